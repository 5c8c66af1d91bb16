// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Supervisor call routines
//!
//! An SVC instruction traps into one of five built-in routines, selected
//! by the trap number in TR. Arguments travel on the stack; because the
//! CPU has already pushed the `(pc, FP)` frame when a routine runs, the
//! first argument sits at `FP - 2`, the second at `FP - 3`, and so on.
//! Each routine returns the number of argument words the CPU must drop
//! from the stack after the frame is popped.
//!
//! | trap | name  | args | effect                                        |
//! |------|-------|------|-----------------------------------------------|
//! | 11   | HALT  | 0    | stop the machine                              |
//! | 12   | READ  | 1    | read an integer from KBD into `*arg0`         |
//! | 13   | WRITE | 1    | write `arg0` to CRT                           |
//! | 14   | TIME  | 3    | seconds, minutes, hours into `*arg0..*arg2`   |
//! | 15   | DATE  | 3    | day, month, year into `*arg0..*arg2`          |
//!
//! All memory traffic goes through the MMU, so bad pointers surface as
//! forbidden-access faults. The `emulate_bugs` flag reproduces two quirks
//! of TitoKone 1.203: READ consumes a second, ignored argument, and DATE
//! reports the month 0-based.

use chrono::{Datelike, Local, Timelike};

use super::devices::DeviceBus;
use super::instruction::Register;
use super::machine::{Machine, StatusFlags};

/// Supervisor call dispatcher
///
/// Holds the behavior toggles the routines branch on. Construction-time
/// state only; the dispatcher itself is immutable while the machine runs.
pub struct Supervisor {
    emulate_bugs: bool,
}

impl Supervisor {
    /// Trap number of HALT
    pub const HALT: i32 = 11;

    /// Trap number of READ
    pub const READ: i32 = 12;

    /// Trap number of WRITE
    pub const WRITE: i32 = 13;

    /// Trap number of TIME
    pub const TIME: i32 = 14;

    /// Trap number of DATE
    pub const DATE: i32 = 15;

    /// Create a dispatcher
    ///
    /// # Arguments
    ///
    /// * `emulate_bugs` - reproduce the TitoKone 1.203 quirks in READ and
    ///   DATE
    pub fn new(emulate_bugs: bool) -> Self {
        Self { emulate_bugs }
    }

    /// Execute the supervisor call selected by TR
    ///
    /// # Returns
    ///
    /// The number of argument words to drop from the stack. An unknown
    /// trap number sets the unknown-instruction bit and returns 0.
    pub fn dispatch(&self, machine: &mut Machine, devices: &mut DeviceBus) -> i32 {
        match machine.tr {
            Self::HALT => self.svc_halt(machine),
            Self::READ => self.svc_read(machine, devices),
            Self::WRITE => self.svc_write(machine, devices),
            Self::TIME => self.svc_time(machine),
            Self::DATE => self.svc_date(machine),
            other => {
                log::error!("invalid supervisor call: {}", other);
                machine.sr.insert(StatusFlags::UNKNOWN_INSTRUCTION);
                0
            }
        }
    }

    /// Read the argument word at `FP - slot` into MBR
    fn load_argument(&self, machine: &mut Machine, slot: i32) {
        machine.mar = machine.r[Register::FP.index()].wrapping_sub(slot);
        machine.mmu_read();
    }

    /// Write `value` through the pointer stored in the argument word at
    /// `FP - slot`
    fn store_through_argument(&self, machine: &mut Machine, slot: i32, value: i32) {
        self.load_argument(machine, slot);
        machine.mar = machine.mbr;
        machine.mbr = value;
        machine.mmu_write();
    }

    /// HALT: stop the machine
    fn svc_halt(&self, machine: &mut Machine) -> i32 {
        machine.halted = true;
        log::info!("halted");
        0
    }

    /// READ: read an integer from the keyboard into the variable whose
    /// address is on the stack
    ///
    /// TitoKone 1.203 made READ take two arguments and ignore the second
    /// one; under `emulate_bugs` the argument is read from one slot lower
    /// and both words are dropped.
    fn svc_read(&self, machine: &mut Machine, devices: &mut DeviceBus) -> i32 {
        log::debug!("SVC READ");
        let slot = if self.emulate_bugs { 3 } else { 2 };

        self.load_argument(machine, slot); // address of the destination variable
        machine.mar = machine.mbr;
        match devices.read_integer(DeviceBus::KBD) {
            Some(value) => {
                machine.mbr = value;
                machine.mmu_write();
            }
            None => {
                machine.sr.insert(StatusFlags::FORBIDDEN_ACCESS);
            }
        }

        if self.emulate_bugs {
            2
        } else {
            1
        }
    }

    /// WRITE: write the integer on the stack to the display
    fn svc_write(&self, machine: &mut Machine, devices: &mut DeviceBus) -> i32 {
        log::debug!("SVC WRITE");
        self.load_argument(machine, 2); // the value itself, not a pointer
        if devices.write_integer(DeviceBus::CRT, machine.mbr).is_none() {
            machine.sr.insert(StatusFlags::FORBIDDEN_ACCESS);
        }
        1
    }

    /// TIME: store the current local time through the three pointers on
    /// the stack (seconds, minutes, hours)
    fn svc_time(&self, machine: &mut Machine) -> i32 {
        let now = Local::now();
        log::debug!("SVC TIME, now is {}", now.format("%H:%M:%S"));

        self.store_through_argument(machine, 2, now.second() as i32);
        self.store_through_argument(machine, 3, now.minute() as i32);
        self.store_through_argument(machine, 4, now.hour() as i32);
        3
    }

    /// DATE: store the current local date through the three pointers on
    /// the stack (day, month, year)
    ///
    /// TitoKone 1.203 reported the month 0-based; `emulate_bugs`
    /// reproduces that.
    fn svc_date(&self, machine: &mut Machine) -> i32 {
        let now = Local::now();
        log::debug!("SVC DATE, now is {}", now.format("%Y-%m-%d"));

        let month = if self.emulate_bugs {
            now.month0()
        } else {
            now.month()
        };

        self.store_through_argument(machine, 2, now.day() as i32);
        self.store_through_argument(machine, 3, month as i32);
        self.store_through_argument(machine, 4, now.year());
        3
    }
}

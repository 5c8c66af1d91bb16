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

//! Instructions involving the outside world: IN, OUT, and SVC

use crate::core::devices::DeviceBus;
use crate::core::instruction::Instruction;
use crate::core::machine::{Machine, StatusFlags};
use crate::core::supervisor::Supervisor;

impl Machine {
    /// IN: read one integer from the device named by TR into the
    /// first-operand register
    ///
    /// A missing device, a device of the wrong direction, or an
    /// unavailable stream sets the forbidden-access bit.
    pub(super) fn exec_in(&mut self, instr: Instruction, devices: &mut DeviceBus) {
        log::trace!("reading input from device {}", self.tr);
        match devices.read_integer(self.tr) {
            Some(value) => {
                self.r[instr.first().index()] = value;
            }
            None => {
                self.sr.insert(StatusFlags::FORBIDDEN_ACCESS);
            }
        }
    }

    /// OUT: write the first-operand register to the device named by TR
    pub(super) fn exec_out(&mut self, instr: Instruction, devices: &mut DeviceBus) {
        log::trace!("writing output to device {}", self.tr);
        let value = self.r[instr.first().index()];
        if devices.write_integer(self.tr, value).is_none() {
            self.sr.insert(StatusFlags::FORBIDDEN_ACCESS);
        }
    }

    /// SVC: trap into a supervisor routine
    ///
    /// Pushes the return frame like CALL, dispatches on the trap number in
    /// TR, and, unless the routine halted the machine, pops the frame back
    /// and removes the routine's stack arguments.
    pub(super) fn exec_svc(
        &mut self,
        instr: Instruction,
        devices: &mut DeviceBus,
        supervisor: &Supervisor,
    ) {
        let sp = instr.first();
        self.push_frame(sp);
        log::debug!("supervisor call {}, FP = 0x{:x}", self.tr, self.r[7]);

        let params = supervisor.dispatch(self, devices);

        if !self.halted {
            self.pop_frame(sp);
            self.r[sp.index()] = self.r[sp.index()].wrapping_sub(params);
        }
    }
}

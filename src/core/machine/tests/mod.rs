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

//! Machine test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: construction, reset, register access, program loading, halt
//! - `alu`: the twelve ALU operations and their fault semantics
//! - `mmu`: address translation and the base/limit window
//! - `operand`: second-operand computation across the addressing modes
//! - `transfer`: LOAD, STORE, IN, OUT
//! - `arithmetic`: the arithmetic instruction class and COMP
//! - `jump`: unconditional, register-conditional, and status-conditional
//! - `stack`: PUSH/POP/PUSHR/POPR, CALL/EXIT, and the SVC frame

use crate::core::config::EmulatorConfig;
use crate::core::devices::DeviceBus;
use crate::core::error::Fault;
use crate::core::machine::Machine;
use crate::core::supervisor::Supervisor;



#[cfg(test)]
mod basic;


#[cfg(test)]
mod mmu;




/// A machine whose whole memory is accessible (base 0, limit = size)
pub fn test_machine(mem_size: usize) -> Machine {
    Machine::new(&EmulatorConfig {
        mem_size,
        ..EmulatorConfig::default()
    })
    .expect("test configuration is valid")
}

/// Step with a throwaway device table and default supervisor
pub fn step(machine: &mut Machine) -> Result<(), Fault> {
    let mut devices = DeviceBus::new();
    let supervisor = Supervisor::new(false);
    machine.step(&mut devices, &supervisor)
}

/// Step and expect the cycle to complete without faulting
pub fn step_ok(machine: &mut Machine) {
    step(machine).expect("step should not fault");
}

/// Run until HALT, with a bound against runaway programs
pub fn run_until_halt(machine: &mut Machine) {
    for _ in 0..10_000 {
        if machine.halted {
            return;
        }
        step_ok(machine);
    }
    panic!("program did not halt");
}

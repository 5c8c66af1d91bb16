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

use super::*;
use crate::core::error::EmulatorError;
use crate::core::instruction::Register;
use crate::core::loader::{Program, Segment, SymbolTable};
use crate::core::machine::StatusFlags;

fn program(code: Vec<i32>, data: Vec<i32>) -> Program {
    let code_end = code.len() as i32 - 1;
    let data_start = code.len() as i32;
    let data_end = data_start + data.len() as i32 - 1;
    Program {
        code: Segment {
            start: 0,
            end: code_end,
            words: code,
        },
        data: Segment {
            start: data_start,
            end: data_end,
            words: data,
        },
        symbols: SymbolTable::new(),
    }
}

#[test]
fn test_machine_initialization() {
    let machine = test_machine(64);
    assert_eq!(machine.pc(), 0);
    assert_eq!(machine.sr(), StatusFlags::empty());
    assert_eq!(machine.mmu_base(), 0);
    assert_eq!(machine.mmu_limit(), 64);
    assert_eq!(machine.mem().len(), 64);
    assert!(!machine.halted());
    for i in 0..8 {
        assert_eq!(machine.r[i], 0);
    }
}

#[test]
fn test_invalid_configuration_rejected() {
    let result = Machine::new(&EmulatorConfig {
        mem_size: 8,
        mmu_base: 4,
        mmu_limit: Some(5),
        ..EmulatorConfig::default()
    });
    assert!(matches!(result, Err(EmulatorError::Config(_))));
}

#[test]
fn test_register_read_write() {
    let mut machine = test_machine(16);
    machine.set_reg(Register::R5, 0x12345678);
    assert_eq!(machine.reg(Register::R5), 0x12345678);
    machine.set_reg(Register::SP, -7);
    assert_eq!(machine.reg(Register::R6), -7);
}

#[test]
fn test_reset_clears_state() {
    let mut machine = test_machine(16);
    machine.set_reg(Register::R1, -1);
    machine.pc = 9;
    machine.tr = 3;
    machine.sr = StatusFlags::OVERFLOW;
    machine.mem[3] = 42;
    machine.halted = true;

    machine.reset();

    assert_eq!(machine.reg(Register::R1), 0);
    assert_eq!(machine.pc(), 0);
    assert_eq!(machine.tr(), 0);
    assert_eq!(machine.sr(), StatusFlags::empty());
    assert_eq!(machine.mem[3], 0);
    assert!(!machine.halted());
}

#[test]
fn test_load_program_seeds_pointers() {
    let mut machine = test_machine(32);
    let program = program(vec![1891631115], vec![42, 7]);

    machine.load_program(&program).unwrap();

    assert_eq!(machine.mem[0], 1891631115);
    assert_eq!(machine.mem[1], 42);
    assert_eq!(machine.mem[2], 7);
    assert_eq!(machine.reg(Register::FP), 0); // end of code
    assert_eq!(machine.reg(Register::SP), 2); // end of data
    assert_eq!(machine.pc(), 0);
    assert!(!machine.halted());
}

#[test]
fn test_load_program_honors_mmu_base() {
    let mut machine = Machine::new(&EmulatorConfig {
        mem_size: 32,
        mmu_base: 10,
        ..EmulatorConfig::default()
    })
    .unwrap();
    let program = program(vec![123], vec![456]);

    machine.load_program(&program).unwrap();

    // physically offset by the base, logically still at 0
    assert_eq!(machine.mem[10], 123);
    assert_eq!(machine.mem[11], 456);
    assert_eq!(machine.mem[0], 0);
}

#[test]
fn test_oversized_program_rejected() {
    let mut machine = Machine::new(&EmulatorConfig {
        mem_size: 32,
        mmu_limit: Some(2),
        ..EmulatorConfig::default()
    })
    .unwrap();
    let program = program(vec![1, 2, 3], vec![]);

    let result = machine.load_program(&program);
    assert!(matches!(
        result,
        Err(EmulatorError::ProgramTooLarge {
            address: 2,
            limit: 2
        })
    ));
}

#[test]
fn test_halted_machine_does_not_step() {
    let mut machine = test_machine(16);
    machine.mem[0] = -1; // would fault as an unknown opcode
    machine.halted = true;

    assert!(step(&mut machine).is_ok());
    assert_eq!(machine.pc(), 0);
    assert_eq!(machine.sr(), StatusFlags::empty());
}

#[test]
fn test_pending_fault_mapping() {
    let mut machine = test_machine(16);
    assert_eq!(machine.pending_fault(), None);

    machine.sr = StatusFlags::GREATER;
    assert_eq!(machine.pending_fault(), None);

    machine.sr = StatusFlags::OVERFLOW;
    assert_eq!(machine.pending_fault(), Some(Fault::Overflow));

    machine.sr = StatusFlags::DIVIDE_BY_ZERO;
    assert_eq!(machine.pending_fault(), Some(Fault::DivisionByZero));

    machine.sr = StatusFlags::UNKNOWN_INSTRUCTION;
    assert_eq!(machine.pending_fault(), Some(Fault::UnknownInstruction));

    machine.sr = StatusFlags::FORBIDDEN_ACCESS;
    assert_eq!(machine.pending_fault(), Some(Fault::ForbiddenAccess));
}

#[test]
fn test_unknown_opcode_faults() {
    let mut machine = test_machine(16);
    machine.mem[0] = -1; // opcode byte 0xff

    assert_eq!(step(&mut machine), Err(Fault::UnknownInstruction));
    assert!(machine.sr().contains(StatusFlags::UNKNOWN_INSTRUCTION));
    // the pre-increment of the program counter stays visible
    assert_eq!(machine.pc(), 1);
}

#[test]
fn test_fetch_beyond_limit_faults() {
    let mut machine = Machine::new(&EmulatorConfig {
        mem_size: 16,
        mmu_limit: Some(2),
        ..EmulatorConfig::default()
    })
    .unwrap();
    machine.pc = 2;

    assert_eq!(step(&mut machine), Err(Fault::ForbiddenAccess));
    assert_eq!(machine.pc(), 3);
}

#[test]
fn test_nop_has_no_effect() {
    let mut machine = test_machine(16);
    machine.mem[0] = 0; // NOP
    machine.set_reg(Register::R1, 99);

    step_ok(&mut machine);

    assert_eq!(machine.pc(), 1);
    assert_eq!(machine.reg(Register::R1), 99);
    assert_eq!(machine.sr(), StatusFlags::empty());
}

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

//! The instruction cycle
//!
//! One step runs three stages: fetch, second-operand computation, and
//! execute. Each stage may deposit bits into the status register; after
//! each stage any pending fault bit aborts the step, leaves already
//! committed state in place (the pre-incremented program counter stays
//! visible), and ends the run.
//!
//! Instruction implementations are organized by class:
//! - `transfer`: STORE, LOAD
//! - `arithmetic`: the ALU operations and COMP
//! - `jump`: JUMP and the conditional jumps
//! - `stack`: PUSH, POP, PUSHR, POPR, CALL, EXIT and the frame helpers
//! - `external`: IN, OUT, SVC

use crate::core::devices::DeviceBus;
use crate::core::error::Fault;
use crate::core::instruction::{Instruction, Opcode, Register};
use crate::core::machine::{Machine, StatusFlags};
use crate::core::supervisor::Supervisor;

mod arithmetic;
mod external;
mod jump;
mod stack;
mod transfer;

impl Machine {
    /// Perform one execution cycle
    ///
    /// Fetches the next instruction, computes its second operand into TR,
    /// and executes it. A halted machine does nothing.
    ///
    /// # Arguments
    ///
    /// * `devices` - device table for IN, OUT, and the supervisor routines
    /// * `supervisor` - supervisor call dispatcher
    ///
    /// # Returns
    ///
    /// - `Ok(())` when the cycle completed (or the machine halted cleanly)
    /// - `Err(Fault)` when a fault bit terminated the step; the machine
    ///   state is left as the aborted step produced it
    pub fn step(
        &mut self,
        devices: &mut DeviceBus,
        supervisor: &Supervisor,
    ) -> std::result::Result<(), Fault> {
        if self.halted {
            return Ok(());
        }

        self.fetch_instruction();
        if let Some(fault) = self.pending_fault() {
            return Err(fault);
        }

        log::debug!("executing {}", Instruction::from_word(self.ir));

        self.compute_second_operand();
        if let Some(fault) = self.pending_fault() {
            return Err(fault);
        }

        self.execute_instruction(devices, supervisor);
        if let Some(fault) = self.pending_fault() {
            return Err(fault);
        }

        log::trace!("instruction finished");
        Ok(())
    }

    /// Fetch the next instruction into IR
    ///
    /// The program counter is incremented before the fetch completes, so
    /// it stays incremented even when the fetch faults.
    pub(crate) fn fetch_instruction(&mut self) {
        log::trace!("fetching instruction at 0x{:x}", self.pc);
        self.mar = self.pc;
        self.pc = self.pc.wrapping_add(1);
        self.mmu_read();
        self.ir = self.mbr;
    }

    /// Calculate the second operand of the current instruction into TR
    ///
    /// The address part and the index register value are added in the ALU
    /// (overflow propagates), then the addressing mode determines how many
    /// times TR is replaced by the word it points to. A fault on the first
    /// indirection prevents the second.
    pub(crate) fn compute_second_operand(&mut self) {
        let instr = Instruction::from_word(self.ir);

        self.alu_in1 = instr.addr() as i32;
        self.alu_in2 = if instr.index() != Register::R0 {
            self.r[instr.index().index()]
        } else {
            0
        };

        self.alu_add();
        if self.sr.contains(StatusFlags::OVERFLOW) {
            return;
        }
        self.tr = self.alu_out;

        let fetches = match instr.mode() {
            Some(mode) => mode.fetch_count(),
            None => {
                log::error!("invalid addressing mode in 0x{:08x}", self.ir as u32);
                self.sr.insert(StatusFlags::UNKNOWN_INSTRUCTION);
                return;
            }
        };

        for round in 0..fetches {
            self.mar = self.tr;
            self.mmu_read();
            if self.sr.contains(StatusFlags::FORBIDDEN_ACCESS) {
                return;
            }
            self.tr = self.mbr;
            log::trace!(
                "second operand {}/{}: 0x{:x} ({})",
                round + 1,
                fetches,
                self.tr,
                self.tr
            );
        }
    }

    /// Execute the current instruction
    ///
    /// Assumes the instruction has been fetched and its second operand
    /// stored into TR. An opcode byte with no matching operation sets the
    /// unknown-instruction bit.
    fn execute_instruction(&mut self, devices: &mut DeviceBus, supervisor: &Supervisor) {
        let instr = Instruction::from_word(self.ir);
        let Some(opcode) = instr.opcode() else {
            log::error!("unknown opcode: 0x{:02x}", instr.opcode_bits());
            self.sr.insert(StatusFlags::UNKNOWN_INSTRUCTION);
            return;
        };

        match opcode {
            Opcode::Nop => {}
            Opcode::Store => self.exec_store(instr),
            Opcode::Load => self.exec_load(instr),
            Opcode::In => self.exec_in(instr, devices),
            Opcode::Out => self.exec_out(instr, devices),
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Shl
            | Opcode::Shr
            | Opcode::Not
            | Opcode::Shra => self.exec_arithmetic(opcode, instr),
            Opcode::Comp => self.exec_comp(instr),
            Opcode::Jump
            | Opcode::Jneg
            | Opcode::Jzer
            | Opcode::Jpos
            | Opcode::Jnneg
            | Opcode::Jnzer
            | Opcode::Jnpos
            | Opcode::Jles
            | Opcode::Jequ
            | Opcode::Jgre
            | Opcode::Jnles
            | Opcode::Jnequ
            | Opcode::Jngre => self.exec_jump(opcode, instr),
            Opcode::Call => self.exec_call(instr),
            Opcode::Exit => self.exec_exit(instr),
            Opcode::Push => self.exec_push(instr),
            Opcode::Pop => self.exec_pop(instr),
            Opcode::Pushr => self.exec_pushr(instr),
            Opcode::Popr => self.exec_popr(instr),
            Opcode::Svc => self.exec_svc(instr, devices, supervisor),
        }
    }
}

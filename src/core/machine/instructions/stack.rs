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

//! Stack and subroutine instructions
//!
//! The stack grows upward: PUSH first increments the stack register, then
//! stores. Any register can serve as the stack pointer; the instruction's
//! first operand names it. CALL and SVC push the frame `(pc, FP)` in that
//! order and EXIT pops it in reverse.

use crate::core::instruction::{Instruction, Register};
use crate::core::machine::Machine;

impl Machine {
    /// Push PC and FP onto the stack and point FP at the new frame
    pub(super) fn push_frame(&mut self, sp: Register) {
        let sp = sp.index();
        self.mar = self.r[sp].wrapping_add(1);
        self.mbr = self.pc;
        self.mmu_write();
        self.mar = self.mar.wrapping_add(1);
        self.mbr = self.r[Register::FP.index()];
        self.mmu_write();
        self.r[sp] = self.r[sp].wrapping_add(2);
        self.r[Register::FP.index()] = self.r[sp];
    }

    /// Pop FP and PC off the stack
    pub(super) fn pop_frame(&mut self, sp: Register) {
        let sp = sp.index();
        self.mar = self.r[sp];
        self.mmu_read();
        let fp = self.mbr;
        self.mar = self.mar.wrapping_sub(1);
        self.mmu_read();
        self.r[sp] = self.r[sp].wrapping_sub(2);
        self.r[Register::FP.index()] = fp;
        self.pc = self.mbr;
    }

    /// CALL: push the return frame and jump to the address in TR
    pub(super) fn exec_call(&mut self, instr: Instruction) {
        self.push_frame(instr.first());
        self.pc = self.tr;
    }

    /// EXIT: pop the return frame, then drop the caller-pushed parameters
    ///
    /// TR holds the parameter count to remove from the stack.
    pub(super) fn exec_exit(&mut self, instr: Instruction) {
        let sp = instr.first();
        self.pop_frame(sp);
        self.r[sp.index()] = self.r[sp.index()].wrapping_sub(self.tr);
    }

    /// PUSH: increment the stack register, then store TR through it
    pub(super) fn exec_push(&mut self, instr: Instruction) {
        let sp = instr.first().index();
        self.r[sp] = self.r[sp].wrapping_add(1);
        self.mar = self.r[sp];
        self.mbr = self.tr;
        self.mmu_write();
    }

    /// POP: load through the stack register into the index register, then
    /// decrement
    ///
    /// When the same register is both stack pointer and destination, the
    /// popped value is overwritten by the decrement. That corner case is
    /// observable and intentional.
    pub(super) fn exec_pop(&mut self, instr: Instruction) {
        let sp = instr.first().index();
        self.mar = self.r[sp];
        self.mmu_read();
        self.r[instr.index().index()] = self.mbr;
        self.r[sp] = self.r[sp].wrapping_sub(1);
    }

    /// PUSHR: push R0 through R6 using the PUSH rule
    ///
    /// Because the stack register increments before each store, the value
    /// pushed for the register serving as stack pointer is its already
    /// incremented value.
    pub(super) fn exec_pushr(&mut self, instr: Instruction) {
        let sp = instr.first().index();
        for reg in 0..=Register::SP.index() {
            self.r[sp] = self.r[sp].wrapping_add(1);
            self.mar = self.r[sp];
            self.mbr = self.r[reg];
            self.mmu_write();
        }
    }

    /// POPR: pop seven words, restoring R6 down to R0 using the POP rule
    pub(super) fn exec_popr(&mut self, instr: Instruction) {
        let sp = instr.first().index();
        for reg in (0..=Register::SP.index()).rev() {
            self.mar = self.r[sp];
            self.mmu_read();
            self.r[reg] = self.mbr;
            self.r[sp] = self.r[sp].wrapping_sub(1);
        }
    }
}

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

use crate::core::instruction::{Instruction, Opcode};
use crate::core::machine::{Machine, StatusFlags};

impl Machine {
    /// Route an arithmetic/logic instruction through the ALU
    ///
    /// The first-operand register and TR are latched into the ALU inputs.
    /// The register is only written back when the operation neither
    /// overflowed nor divided by zero.
    pub(super) fn exec_arithmetic(&mut self, opcode: Opcode, instr: Instruction) {
        self.alu_in1 = self.r[instr.first().index()];
        self.alu_in2 = self.tr;

        match opcode {
            Opcode::Add => self.alu_add(),
            Opcode::Sub => self.alu_sub(),
            Opcode::Mul => self.alu_mul(),
            Opcode::Div => self.alu_div(),
            Opcode::Mod => self.alu_mod(),
            Opcode::And => self.alu_and(),
            Opcode::Or => self.alu_or(),
            Opcode::Xor => self.alu_xor(),
            Opcode::Shl => self.alu_shl(),
            Opcode::Shr => self.alu_shr(),
            Opcode::Not => self.alu_not(),
            Opcode::Shra => self.alu_shra(),
            _ => {
                log::error!("non-arithmetic opcode {} routed to the ALU", opcode);
            }
        }

        if self
            .sr
            .intersects(StatusFlags::OVERFLOW | StatusFlags::DIVIDE_BY_ZERO)
        {
            return;
        }

        self.r[instr.first().index()] = self.alu_out;
    }

    /// COMP: compare the first-operand register against TR (signed)
    ///
    /// The three comparison bits are cleared first, then exactly one is
    /// set.
    pub(super) fn exec_comp(&mut self, instr: Instruction) {
        self.sr.remove(StatusFlags::COMPARISON);

        let a = self.r[instr.first().index()];
        let b = self.tr;

        if a < b {
            self.sr.insert(StatusFlags::LESS);
        } else if a == b {
            self.sr.insert(StatusFlags::EQUAL);
        } else {
            self.sr.insert(StatusFlags::GREATER);
        }
    }
}

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
    /// Execute a jump instruction
    ///
    /// Register-conditional jumps test the sign or zeroness of the
    /// first-operand register; status-conditional jumps test the
    /// comparison bits of the last COMP. When the predicate holds, the
    /// program counter is replaced by TR.
    pub(super) fn exec_jump(&mut self, opcode: Opcode, instr: Instruction) {
        let a = self.r[instr.first().index()];
        let sr = self.sr;

        let jump = match opcode {
            Opcode::Jump => true,

            Opcode::Jneg => a < 0,
            Opcode::Jzer => a == 0,
            Opcode::Jpos => a > 0,
            Opcode::Jnneg => a >= 0,
            Opcode::Jnzer => a != 0,
            Opcode::Jnpos => a <= 0,

            Opcode::Jles => sr.contains(StatusFlags::LESS),
            Opcode::Jequ => sr.contains(StatusFlags::EQUAL),
            Opcode::Jgre => sr.contains(StatusFlags::GREATER),
            Opcode::Jnles => !sr.contains(StatusFlags::LESS),
            Opcode::Jnequ => !sr.contains(StatusFlags::EQUAL),
            Opcode::Jngre => !sr.contains(StatusFlags::GREATER),

            _ => {
                log::error!("non-jump opcode {} routed to the jump unit", opcode);
                false
            }
        };

        if jump {
            self.pc = self.tr;
        }
    }
}

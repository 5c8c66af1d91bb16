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

use crate::core::instruction::Instruction;
use crate::core::machine::Machine;

impl Machine {
    /// STORE: write the first-operand register to the address in TR
    ///
    /// Note the asymmetry with LOAD: TR names a memory location here, so
    /// STORE with immediate addressing writes to the address the constant
    /// evaluates to.
    pub(super) fn exec_store(&mut self, instr: Instruction) {
        self.mar = self.tr;
        self.mbr = self.r[instr.first().index()];
        self.mmu_write();
    }

    /// LOAD: copy the second operand into the first-operand register
    pub(super) fn exec_load(&mut self, instr: Instruction) {
        self.r[instr.first().index()] = self.tr;
    }
}

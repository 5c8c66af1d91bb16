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

//! Memory management unit
//!
//! The emulated program addresses memory through a logical window: a
//! logical address `L` is valid iff `0 <= L < mmu_limit` and maps to the
//! physical word `mmu_base + L`. Every access goes through MAR and MBR;
//! the instruction cycle never touches the memory array directly.

use super::{Machine, StatusFlags};

impl Machine {
    /// Whether MAR holds a logical address inside the MMU window
    fn mar_in_window(&self) -> bool {
        self.mar >= 0 && self.mar < self.mmu_limit
    }

    /// Read a word from memory
    ///
    /// Translates MAR and copies the addressed word into MBR. An address
    /// outside the window sets the forbidden-access bit and leaves MBR
    /// unchanged.
    pub(crate) fn mmu_read(&mut self) {
        if !self.mar_in_window() {
            log::error!(
                "tried to read from logical address 0x{:x} ({}) (base = {}, limit = {} words); \
                 try adding more memory with --mem-size, or raising --mmu-limit",
                self.mar,
                self.mar,
                self.mmu_base,
                self.mmu_limit
            );
            self.sr.insert(StatusFlags::FORBIDDEN_ACCESS);
            return;
        }

        self.mbr = self.mem[(self.mmu_base + self.mar) as usize];
        log::trace!("read 0x{:x} from logical 0x{:x}", self.mbr, self.mar);
    }

    /// Write a word to memory
    ///
    /// Translates MAR and stores MBR at the addressed word. An address
    /// outside the window sets the forbidden-access bit and leaves memory
    /// unchanged.
    pub(crate) fn mmu_write(&mut self) {
        if !self.mar_in_window() {
            log::error!(
                "tried to write to logical address 0x{:x} ({}) (base = {}, limit = {} words); \
                 try adding more memory with --mem-size, or raising --mmu-limit",
                self.mar,
                self.mar,
                self.mmu_base,
                self.mmu_limit
            );
            self.sr.insert(StatusFlags::FORBIDDEN_ACCESS);
            return;
        }

        self.mem[(self.mmu_base + self.mar) as usize] = self.mbr;
        log::trace!("wrote 0x{:x} to logical 0x{:x}", self.mbr, self.mar);
    }
}

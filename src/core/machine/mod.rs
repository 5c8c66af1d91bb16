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

//! TTK-91 machine emulation
//!
//! # Specifications
//! - Architecture: TTK-91 (32-bit, word-addressed)
//! - Registers: 8 general-purpose registers (R6 = SP, R7 = FP)
//! - Memory: owned array of 32-bit signed words behind a base/limit MMU
//!
//! The contents of [`Machine`] define the state of the emulator
//! completely. One [`Machine::step`] runs a full fetch, second-operand
//! computation, and execute cycle; faults abort the step by depositing a
//! bit into the status register.

use bitflags::bitflags;

use super::config::EmulatorConfig;
use super::error::{EmulatorError, Fault, Result};
use super::instruction::Register;
use super::loader::Program;

mod alu;
mod instructions;
mod mmu;

#[cfg(test)]
mod tests;

bitflags! {
    /// The status register bits
    ///
    /// The comparison bits record the outcome of the last COMP and are
    /// mutually exclusive. The four fault bits terminate the run when set.
    /// The bits below `FORBIDDEN_ACCESS` are reserved and never written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusFlags: u32 {
        /// The first operand was greater than the second in a COMP
        const GREATER = 1 << 31;
        /// The operands were equal in a COMP
        const EQUAL = 1 << 30;
        /// The first operand was less than the second in a COMP
        const LESS = 1 << 29;
        /// The result of an arithmetic operation did not fit into 32 bits
        const OVERFLOW = 1 << 28;
        /// A division by zero has occurred
        const DIVIDE_BY_ZERO = 1 << 27;
        /// An unknown opcode or addressing mode was encountered
        const UNKNOWN_INSTRUCTION = 1 << 26;
        /// The program tried to access memory beyond its limits, or an
        /// invalid device
        const FORBIDDEN_ACCESS = 1 << 25;
        /// Device interrupt (reserved, unused)
        const DEVICE_INTERRUPT = 1 << 24;
        /// Supervisor call (reserved, unused)
        const SUPERVISOR_CALL = 1 << 23;
        /// Privileged mode (reserved, unused)
        const PRIVILEGED_MODE = 1 << 22;
        /// Interrupts disabled (reserved, unused)
        const INTERRUPTS_DISABLED = 1 << 21;

        /// The outcome bits of a COMP
        const COMPARISON = Self::GREATER.bits() | Self::EQUAL.bits() | Self::LESS.bits();
        /// The bits that terminate a run
        const FAULTS = Self::OVERFLOW.bits()
            | Self::DIVIDE_BY_ZERO.bits()
            | Self::UNKNOWN_INSTRUCTION.bits()
            | Self::FORBIDDEN_ACCESS.bits();
    }
}

/// The complete TTK-91 machine state
///
/// # Example
///
/// ```
/// use rkone::core::config::EmulatorConfig;
/// use rkone::core::instruction::Register;
/// use rkone::core::machine::Machine;
///
/// let machine = Machine::new(&EmulatorConfig::default()).unwrap();
/// assert_eq!(machine.reg(Register::R0), 0);
/// assert!(!machine.halted());
/// ```
pub struct Machine {
    /// The working registers R0 to R7
    pub(crate) r: [i32; 8],

    /// The first ALU operand register
    pub(crate) alu_in1: i32,

    /// The second ALU operand register
    pub(crate) alu_in2: i32,

    /// The ALU result register
    pub(crate) alu_out: i32,

    /// The temporary register; holds the computed second operand and the
    /// supervisor call number
    pub(crate) tr: i32,

    /// The program counter; points to the next instruction in memory
    pub(crate) pc: i32,

    /// The instruction register; contains the currently executing
    /// instruction
    pub(crate) ir: i32,

    /// The status register
    pub(crate) sr: StatusFlags,

    /// The MMU base register; added to every memory address before the
    /// memory array is accessed
    pub(crate) mmu_base: i32,

    /// The MMU limit register; how many words from `mmu_base` the program
    /// may access
    pub(crate) mmu_limit: i32,

    /// The memory address register
    pub(crate) mar: i32,

    /// The memory buffer register
    pub(crate) mbr: i32,

    /// The memory array
    pub(crate) mem: Vec<i32>,

    /// True once the machine has executed a HALT supervisor call
    pub(crate) halted: bool,
}

impl Machine {
    /// Create a machine from a validated configuration
    ///
    /// Memory and registers start zeroed. The MMU window is taken from the
    /// configuration and upholds `mmu_base + mmu_limit <= mem_size`.
    ///
    /// # Returns
    ///
    /// - `Ok(Machine)` ready for [`Machine::load_program`]
    /// - `Err(EmulatorError::Config)` if the configuration is inconsistent
    pub fn new(config: &EmulatorConfig) -> Result<Self> {
        config.validate()?;
        log::debug!("allocating {} words of emulator memory", config.mem_size);
        Ok(Self {
            r: [0; 8],
            alu_in1: 0,
            alu_in2: 0,
            alu_out: 0,
            tr: 0,
            pc: 0,
            ir: 0,
            sr: StatusFlags::empty(),
            mmu_base: config.mmu_base,
            mmu_limit: config.resolved_limit(),
            mar: 0,
            mbr: 0,
            mem: vec![0; config.mem_size],
            halted: false,
        })
    }

    /// Zero registers, latches, status bits, and memory
    ///
    /// The MMU window is kept; this is the `--zero` behavior for a machine
    /// image that is being reused.
    pub fn reset(&mut self) {
        log::info!("zeroing machine state");
        self.r = [0; 8];
        self.alu_in1 = 0;
        self.alu_in2 = 0;
        self.alu_out = 0;
        self.tr = 0;
        self.pc = 0;
        self.ir = 0;
        self.sr = StatusFlags::empty();
        self.mar = 0;
        self.mbr = 0;
        self.mem.fill(0);
        self.halted = false;
    }

    /// Load a parsed program image
    ///
    /// Code and data words are written through the MMU window starting at
    /// their logical addresses. Afterwards FP points to the end of the code
    /// segment, SP to the end of the data segment, and the machine is ready
    /// to run from logical address 0.
    ///
    /// # Returns
    ///
    /// - `Ok(())` when the whole image fits under the MMU limit
    /// - `Err(EmulatorError::ProgramTooLarge)` otherwise
    pub fn load_program(&mut self, program: &Program) -> Result<()> {
        for segment in [&program.code, &program.data] {
            for (offset, &word) in segment.words.iter().enumerate() {
                let address = segment.start + offset as i32;
                if address < 0 || address >= self.mmu_limit {
                    log::error!(
                        "the program is too big to fit in mmu_limit = {} words",
                        self.mmu_limit
                    );
                    return Err(EmulatorError::ProgramTooLarge {
                        address,
                        limit: self.mmu_limit,
                    });
                }
                self.mem[(self.mmu_base + address) as usize] = word;
            }
        }

        self.r[Register::FP.index()] = program.code.end;
        log::info!("frame pointer set to 0x{:x}", program.code.end);
        self.r[Register::SP.index()] = program.data.end;
        log::info!("stack pointer set to 0x{:x}", program.data.end);

        self.pc = 0;
        self.sr = StatusFlags::empty();
        self.halted = false;
        Ok(())
    }

    /// Read a working register
    #[inline(always)]
    pub fn reg(&self, register: Register) -> i32 {
        self.r[register.index()]
    }

    /// Write a working register
    #[inline(always)]
    pub fn set_reg(&mut self, register: Register, value: i32) {
        self.r[register.index()] = value;
    }

    /// The fault the status register currently reports, if any
    pub fn pending_fault(&self) -> Option<Fault> {
        if !self.sr.intersects(StatusFlags::FAULTS) {
            return None;
        }
        if self.sr.contains(StatusFlags::OVERFLOW) {
            Some(Fault::Overflow)
        } else if self.sr.contains(StatusFlags::DIVIDE_BY_ZERO) {
            Some(Fault::DivisionByZero)
        } else if self.sr.contains(StatusFlags::UNKNOWN_INSTRUCTION) {
            Some(Fault::UnknownInstruction)
        } else if self.sr.contains(StatusFlags::FORBIDDEN_ACCESS) {
            Some(Fault::ForbiddenAccess)
        } else {
            None
        }
    }

    /// The program counter
    #[inline(always)]
    pub fn pc(&self) -> i32 {
        self.pc
    }

    /// The instruction register
    #[inline(always)]
    pub fn ir(&self) -> i32 {
        self.ir
    }

    /// The temporary register
    #[inline(always)]
    pub fn tr(&self) -> i32 {
        self.tr
    }

    /// The status register
    #[inline(always)]
    pub fn sr(&self) -> StatusFlags {
        self.sr
    }

    /// The first ALU operand latch
    #[inline(always)]
    pub fn alu_in1(&self) -> i32 {
        self.alu_in1
    }

    /// The second ALU operand latch
    #[inline(always)]
    pub fn alu_in2(&self) -> i32 {
        self.alu_in2
    }

    /// The ALU result latch
    #[inline(always)]
    pub fn alu_out(&self) -> i32 {
        self.alu_out
    }

    /// The memory address register
    #[inline(always)]
    pub fn mar(&self) -> i32 {
        self.mar
    }

    /// The memory buffer register
    #[inline(always)]
    pub fn mbr(&self) -> i32 {
        self.mbr
    }

    /// The MMU base register
    #[inline(always)]
    pub fn mmu_base(&self) -> i32 {
        self.mmu_base
    }

    /// The MMU limit register
    #[inline(always)]
    pub fn mmu_limit(&self) -> i32 {
        self.mmu_limit
    }

    /// The memory array, physically addressed
    #[inline(always)]
    pub fn mem(&self) -> &[i32] {
        &self.mem
    }

    /// True once a HALT supervisor call has executed
    #[inline(always)]
    pub fn halted(&self) -> bool {
        self.halted
    }
}

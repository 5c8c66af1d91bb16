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

//! Emulator error types

use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// A run-terminating condition reported through the status register.
///
/// Each variant corresponds to one of the four fault bits. Once any of
/// them is set during a step, the step is aborted and the run ends; the
/// machine state stays available for a post-mortem dump.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The result of an ADD, SUB, or MUL did not fit into 32 bits
    #[error("arithmetic overflow")]
    Overflow,

    /// DIV or MOD with a zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// Unknown opcode, invalid addressing mode, or unknown supervisor call
    #[error("unknown opcode or addressing mode")]
    UnknownInstruction,

    /// Memory access outside the MMU window, or an invalid device access
    #[error("forbidden memory or device access")]
    ForbiddenAccess,
}

/// Emulator error types
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// Invalid configuration, rejected before any machine state exists
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Malformed b91 program text
    #[error("expected {expected} at line {line} but got {got:?}")]
    Parse {
        /// Line number in the program file (1-based)
        line: usize,
        /// The token or construct the parser was looking for
        expected: &'static str,
        /// What was actually found
        got: String,
    },

    /// A program word falls outside the accessible address window
    #[error("program word at address {address} does not fit below mmu_limit = {limit} words")]
    ProgramTooLarge {
        /// Logical address of the offending word
        address: i32,
        /// The MMU limit the program must fit under
        limit: i32,
    },

    /// An execution fault terminated the run
    #[error("execution fault: {0}")]
    Fault(#[from] Fault),

    /// The user quit a step-mode session before the program halted
    #[error("execution stopped by user")]
    Interrupted,

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

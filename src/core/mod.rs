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

//! Core emulation components
//!
//! This module contains all hardware emulation components:
//! - Machine (registers, ALU, MMU, instruction cycle)
//! - Instruction codec
//! - Device table (CRT, KBD, STDIN, STDOUT)
//! - Supervisor call routines
//! - b91 program loader and symbol table
//! - System integration

pub mod config;
pub mod devices;
pub mod error;
pub mod instruction;
pub mod loader;
pub mod machine;
pub mod supervisor;
pub mod system;

// Re-export commonly used types
pub use config::EmulatorConfig;
pub use devices::DeviceBus;
pub use error::{EmulatorError, Fault, Result};
pub use instruction::{AddrMode, Instruction, Opcode, Register};
pub use loader::{Program, Segment, SymbolTable};
pub use machine::{Machine, StatusFlags};
pub use supervisor::Supervisor;
pub use system::System;

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

//! TTK-91 educational computer emulator library
//!
//! This library provides the core emulation components for the TTK-91, a
//! 32-bit word-addressed teaching architecture: the machine state with its
//! ALU and MMU, the instruction codec, the fixed I/O device table, the
//! supervisor call routines, and a loader for the textual "b91" object
//! file format.
//!
//! # Example
//!
//! ```no_run
//! use rkone::core::config::EmulatorConfig;
//! use rkone::core::loader::Program;
//! use rkone::core::system::System;
//!
//! let source = std::fs::read_to_string("program.b91").unwrap();
//! let program = Program::parse(&source).unwrap();
//!
//! let mut system = System::new(&EmulatorConfig::default()).unwrap();
//! system.load_program(&program).unwrap();
//! system.run().unwrap();
//! ```

pub mod core;
pub mod frontend;

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

//! Program builders for end-to-end tests

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use rkone::core::config::EmulatorConfig;
use rkone::core::devices::DeviceBus;
use rkone::core::instruction::{AddrMode, Instruction, Opcode, Register};
use rkone::core::loader::Program;
use rkone::core::system::System;

/// Assemble one instruction word
pub fn instr(op: Opcode, first: Register, mode: AddrMode, index: Register, addr: i16) -> i32 {
    Instruction::new(op, first, mode, index, addr).word()
}

/// Assemble an immediate-mode instruction word with no index register
pub fn imm(op: Opcode, first: Register, addr: i16) -> i32 {
    instr(op, first, AddrMode::Immediate, Register::R0, addr)
}

/// Render a b91 source with code at 0 and data directly after it
pub fn b91_source(code: &[i32], data: &[i32], symbols: &[(&str, &str)]) -> String {
    let mut source = String::from("___b91___\n___code___\n");
    source.push_str(&format!("0 {}\n", code.len() as i32 - 1));
    for word in code {
        source.push_str(&format!("{}\n", word));
    }
    source.push_str("___data___\n");
    source.push_str(&format!(
        "{} {}\n",
        code.len(),
        code.len() as i32 + data.len() as i32 - 1
    ));
    for word in data {
        source.push_str(&format!("{}\n", word));
    }
    source.push_str("___symboltable___\n");
    for (name, value) in symbols {
        source.push_str(&format!("{} {}\n", name, value));
    }
    source.push_str("___end___\n");
    source
}

/// Parse and load a b91 source into a fresh default-configured system
pub fn load(source: &str) -> System {
    let program = Program::parse(source).expect("fixture program parses");
    let mut system = System::new(&EmulatorConfig::default()).expect("default config is valid");
    system.load_program(&program).expect("fixture program loads");
    system
}

/// A writer that appends into a shared buffer the test can inspect
pub struct SharedWriter(pub Arc<Mutex<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture everything a program writes to the display device
pub fn capture_crt(system: &mut System) -> Arc<Mutex<Vec<u8>>> {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    system
        .devices_mut()
        .redirect_output(DeviceBus::CRT, Box::new(SharedWriter(buffer.clone())));
    buffer
}

/// Feed canned keyboard input to a program
pub fn feed_kbd(system: &mut System, input: &str) {
    system
        .devices_mut()
        .redirect_input(DeviceBus::KBD, Box::new(io::Cursor::new(input.to_string())));
}

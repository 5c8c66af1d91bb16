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

//! Console frontend
//!
//! Everything the emulator prints for a human lives here: the register
//! and memory dumps, the symbol table listing, and the step-mode pause
//! loop. The core stays silent apart from the log facade; this module is
//! the only place that renders machine state to standard output.

use std::io::{self, BufRead, Write};

use crate::core::error::{EmulatorError, Result};
use crate::core::instruction::{Instruction, Register};
use crate::core::machine::{Machine, StatusFlags};
use crate::core::system::System;

/// Default memory dump width in columns
pub const DEFAULT_DUMP_COLUMNS: usize = 4;

/// Presentation options for the console frontend
#[derive(Debug, Clone)]
pub struct FrontendOptions {
    /// Pause after every instruction
    pub step: bool,
    /// Number of columns in the memory dump
    pub columns: usize,
    /// Include the symbol table in every dump
    pub show_symtable: bool,
}

impl Default for FrontendOptions {
    fn default() -> Self {
        Self {
            step: false,
            columns: DEFAULT_DUMP_COLUMNS,
            show_symtable: false,
        }
    }
}

/// What the user chose at a step-mode pause
enum PauseChoice {
    Continue,
    Quit,
}

/// Run a loaded system under the console frontend
///
/// Without step mode the program runs to completion and one dump is
/// printed at the end (also after a fault: the post-mortem dump is always
/// produced). In step mode a dump is printed and the user is prompted
/// after every instruction; quitting mid-run reports as
/// [`EmulatorError::Interrupted`].
pub fn run(system: &mut System, options: &FrontendOptions) -> Result<()> {
    log::info!("running program");

    if options.step {
        dump(system, options);
        if let PauseChoice::Quit = pause(system)? {
            return Err(EmulatorError::Interrupted);
        }
    }

    while !system.halted() {
        if let Err(err) = system.step() {
            log::info!("execution stopped");
            dump(system, options);
            return Err(err);
        }
        if options.step {
            dump(system, options);
            if !system.halted() {
                if let PauseChoice::Quit = pause(system)? {
                    return Err(EmulatorError::Interrupted);
                }
            }
        }
    }

    if !options.step {
        dump(system, options);
    }
    Ok(())
}

/// Print the current machine state
pub fn dump(system: &System, options: &FrontendOptions) {
    println!("\nCurrent state:\n");
    dump_registers(system.machine());
    if options.step {
        println!("\n>>> Next instruction: {}", next_instruction(system.machine()));
    }
    println!();
    if options.show_symtable {
        dump_symbols(system);
        println!();
    }
    dump_memory(system.machine(), options.columns);
    println!();
}

/// Print the symbol table of the loaded program
pub fn dump_symbols(system: &System) {
    println!("Symbol table:");
    for symbol in system.symbols().iter() {
        println!("{} = {}", symbol.name, symbol.value);
    }
}

fn hex_dec(value: i32) -> String {
    format!("0x{:08x} ({:11})", value, value)
}

/// The instruction the program counter points at, if it is fetchable
fn next_instruction(machine: &Machine) -> String {
    let pc = machine.pc();
    if !machine.halted() && pc >= 0 && pc < machine.mmu_limit() {
        let word = machine.mem()[(machine.mmu_base() + pc) as usize];
        Instruction::from_word(word).to_string()
    } else {
        "N/A".to_string()
    }
}

/// Render the status register as a flag string, upper case for set bits
fn status_string(sr: StatusFlags) -> String {
    let letter = |flag: StatusFlags, set: char, clear: char| {
        if sr.contains(flag) {
            set
        } else {
            clear
        }
    };
    format!(
        "{}{}{}{}{}{}{}... (0x{:08x})",
        letter(StatusFlags::GREATER, 'G', 'g'),
        letter(StatusFlags::EQUAL, 'E', 'e'),
        letter(StatusFlags::LESS, 'L', 'l'),
        letter(StatusFlags::OVERFLOW, 'O', 'o'),
        letter(StatusFlags::DIVIDE_BY_ZERO, 'Z', 'z'),
        letter(StatusFlags::UNKNOWN_INSTRUCTION, 'U', 'u'),
        letter(StatusFlags::FORBIDDEN_ACCESS, 'M', 'm'),
        sr.bits()
    )
}

/// Print the working registers alongside the internal latches
pub fn dump_registers(machine: &Machine) {
    println!("Registers:");
    let latches = [
        ("PC     ", machine.pc()),
        ("IR     ", machine.ir()),
        ("TR     ", machine.tr()),
        ("ALU_IN1", machine.alu_in1()),
        ("ALU_IN2", machine.alu_in2()),
        ("ALU_OUT", machine.alu_out()),
        ("MAR    ", machine.mar()),
        ("MBR    ", machine.mbr()),
    ];
    for (index, (latch_name, latch_value)) in latches.iter().enumerate() {
        let prefix = match index {
            6 => "R6 (SP)".to_string(),
            7 => "R7 (FP)".to_string(),
            _ => format!("R{}     ", index),
        };
        println!(
            "{} = {}   {} = {}",
            prefix,
            hex_dec(machine.reg(Register::from_bits(index as u8))),
            latch_name,
            hex_dec(*latch_value)
        );
    }
    println!("SR = {}", status_string(machine.sr()));
}

/// Print the memory contents as a table
pub fn dump_memory(machine: &Machine, columns: usize) {
    let columns = columns.max(1);

    println!(
        "Memory size: {} words, MMU base: 0x{:08x} ({}), MMU limit: {} words",
        machine.mem().len(),
        machine.mmu_base(),
        machine.mmu_base(),
        machine.mmu_limit()
    );
    println!(
        "Accessible memory area: 0x{:08x} - 0x{:08x} ({} - {})",
        machine.mmu_base(),
        machine.mmu_base() + machine.mmu_limit() - 1,
        machine.mmu_base(),
        machine.mmu_base() + machine.mmu_limit() - 1
    );

    print!("Memory    ");
    for column in 0..columns {
        print!("{:>12}", column);
    }
    println!();
    println!("{}", "-".repeat(10 + 12 * columns));

    for (address, word) in machine.mem().iter().enumerate() {
        if address % columns == 0 {
            print!("{:8} |", address);
        }
        print!("  0x{:08x}", word);
        if address % columns == columns - 1 || address == machine.mem().len() - 1 {
            println!();
        }
    }
}

/// Pause between instructions in step mode
///
/// Enter continues, `s` prints the symbol table, `q` (or end of input)
/// stops the run.
fn pause(system: &System) -> Result<PauseChoice> {
    let stdin = io::stdin();
    loop {
        println!(
            "Type enter to execute the next instruction, \"s\" to show\n\
             the symbol table, or \"q\" to quit:"
        );
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = stdin.lock().read_line(&mut line)?;
        if bytes == 0 {
            // end of input: nothing more will ever arrive
            return Ok(PauseChoice::Quit);
        }

        match line.trim() {
            "" => return Ok(PauseChoice::Continue),
            "s" => {
                println!();
                dump_symbols(system);
                println!();
            }
            "q" => return Ok(PauseChoice::Quit),
            _ => {}
        }
    }
}

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

//! System integration
//!
//! [`System`] wires the machine, the device table, and the supervisor
//! dispatcher together and owns the symbol table of the loaded program.
//! It is the type embedders and the CLI drive: construct it from a
//! configuration, load a parsed program, then step or run.

use super::config::EmulatorConfig;
use super::devices::DeviceBus;
use super::error::Result;
use super::loader::{Program, SymbolTable};
use super::machine::Machine;
use super::supervisor::Supervisor;

#[cfg(test)]
mod tests;

/// The complete emulator: machine, devices, and supervisor
///
/// # Example
///
/// ```
/// use rkone::core::config::EmulatorConfig;
/// use rkone::core::loader::Program;
/// use rkone::core::system::System;
///
/// let source = "___b91___\n___code___\n0 0\n1891631115\n___data___\n\
///               1 0\n___symboltable___\n___end___\n";
/// let program = Program::parse(source).unwrap();
///
/// let mut system = System::new(&EmulatorConfig::default()).unwrap();
/// system.load_program(&program).unwrap();
/// system.run().unwrap();
/// assert!(system.halted());
/// ```
pub struct System {
    machine: Machine,
    devices: DeviceBus,
    supervisor: Supervisor,
    symbols: SymbolTable,
    stdin_override: Option<String>,
    stdout_override: Option<String>,
}

impl System {
    /// Create a system from a configuration
    ///
    /// Allocates the machine, builds the device table with the console
    /// devices bound, and remembers the configured STDIN/STDOUT file
    /// overrides for [`System::load_program`].
    ///
    /// # Returns
    ///
    /// - `Ok(System)` ready to load a program
    /// - `Err(EmulatorError::Config)` if the configuration is inconsistent
    pub fn new(config: &EmulatorConfig) -> Result<Self> {
        let machine = Machine::new(config)?;
        Ok(Self {
            machine,
            devices: DeviceBus::new(),
            supervisor: Supervisor::new(config.emulate_bugs),
            symbols: SymbolTable::new(),
            stdin_override: config.stdin_file.clone(),
            stdout_override: config.stdout_file.clone(),
        })
    }

    /// Load a parsed program and bind the file devices
    ///
    /// The STDIN/STDOUT device files resolve in this order: the
    /// configured override, then a `stdin`/`stdout` symbol from the
    /// program file. With neither, the device stays unbound and accessing
    /// it faults. A file that cannot be opened only logs a warning; the
    /// device stays present but unusable.
    pub fn load_program(&mut self, program: &Program) -> Result<()> {
        self.machine.load_program(program)?;
        self.symbols = program.symbols.clone();

        let stdin_file = self
            .stdin_override
            .clone()
            .or_else(|| self.symbols.lookup_str("stdin").map(str::to_string));
        let stdout_file = self
            .stdout_override
            .clone()
            .or_else(|| self.symbols.lookup_str("stdout").map(str::to_string));

        match stdin_file {
            Some(path) => self.devices.bind_stdin_file(&path),
            None => log::debug!("no file configured for the STDIN device"),
        }
        match stdout_file {
            Some(path) => self.devices.bind_stdout_file(&path),
            None => log::debug!("no file configured for the STDOUT device"),
        }
        Ok(())
    }

    /// Execute one instruction
    ///
    /// # Returns
    ///
    /// - `Ok(())` when the cycle completed or the machine is halted
    /// - `Err(EmulatorError::Fault)` when a fault terminated the step
    pub fn step(&mut self) -> Result<()> {
        self.machine
            .step(&mut self.devices, &self.supervisor)
            .map_err(Into::into)
    }

    /// Run until the machine halts or a fault terminates the run
    pub fn run(&mut self) -> Result<()> {
        log::info!("running program");
        while !self.machine.halted() {
            self.step()?;
        }
        Ok(())
    }

    /// The machine state
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Mutable access to the machine state
    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// The device table
    pub fn devices_mut(&mut self) -> &mut DeviceBus {
        &mut self.devices
    }

    /// The symbol table of the loaded program
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// True once the program has executed a HALT supervisor call
    pub fn halted(&self) -> bool {
        self.machine.halted()
    }
}

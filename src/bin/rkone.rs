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

use std::fs;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rkone::core::config::{EmulatorConfig, DEFAULT_MEM_SIZE};
use rkone::core::error::{EmulatorError, Result};
use rkone::core::loader::Program;
use rkone::core::system::System;
use rkone::frontend::{self, FrontendOptions, DEFAULT_DUMP_COLUMNS};

/// TTK-91 educational computer emulator
#[derive(Parser)]
#[command(name = "rkone")]
#[command(about = "TTK-91 emulator")]
#[command(version)]
#[command(after_help = "If the program file is -, the program is read from the standard input.\n\
                        The stdin and stdout options override settings defined in the program file.")]
struct Args {
    /// Program file in b91 format
    #[arg(value_name = "PROGRAM_FILE")]
    program: String,

    /// Use INFILE as the STDIN device
    #[arg(short = 'i', long = "stdin", value_name = "INFILE")]
    stdin: Option<String>,

    /// Use OUTFILE as the STDOUT device
    #[arg(short = 'o', long = "stdout", value_name = "OUTFILE")]
    stdout: Option<String>,

    /// Use SIZE words of memory
    #[arg(short = 'm', long = "mem-size", value_name = "SIZE", default_value_t = DEFAULT_MEM_SIZE)]
    mem_size: usize,

    /// Set mmu_base to BASE
    #[arg(long = "mmu-base", value_name = "BASE", default_value_t = 0)]
    mmu_base: i32,

    /// Set mmu_limit to LIMIT (default: mem_size - mmu_base)
    #[arg(long = "mmu-limit", value_name = "LIMIT")]
    mmu_limit: Option<i32>,

    /// Fill memory and registers with zero before starting
    #[arg(long = "zero", alias = "clean")]
    zero: bool,

    /// Use COLS columns in the memory dump
    #[arg(short = 'c', long = "columns", value_name = "COLS", default_value_t = DEFAULT_DUMP_COLUMNS)]
    columns: usize,

    /// Pause execution after each instruction
    #[arg(short = 's', long = "step")]
    step: bool,

    /// Be verbose (use twice to be very verbose)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emulate bugs found in TitoKone 1.203
    #[arg(long = "emulate-bugs")]
    emulate_bugs: bool,

    /// Include the symbol table in dumps
    #[arg(short = 'y', long = "show-symtable")]
    show_symtable: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // --verbose raises the log threshold; RUST_LOG still takes precedence
    let filter = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(filter)
        .init();

    info!("rkone v{}", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.columns == 0 {
        return Err(EmulatorError::Config("columns must be positive".into()));
    }

    let config = EmulatorConfig {
        mem_size: args.mem_size,
        mmu_base: args.mmu_base,
        mmu_limit: args.mmu_limit,
        zero: args.zero,
        emulate_bugs: args.emulate_bugs,
        stdin_file: args.stdin.clone(),
        stdout_file: args.stdout.clone(),
    };

    let program = if args.program == "-" {
        info!("reading the program from standard input");
        Program::read_from(io::stdin())?
    } else {
        info!("reading the program from {}", args.program);
        Program::parse(&fs::read_to_string(&args.program)?)?
    };

    let mut system = System::new(&config)?;
    if config.zero {
        // re-zeroes registers, latches, and memory before the load
        system.machine_mut().reset();
    }
    system.load_program(&program)?;

    let options = FrontendOptions {
        step: args.step,
        columns: args.columns,
        show_symtable: args.show_symtable,
    };
    frontend::run(&mut system, &options)
}

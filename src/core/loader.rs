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

//! Program loading for the TTK-91
//!
//! This module parses the textual "b91" object file format into a
//! [`Program`] that [`crate::core::machine::Machine::load_program`]
//! applies to a machine.
//!
//! # b91 Format
//!
//! Seven sections, each on its own line, in this fixed order:
//!
//! ```text
//! ___b91___
//! ___code___
//! 0 2                 <- start and end address, inclusive
//! 33554435            <- one instruction word per line
//! 16777220
//! 36700164
//! ___data___
//! 3 4
//! 42
//! 0
//! ___symboltable___
//! halt 11             <- name-value pairs until the terminator
//! stdin input.txt
//! ___end___
//! ```
//!
//! Symbol values are usually integers, but the `stdin` and `stdout`
//! symbols carry file names that bind the corresponding devices.
//!
//! # Example
//!
//! ```
//! use rkone::core::loader::Program;
//!
//! let source = "___b91___\n___code___\n0 0\n1891631115\n___data___\n\
//!               1 0\n___symboltable___\nhalt 11\n___end___\n";
//! let program = Program::parse(source).unwrap();
//! assert_eq!(program.code.words, vec![1891631115]);
//! assert_eq!(program.symbols.lookup("halt"), Some(11));
//! ```

use std::io::Read;

use super::error::{EmulatorError, Result};

/// One symbol from the program file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The symbol name
    pub name: String,
    /// The symbol value as written in the file
    pub value: String,
}

/// A read-only list of the symbols defined by a program file
///
/// Insertion order is preserved for dumps. Lookups scan the list; symbol
/// tables in b91 files are tiny.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<Symbol>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let symbol = Symbol {
            name: name.into(),
            value: value.into(),
        };
        log::trace!("symbol added: {} = {}", symbol.name, symbol.value);
        self.entries.push(symbol);
    }

    /// Look up a symbol's value as an integer
    ///
    /// # Returns
    ///
    /// `None` when the symbol does not exist or its value is not a
    /// decimal integer.
    pub fn lookup(&self, name: &str) -> Option<i32> {
        self.lookup_str(name)?.parse().ok()
    }

    /// Look up a symbol's value as the raw string from the file
    pub fn lookup_str(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.as_str())
    }

    /// Iterate over the symbols in file order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.iter()
    }

    /// The number of symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no symbols were defined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One segment of a program image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// First logical address of the segment (inclusive)
    pub start: i32,
    /// Last logical address of the segment (inclusive)
    pub end: i32,
    /// The segment contents, one word per address
    pub words: Vec<i32>,
}

/// A parsed b91 program image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The code segment; its end seeds the frame pointer
    pub code: Segment,
    /// The data segment; its end seeds the stack pointer
    pub data: Segment,
    /// The symbol table
    pub symbols: SymbolTable,
}

/// Tracks the current line number while consuming program text
struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    number: usize,
}

impl<'a> LineReader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            number: 0,
        }
    }

    /// The next line, trimmed, or a parse error naming what was expected
    fn next_line(&mut self, expected: &'static str) -> Result<&'a str> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                log::trace!("line {} = {}", self.number, line);
                Ok(line.trim())
            }
            None => Err(EmulatorError::Parse {
                line: self.number + 1,
                expected,
                got: "end of input".to_string(),
            }),
        }
    }

    /// A parse error pointing at the line read most recently
    fn error(&self, expected: &'static str, got: &str) -> EmulatorError {
        EmulatorError::Parse {
            line: self.number,
            expected,
            got: got.to_string(),
        }
    }

    /// Consume a line that must match a literal marker exactly
    fn expect_literal(&mut self, literal: &'static str) -> Result<()> {
        let line = self.next_line(literal)?;
        if line != literal {
            return Err(self.error(literal, line));
        }
        Ok(())
    }

    /// Consume a `start end` address range line
    fn read_range(&mut self) -> Result<(i32, i32)> {
        let line = self.next_line("two integers")?;
        let mut parts = line.split_whitespace();
        let (Some(start), Some(end)) = (parts.next(), parts.next()) else {
            return Err(self.error("two integers", line));
        };
        match (start.parse(), end.parse()) {
            (Ok(start), Ok(end)) => Ok((start, end)),
            _ => Err(self.error("two integers", line)),
        }
    }

    /// Consume one word line
    fn read_word(&mut self) -> Result<i32> {
        let line = self.next_line("an integer")?;
        line.parse().map_err(|_| self.error("an integer", line))
    }
}

impl Program {
    /// Parse b91 program text
    ///
    /// # Returns
    ///
    /// - `Ok(Program)` when the text is well formed
    /// - `Err(EmulatorError::Parse)` naming the line and the expected
    ///   token otherwise
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = LineReader::new(source);

        reader.expect_literal("___b91___")?;

        let code = Self::parse_segment(&mut reader, "___code___")?;
        log::debug!("code segment: {} - {}", code.start, code.end);

        let data = Self::parse_segment(&mut reader, "___data___")?;
        log::debug!("data segment: {} - {}", data.start, data.end);

        reader.expect_literal("___symboltable___")?;
        let mut symbols = SymbolTable::new();
        loop {
            let line = reader.next_line("a name-value pair or ___end___")?;
            if line == "___end___" {
                break;
            }
            let mut parts = line.split_whitespace();
            let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                return Err(reader.error("a name-value pair", line));
            };
            symbols.insert(name, value);
        }

        Ok(Self {
            code,
            data,
            symbols,
        })
    }

    /// Read and parse b91 program text from a stream
    pub fn read_from(mut reader: impl Read) -> Result<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Self::parse(&source)
    }

    fn parse_segment(reader: &mut LineReader<'_>, marker: &'static str) -> Result<Segment> {
        reader.expect_literal(marker)?;
        let (start, end) = reader.read_range()?;

        // an `end` below `start` denotes an empty segment
        let count = (end as i64 - start as i64 + 1).max(0) as usize;
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(reader.read_word()?);
        }

        Ok(Segment { start, end, words })
    }
}

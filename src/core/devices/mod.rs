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

//! External device table
//!
//! The machine talks to a fixed table of four devices, each identified by
//! a small integer:
//!
//! | number | device | direction | stream                       |
//! |--------|--------|-----------|------------------------------|
//! | 0      | CRT    | output    | the process standard output  |
//! | 1      | KBD    | input     | the process standard input   |
//! | 6      | STDIN  | input     | a file bound at load time    |
//! | 7      | STDOUT | output    | a file bound at load time    |
//!
//! Devices exchange whole integers, one per line of text. The interactive
//! console devices decorate their I/O with a prompt and a label; the file
//! devices carry bare values. A file that cannot be opened leaves its
//! device present but unusable, and accessing it then counts as a
//! forbidden access.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Direction of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

/// The byte stream behind a device
enum Stream {
    Input(Box<dyn BufRead>),
    Output(Box<dyn Write>),
}

/// One entry in the device table
struct Device {
    number: i32,
    name: &'static str,
    direction: Direction,
    /// Whether this stream is the interactive console (prompt + label)
    interactive: bool,
    /// `None` until bound, or after a failed bind
    stream: Option<Stream>,
}

/// The fixed table of external devices
///
/// # Example
///
/// ```
/// use rkone::core::devices::DeviceBus;
///
/// let mut devices = DeviceBus::new();
/// devices.redirect_input(DeviceBus::KBD, Box::new(std::io::Cursor::new("42\n")));
/// ```
pub struct DeviceBus {
    devices: Vec<Device>,
}

impl DeviceBus {
    /// The display device, always standard output
    pub const CRT: i32 = 0;

    /// The keyboard device, always standard input
    pub const KBD: i32 = 1;

    /// The STDIN device, backed by a configurable file
    pub const STDIN: i32 = 6;

    /// The STDOUT device, backed by a configurable file
    pub const STDOUT: i32 = 7;

    /// Create the device table
    ///
    /// CRT and KBD are bound to the process console; the STDIN and STDOUT
    /// file devices stay unbound until [`DeviceBus::bind_stdin_file`] /
    /// [`DeviceBus::bind_stdout_file`] are called.
    pub fn new() -> Self {
        Self {
            devices: vec![
                Device {
                    number: Self::CRT,
                    name: "CRT",
                    direction: Direction::Output,
                    interactive: true,
                    stream: Some(Stream::Output(Box::new(io::stdout()))),
                },
                Device {
                    number: Self::KBD,
                    name: "KBD",
                    direction: Direction::Input,
                    interactive: true,
                    stream: Some(Stream::Input(Box::new(BufReader::new(io::stdin())))),
                },
                Device {
                    number: Self::STDIN,
                    name: "STDIN",
                    direction: Direction::Input,
                    interactive: false,
                    stream: None,
                },
                Device {
                    number: Self::STDOUT,
                    name: "STDOUT",
                    direction: Direction::Output,
                    interactive: false,
                    stream: None,
                },
            ],
        }
    }

    /// Bind the STDIN device to a file
    ///
    /// A file that cannot be opened logs a warning; the device stays
    /// unusable and reads from it will fail.
    pub fn bind_stdin_file(&mut self, path: &str) {
        log::info!("opening STDIN file: {}", path);
        match File::open(path) {
            Ok(file) => {
                self.set_stream(
                    Self::STDIN,
                    Stream::Input(Box::new(BufReader::new(file))),
                    false,
                );
            }
            Err(err) => {
                log::warn!(
                    "cannot open {} for reading; trying to read from STDIN will not work: {}",
                    path,
                    err
                );
            }
        }
    }

    /// Bind the STDOUT device to a file
    ///
    /// A file that cannot be created logs a warning; the device stays
    /// unusable and writes to it will fail.
    pub fn bind_stdout_file(&mut self, path: &str) {
        log::info!("opening STDOUT file: {}", path);
        match File::create(path) {
            Ok(file) => {
                self.set_stream(Self::STDOUT, Stream::Output(Box::new(file)), false);
            }
            Err(err) => {
                log::warn!(
                    "cannot open {} for writing; trying to write to STDOUT will not work: {}",
                    path,
                    err
                );
            }
        }
    }

    /// Replace an input device's stream
    ///
    /// The replacement is treated as non-interactive (no prompt). Useful
    /// for embedding the emulator and for tests.
    pub fn redirect_input(&mut self, number: i32, reader: Box<dyn BufRead>) {
        self.set_stream(number, Stream::Input(reader), false);
    }

    /// Replace an output device's stream
    ///
    /// The replacement is treated as non-interactive (no label prefix).
    pub fn redirect_output(&mut self, number: i32, writer: Box<dyn Write>) {
        self.set_stream(number, Stream::Output(writer), false);
    }

    fn set_stream(&mut self, number: i32, stream: Stream, interactive: bool) {
        let Some(device) = self.devices.iter_mut().find(|d| d.number == number) else {
            log::warn!("device {} does not exist", number);
            return;
        };
        let matches = matches!(
            (&stream, device.direction),
            (Stream::Input(_), Direction::Input) | (Stream::Output(_), Direction::Output)
        );
        if !matches {
            log::warn!("stream direction does not match device {}", device.name);
            return;
        }
        device.stream = Some(stream);
        device.interactive = interactive;
    }

    /// Find a device by number, logging when it does not exist
    fn find(&mut self, number: i32) -> Option<&mut Device> {
        let device = self.devices.iter_mut().find(|d| d.number == number);
        if device.is_none() {
            log::error!("device {} does not exist", number);
        }
        device
    }

    /// Read one integer from a device
    ///
    /// The value is a decimal integer on a line of its own, terminated by
    /// a newline or end of input. A line that does not parse logs a
    /// warning and yields 0.
    ///
    /// # Returns
    ///
    /// `None` when the device does not exist, is not an input device, or
    /// its stream is unavailable; the caller reports that as a forbidden
    /// access.
    pub fn read_integer(&mut self, number: i32) -> Option<i32> {
        let device = self.find(number)?;
        let name = device.name;

        if device.direction != Direction::Input {
            log::error!("device {} is not an input device", name);
            return None;
        }
        let interactive = device.interactive;
        let reader = match device.stream.as_mut() {
            Some(Stream::Input(reader)) => reader,
            _ => {
                log::error!("the stream for device {} is unavailable", name);
                return None;
            }
        };

        if interactive {
            print!("Enter an integer: ");
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(_) => {}
            Err(err) => {
                log::error!("reading from {} failed: {}", name, err);
                return None;
            }
        }

        let value = match line.trim().parse::<i32>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("the value read was not an integer");
                0
            }
        };
        log::trace!("read {} from {}", value, name);
        Some(value)
    }

    /// Write one integer to a device
    ///
    /// The value is written in decimal followed by a newline; the
    /// interactive display prefixes it with a human-readable label.
    ///
    /// # Returns
    ///
    /// `None` when the device does not exist, is not an output device, or
    /// its stream is unavailable; the caller reports that as a forbidden
    /// access.
    pub fn write_integer(&mut self, number: i32, value: i32) -> Option<()> {
        let device = self.find(number)?;
        let name = device.name;

        if device.direction != Direction::Output {
            log::error!("device {} is not an output device", name);
            return None;
        }
        let interactive = device.interactive;
        let writer = match device.stream.as_mut() {
            Some(Stream::Output(writer)) => writer,
            _ => {
                log::error!("the stream for device {} is unavailable", name);
                return None;
            }
        };

        let result = if interactive {
            writeln!(writer, "Program outputted: {}", value)
        } else {
            writeln!(writer, "{}", value)
        };
        if let Err(err) = result.and_then(|_| writer.flush()) {
            log::error!("writing to {} failed: {}", name, err);
            return None;
        }

        log::trace!("wrote {} to {}", value, name);
        Some(())
    }
}

impl Default for DeviceBus {
    fn default() -> Self {
        Self::new()
    }
}

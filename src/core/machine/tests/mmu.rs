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

use super::*;
use crate::core::machine::StatusFlags;

fn windowed(mem_size: usize, base: i32, limit: i32) -> Machine {
    Machine::new(&EmulatorConfig {
        mem_size,
        mmu_base: base,
        mmu_limit: Some(limit),
        ..EmulatorConfig::default()
    })
    .expect("test configuration is valid")
}

#[test]
fn test_read_translates_through_base() {
    let mut m = windowed(4, 1, 2);
    m.mem[1] = 1337;
    m.mar = 0;

    m.mmu_read();

    assert_eq!(m.mbr, 1337);
    assert!(!m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
}

#[test]
fn test_read_beyond_limit_faults() {
    let mut m = windowed(4, 1, 2);
    m.mar = 2;
    m.mbr = 55;

    m.mmu_read();

    assert!(m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
    // the buffer register keeps its old value
    assert_eq!(m.mbr, 55);
}

#[test]
fn test_read_negative_address_faults() {
    let mut m = windowed(4, 1, 2);
    m.mar = -1;
    m.mbr = 55;

    m.mmu_read();

    assert!(m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
    assert_eq!(m.mbr, 55);
}

#[test]
fn test_write_translates_through_base() {
    let mut m = windowed(4, 1, 2);
    assert_eq!(m.mem[1], 0);
    m.mar = 0;
    m.mbr = 42;

    m.mmu_write();

    assert_eq!(m.mem[1], 42);
    assert!(!m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
}

#[test]
fn test_write_beyond_limit_faults() {
    let mut m = windowed(4, 1, 2);
    m.mar = 2;
    m.mbr = 42;

    m.mmu_write();

    assert!(m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
    assert_eq!(m.mem, vec![0, 0, 0, 0]);
}

#[test]
fn test_write_negative_address_faults() {
    let mut m = windowed(4, 1, 2);
    m.mar = -1;
    m.mbr = 42;

    m.mmu_write();

    assert!(m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
    assert_eq!(m.mem, vec![0, 0, 0, 0]);
}

#[test]
fn test_whole_window_is_accessible() {
    let mut m = windowed(8, 2, 4);
    for logical in 0..4 {
        m.mar = logical;
        m.mbr = logical + 100;
        m.mmu_write();
    }
    assert!(!m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));

    for logical in 0..4 {
        m.mar = logical;
        m.mmu_read();
        assert_eq!(m.mbr, logical + 100);
    }
    // words outside the window were never touched
    assert_eq!(m.mem[0], 0);
    assert_eq!(m.mem[1], 0);
    assert_eq!(m.mem[6], 0);
    assert_eq!(m.mem[7], 0);
}

#[test]
fn test_zero_limit_rejects_everything() {
    let mut m = windowed(4, 0, 0);
    m.mar = 0;
    m.mmu_read();
    assert!(m.sr.contains(StatusFlags::FORBIDDEN_ACCESS));
}

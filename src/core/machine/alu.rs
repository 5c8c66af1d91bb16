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

//! Arithmetic/logic unit
//!
//! Every operation reads `alu_in1` (and, except NOT, `alu_in2`) and writes
//! `alu_out`. ADD, SUB, and MUL also compute in 64 bits; when the wide
//! result differs from the truncated 32-bit result the overflow status bit
//! is set alongside the truncated value. DIV and MOD guard against a zero
//! divisor and leave `alu_out` untouched when it occurs.
//!
//! Shift counts are taken modulo 32. A negative count therefore masks like
//! its two's-complement bit pattern; out-of-range counts never fault.

use super::{Machine, StatusFlags};

/// Overflow-checked operations
enum WideOp {
    Add,
    Sub,
    Mul,
}

impl Machine {
    /// Perform an operation, compare against the 64-bit result, and set
    /// the overflow bit if the truncated result differs.
    fn alu_checked(&mut self, op: WideOp) {
        let a = self.alu_in1;
        let b = self.alu_in2;

        let (result, wide, symbol) = match op {
            WideOp::Add => (a.wrapping_add(b), a as i64 + b as i64, "+"),
            WideOp::Sub => (a.wrapping_sub(b), a as i64 - b as i64, "-"),
            WideOp::Mul => (a.wrapping_mul(b), a as i64 * b as i64, "*"),
        };

        if result as i64 != wide {
            log::error!("integer overflow: {} {} {}", a, symbol, b);
            self.sr.insert(StatusFlags::OVERFLOW);
        }

        self.alu_out = result;
    }

    /// Addition; may set the overflow bit
    pub(crate) fn alu_add(&mut self) {
        log::trace!("calculating {} + {}", self.alu_in1, self.alu_in2);
        self.alu_checked(WideOp::Add);
    }

    /// Subtraction; may set the overflow bit
    pub(crate) fn alu_sub(&mut self) {
        log::trace!("calculating {} - {}", self.alu_in1, self.alu_in2);
        self.alu_checked(WideOp::Sub);
    }

    /// Multiplication; may set the overflow bit
    pub(crate) fn alu_mul(&mut self) {
        log::trace!("calculating {} * {}", self.alu_in1, self.alu_in2);
        self.alu_checked(WideOp::Mul);
    }

    /// Truncated-toward-zero division
    ///
    /// A zero divisor sets the divide-by-zero bit and leaves `alu_out`
    /// unchanged.
    pub(crate) fn alu_div(&mut self) {
        log::trace!("calculating {} / {}", self.alu_in1, self.alu_in2);
        if self.alu_in2 == 0 {
            log::error!("division by zero");
            self.sr.insert(StatusFlags::DIVIDE_BY_ZERO);
            return;
        }
        self.alu_out = self.alu_in1.wrapping_div(self.alu_in2);
    }

    /// Remainder of the truncated division
    ///
    /// A zero divisor sets the divide-by-zero bit and leaves `alu_out`
    /// unchanged.
    pub(crate) fn alu_mod(&mut self) {
        log::trace!("calculating {} % {}", self.alu_in1, self.alu_in2);
        if self.alu_in2 == 0 {
            log::error!("division by zero");
            self.sr.insert(StatusFlags::DIVIDE_BY_ZERO);
            return;
        }
        self.alu_out = self.alu_in1.wrapping_rem(self.alu_in2);
    }

    /// Bitwise and
    pub(crate) fn alu_and(&mut self) {
        self.alu_out = self.alu_in1 & self.alu_in2;
    }

    /// Bitwise or
    pub(crate) fn alu_or(&mut self) {
        self.alu_out = self.alu_in1 | self.alu_in2;
    }

    /// Bitwise exclusive or
    pub(crate) fn alu_xor(&mut self) {
        self.alu_out = self.alu_in1 ^ self.alu_in2;
    }

    /// Bitwise complement of `alu_in1`; `alu_in2` is ignored
    pub(crate) fn alu_not(&mut self) {
        self.alu_out = !self.alu_in1;
    }

    /// Logical left shift by `alu_in2` positions, count modulo 32
    pub(crate) fn alu_shl(&mut self) {
        self.alu_out = self.alu_in1.wrapping_shl(self.alu_in2 as u32);
    }

    /// Logical right shift: high bits fill with zero regardless of the
    /// sign of `alu_in1`; count modulo 32
    pub(crate) fn alu_shr(&mut self) {
        self.alu_out = ((self.alu_in1 as u32).wrapping_shr(self.alu_in2 as u32)) as i32;
    }

    /// Arithmetic right shift: high bits fill with the sign bit of
    /// `alu_in1`; count modulo 32
    pub(crate) fn alu_shra(&mut self) {
        self.alu_out = self.alu_in1.wrapping_shr(self.alu_in2 as u32);
    }
}

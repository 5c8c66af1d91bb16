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

//! Emulator configuration
//!
//! Everything adjustable from the outside is collected into
//! [`EmulatorConfig`]. The struct is validated up front so that impossible
//! settings (zero memory, an MMU window outside physical memory) are
//! rejected before any machine state is allocated.

use super::error::{EmulatorError, Result};

/// Default memory size in words when none is configured
pub const DEFAULT_MEM_SIZE: usize = 512;

/// Emulator configuration
///
/// # Example
///
/// ```
/// use rkone::core::config::EmulatorConfig;
///
/// let config = EmulatorConfig {
///     mem_size: 128,
///     ..EmulatorConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.resolved_limit(), 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Size of the emulator memory in words (1 word = 4 bytes)
    pub mem_size: usize,

    /// Value of the MMU base register
    pub mmu_base: i32,

    /// Value of the MMU limit register; `None` means the rest of memory
    /// above `mmu_base`
    pub mmu_limit: Option<i32>,

    /// Zero memory and registers before loading
    ///
    /// Freshly allocated machines are always zeroed; the flag additionally
    /// clears a machine image that is being reused.
    pub zero: bool,

    /// Replicate the off-by-one behaviors of TitoKone 1.203 in the
    /// supervisor routines
    pub emulate_bugs: bool,

    /// File backing the STDIN device; overrides a `stdin` symbol in the
    /// program file
    pub stdin_file: Option<String>,

    /// File backing the STDOUT device; overrides a `stdout` symbol in the
    /// program file
    pub stdout_file: Option<String>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            mem_size: DEFAULT_MEM_SIZE,
            mmu_base: 0,
            mmu_limit: None,
            zero: false,
            emulate_bugs: false,
            stdin_file: None,
            stdout_file: None,
        }
    }
}

impl EmulatorConfig {
    /// The MMU limit this configuration resolves to
    ///
    /// Defaults to all memory above `mmu_base` when no explicit limit is
    /// set, matching the `--mmu-limit` default.
    pub fn resolved_limit(&self) -> i32 {
        self.mmu_limit
            .unwrap_or_else(|| self.mem_size as i32 - self.mmu_base)
    }

    /// Check that the configuration describes a machine that can exist
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the settings are consistent
    /// - `Err(EmulatorError::Config)` describing the first violated rule
    pub fn validate(&self) -> Result<()> {
        if self.mem_size == 0 {
            return Err(EmulatorError::Config("mem_size must be positive".into()));
        }
        if self.mem_size > i32::MAX as usize {
            return Err(EmulatorError::Config(format!(
                "mem_size must be at most {} words",
                i32::MAX
            )));
        }
        if self.mmu_base < 0 {
            return Err(EmulatorError::Config(
                "mmu_base must be non-negative".into(),
            ));
        }
        if self.mmu_base as usize >= self.mem_size {
            return Err(EmulatorError::Config(
                "mmu_base must be less than mem_size".into(),
            ));
        }
        let limit = self.resolved_limit();
        if limit < 0 {
            return Err(EmulatorError::Config(
                "mmu_limit must be non-negative".into(),
            ));
        }
        if self.mmu_base as i64 + limit as i64 > self.mem_size as i64 {
            return Err(EmulatorError::Config(
                "mmu_base + mmu_limit must be at most mem_size".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EmulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mem_size, DEFAULT_MEM_SIZE);
        assert_eq!(config.resolved_limit(), DEFAULT_MEM_SIZE as i32);
    }

    #[test]
    fn test_zero_memory_rejected() {
        let config = EmulatorConfig {
            mem_size: 0,
            ..EmulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_base_rejected() {
        let config = EmulatorConfig {
            mmu_base: -1,
            ..EmulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_beyond_memory_rejected() {
        let config = EmulatorConfig {
            mem_size: 16,
            mmu_base: 16,
            ..EmulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_window_beyond_memory_rejected() {
        let config = EmulatorConfig {
            mem_size: 16,
            mmu_base: 8,
            mmu_limit: Some(9),
            ..EmulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_limit_defaults_to_rest_of_memory() {
        let config = EmulatorConfig {
            mem_size: 100,
            mmu_base: 25,
            ..EmulatorConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_limit(), 75);
    }

    #[test]
    fn test_explicit_window_accepted() {
        let config = EmulatorConfig {
            mem_size: 100,
            mmu_base: 25,
            mmu_limit: Some(50),
            ..EmulatorConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_limit(), 50);
    }
}

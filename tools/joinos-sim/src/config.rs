//! Machine configuration.
//!
//! Loaded from an optional TOML file; every field defaults to the kernel's
//! compile-time value. Command-line flags override the file.
//!
//! ```toml
//! phys_pages = 64
//! stack_pages = 8
//! max_pid = 1000
//! input = "hello\n"
//! ```

use std::path::Path;

use joinos_kernel::config::{DEFAULT_MAX_PID, DEFAULT_PHYS_PAGES, PID_LIMIT, STACK_PAGES};
use joinos_kernel::KernelConfig;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Configuration of one simulated machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Physical pages available to user processes.
    pub phys_pages: usize,
    /// Stack pages per process.
    pub stack_pages: usize,
    /// Highest pid the kernel may hand out.
    pub max_pid: u32,
    /// Bytes queued on the console input before boot.
    pub input: String,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            phys_pages: DEFAULT_PHYS_PAGES,
            stack_pages: STACK_PAGES,
            max_pid: DEFAULT_MAX_PID,
            input: String::new(),
        }
    }
}

impl MachineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, SimError> {
        let config: MachineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        if !path.exists() {
            return Err(SimError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Reject configurations no program can run on.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.phys_pages == 0 {
            return Err(SimError::InvalidConfig {
                reason: "phys_pages must be at least 1".to_string(),
            });
        }
        if self.max_pid > PID_LIMIT {
            return Err(SimError::InvalidConfig {
                reason: format!("max_pid must not exceed {}", PID_LIMIT),
            });
        }
        Ok(())
    }

    /// Kernel view of this configuration.
    pub fn kernel_config(&self) -> KernelConfig {
        let mut config = KernelConfig::new()
            .with_phys_pages(self.phys_pages)
            .with_max_pid(self.max_pid);
        config.stack_pages = self.stack_pages;
        config
    }
}

//! Kernel configuration constants.
//!
//! Compile-time defaults for the simulated machine. A [`KernelConfig`]
//! built from these values can be adjusted at boot.

/// Page size in bytes (1 KB, as on the simulated MIPS machine).
pub const PAGE_SIZE: usize = 1024;

/// Number of physical pages installed in the machine.
pub const DEFAULT_PHYS_PAGES: usize = 256;

/// Stack pages given to every process.
pub const STACK_PAGES: usize = 8;

/// Pages reserved for the argument area of every process.
pub const ARG_PAGES: usize = 1;

/// Highest pid the kernel hands out unless configured otherwise.
pub const DEFAULT_MAX_PID: u32 = 65_535;

/// Ceiling on any configured pid. Pids travel through the ABI as `i32`.
pub const PID_LIMIT: u32 = i32::MAX as u32;

/// Longest program name or argument string accepted by `exec`, in bytes.
pub const MAX_STRING_LEN: usize = 256;

/// Required suffix of executable image names.
pub const EXECUTABLE_SUFFIX: &str = ".coff";

/// File descriptor of the console input.
pub const STDIN_FD: i32 = 0;

/// File descriptor of the console output.
pub const STDOUT_FD: i32 = 1;

/// Runtime configuration of the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Physical pages available to user processes.
    pub phys_pages: usize,
    /// Stack pages per process.
    pub stack_pages: usize,
    /// Highest pid that may be allocated.
    pub max_pid: u32,
}

impl KernelConfig {
    /// Configuration built from the compile-time defaults.
    pub const fn new() -> Self {
        Self {
            phys_pages: DEFAULT_PHYS_PAGES,
            stack_pages: STACK_PAGES,
            max_pid: DEFAULT_MAX_PID,
        }
    }

    /// Replace the number of physical pages.
    pub const fn with_phys_pages(mut self, pages: usize) -> Self {
        self.phys_pages = pages;
        self
    }

    /// Replace the highest allocatable pid, capped at [`PID_LIMIT`].
    pub const fn with_max_pid(mut self, max_pid: u32) -> Self {
        self.max_pid = if max_pid > PID_LIMIT { PID_LIMIT } else { max_pid };
        self
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_pid_is_capped() {
        assert_eq!(KernelConfig::new().with_max_pid(9).max_pid, 9);
        assert_eq!(KernelConfig::new().with_max_pid(u32::MAX).max_pid, PID_LIMIT);
    }
}

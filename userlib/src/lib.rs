//! joinos Userspace Library
//!
//! System call wrappers and the user programs shipped with the machine.
//!
//! # Architecture
//!
//! Programs never touch the kernel directly. Every kernel service is
//! reached through a [`syscall::Syscalls`] implementation handed to the
//! program's entry point, so the same program runs on any execution
//! engine that provides one.
//!
//! # Example
//!
//! ```rust,no_run
//! use userlib::{io, process, syscall::Syscalls};
//!
//! fn hello(sys: &dyn Syscalls, _argv: &[&str]) -> i32 {
//!     io::println(sys, "Hello from userspace!");
//!     match process::spawn(sys, "echo.coff", &["echo.coff"]) {
//!         Ok(pid) => process::wait(sys, pid).code().unwrap_or(-1),
//!         Err(_) => -1,
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod fmt;
pub mod io;
pub mod process;
pub mod programs;
pub mod syscall;

#[cfg(test)]
mod mock;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::io::{print, println, stdout};
    pub use crate::process::{exit, spawn, wait, JoinStatus, SpawnError};
    pub use crate::syscall::Syscalls;
}

//! joinos Kernel Library
//!
//! Process lifecycle core of the joinos teaching kernel: pid allocation,
//! parent/child tracking, single-join enforcement and exit-status delivery
//! for the `exec`, `join`, `exit` and `halt` system calls.
//!
//! # Layout
//!
//! - [`process`] - process table, wait queue and lifecycle manager
//! - [`loader`] - executable images and address-space construction
//! - [`memory`] - physical frame pool
//! - [`console`] - append-only console device
//! - [`syscall`] - integer system call ABI on top of the manager
//!
//! The execution engine is not part of this crate. It is reached through
//! the [`process::Platform`] trait, which starts, suspends, wakes and powers
//! off processes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod config;
pub mod console;
pub mod loader;
pub mod memory;
pub mod process;
pub mod syscall;

#[cfg(test)]
mod tests;

pub use config::KernelConfig;
pub use process::{Pid, Platform, ProcessManager, Termination};

//! Host simulator for the joinos lifecycle kernel.
//!
//! Runs the user programs from `userlib` on [`joinos_kernel`], one host
//! thread per simulated process.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod machine;
pub mod output;
pub mod platform;
pub mod process;

pub use config::MachineConfig;
pub use error::SimError;
pub use machine::{Machine, MachineExit, MachineReport, ProcessEntry, RootOutcome};

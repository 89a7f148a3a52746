//! Process Management
//!
//! This module provides pid allocation, parent/child tracking and the
//! lifecycle operations (`exec`, `join`, `exit`, `halt`) built on them.
//!
//! - [`table`] owns every process record and enforces join-once semantics
//! - [`wait`] records which process is blocked joining which pid
//! - [`manager`] composes both with the loader and the [`Platform`]

pub mod manager;
pub mod table;
pub mod wait;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

pub use manager::{ExecError, HaltError, Halted, JoinError, ProcessManager};
pub use table::{ExitRecord, JoinOutcome, ProcessSnapshot, ProcessState, ProcessTable, TableError};
pub use wait::WaitQueue;

/// Process ID type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u32);

impl Pid {
    /// Pid of the first process booted on the machine.
    pub const ROOT: Pid = Pid(0);

    /// Convert a pid received through the integer ABI.
    ///
    /// Negative values never name a process.
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Pid)
    }

    /// Pid as returned through the integer ABI.
    ///
    /// The table never issues a pid above [`crate::config::PID_LIMIT`], so
    /// `None` only comes from a hand-built pid.
    pub fn as_i32(self) -> Option<i32> {
        i32::try_from(self.0).ok()
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process called `exit` (or returned from `main`) with a status.
    Exit(i32),
    /// The process died without producing a status, e.g. on a fault.
    Abnormal,
}

impl Termination {
    /// Build from an optional status; `None` means abnormal termination.
    pub fn from_status(status: Option<i32>) -> Self {
        match status {
            Some(code) => Termination::Exit(code),
            None => Termination::Abnormal,
        }
    }

    /// Exit status, if the process exited cleanly.
    pub fn status(self) -> Option<i32> {
        match self {
            Termination::Exit(code) => Some(code),
            Termination::Abnormal => None,
        }
    }
}

/// Why the machine is being stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The last running process called `halt`.
    Requested(Pid),
    /// Every process has exited.
    AllExited,
    /// No process identifier is left to allocate.
    PidSpaceExhausted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Requested(pid) => write!(f, "halt requested by process {}", pid),
            HaltReason::AllExited => write!(f, "all processes exited"),
            HaltReason::PidSpaceExhausted => write!(f, "process identifier space exhausted"),
        }
    }
}

/// The execution engine could not start a loaded process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// No execution context (thread, stack) is available.
    NoExecutionContext,
    /// The machine is powering off.
    MachineStopped,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::NoExecutionContext => write!(f, "no execution context available"),
            StartError::MachineStopped => write!(f, "machine is stopped"),
        }
    }
}

/// Execution engine seen by the lifecycle manager.
///
/// `wake` and `suspend` follow park/unpark semantics: a `wake` delivered
/// before the matching `suspend` makes that `suspend` return immediately.
/// `suspend` may also return without a `wake`; callers re-check their
/// condition after every return.
pub trait Platform: Send + Sync {
    /// Platform-specific entry point stored in executable images.
    type Entry: Clone + Send;

    /// Schedule a freshly loaded process.
    fn start(&self, pid: Pid, entry: Self::Entry, args: Vec<String>) -> Result<(), StartError>;

    /// Block the calling process `pid` until it is woken.
    fn suspend(&self, pid: Pid);

    /// Make a suspended process runnable.
    fn wake(&self, pid: Pid);

    /// Stop the whole machine. Must tolerate being called more than once.
    fn power_off(&self, reason: HaltReason);
}

//! Process Manager
//!
//! Lifecycle operations on top of the process table: creating a process
//! from an executable image, waiting for a child, terminating, and
//! stopping the machine.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::table::{ExitRecord, JoinOutcome, ProcessTable, TableError};
use super::wait::WaitQueue;
use super::{HaltReason, Pid, Platform, StartError, Termination};
use crate::config::KernelConfig;
use crate::loader::{ImageRegistry, LoadError, Loader};

/// Process creation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
    /// Pid space exhausted; the machine has been powered off
    PidSpaceExhausted,
    /// The calling process has no live record
    NoSuchParent,
    /// The image could not be loaded
    Load(LoadError),
    /// The platform refused to run the loaded image
    Start(StartError),
}

impl From<LoadError> for ExecError {
    fn from(e: LoadError) -> Self {
        ExecError::Load(e)
    }
}

impl From<StartError> for ExecError {
    fn from(e: StartError) -> Self {
        ExecError::Start(e)
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::PidSpaceExhausted => write!(f, "process identifier space exhausted"),
            ExecError::NoSuchParent => write!(f, "calling process not found"),
            ExecError::Load(e) => write!(f, "load failed: {}", e),
            ExecError::Start(e) => write!(f, "start failed: {}", e),
        }
    }
}

/// Join error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    /// Target is not an unjoined child of the caller
    NotAChild,
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::NotAChild => write!(f, "not an unjoined child of the caller"),
        }
    }
}

/// Halt error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltError {
    /// Other processes are still running, or the caller is not running
    NotLastProcess,
}

impl fmt::Display for HaltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltError::NotLastProcess => write!(f, "caller is not the last running process"),
        }
    }
}

/// Proof that the machine has been told to power off.
///
/// The caller must not continue executing the halting process.
#[must_use]
#[derive(Debug)]
pub struct Halted(());

/// Process lifecycle manager
pub struct ProcessManager<P: Platform> {
    table: ProcessTable,
    waiters: WaitQueue,
    loader: Loader<P::Entry>,
    platform: P,
}

impl<P: Platform> ProcessManager<P> {
    /// Create a manager with an empty table.
    pub fn new(config: KernelConfig, registry: ImageRegistry<P::Entry>, platform: P) -> Self {
        Self {
            table: ProcessTable::new(config.max_pid),
            waiters: WaitQueue::new(),
            loader: Loader::new(registry, config.phys_pages, config.stack_pages),
            platform,
        }
    }

    /// Boot the first process. It has no parent and gets [`Pid::ROOT`].
    pub fn spawn_root(&self, name: &str, argv: &[&str]) -> Result<Pid, ExecError> {
        let pid = self.spawn(None, name, argv)?;
        log::info!("[PROC] Root process {} started from {}", pid, name);
        Ok(pid)
    }

    /// Create a child of `caller` running image `name` with `argv`.
    ///
    /// On failure no record, pid or frame remains allocated, and `caller`
    /// gains no child.
    pub fn exec(&self, caller: Pid, name: &str, argv: &[&str]) -> Result<Pid, ExecError> {
        match self.spawn(Some(caller), name, argv) {
            Ok(pid) => {
                log::debug!("[PROC] {} exec {} -> pid {}", caller, name, pid);
                Ok(pid)
            }
            Err(e) => {
                log::debug!("[PROC] {} exec {} failed: {}", caller, name, e);
                Err(e)
            }
        }
    }

    fn spawn(&self, parent: Option<Pid>, name: &str, argv: &[&str]) -> Result<Pid, ExecError> {
        let pid = match self.table.allocate(parent) {
            Ok(pid) => pid,
            Err(TableError::PidSpaceExhausted) => {
                log::error!("[PROC] Out of process identifiers, powering off");
                self.platform.power_off(HaltReason::PidSpaceExhausted);
                return Err(ExecError::PidSpaceExhausted);
            }
            Err(_) => return Err(ExecError::NoSuchParent),
        };

        let loaded = match self.loader.load(name, argv) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.table.rollback(pid);
                return Err(e.into());
            }
        };

        let args: Vec<String> = loaded.space.args.clone();
        if let Err(space) = self.table.commit(pid, loaded.space) {
            self.loader.unload(space);
            self.table.rollback(pid);
            return Err(ExecError::NoSuchParent);
        }

        // The child may run, exit and be joined before `start` returns.
        if let Err(e) = self.platform.start(pid, loaded.entry, args) {
            if let Some(space) = self.table.rollback(pid) {
                self.loader.unload(space);
            }
            return Err(e.into());
        }
        Ok(pid)
    }

    /// Wait for child `target` of `caller` to terminate and collect it.
    ///
    /// Returns immediately if the child has already terminated. A child
    /// can be collected at most once.
    pub fn join(&self, caller: Pid, target: Pid) -> Result<Termination, JoinError> {
        loop {
            // Registered before checking, so an exit in between still wakes us.
            self.waiters.register(target, caller);
            match self.table.try_join(caller, target) {
                JoinOutcome::StillRunning => self.platform.suspend(caller),
                JoinOutcome::NotAChild => {
                    self.waiters.cancel(target, caller);
                    return Err(JoinError::NotAChild);
                }
                JoinOutcome::Completed(termination) => {
                    self.waiters.cancel(target, caller);
                    log::debug!("[PROC] {} joined {}: {:?}", caller, target, termination);
                    return Ok(termination);
                }
            }
        }
    }

    /// Terminate `caller`. `None` records an abnormal termination.
    ///
    /// Frees the caller's memory and wakes any process joining it. When no
    /// running process remains, the machine is powered off.
    pub fn exit(&self, caller: Pid, status: Option<i32>) {
        let ExitRecord { space, remaining } = match self.table.mark_exited(caller, status) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("[PROC] exit of {} ignored: {}", caller, e);
                return;
            }
        };

        if let Some(space) = space {
            self.loader.unload(space);
        }
        log::debug!(
            "[PROC] {} exited with {:?}, {} running",
            caller,
            Termination::from_status(status),
            remaining
        );

        for waiter in self.waiters.take(caller) {
            self.platform.wake(waiter);
        }

        if remaining == 0 {
            log::info!("[PROC] Last process exited, powering off");
            self.platform.power_off(HaltReason::AllExited);
        }
    }

    /// Power off the machine if `caller` is the only running process.
    pub fn halt(&self, caller: Pid) -> Result<Halted, HaltError> {
        if !self.table.can_halt(caller) {
            log::debug!("[PROC] halt from {} refused", caller);
            return Err(HaltError::NotLastProcess);
        }
        log::info!("[PROC] Halt requested by {}", caller);
        self.platform.power_off(HaltReason::Requested(caller));
        Ok(Halted(()))
    }

    /// Process table.
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Join wait queue.
    pub fn waiters(&self) -> &WaitQueue {
        &self.waiters
    }

    /// Program loader.
    pub fn loader(&self) -> &Loader<P::Entry> {
        &self.loader
    }

    /// Execution platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Free physical pages.
    pub fn free_pages(&self) -> usize {
        self.loader.free_pages()
    }
}

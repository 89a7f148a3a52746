//! System call handlers.
//!
//! Converts the typed results of the process manager and the console into
//! the integer return conventions seen by user programs.

use super::trace::{self, SyscallStats};
use super::Syscall;
use crate::config::{STDIN_FD, STDOUT_FD};
use crate::console::ConsoleDevice;
use crate::process::{Pid, Platform, ProcessManager, Termination};

/// Dispatches system calls of any process to the kernel services.
pub struct SyscallHandler<'k, P: Platform> {
    manager: &'k ProcessManager<P>,
    console: &'k dyn ConsoleDevice,
    stats: Option<&'k SyscallStats>,
}

impl<'k, P: Platform> SyscallHandler<'k, P> {
    /// Create a handler over `manager` and `console`.
    pub fn new(manager: &'k ProcessManager<P>, console: &'k dyn ConsoleDevice) -> Self {
        Self {
            manager,
            console,
            stats: None,
        }
    }

    /// Count every dispatched call in `stats`.
    pub fn with_stats(mut self, stats: &'k SyscallStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Handle a decoded system call from `caller`.
    ///
    /// After `Exit`, and after a `Halt` returning 0, the caller must not
    /// be resumed.
    pub fn handle(&self, caller: Pid, call: Syscall<'_>) -> i32 {
        let number = call.number();
        if let Some(stats) = self.stats {
            stats.record(number);
        }
        trace::trace_entry(caller, &call);

        let result = match call {
            Syscall::Halt => self.sys_halt(caller),
            Syscall::Exit(status) => self.sys_exit(caller, status),
            Syscall::Exec { name, argv } => self.sys_exec(caller, name, argv),
            Syscall::Join { pid, status } => self.sys_join(caller, pid, status),
            Syscall::Read { fd, buf } => self.sys_read(caller, fd, buf),
            Syscall::Write { fd, buf } => self.sys_write(caller, fd, buf),
            Syscall::Unsupported(number) => {
                log::debug!("[SYSCALL] {} called unsupported {}", caller, number);
                -1
            }
        };

        trace::trace_exit(caller, number, result);
        result
    }

    /// Handle a raw number that names no system call.
    pub fn handle_unknown(&self, caller: Pid, raw: u32) -> i32 {
        if let Some(stats) = self.stats {
            stats.record_unknown();
        }
        log::warn!("[SYSCALL] {} called unknown syscall {}", caller, raw);
        -1
    }

    /// Start a child. Returns its pid, or -1.
    pub fn sys_exec(&self, caller: Pid, name: &str, argv: &[&str]) -> i32 {
        match self.manager.exec(caller, name, argv) {
            Ok(pid) => pid.as_i32().unwrap_or(-1),
            Err(_) => -1,
        }
    }

    /// Wait for child `pid`.
    ///
    /// Returns 1 and stores the exit status in `status` if the child
    /// exited normally, 0 if it terminated abnormally, and -1 if `pid` is
    /// not an unjoined child of the caller. `status` is written only when
    /// 1 is returned.
    pub fn sys_join(&self, caller: Pid, pid: i32, status: &mut i32) -> i32 {
        let Some(target) = Pid::from_raw(pid) else {
            return -1;
        };
        match self.manager.join(caller, target).map(Termination::status) {
            Ok(Some(code)) => {
                *status = code;
                1
            }
            Ok(None) => 0,
            Err(_) => -1,
        }
    }

    /// Terminate the caller with `status`.
    pub fn sys_exit(&self, caller: Pid, status: i32) -> i32 {
        self.manager.exit(caller, Some(status));
        0
    }

    /// Terminate the caller without a status.
    pub fn sys_abort(&self, caller: Pid) {
        log::debug!("[SYSCALL] {} terminated abnormally", caller);
        self.manager.exit(caller, None);
    }

    /// Power off the machine. Returns -1 if the caller is not the last
    /// running process.
    pub fn sys_halt(&self, caller: Pid) -> i32 {
        match self.manager.halt(caller) {
            Ok(_halted) => 0,
            Err(_) => -1,
        }
    }

    /// Read console input. Only the console input descriptor is readable.
    pub fn sys_read(&self, _caller: Pid, fd: i32, buf: &mut [u8]) -> i32 {
        if fd != STDIN_FD {
            return -1;
        }
        clamp(self.console.read(buf))
    }

    /// Write console output. Only the console output descriptor is writable.
    pub fn sys_write(&self, _caller: Pid, fd: i32, buf: &[u8]) -> i32 {
        if fd != STDOUT_FD {
            return -1;
        }
        clamp(self.console.write(buf))
    }
}

fn clamp(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}


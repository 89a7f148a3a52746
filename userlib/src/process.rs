//! Process management for userspace.
//!
//! Typed wrappers over `exec`, `join`, `exit` and `halt`.

use core::fmt;

use crate::syscall::Syscalls;

/// `exec` was refused by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// The kernel returned -1: bad image name, bad arguments, or no memory.
    ExecFailed,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::ExecFailed => write!(f, "process creation failed"),
        }
    }
}

/// How a `join` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStatus {
    /// The child exited with this status.
    Exited(i32),
    /// The child terminated without a status.
    Abnormal,
    /// The pid is not an unjoined child of the caller.
    Invalid,
}

impl JoinStatus {
    /// Decode a `join` return value and the status it may have written.
    pub fn from_raw(ret: i32, status: i32) -> Self {
        match ret {
            1 => JoinStatus::Exited(status),
            0 => JoinStatus::Abnormal,
            _ => JoinStatus::Invalid,
        }
    }

    /// Exit status, if the child exited normally.
    pub fn code(self) -> Option<i32> {
        match self {
            JoinStatus::Exited(code) => Some(code),
            _ => None,
        }
    }
}

/// Start `name` as a child process.
pub fn spawn(sys: &dyn Syscalls, name: &str, argv: &[&str]) -> Result<i32, SpawnError> {
    match sys.exec(name, argv) {
        pid if pid >= 0 => Ok(pid),
        _ => Err(SpawnError::ExecFailed),
    }
}

/// Wait for child `pid` to terminate.
pub fn wait(sys: &dyn Syscalls, pid: i32) -> JoinStatus {
    let mut status = 0;
    let ret = sys.join(pid, &mut status);
    JoinStatus::from_raw(ret, status)
}

/// Exit the current process.
pub fn exit(sys: &dyn Syscalls, code: i32) -> ! {
    sys.exit(code)
}

/// Power off the machine.
///
/// Only returns if the kernel refused, i.e. other processes still run.
pub fn halt(sys: &dyn Syscalls) -> i32 {
    sys.halt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSyscalls;

    #[test]
    fn test_join_status_decoding() {
        assert_eq!(JoinStatus::from_raw(1, 7), JoinStatus::Exited(7));
        assert_eq!(JoinStatus::from_raw(0, 7), JoinStatus::Abnormal);
        assert_eq!(JoinStatus::from_raw(-1, 7), JoinStatus::Invalid);
        assert_eq!(JoinStatus::Exited(-1).code(), Some(-1));
        assert_eq!(JoinStatus::Abnormal.code(), None);
    }

    #[test]
    fn test_spawn_and_wait() {
        let sys = MockSyscalls::new();
        let pid = spawn(&sys, "print_args.coff", &["print_args.coff", "hi"]).unwrap();
        assert_eq!(wait(&sys, pid), JoinStatus::Exited(0));
        assert_eq!(wait(&sys, pid), JoinStatus::Invalid);
    }

    #[test]
    fn test_spawn_failure() {
        let sys = MockSyscalls::new();
        assert_eq!(spawn(&sys, "missing.coff", &[]), Err(SpawnError::ExecFailed));
        assert_eq!(wait(&sys, -1), JoinStatus::Invalid);
    }
}

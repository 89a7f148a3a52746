//! System call interface.
//!
//! Numbers and argument shapes of the integer system call ABI. Every call
//! returns an `i32`; negative values report failure.

pub mod handlers;
pub mod trace;

use core::fmt;

pub use handlers::SyscallHandler;
pub use trace::SyscallStats;

/// System call numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum SyscallNumber {
    // ==========================================
    // Process Management (0-3)
    // ==========================================
    /// Power off the machine.
    Halt = 0,
    /// Terminate the calling process.
    Exit = 1,
    /// Start a child process.
    Exec = 2,
    /// Wait for a child process.
    Join = 3,

    // ==========================================
    // File System (4-9)
    // ==========================================
    /// Create a file.
    Create = 4,
    /// Open a file.
    Open = 5,
    /// Read from a file descriptor.
    Read = 6,
    /// Write to a file descriptor.
    Write = 7,
    /// Close a file descriptor.
    Close = 8,
    /// Delete a file.
    Unlink = 9,
}

impl SyscallNumber {
    /// Number of defined system calls.
    pub const COUNT: usize = 10;

    /// Lower-case name, as used in traces.
    pub fn name(self) -> &'static str {
        match self {
            SyscallNumber::Halt => "halt",
            SyscallNumber::Exit => "exit",
            SyscallNumber::Exec => "exec",
            SyscallNumber::Join => "join",
            SyscallNumber::Create => "create",
            SyscallNumber::Open => "open",
            SyscallNumber::Read => "read",
            SyscallNumber::Write => "write",
            SyscallNumber::Close => "close",
            SyscallNumber::Unlink => "unlink",
        }
    }
}

impl TryFrom<u32> for SyscallNumber {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SyscallNumber::Halt),
            1 => Ok(SyscallNumber::Exit),
            2 => Ok(SyscallNumber::Exec),
            3 => Ok(SyscallNumber::Join),
            4 => Ok(SyscallNumber::Create),
            5 => Ok(SyscallNumber::Open),
            6 => Ok(SyscallNumber::Read),
            7 => Ok(SyscallNumber::Write),
            8 => Ok(SyscallNumber::Close),
            9 => Ok(SyscallNumber::Unlink),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SyscallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded system call with its arguments.
#[derive(Debug)]
pub enum Syscall<'a> {
    Halt,
    Exit(i32),
    Exec { name: &'a str, argv: &'a [&'a str] },
    Join { pid: i32, status: &'a mut i32 },
    Read { fd: i32, buf: &'a mut [u8] },
    Write { fd: i32, buf: &'a [u8] },
    /// A defined number this kernel does not implement.
    Unsupported(SyscallNumber),
}

impl Syscall<'_> {
    /// Number of this call.
    pub fn number(&self) -> SyscallNumber {
        match self {
            Syscall::Halt => SyscallNumber::Halt,
            Syscall::Exit(_) => SyscallNumber::Exit,
            Syscall::Exec { .. } => SyscallNumber::Exec,
            Syscall::Join { .. } => SyscallNumber::Join,
            Syscall::Read { .. } => SyscallNumber::Read,
            Syscall::Write { .. } => SyscallNumber::Write,
            Syscall::Unsupported(number) => *number,
        }
    }
}

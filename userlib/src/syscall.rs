//! System call interface.
//!
//! Integer conventions follow the kernel ABI: negative results report
//! failure, `exit` never returns, and `halt` returns only when refused.

/// The kernel services available to a user program.
pub trait Syscalls {
    /// Start `name` as a child with `argv`. Returns the child pid or -1.
    fn exec(&self, name: &str, argv: &[&str]) -> i32;

    /// Wait for child `pid`. Returns 1 (status written), 0 (abnormal
    /// termination) or -1 (not an unjoined child).
    fn join(&self, pid: i32, status: &mut i32) -> i32;

    /// Terminate the calling process.
    fn exit(&self, status: i32) -> !;

    /// Power off the machine. Returns -1 if the caller is not the last
    /// running process.
    fn halt(&self) -> i32;

    /// Read from a file descriptor. Returns the byte count or -1.
    fn read(&self, fd: i32, buf: &mut [u8]) -> i32;

    /// Write to a file descriptor. Returns the byte count or -1.
    fn write(&self, fd: i32, buf: &[u8]) -> i32;
}

//! I/O functions for userspace.
//!
//! The console is the only device: descriptor 0 reads its input and
//! descriptor 1 writes its output.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::syscall::Syscalls;

/// File descriptor for stdin.
pub const STDIN: i32 = 0;
/// File descriptor for stdout.
pub const STDOUT: i32 = 1;

/// Longest line returned by [`read_line`].
pub const MAX_LINE: usize = 256;

/// Write bytes to a file descriptor.
pub fn write(sys: &dyn Syscalls, fd: i32, buf: &[u8]) -> i32 {
    sys.write(fd, buf)
}

/// Read bytes from a file descriptor.
pub fn read(sys: &dyn Syscalls, fd: i32, buf: &mut [u8]) -> i32 {
    sys.read(fd, buf)
}

/// Print a string to stdout.
pub fn print(sys: &dyn Syscalls, s: &str) {
    let _ = write(sys, STDOUT, s.as_bytes());
}

/// Print a string to stdout with a newline, in a single write.
pub fn println(sys: &dyn Syscalls, s: &str) {
    let mut line = String::with_capacity(s.len() + 1);
    line.push_str(s);
    line.push('\n');
    print(sys, &line);
}

/// Read one line from stdin, without its line terminator.
///
/// Stops at a newline, at end of input, or after [`MAX_LINE`] bytes.
pub fn read_line(sys: &dyn Syscalls) -> String {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while line.len() < MAX_LINE {
        if read(sys, STDIN, &mut byte) <= 0 || byte[0] == b'\n' {
            break;
        }
        line.push(byte[0]);
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8_lossy(&line).into_owned()
}

/// Formatted writer for stdout, for use with `write!`.
pub struct Stdout<'a> {
    sys: &'a dyn Syscalls,
}

/// Get a formatted writer for stdout.
pub fn stdout(sys: &dyn Syscalls) -> Stdout<'_> {
    Stdout { sys }
}

impl fmt::Write for Stdout<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if write(self.sys, STDOUT, s.as_bytes()) < 0 {
            return Err(fmt::Error);
        }
        Ok(())
    }
}

//! Console device.
//!
//! File descriptor 0 reads from the console input queue and file
//! descriptor 1 appends to the console output. Output is append-only and
//! shared by every process; writes from one call are never interleaved
//! with another process's bytes.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use spin::Mutex;

/// A character device used for process I/O.
pub trait ConsoleDevice: Send + Sync {
    /// Append bytes to the output stream. Returns the number written.
    fn write(&self, bytes: &[u8]) -> usize;

    /// Read up to `buf.len()` bytes of pending input. Returns 0 when no
    /// input is available.
    fn read(&self, buf: &mut [u8]) -> usize;
}

/// Callback invoked with every chunk written to a [`BufferConsole`].
pub type OutputHook = fn(&[u8]);

/// In-memory console with a pre-loaded input queue.
pub struct BufferConsole {
    output: Mutex<Vec<u8>>,
    input: Mutex<VecDeque<u8>>,
    hook: Option<OutputHook>,
}

impl BufferConsole {
    /// Create a console with no pending input.
    pub const fn new() -> Self {
        Self {
            output: Mutex::new(Vec::new()),
            input: Mutex::new(VecDeque::new()),
            hook: None,
        }
    }

    /// Mirror every write to `hook` as well as the buffer.
    pub fn with_hook(mut self, hook: OutputHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Queue bytes for later reads.
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().extend(bytes.iter().copied());
    }

    /// Snapshot of everything written so far.
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().clone()
    }
}

impl Default for BufferConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDevice for BufferConsole {
    fn write(&self, bytes: &[u8]) -> usize {
        let mut output = self.output.lock();
        output.extend_from_slice(bytes);
        if let Some(hook) = self.hook {
            hook(bytes);
        }
        bytes.len()
    }

    fn read(&self, buf: &mut [u8]) -> usize {
        let mut input = self.input.lock();
        let count = buf.len().min(input.len());
        for (slot, byte) in buf.iter_mut().zip(input.drain(..count)) {
            *slot = byte;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends() {
        let console = BufferConsole::new();
        assert_eq!(console.write(b"hello "), 6);
        assert_eq!(console.write(b"world\n"), 6);
        assert_eq!(console.output(), b"hello world\n");
    }

    #[test]
    fn test_read_drains_input() {
        let console = BufferConsole::new();
        console.push_input(b"abc");

        let mut buf = [0u8; 2];
        assert_eq!(console.read(&mut buf), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(console.read(&mut buf), 1);
        assert_eq!(buf[0], b'c');
        assert_eq!(console.read(&mut buf), 0);
    }
}

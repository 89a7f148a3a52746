//! Physical frame pool.
//!
//! The simulated machine has a fixed number of physical pages. Frames are
//! handed out from a free list and returned when a process exits, so the
//! pool never grows and allocation failure is the machine's only form of
//! memory exhaustion.

use alloc::vec::Vec;
use spin::Mutex;

use crate::config::PAGE_SIZE;

/// A physical page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame(pub u32);

impl Frame {
    /// Physical start address of the frame.
    pub const fn start_address(self) -> usize {
        self.0 as usize * PAGE_SIZE
    }
}

/// Pool of physical frames shared by all processes.
pub struct FramePool {
    /// Free frame numbers. Reused most-recently-freed first.
    free: Mutex<Vec<Frame>>,
    /// Total number of frames managed by the pool.
    total: usize,
}

impl FramePool {
    /// Create a pool holding frames `0..total`.
    pub fn new(total: usize) -> Self {
        let free = (0..total as u32).rev().map(Frame).collect();
        Self {
            free: Mutex::new(free),
            total,
        }
    }

    /// Allocate `count` frames.
    ///
    /// All-or-nothing: returns `None` without taking any frame when fewer
    /// than `count` are free.
    pub fn allocate(&self, count: usize) -> Option<Vec<Frame>> {
        let mut free = self.free.lock();
        if free.len() < count {
            return None;
        }
        let split = free.len() - count;
        Some(free.split_off(split))
    }

    /// Return frames to the pool.
    pub fn release(&self, frames: Vec<Frame>) {
        let mut free = self.free.lock();
        debug_assert!(free.len() + frames.len() <= self.total);
        free.extend(frames);
    }

    /// Number of frames currently free.
    pub fn free_count(&self) -> usize {
        self.free.lock().len()
    }

    /// Total number of frames managed by the pool.
    pub fn total(&self) -> usize {
        self.total
    }
}

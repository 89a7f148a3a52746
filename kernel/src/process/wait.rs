//! Join wait queue.
//!
//! Maps a target pid to the processes blocked joining it, so that `exit`
//! wakes exactly those waiters and nobody else.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use spin::Mutex;

use super::Pid;

/// Waiters keyed by the pid they are joining.
pub struct WaitQueue {
    waiters: Mutex<BTreeMap<Pid, Vec<Pid>>>,
}

impl WaitQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            waiters: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record that `waiter` is joining `target`. Registering twice is a no-op.
    pub fn register(&self, target: Pid, waiter: Pid) {
        let mut waiters = self.waiters.lock();
        let queue = waiters.entry(target).or_insert_with(Vec::new);
        if !queue.contains(&waiter) {
            queue.push(waiter);
        }
    }

    /// Withdraw `waiter` from `target`'s queue.
    pub fn cancel(&self, target: Pid, waiter: Pid) {
        let mut waiters = self.waiters.lock();
        if let Some(queue) = waiters.get_mut(&target) {
            queue.retain(|pid| *pid != waiter);
            if queue.is_empty() {
                waiters.remove(&target);
            }
        }
    }

    /// Remove and return every waiter on `target`.
    pub fn take(&self, target: Pid) -> Vec<Pid> {
        self.waiters.lock().remove(&target).unwrap_or_default()
    }

    /// Number of processes waiting on `target`.
    pub fn waiting_on(&self, target: Pid) -> usize {
        self.waiters.lock().get(&target).map_or(0, Vec::len)
    }
}

impl Default for WaitQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let queue = WaitQueue::new();
        queue.register(Pid(2), Pid(1));
        queue.register(Pid(2), Pid(1));
        assert_eq!(queue.waiting_on(Pid(2)), 1);
    }

    #[test]
    fn test_take_is_keyed_by_target() {
        let queue = WaitQueue::new();
        queue.register(Pid(2), Pid(1));
        queue.register(Pid(3), Pid(1));
        queue.register(Pid(3), Pid(4));

        assert_eq!(queue.take(Pid(3)), [Pid(1), Pid(4)]);
        assert_eq!(queue.waiting_on(Pid(3)), 0);
        assert_eq!(queue.waiting_on(Pid(2)), 1);
        assert!(queue.take(Pid(9)).is_empty());
    }

    #[test]
    fn test_cancel() {
        let queue = WaitQueue::new();
        queue.register(Pid(2), Pid(1));
        queue.cancel(Pid(2), Pid(1));
        queue.cancel(Pid(5), Pid(1));
        assert!(queue.take(Pid(2)).is_empty());
    }
}

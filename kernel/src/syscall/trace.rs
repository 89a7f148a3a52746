//! System call tracing and statistics.
//!
//! Every dispatched call is counted. With the `trace-syscalls` feature,
//! entry and result of each call are also logged at trace level.

use core::sync::atomic::{AtomicU64, Ordering};

use super::{Syscall, SyscallNumber};
use crate::process::Pid;

// ═══════════════════════════════════════════════════════════════════════
// Statistics
// ═══════════════════════════════════════════════════════════════════════

/// Per-call invocation counters.
pub struct SyscallStats {
    counts: [AtomicU64; SyscallNumber::COUNT],
    unknown: AtomicU64,
}

impl SyscallStats {
    /// All counters at zero.
    pub const fn new() -> Self {
        const ZERO: AtomicU64 = AtomicU64::new(0);
        Self {
            counts: [ZERO; SyscallNumber::COUNT],
            unknown: AtomicU64::new(0),
        }
    }

    /// Count one invocation of `number`.
    pub fn record(&self, number: SyscallNumber) {
        self.counts[number as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Count one invocation of an undefined number.
    pub fn record_unknown(&self) {
        self.unknown.fetch_add(1, Ordering::Relaxed);
    }

    /// Invocations of `number` so far.
    pub fn count(&self, number: SyscallNumber) -> u64 {
        self.counts[number as usize].load(Ordering::Relaxed)
    }

    /// Invocations of undefined numbers so far.
    pub fn unknown(&self) -> u64 {
        self.unknown.load(Ordering::Relaxed)
    }

    /// Invocations of defined numbers so far.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Reset every counter.
    pub fn reset(&self) {
        for count in &self.counts {
            count.store(0, Ordering::Relaxed);
        }
        self.unknown.store(0, Ordering::Relaxed);
    }

    /// Every call made at least once, with its count, in number order.
    pub fn nonzero(&self) -> impl Iterator<Item = (SyscallNumber, u64)> + '_ {
        (0..SyscallNumber::COUNT as u32)
            .filter_map(|raw| SyscallNumber::try_from(raw).ok())
            .map(|number| (number, self.count(number)))
            .filter(|&(_, count)| count > 0)
    }

    /// Log every non-zero counter at info level.
    pub fn dump(&self) {
        log::info!("[SYSCALL] {} calls, {} unknown", self.total(), self.unknown());
        for (number, count) in self.nonzero() {
            log::info!("[SYSCALL]   {:<8} {}", number.name(), count);
        }
    }
}

impl Default for SyscallStats {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tracing
// ═══════════════════════════════════════════════════════════════════════

/// Log a call on entry.
#[cfg(feature = "trace-syscalls")]
pub fn trace_entry(caller: Pid, call: &Syscall<'_>) {
    match call {
        Syscall::Exec { name, argv } => {
            log::trace!("[SYSCALL] {} exec({:?}, {:?})", caller, name, argv)
        }
        Syscall::Join { pid, .. } => log::trace!("[SYSCALL] {} join({})", caller, pid),
        Syscall::Exit(status) => log::trace!("[SYSCALL] {} exit({})", caller, status),
        Syscall::Read { fd, buf } => {
            log::trace!("[SYSCALL] {} read({}, {} bytes)", caller, fd, buf.len())
        }
        Syscall::Write { fd, buf } => {
            log::trace!("[SYSCALL] {} write({}, {} bytes)", caller, fd, buf.len())
        }
        other => log::trace!("[SYSCALL] {} {}()", caller, other.number()),
    }
}

/// Log a call's result.
#[cfg(feature = "trace-syscalls")]
pub fn trace_exit(caller: Pid, number: SyscallNumber, result: i32) {
    log::trace!("[SYSCALL] {} {} = {}", caller, number, result);
}

#[cfg(not(feature = "trace-syscalls"))]
#[inline(always)]
pub fn trace_entry(_caller: Pid, _call: &Syscall<'_>) {}

#[cfg(not(feature = "trace-syscalls"))]
#[inline(always)]
pub fn trace_exit(_caller: Pid, _number: SyscallNumber, _result: i32) {}

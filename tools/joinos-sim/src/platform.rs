//! Host execution platform.
//!
//! Every simulated process runs on its own host thread. A process blocked
//! in `join` parks on a per-pid token; `wake` sets the token, so a wake
//! that arrives before the park is not lost. Powering off records why the
//! machine stopped and releases every parked process.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};

use joinos_kernel::process::{HaltReason, Pid, Platform, StartError};
use userlib::programs::Main;

use crate::machine::Kernel;
use crate::process::{SimProcess, Trap};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Critical sections are single updates; a poisoned lock is still consistent.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Suspend/wake token of one process.
#[derive(Default)]
struct Parker {
    woken: Mutex<bool>,
    cond: Condvar,
}

impl Parker {
    /// Block until a token is available or `halted` is set.
    fn park(&self, halted: &AtomicBool) {
        let mut woken = lock(&self.woken);
        while !*woken && !halted.load(Ordering::SeqCst) {
            woken = self.cond.wait(woken).unwrap_or_else(PoisonError::into_inner);
        }
        *woken = false;
    }

    fn unpark(&self) {
        *lock(&self.woken) = true;
        self.cond.notify_one();
    }
}

/// Platform running each process on a host thread.
pub struct HostPlatform {
    kernel: Weak<Kernel>,
    parkers: Mutex<HashMap<Pid, Arc<Parker>>>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    halted: AtomicBool,
    exit: Mutex<Option<HaltReason>>,
    stopped: Condvar,
}

impl HostPlatform {
    /// Create a platform serving `kernel`.
    pub fn new(kernel: Weak<Kernel>) -> Self {
        Self {
            kernel,
            parkers: Mutex::new(HashMap::new()),
            threads: Mutex::new(Vec::new()),
            halted: AtomicBool::new(false),
            exit: Mutex::new(None),
            stopped: Condvar::new(),
        }
    }

    /// Whether the machine has been powered off.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Block until the machine powers off, then wait for every process
    /// thread to finish.
    pub fn wait_for_power_off(&self) -> HaltReason {
        let reason = {
            let mut exit = lock(&self.exit);
            loop {
                if let Some(reason) = *exit {
                    break reason;
                }
                exit = self.stopped.wait(exit).unwrap_or_else(PoisonError::into_inner);
            }
        };

        loop {
            let handles: Vec<_> = lock(&self.threads).drain(..).collect();
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                let _ = handle.join();
            }
        }
        reason
    }

    fn parker(&self, pid: Pid) -> Option<Arc<Parker>> {
        lock(&self.parkers).get(&pid).cloned()
    }

    fn retire(&self, pid: Pid) {
        lock(&self.parkers).remove(&pid);
    }
}

impl Platform for HostPlatform {
    type Entry = Main;

    fn start(&self, pid: Pid, entry: Main, args: Vec<String>) -> Result<(), StartError> {
        if self.is_halted() {
            return Err(StartError::MachineStopped);
        }
        let kernel = self.kernel.upgrade().ok_or(StartError::MachineStopped)?;

        lock(&self.parkers).insert(pid, Arc::new(Parker::default()));
        let spawned = thread::Builder::new()
            .name(format!("pid-{pid}"))
            .spawn(move || run_process(kernel, pid, entry, args));

        match spawned {
            Ok(handle) => {
                lock(&self.threads).push(handle);
                Ok(())
            }
            Err(e) => {
                log::warn!("[SIM] no thread for process {}: {}", pid, e);
                self.retire(pid);
                Err(StartError::NoExecutionContext)
            }
        }
    }

    fn suspend(&self, pid: Pid) {
        match self.parker(pid) {
            Some(parker) => parker.park(&self.halted),
            None => thread::yield_now(),
        }
        if self.is_halted() {
            panic::resume_unwind(Box::new(Trap));
        }
    }

    fn wake(&self, pid: Pid) {
        if let Some(parker) = self.parker(pid) {
            parker.unpark();
        }
    }

    fn power_off(&self, reason: HaltReason) {
        {
            let mut exit = lock(&self.exit);
            if exit.is_some() {
                return;
            }
            *exit = Some(reason);
            self.halted.store(true, Ordering::SeqCst);
        }
        log::info!("[SIM] Machine powered off: {}", reason);

        self.stopped.notify_all();
        for parker in lock(&self.parkers).values() {
            parker.unpark();
        }
    }
}

/// Body of a process thread.
fn run_process(kernel: Arc<Kernel>, pid: Pid, main: Main, args: Vec<String>) {
    let process = SimProcess::new(&kernel, pid);
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| main(&process, &argv)));
    let platform = kernel.manager.platform();

    if !platform.is_halted() {
        match outcome {
            Ok(status) => kernel.manager.exit(pid, Some(status)),
            // exit() already recorded the termination.
            Err(payload) if payload.is::<Trap>() => {}
            Err(_) => {
                log::warn!("[SIM] process {} crashed", pid);
                kernel.syscalls().sys_abort(pid);
            }
        }
    }
    platform.retire(pid);
}

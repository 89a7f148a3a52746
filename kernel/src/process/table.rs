//! Process Table
//!
//! Owns the record of every process from `exec` until its parent joins it.
//! All operations take the table lock for their own duration only; no lock
//! is ever held while a process is suspended.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use spin::Mutex;

use super::{Pid, Termination};
use crate::config::PID_LIMIT;
use crate::loader::AddressSpace;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Pid allocated, image still loading; the process has never run
    Embryo,
    /// Process is running (or suspended in `join`)
    Running,
    /// Process has terminated and waits for its parent's join
    Exited(Termination),
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Target is not an unjoined child of the caller.
    NotAChild,
    /// Target has not terminated yet; the caller must wait.
    StillRunning,
    /// Target terminated; its record has been consumed.
    Completed(Termination),
}

/// Process table errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// No pid left below the configured maximum
    PidSpaceExhausted,
    /// No record with this pid
    NoSuchProcess(Pid),
    /// Record is not in the state the operation requires
    InvalidState(Pid, ProcessState),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::PidSpaceExhausted => write!(f, "process identifier space exhausted"),
            TableError::NoSuchProcess(pid) => write!(f, "no process {}", pid),
            TableError::InvalidState(pid, state) => {
                write!(f, "process {} is in state {:?}", pid, state)
            }
        }
    }
}

/// One process.
#[derive(Debug)]
pub struct ProcessRecord {
    /// Process ID
    pub pid: Pid,
    /// Creator, `None` for the root process
    pub parent: Option<Pid>,
    /// Lifecycle state
    pub state: ProcessState,
    /// Spawned children not yet joined
    pub children: BTreeSet<Pid>,
    /// Memory owned while the process is alive
    space: Option<AddressSpace>,
}

impl ProcessRecord {
    fn new(pid: Pid, parent: Option<Pid>) -> Self {
        Self {
            pid,
            parent,
            state: ProcessState::Embryo,
            children: BTreeSet::new(),
            space: None,
        }
    }
}

/// Lightweight copy of a record, taken without holding the lock afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: Pid,
    pub parent: Option<Pid>,
    pub state: ProcessState,
    pub children: Vec<Pid>,
    pub image: Option<String>,
}

/// A process that just terminated.
#[derive(Debug)]
pub struct ExitRecord {
    /// Address space to give back to the frame pool
    pub space: Option<AddressSpace>,
    /// Running processes left after this one
    pub remaining: usize,
}

struct TableInner {
    records: BTreeMap<Pid, ProcessRecord>,
    next_pid: u32,
    running: usize,
}

/// The authoritative pid-to-record mapping.
pub struct ProcessTable {
    inner: Mutex<TableInner>,
    max_pid: u32,
}

impl ProcessTable {
    /// Create an empty table handing out pids `0..=max_pid`.
    ///
    /// `max_pid` is capped at [`PID_LIMIT`].
    pub const fn new(max_pid: u32) -> Self {
        let max_pid = if max_pid > PID_LIMIT { PID_LIMIT } else { max_pid };
        Self {
            inner: Mutex::new(TableInner {
                records: BTreeMap::new(),
                next_pid: 0,
                running: 0,
            }),
            max_pid,
        }
    }

    /// Create an embryo record under `parent` and return its pid.
    ///
    /// The pid is added to the parent's children at once, so a record that
    /// is later committed is joinable without further bookkeeping.
    pub fn allocate(&self, parent: Option<Pid>) -> Result<Pid, TableError> {
        let mut inner = self.inner.lock();
        if inner.next_pid > self.max_pid {
            return Err(TableError::PidSpaceExhausted);
        }
        let pid = Pid(inner.next_pid);

        if let Some(ppid) = parent {
            let parent_record = inner
                .records
                .get_mut(&ppid)
                .ok_or(TableError::NoSuchProcess(ppid))?;
            parent_record.children.insert(pid);
        }

        inner.next_pid += 1;
        inner.records.insert(pid, ProcessRecord::new(pid, parent));
        Ok(pid)
    }

    /// Turn an embryo into a running process owning `space`.
    ///
    /// Gives `space` back if `pid` is not an embryo.
    pub fn commit(&self, pid: Pid, space: AddressSpace) -> Result<(), AddressSpace> {
        let mut inner = self.inner.lock();
        match inner.records.get_mut(&pid) {
            Some(record) if record.state == ProcessState::Embryo => {
                record.state = ProcessState::Running;
                record.space = Some(space);
            }
            _ => return Err(space),
        }
        inner.running += 1;
        Ok(())
    }

    /// Undo a spawn that never got to run.
    ///
    /// Removes the record and the parent's reference to it. If `pid` was
    /// the last one issued, it is handed out again by the next `allocate`.
    /// Otherwise another spawn allocated after it and `pid` is retired for
    /// good: pids never go backwards past one that was handed out. Which
    /// case applies to concurrent spawns depends on their interleaving.
    pub fn rollback(&self, pid: Pid) -> Option<AddressSpace> {
        let mut inner = self.inner.lock();
        let record = inner.records.remove(&pid)?;

        if let Some(ppid) = record.parent {
            if let Some(parent) = inner.records.get_mut(&ppid) {
                parent.children.remove(&pid);
            }
        }
        if record.state == ProcessState::Running {
            inner.running -= 1;
        }
        if pid.0 + 1 == inner.next_pid {
            inner.next_pid = pid.0;
        }
        record.space
    }

    /// Record the termination of a running process.
    ///
    /// `None` marks an abnormal termination. The record stays in the table
    /// until its parent joins it.
    pub fn mark_exited(&self, pid: Pid, status: Option<i32>) -> Result<ExitRecord, TableError> {
        let mut inner = self.inner.lock();
        let record = inner
            .records
            .get_mut(&pid)
            .ok_or(TableError::NoSuchProcess(pid))?;
        if record.state != ProcessState::Running {
            return Err(TableError::InvalidState(pid, record.state));
        }

        record.state = ProcessState::Exited(Termination::from_status(status));
        let space = record.space.take();
        inner.running -= 1;

        Ok(ExitRecord {
            space,
            remaining: inner.running,
        })
    }

    /// Attempt to collect `target` on behalf of `caller`.
    pub fn try_join(&self, caller: Pid, target: Pid) -> JoinOutcome {
        let mut inner = self.inner.lock();

        let is_child = inner
            .records
            .get(&caller)
            .map_or(false, |record| record.children.contains(&target));
        if !is_child {
            return JoinOutcome::NotAChild;
        }

        let termination = match inner.records.get(&target).map(|record| record.state) {
            Some(ProcessState::Exited(termination)) => termination,
            Some(_) => return JoinOutcome::StillRunning,
            None => {
                // Child set and records disagree; drop the stale reference.
                if let Some(record) = inner.records.get_mut(&caller) {
                    record.children.remove(&target);
                }
                return JoinOutcome::NotAChild;
            }
        };

        if let Some(record) = inner.records.get_mut(&caller) {
            record.children.remove(&target);
        }
        inner.records.remove(&target);
        JoinOutcome::Completed(termination)
    }

    /// Whether `caller` is the only running process.
    pub fn can_halt(&self, caller: Pid) -> bool {
        let inner = self.inner.lock();
        inner.running == 1
            && inner
                .records
                .get(&caller)
                .map_or(false, |record| record.state == ProcessState::Running)
    }

    /// Number of running processes.
    pub fn running_count(&self) -> usize {
        self.inner.lock().running
    }

    /// Number of records, including exited and embryo ones.
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Whether the table holds no record.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }

    /// Whether a record with `pid` exists.
    pub fn contains(&self, pid: Pid) -> bool {
        self.inner.lock().records.contains_key(&pid)
    }

    /// Current state of `pid`, if it has a record.
    pub fn state_of(&self, pid: Pid) -> Option<ProcessState> {
        self.inner.lock().records.get(&pid).map(|record| record.state)
    }

    /// The pid the next successful `allocate` will return.
    pub fn next_pid(&self) -> Pid {
        Pid(self.inner.lock().next_pid)
    }

    /// Copy of every record.
    pub fn snapshot(&self) -> Vec<ProcessSnapshot> {
        let inner = self.inner.lock();
        inner
            .records
            .values()
            .map(|record| ProcessSnapshot {
                pid: record.pid,
                parent: record.parent,
                state: record.state,
                children: record.children.iter().copied().collect(),
                image: record.space.as_ref().map(|space| space.image.clone()),
            })
            .collect()
    }
}

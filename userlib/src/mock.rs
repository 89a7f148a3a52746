//! In-process system call mock for unit tests.
//!
//! `exec` runs the child program to completion before returning, so a
//! whole process tree executes on the test thread. `exit` and a granted
//! `halt` unwind to the nearest [`MockSyscalls::run_main`].

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::programs::{self, Main};
use crate::syscall::Syscalls;

/// Value `run_main` returns when the program halted the machine.
pub const HALTED: i32 = i32::MIN;

struct ExitTrap(i32);
struct HaltTrap;

#[derive(Default)]
struct Machine {
    output: RefCell<String>,
    input: RefCell<VecDeque<u8>>,
    next_pid: Cell<i32>,
    running_children: Cell<usize>,
    process_limit: Cell<Option<usize>>,
    refuse_halt: Cell<bool>,
}

pub struct MockSyscalls {
    machine: Rc<Machine>,
    children: RefCell<HashMap<i32, Option<i32>>>,
    is_root: bool,
}

impl MockSyscalls {
    pub fn new() -> Self {
        let machine = Machine::default();
        machine.next_pid.set(1);
        Self {
            machine: Rc::new(machine),
            children: RefCell::new(HashMap::new()),
            is_root: true,
        }
    }

    pub fn with_input(input: &str) -> Self {
        let sys = Self::new();
        sys.machine.input.borrow_mut().extend(input.bytes());
        sys
    }

    /// Refuse `exec` while `limit` children are running.
    pub fn with_process_limit(self, limit: usize) -> Self {
        self.machine.process_limit.set(Some(limit));
        self
    }

    pub fn refusing_halt(self) -> Self {
        self.machine.refuse_halt.set(true);
        self
    }

    pub fn output(&self) -> String {
        self.machine.output.borrow().clone()
    }

    /// Run `main` as this process. Returns its exit status, or [`HALTED`].
    pub fn run_main(&self, main: Main, argv: &[&str]) -> i32 {
        self.run(main, argv).unwrap_or(-1)
    }

    fn run(&self, main: Main, argv: &[&str]) -> Option<i32> {
        match panic::catch_unwind(AssertUnwindSafe(|| main(self, argv))) {
            Ok(status) => Some(status),
            Err(payload) => {
                if let Some(ExitTrap(status)) = payload.downcast_ref::<ExitTrap>() {
                    Some(*status)
                } else if payload.is::<HaltTrap>() {
                    Some(HALTED)
                } else {
                    None
                }
            }
        }
    }

    fn child(&self) -> Self {
        Self {
            machine: Rc::clone(&self.machine),
            children: RefCell::new(HashMap::new()),
            is_root: false,
        }
    }
}

impl Syscalls for MockSyscalls {
    fn exec(&self, name: &str, argv: &[&str]) -> i32 {
        let Some(program) = programs::find(name) else {
            return -1;
        };
        let running = self.machine.running_children.get();
        if self.machine.process_limit.get().map_or(false, |limit| running >= limit) {
            return -1;
        }

        let pid = self.machine.next_pid.get();
        self.machine.next_pid.set(pid + 1);

        self.machine.running_children.set(running + 1);
        let status = self.child().run(program.main, argv);
        self.machine.running_children.set(running);

        self.children.borrow_mut().insert(pid, status);
        pid
    }

    fn join(&self, pid: i32, status: &mut i32) -> i32 {
        match self.children.borrow_mut().remove(&pid) {
            Some(Some(code)) => {
                *status = code;
                1
            }
            Some(None) => 0,
            None => -1,
        }
    }

    fn exit(&self, status: i32) -> ! {
        panic::panic_any(ExitTrap(status))
    }

    fn halt(&self) -> i32 {
        let alone = self.is_root && self.machine.running_children.get() == 0;
        if !alone || self.machine.refuse_halt.get() {
            return -1;
        }
        panic::panic_any(HaltTrap)
    }

    fn read(&self, fd: i32, buf: &mut [u8]) -> i32 {
        if fd != 0 {
            return -1;
        }
        let mut input = self.machine.input.borrow_mut();
        let count = buf.len().min(input.len());
        for (slot, byte) in buf.iter_mut().zip(input.drain(..count)) {
            *slot = byte;
        }
        count as i32
    }

    fn write(&self, fd: i32, buf: &[u8]) -> i32 {
        if fd != 1 {
            return -1;
        }
        self.machine
            .output
            .borrow_mut()
            .push_str(&String::from_utf8_lossy(buf));
        buf.len() as i32
    }
}

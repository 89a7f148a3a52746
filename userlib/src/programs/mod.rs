//! User programs installed on every machine.
//!
//! Each program is an entry point taking the system call interface and its
//! argument vector. Returning from the entry point exits with the returned
//! status.

pub mod echo;
pub mod fibonacci;
pub mod print_args;

use crate::syscall::Syscalls;

/// Program entry point.
pub type Main = fn(&dyn Syscalls, &[&str]) -> i32;

/// An installable program image.
#[derive(Clone, Copy)]
pub struct Program {
    /// Image name passed to `exec`.
    pub name: &'static str,
    /// Code and data pages.
    pub pages: usize,
    /// Entry point.
    pub main: Main,
    /// One-line summary.
    pub about: &'static str,
}

/// Every built-in program.
pub const PROGRAMS: &[Program] = &[
    Program {
        name: echo::NAME,
        pages: 2,
        main: echo::main,
        about: "echo one line of input, then try to halt",
    },
    Program {
        name: fibonacci::NAME,
        pages: 3,
        main: fibonacci::main,
        about: "compute fibonacci(n) with one child process per call",
    },
    Program {
        name: join_test::NAME,
        pages: 4,
        main: join_test::main,
        about: "exercise exec, join and halt from a parent process",
    },
    Program {
        name: print_args::NAME,
        pages: 2,
        main: print_args::main,
        about: "print each argument on its own line",
    },
];

/// Look up a built-in program by image name.
pub fn find(name: &str) -> Option<&'static Program> {
    PROGRAMS.iter().find(|program| program.name == name)
}

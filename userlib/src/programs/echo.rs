//! `echo.coff`: echo a line of input, then try to halt.

use crate::io;
use crate::process;
use crate::syscall::Syscalls;

/// Image name.
pub const NAME: &str = "echo.coff";

pub fn main(sys: &dyn Syscalls, _argv: &[&str]) -> i32 {
    io::print(sys, "echo: ");
    let line = io::read_line(sys);
    io::println(sys, &line);

    // Only the last running process may halt; a parent is still waiting.
    process::halt(sys);
    io::println(sys, "halt refused");
    0
}

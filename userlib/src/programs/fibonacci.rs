//! `fibonacci.coff`: recursive fibonacci through child processes.
//!
//! `fibonacci n` computes fib(n) with fib(0) = 1 and fib(1) = 2. For
//! larger n it runs itself on n-2, joins it, runs itself on n-1, joins
//! it, prints the sum and exits with it. Negative n is treated as 0.

use alloc::format;

use crate::fmt::{int_to_string, parse_int};
use crate::io;
use crate::process::{self, JoinStatus};
use crate::syscall::Syscalls;

/// Image name.
pub const NAME: &str = "fibonacci.coff";

/// Status of a process that could not create its children.
pub const OUT_OF_MEMORY: i32 = -1;

pub fn main(sys: &dyn Syscalls, argv: &[&str]) -> i32 {
    let n = argv.get(1).map_or(0, |arg| parse_int(arg));

    // A digit string past i32::MAX wraps negative; it counts as 0.
    match n {
        i32::MIN..=0 => return 1,
        1 => return 2,
        _ => {}
    }

    let a = child(sys, n - 2);
    let b = child(sys, n - 1);
    let sum = a.wrapping_add(b);

    io::println(sys, &format!("fibonacci({}) = {}", n, sum));
    sum
}

fn child(sys: &dyn Syscalls, n: i32) -> i32 {
    let arg = int_to_string(n);
    let Ok(pid) = process::spawn(sys, NAME, &[NAME, &arg]) else {
        out_of_memory(sys)
    };
    match process::wait(sys, pid) {
        JoinStatus::Exited(OUT_OF_MEMORY) | JoinStatus::Abnormal | JoinStatus::Invalid => {
            out_of_memory(sys)
        }
        JoinStatus::Exited(value) => value,
    }
}

fn out_of_memory(sys: &dyn Syscalls) -> ! {
    io::println(sys, "Machine ran out of memory");
    process::exit(sys, OUT_OF_MEMORY)
}

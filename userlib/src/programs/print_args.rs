//! `print_args.coff`: print each argument after the image name.

use crate::io;
use crate::syscall::Syscalls;

/// Image name.
pub const NAME: &str = "print_args.coff";

pub fn main(sys: &dyn Syscalls, argv: &[&str]) -> i32 {
    for arg in argv.iter().skip(1) {
        io::println(sys, arg);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSyscalls;

    #[test]
    fn test_prints_arguments() {
        let sys = MockSyscalls::new();
        assert_eq!(main(&sys, &[NAME, "hey", "there"]), 0);
        assert_eq!(sys.output(), "hey\nthere\n");
    }
}

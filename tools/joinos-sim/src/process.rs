//! User process view of the kernel.

use std::panic;

use joinos_kernel::process::Pid;
use joinos_kernel::syscall::Syscall;
use userlib::syscall::Syscalls;

use crate::machine::Kernel;

/// Unwind payload that ends a process thread without counting as a crash.
///
/// Raised by `exit`, by a successful `halt`, and by any system call made
/// after the machine powered off.
#[derive(Debug)]
pub struct Trap;

/// System call interface of one simulated process.
pub struct SimProcess<'k> {
    kernel: &'k Kernel,
    pid: Pid,
}

impl<'k> SimProcess<'k> {
    pub fn new(kernel: &'k Kernel, pid: Pid) -> Self {
        Self { kernel, pid }
    }

    fn dispatch(&self, call: Syscall<'_>) -> i32 {
        self.stop_if_halted();
        let result = self.kernel.syscalls().handle(self.pid, call);
        self.stop_if_halted();
        result
    }

    fn stop_if_halted(&self) {
        if self.kernel.manager.platform().is_halted() {
            panic::resume_unwind(Box::new(Trap));
        }
    }
}

impl Syscalls for SimProcess<'_> {
    fn exec(&self, name: &str, argv: &[&str]) -> i32 {
        self.dispatch(Syscall::Exec { name, argv })
    }

    fn join(&self, pid: i32, status: &mut i32) -> i32 {
        self.dispatch(Syscall::Join { pid, status })
    }

    fn exit(&self, status: i32) -> ! {
        self.dispatch(Syscall::Exit(status));
        panic::resume_unwind(Box::new(Trap))
    }

    fn halt(&self) -> i32 {
        // A granted halt powers off the machine, and dispatch unwinds.
        self.dispatch(Syscall::Halt)
    }

    fn read(&self, fd: i32, buf: &mut [u8]) -> i32 {
        self.dispatch(Syscall::Read { fd, buf })
    }

    fn write(&self, fd: i32, buf: &[u8]) -> i32 {
        self.dispatch(Syscall::Write { fd, buf })
    }
}

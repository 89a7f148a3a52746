//! Test programs installed next to the built-in ones.

#![allow(dead_code)]

use std::fmt::Write as _;

use joinos_sim::{Machine, MachineConfig};
use userlib::fmt::parse_int;
use userlib::io;
use userlib::programs::Program;
use userlib::syscall::Syscalls;

/// `status.coff n`: exit with status n.
pub const STATUS: Program = Program {
    name: "status.coff",
    pages: 1,
    main: status_main,
    about: "exit with the given status",
};

/// `crash.coff`: die without a status.
pub const CRASH: Program = Program {
    name: "crash.coff",
    pages: 1,
    main: crash_main,
    about: "terminate abnormally",
};

/// `parent.coff image [args..]`: exec the image, join it, and print
/// `exec=<pid> join=<ret> status=<status>`. Exits with the child's status.
pub const PARENT: Program = Program {
    name: "parent.coff",
    pages: 1,
    main: parent_main,
    about: "run one child and report its join",
};

/// `join_order.coff i j ..`: start one `status.coff` child per argument,
/// child k exiting with 100 + k, then join them in the given order, twice
/// each. Prints `child=<k> first=<ret>:<status> second=<ret>` per join.
pub const JOIN_ORDER: Program = Program {
    name: "join_order.coff",
    pages: 1,
    main: join_order_main,
    about: "join children in a given order",
};

/// `halt_child.coff`: start a child that tries to halt, then halt.
pub const HALT_CHILD: Program = Program {
    name: "halt_child.coff",
    pages: 1,
    main: halt_child_main,
    about: "halt from a child while the parent is alive",
};

/// `halter.coff`: try to halt and exit 7 if refused.
pub const HALTER: Program = Program {
    name: "halter.coff",
    pages: 1,
    main: halter_main,
    about: "try to halt",
};

const UNTOUCHED: i32 = -99;

fn status_main(_sys: &dyn Syscalls, argv: &[&str]) -> i32 {
    argv.get(1).map_or(0, |arg| parse_int(arg))
}

fn crash_main(_sys: &dyn Syscalls, _argv: &[&str]) -> i32 {
    panic!("crash.coff faulted")
}

fn parent_main(sys: &dyn Syscalls, argv: &[&str]) -> i32 {
    let child = &argv[1..];
    let pid = sys.exec(child[0], child);
    let mut status = UNTOUCHED;
    let ret = sys.join(if pid < 0 { 1 } else { pid }, &mut status);
    let _ = writeln!(io::stdout(sys), "exec={pid} join={ret} status={status}");
    status
}

fn join_order_main(sys: &dyn Syscalls, argv: &[&str]) -> i32 {
    let count = argv.len() - 1;
    let mut pids = Vec::new();
    for k in 0..count {
        let status = (100 + k).to_string();
        pids.push(sys.exec(STATUS.name, &[STATUS.name, &status]));
    }
    for arg in &argv[1..] {
        let k = parse_int(arg) as usize;
        let mut status = UNTOUCHED;
        let first = sys.join(pids[k], &mut status);
        let mut again = UNTOUCHED;
        let second = sys.join(pids[k], &mut again);
        let _ = writeln!(io::stdout(sys), "child={k} first={first}:{status} second={second}");
    }
    0
}

fn halt_child_main(sys: &dyn Syscalls, _argv: &[&str]) -> i32 {
    let pid = sys.exec(HALTER.name, &[HALTER.name]);
    let mut status = UNTOUCHED;
    let ret = sys.join(pid, &mut status);
    let _ = writeln!(io::stdout(sys), "child halt join={ret} status={status}");
    sys.halt();
    -1
}

fn halter_main(sys: &dyn Syscalls, _argv: &[&str]) -> i32 {
    if sys.halt() == -1 {
        7
    } else {
        0
    }
}

/// Machine with the built-in and test programs installed.
pub fn machine(config: MachineConfig) -> Machine {
    [STATUS, CRASH, PARENT, JOIN_ORDER, HALT_CHILD, HALTER]
        .iter()
        .fold(Machine::new(config), |machine, program| machine.install(program))
}

/// Configuration with `phys_pages` pages and defaults otherwise.
pub fn with_pages(phys_pages: usize) -> MachineConfig {
    MachineConfig {
        phys_pages,
        ..MachineConfig::default()
    }
}

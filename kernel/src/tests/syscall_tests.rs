//! System Call Unit Tests
//!
//! Tests for the integer return conventions of the lifecycle and console
//! system calls.

#[cfg(test)]
mod tests {
    use crate::console::BufferConsole;
    use crate::process::Pid;
    use crate::syscall::{Syscall, SyscallHandler, SyscallNumber, SyscallStats};
    use crate::tests::platform::{child_pages, manager};

    const UNTOUCHED: i32 = -12345;

    // ========================================
    // Exec / Join Tests
    // ========================================

    #[test]
    fn test_join_returns_child_status() {
        let pm = manager(256);
        let console = BufferConsole::new();
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();

        let pid = sys.sys_exec(root, "child.coff", &["child.coff", "0"]);
        assert!(pid > 0);
        assert_eq!(sys.sys_exit(Pid(pid as u32), 1), 0);

        let mut status = UNTOUCHED;
        assert_eq!(sys.sys_join(root, pid, &mut status), 1);
        assert_eq!(status, 1);
    }

    #[test]
    fn test_join_negative_status() {
        let pm = manager(256);
        let console = BufferConsole::new();
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();

        let pid = sys.sys_exec(root, "child.coff", &[]);
        sys.sys_exit(Pid(pid as u32), -1);

        let mut status = UNTOUCHED;
        assert_eq!(sys.sys_join(root, pid, &mut status), 1);
        assert_eq!(status, -1);
    }

    #[test]
    fn test_join_abnormal_leaves_status() {
        let pm = manager(256);
        let console = BufferConsole::new();
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();

        let pid = sys.sys_exec(root, "child.coff", &[]);
        sys.sys_abort(Pid(pid as u32));

        let mut status = UNTOUCHED;
        assert_eq!(sys.sys_join(root, pid, &mut status), 0);
        assert_eq!(status, UNTOUCHED);
    }

    #[test]
    fn test_join_invalid_targets() {
        let pm = manager(256);
        let console = BufferConsole::new();
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();
        let pid = sys.sys_exec(root, "child.coff", &[]);
        sys.sys_exit(Pid(pid as u32), 5);

        let mut status = UNTOUCHED;
        assert_eq!(sys.sys_join(root, -1, &mut status), -1);
        assert_eq!(sys.sys_join(root, 0, &mut status), -1);
        assert_eq!(sys.sys_join(root, 4242, &mut status), -1);
        assert_eq!(status, UNTOUCHED);

        assert_eq!(sys.sys_join(root, pid, &mut status), 1);
        status = UNTOUCHED;
        assert_eq!(sys.sys_join(root, pid, &mut status), -1);
        assert_eq!(status, UNTOUCHED);
    }

    #[test]
    fn test_exec_failures_return_minus_one() {
        let pm = manager(10 + child_pages() - 1);
        let console = BufferConsole::new();
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();
        let next = pm.table().next_pid();

        assert_eq!(sys.sys_exec(root, "child", &[]), -1);
        assert_eq!(sys.sys_exec(root, "missing.coff", &[]), -1);
        assert_eq!(sys.sys_exec(root, "child.coff", &[]), -1);
        assert_eq!(pm.table().len(), 1);

        let mut status = UNTOUCHED;
        assert_eq!(sys.sys_join(root, next.as_i32().unwrap(), &mut status), -1);
    }

    // ========================================
    // Halt Tests
    // ========================================

    #[test]
    fn test_halt_conventions() {
        let pm = manager(256);
        let console = BufferConsole::new();
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();
        let pid = sys.sys_exec(root, "child.coff", &[]);

        assert_eq!(sys.sys_halt(Pid(pid as u32)), -1);
        assert_eq!(sys.sys_halt(root), -1);
        sys.sys_exit(Pid(pid as u32), 0);
        assert_eq!(sys.sys_halt(root), 0);
    }

    // ========================================
    // Console Tests
    // ========================================

    #[test]
    fn test_console_descriptors() {
        let pm = manager(256);
        let console = BufferConsole::new();
        console.push_input(b"hi\n");
        let sys = SyscallHandler::new(&pm, &console);
        let root = pm.spawn_root("root.coff", &[]).unwrap();

        assert_eq!(sys.sys_write(root, 1, b"hello"), 5);
        assert_eq!(sys.sys_write(root, 0, b"x"), -1);
        assert_eq!(sys.sys_write(root, 2, b"x"), -1);

        let mut buf = [0u8; 8];
        assert_eq!(sys.sys_read(root, 1, &mut buf), -1);
        assert_eq!(sys.sys_read(root, 0, &mut buf), 3);
        assert_eq!(&buf[..3], b"hi\n");
        assert_eq!(sys.sys_read(root, 0, &mut buf), 0);
        assert_eq!(console.output(), b"hello");
    }

    // ========================================
    // Dispatch Tests
    // ========================================

    #[test]
    fn test_dispatch_counts_calls() {
        let pm = manager(256);
        let console = BufferConsole::new();
        let stats = SyscallStats::new();
        let sys = SyscallHandler::new(&pm, &console).with_stats(&stats);
        let root = pm.spawn_root("root.coff", &[]).unwrap();

        let pid = sys.handle(
            root,
            Syscall::Exec {
                name: "child.coff",
                argv: &[],
            },
        );
        assert_eq!(sys.handle(Pid(pid as u32), Syscall::Exit(9)), 0);

        let mut status = 0;
        assert_eq!(
            sys.handle(root, Syscall::Join { pid, status: &mut status }),
            1
        );
        assert_eq!(status, 9);
        assert_eq!(
            sys.handle(root, Syscall::Write { fd: 1, buf: b"ok" }),
            2
        );
        assert_eq!(sys.handle(root, Syscall::Unsupported(SyscallNumber::Open)), -1);
        assert_eq!(sys.handle_unknown(root, 77), -1);

        assert_eq!(stats.count(SyscallNumber::Exec), 1);
        assert_eq!(stats.count(SyscallNumber::Open), 1);
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.unknown(), 1);
    }
}

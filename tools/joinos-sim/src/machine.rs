//! Simulated machine: kernel, console and installed programs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use joinos_kernel::console::BufferConsole;
use joinos_kernel::loader::ImageRegistry;
use joinos_kernel::process::{HaltReason, Pid, ProcessManager, ProcessSnapshot, ProcessState};
use joinos_kernel::syscall::{SyscallHandler, SyscallStats};
use serde::Serialize;
use userlib::programs::{self, Main, Program};

use crate::config::MachineConfig;
use crate::error::SimError;
use crate::platform::HostPlatform;

/// Kernel state shared by every process thread.
pub struct Kernel {
    pub manager: ProcessManager<HostPlatform>,
    pub console: BufferConsole,
    pub stats: SyscallStats,
}

impl Kernel {
    /// System call dispatcher over this kernel.
    pub fn syscalls(&self) -> SyscallHandler<'_, HostPlatform> {
        SyscallHandler::new(&self.manager, &self.console).with_stats(&self.stats)
    }
}

/// Why the machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MachineExit {
    /// The last running process called `halt`.
    Halted { by: u32 },
    /// Every process exited.
    AllExited,
    /// The kernel ran out of process identifiers.
    PidSpaceExhausted,
}

impl From<HaltReason> for MachineExit {
    fn from(reason: HaltReason) -> Self {
        match reason {
            HaltReason::Requested(pid) => MachineExit::Halted { by: pid.0 },
            HaltReason::AllExited => MachineExit::AllExited,
            HaltReason::PidSpaceExhausted => MachineExit::PidSpaceExhausted,
        }
    }
}

impl fmt::Display for MachineExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineExit::Halted { by } => write!(f, "halted by process {by}"),
            MachineExit::AllExited => write!(f, "all processes exited"),
            MachineExit::PidSpaceExhausted => write!(f, "out of process identifiers"),
        }
    }
}

/// How the root process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RootOutcome {
    /// Still running when the machine stopped (it halted the machine).
    Running,
    /// Exited with a status.
    Exited { status: i32 },
    /// Terminated without a status.
    Abnormal,
}

impl fmt::Display for RootOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootOutcome::Running => write!(f, "running"),
            RootOutcome::Exited { status } => write!(f, "exited with status {status}"),
            RootOutcome::Abnormal => write!(f, "terminated abnormally"),
        }
    }
}

/// A process record still in the table when the machine stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub parent: Option<u32>,
    /// `running`, `exited(<status>)`, `abnormal` or `embryo`
    pub state: String,
    /// Image of a process that still owns its address space.
    pub image: Option<String>,
    /// Children not joined yet.
    pub children: Vec<u32>,
}

impl From<ProcessSnapshot> for ProcessEntry {
    fn from(snapshot: ProcessSnapshot) -> Self {
        let state = match snapshot.state {
            ProcessState::Embryo => "embryo".to_string(),
            ProcessState::Running => "running".to_string(),
            ProcessState::Exited(termination) => match termination.status() {
                Some(status) => format!("exited({status})"),
                None => "abnormal".to_string(),
            },
        };
        Self {
            pid: snapshot.pid.0,
            parent: snapshot.parent.map(|pid| pid.0),
            state,
            image: snapshot.image,
            children: snapshot.children.iter().map(|pid| pid.0).collect(),
        }
    }
}

/// Result of one machine run.
#[derive(Debug, Clone, Serialize)]
pub struct MachineReport {
    pub program: String,
    pub exit: MachineExit,
    pub root: RootOutcome,
    /// Everything written to the console.
    pub console: String,
    /// Frames still allocated when the machine stopped.
    pub pages_in_use: usize,
    /// Invocation count per system call name.
    pub syscalls: BTreeMap<String, u64>,
    /// Records left in the process table, by pid.
    pub processes: Vec<ProcessEntry>,
}

impl fmt::Display for MachineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "machine stopped: {}", self.exit)?;
        writeln!(f, "root process {}: {}", self.program, self.root)?;
        write!(f, "pages in use: {}", self.pages_in_use)?;
        if !self.processes.is_empty() {
            write!(f, "\n{:>5} {:>6}  {:<12} IMAGE", "PID", "PARENT", "STATE")?;
            for process in &self.processes {
                let parent = process.parent.map_or("-".to_string(), |pid| pid.to_string());
                let image = process.image.as_deref().unwrap_or("-");
                write!(f, "\n{:>5} {:>6}  {:<12} {}", process.pid, parent, process.state, image)?;
            }
        }
        Ok(())
    }
}

/// Builder and runner of a simulated machine.
pub struct Machine {
    config: MachineConfig,
    registry: ImageRegistry<Main>,
    echo_console: bool,
}

impl Machine {
    /// A machine with every built-in program installed.
    pub fn new(config: MachineConfig) -> Self {
        let mut machine = Self {
            config,
            registry: ImageRegistry::new(),
            echo_console: false,
        };
        for program in programs::PROGRAMS {
            machine = machine.install(program);
        }
        machine
    }

    /// Install `program`, replacing any program with the same name.
    pub fn install(mut self, program: &Program) -> Self {
        self.registry.install(program.name, program.pages, program.main);
        self
    }

    /// Copy console output to stdout as it is written.
    pub fn echo_console(mut self, echo: bool) -> Self {
        self.echo_console = echo;
        self
    }

    /// Boot `name` as the root process with `argv` and run until the
    /// machine powers off.
    pub fn run(&self, name: &str, argv: &[&str]) -> Result<MachineReport, SimError> {
        if self.registry.get(name).is_none() {
            return Err(SimError::UnknownProgram {
                name: name.to_string(),
                installed: self.registry.names().join(", "),
            });
        }

        let console = if self.echo_console {
            BufferConsole::new().with_hook(echo_to_stdout)
        } else {
            BufferConsole::new()
        };
        console.push_input(self.config.input.as_bytes());

        let kernel_config = self.config.kernel_config();
        let registry = self.registry.clone();
        let kernel = Arc::new_cyclic(|weak| Kernel {
            manager: ProcessManager::new(kernel_config, registry, HostPlatform::new(weak.clone())),
            console,
            stats: SyscallStats::new(),
        });

        log::info!("[SIM] Booting {} with {} pages", name, self.config.phys_pages);
        let root = kernel
            .manager
            .spawn_root(name, argv)
            .map_err(|e| SimError::BootFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let reason = kernel.manager.platform().wait_for_power_off();
        Ok(report(&kernel, name, root, reason))
    }
}

fn echo_to_stdout(bytes: &[u8]) {
    use std::io::Write;
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(bytes);
    let _ = stdout.flush();
}

fn report(kernel: &Kernel, program: &str, root: Pid, reason: HaltReason) -> MachineReport {
    let root = match kernel.manager.table().state_of(root) {
        Some(ProcessState::Exited(termination)) => match termination.status() {
            Some(status) => RootOutcome::Exited { status },
            None => RootOutcome::Abnormal,
        },
        _ => RootOutcome::Running,
    };

    kernel.stats.dump();
    let syscalls = kernel
        .stats
        .nonzero()
        .map(|(number, count)| (number.name().to_string(), count))
        .collect();
    let processes = kernel
        .manager
        .table()
        .snapshot()
        .into_iter()
        .map(ProcessEntry::from)
        .collect();

    let loader = kernel.manager.loader();
    MachineReport {
        program: program.to_string(),
        exit: reason.into(),
        root,
        console: String::from_utf8_lossy(&kernel.console.output()).into_owned(),
        pages_in_use: loader.total_pages() - loader.free_pages(),
        syscalls,
        processes,
    }
}

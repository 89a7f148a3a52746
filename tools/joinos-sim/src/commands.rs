//! Subcommand handlers.

use std::fmt;

use serde::Serialize;
use userlib::programs;

use crate::cli::RunArgs;
use crate::config::MachineConfig;
use crate::error::SimError;
use crate::machine::{Machine, MachineReport};

/// Build the machine configuration for `args`: file first, then flags.
pub fn resolve_config(args: &RunArgs) -> Result<MachineConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => MachineConfig::load(path)?,
        None => MachineConfig::default(),
    };
    if let Some(pages) = args.phys_pages {
        config.phys_pages = pages;
    }
    if let Some(max_pid) = args.max_pid {
        config.max_pid = max_pid;
    }
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    config.validate()?;
    Ok(config)
}

/// `run`: boot the program and wait for the machine to stop.
///
/// With `echo_console`, console output is streamed to stdout while the
/// machine runs.
pub fn run(args: &RunArgs, echo_console: bool) -> Result<MachineReport, SimError> {
    let config = resolve_config(args)?;

    let mut argv: Vec<&str> = vec![args.program.as_str()];
    argv.extend(args.args.iter().map(String::as_str));

    Machine::new(config)
        .echo_console(echo_console)
        .run(&args.program, &argv)
}

/// One installed program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub pages: usize,
    pub about: &'static str,
}

/// Every installed program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramList {
    pub programs: Vec<ProgramInfo>,
}

impl fmt::Display for ProgramList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, program) in self.programs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<18} {:>2} pages  {}", program.name, program.pages, program.about)?;
        }
        Ok(())
    }
}

/// `programs`: list the installed programs.
pub fn programs() -> ProgramList {
    ProgramList {
        programs: programs::PROGRAMS
            .iter()
            .map(|program| ProgramInfo {
                name: program.name,
                pages: program.pages,
                about: program.about,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(program: &str) -> RunArgs {
        RunArgs {
            program: program.to_string(),
            args: Vec::new(),
            config: None,
            phys_pages: None,
            max_pid: None,
            input: None,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let mut run_args = args("echo.coff");
        run_args.phys_pages = Some(33);
        run_args.input = Some("x\n".to_string());

        let config = resolve_config(&run_args).unwrap();
        assert_eq!(config.phys_pages, 33);
        assert_eq!(config.input, "x\n");
        assert_eq!(config.max_pid, MachineConfig::default().max_pid);
    }

    #[test]
    fn zero_pages_rejected() {
        let mut run_args = args("echo.coff");
        run_args.phys_pages = Some(0);
        assert!(matches!(
            resolve_config(&run_args),
            Err(SimError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn program_list_is_complete() {
        let list = programs();
        assert_eq!(list.programs.len(), programs::PROGRAMS.len());
        assert!(list.to_string().contains("fibonacci.coff"));
    }
}

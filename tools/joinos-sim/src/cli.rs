use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Run joinos user programs on a simulated machine.
#[derive(Parser, Debug)]
#[command(name = "joinos-sim", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format for all subcommands.
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Maximum log level written to stderr.
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

/// Log levels accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Boot a program as the root process and run until the machine stops.
    Run(RunArgs),

    /// List the installed programs.
    Programs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image name of the root program, e.g. `fibonacci.coff`.
    pub program: String,

    /// Arguments passed after the image name.
    pub args: Vec<String>,

    /// TOML machine configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Physical pages, overriding the configuration.
    #[arg(long)]
    pub phys_pages: Option<usize>,

    /// Highest allocatable pid, overriding the configuration.
    #[arg(long)]
    pub max_pid: Option<u32>,

    /// Console input, overriding the configuration.
    #[arg(long)]
    pub input: Option<String>,
}

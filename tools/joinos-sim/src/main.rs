use std::process::ExitCode;

use clap::Parser;

use joinos_sim::cli::{Cli, Command};
use joinos_sim::output::{self, OutputFormat};
use joinos_sim::{commands, logger, SimError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.log_level);

    let result = match &cli.command {
        Command::Run(args) => commands::run(args, cli.output == OutputFormat::Human)
            .and_then(|report| output::emit(cli.output, &report).map_err(SimError::from)),
        Command::Programs => {
            output::emit(cli.output, &commands::programs()).map_err(SimError::from)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::emit_error(cli.output, e.exit_code_num(), &e.to_string());
            e.exit_code()
        }
    }
}

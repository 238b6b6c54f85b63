use clap::Parser;
use sortdir::cli::{Cli, run_cli_with_options};
use sortdir::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let target = cli.target_dir();

    match run_cli_with_options(cli.command(), &target, &cli.options()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

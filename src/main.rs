use clap::Parser;
use console::style;
use std::process::ExitCode;

use pushgate::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run() {
        // accept: let the refs update
        Ok(true) => ExitCode::SUCCESS,
        // denied: diagnostics were already reported per check
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!(
                "{} {}",
                style("✖").red().bold().for_stderr(),
                style(format!("{err:#}")).red().for_stderr()
            );
            ExitCode::FAILURE
        }
    }
}

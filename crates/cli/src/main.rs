use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use fileprops_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "fileprops",
    version,
    about = "Render the properties report of a file",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => commands::render::run(args),
    }
}

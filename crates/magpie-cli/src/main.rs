mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            input,
            format,
            options,
            output,
        } => commands::parse::run(commands::parse::Params {
            input,
            format,
            options,
            output,
        }),
        Command::Check {
            input,
            options,
            output,
        } => commands::check::run(commands::check::Params {
            input,
            options,
            output,
        }),
        Command::Tables { verify } => commands::tables::run(verify),
    }
}

mod app;
mod effects;
mod logging;
mod persistence;
mod render;

use crate::cli::{Cli, Command};
use logging::LogDestination;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    // The server logs to the terminal; other commands keep stdout for output.
    let destination = match cli.command {
        Command::Serve { .. } => LogDestination::Both,
        _ => LogDestination::File,
    };
    logging::initialize(destination, cli.verbose);

    match cli.command {
        Command::Serve { port, root, index } => app::serve(port, root, index),
        Command::Show {
            document,
            filter,
            policy,
        } => app::show(&document, filter, policy),
        Command::Toggle {
            document,
            id,
            policy,
        } => app::toggle(&document, &id, policy),
        Command::Session { document, policy } => app::run_session(&document, policy),
        Command::Theme { file } => app::print_theme(file.as_deref()),
    }
}

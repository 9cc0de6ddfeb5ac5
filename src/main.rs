use anyhow::Result;
use clap::Parser;
use tracing::Level;

use episode_deck::cli::cli_data::Cli;
use episode_deck::cli::handle_cli::handle_cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    handle_cli(cli)
}

//! fabops - bulk operations against the manufacturing platform API.
//!
//! Each subcommand is one short-lived script: authenticate, run the
//! operation, print a summary. Batches finish even when individual rows
//! fail; row failures are summarized on stderr and do not change the exit
//! code, while configuration and authentication problems abort immediately.

mod cli;
mod commands;
mod connect;
mod csv_io;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Teams(cmd) => commands::teams::handle(&cli.connection, cmd).await,
        Commands::Roles(cmd) => commands::roles::handle(&cli.connection, cmd).await,
        Commands::Mboms(cmd) => commands::mboms::handle(&cli.connection, cmd).await,
        Commands::Inventory(cmd) => commands::inventory::handle(&cli.connection, cmd).await,
        Commands::Purchases(cmd) => commands::purchases::handle(&cli.connection, cmd).await,
        Commands::Issues(cmd) => commands::issues::handle(&cli.connection, cmd).await,
        Commands::Locations(cmd) => commands::locations::handle(&cli.connection, cmd).await,
        Commands::Runs(cmd) => commands::runs::handle(&cli.connection, cmd).await,
        Commands::Rules(cmd) => commands::rules::handle(&cli.connection, cmd).await,
        Commands::Procedures(cmd) => commands::procedures::handle(cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}

//! Location commands.

use std::io::BufRead;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use fabops_graphql::ops::locations;

use crate::cli::ConnectionArgs;
use crate::{connect, output};

#[derive(Args, Debug)]
pub struct LocationsCommand {
    #[command(subcommand)]
    pub command: LocationsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LocationsSubcommand {
    /// Delete every location in the environment
    DeleteAll(DeleteAllArgs),
}

#[derive(Args, Debug)]
pub struct DeleteAllArgs {
    /// Skip the interactive confirmation
    #[arg(long)]
    pub yes: bool,
}

pub async fn handle(connection: &ConnectionArgs, cmd: LocationsCommand) -> Result<()> {
    match cmd.command {
        LocationsSubcommand::DeleteAll(args) => delete_all(connection, args).await,
    }
}

async fn delete_all(connection: &ConnectionArgs, args: DeleteAllArgs) -> Result<()> {
    if !args.yes {
        eprintln!(
            "{}",
            "This deletes every location in the environment.".yellow()
        );
        eprint!("Type 'delete' to continue: ");
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        if answer.trim() != "delete" {
            bail!("aborted");
        }
    }

    let client = connect::connect(connection).await?;
    let summary = locations::delete_all_locations(&client).await?;

    output::success(&format!("{} locations deleted", summary.deleted));
    output::entity_failures(summary.failures);
    Ok(())
}

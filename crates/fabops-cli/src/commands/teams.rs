//! Team membership commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::{ops, run_batch};

use crate::cli::ConnectionArgs;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct TeamsCommand {
    #[command(subcommand)]
    pub command: TeamsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamsSubcommand {
    /// Add users to teams from a CSV of (team name, user email)
    AddUsers(AddUsersArgs),
}

#[derive(Args, Debug)]
pub struct AddUsersArgs {
    /// CSV input path
    #[arg(long)]
    pub csv: PathBuf,
}

pub async fn handle(connection: &ConnectionArgs, cmd: TeamsCommand) -> Result<()> {
    match cmd.command {
        TeamsSubcommand::AddUsers(args) => add_users(connection, args).await,
    }
}

async fn add_users(connection: &ConnectionArgs, args: AddUsersArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let team = field::require(row_number, &row, 0)?;
            let email = field::require(row_number, &row, 1)?;
            ops::teams::add_user_to_team(&client, team, email).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

//! Issue commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::ops::issues;
use fabops_graphql::run_batch;

use crate::cli::ConnectionArgs;
use crate::commands::parse_entity_id;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct IssuesCommand {
    #[command(subcommand)]
    pub command: IssuesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssuesSubcommand {
    /// Create issues from a CSV of (part inventory id, cause text)
    BulkCreate(BulkCreateArgs),

    /// Set issue attributes from a CSV of (issue id, key, value)
    UpdateAttributes(UpdateAttributesArgs),
}

#[derive(Args, Debug)]
pub struct BulkCreateArgs {
    /// CSV input path
    #[arg(long)]
    pub csv: PathBuf,
}

#[derive(Args, Debug)]
pub struct UpdateAttributesArgs {
    /// CSV input path
    #[arg(long)]
    pub csv: PathBuf,
}

pub async fn handle(connection: &ConnectionArgs, cmd: IssuesCommand) -> Result<()> {
    match cmd.command {
        IssuesSubcommand::BulkCreate(args) => bulk_create(connection, args).await,
        IssuesSubcommand::UpdateAttributes(args) => update_attributes(connection, args).await,
    }
}

async fn bulk_create(connection: &ConnectionArgs, args: BulkCreateArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let part_inventory = parse_entity_id(field::require(row_number, &row, 0)?);
            let cause = field::require(row_number, &row, 1)?;
            issues::create_issue(&client, &part_inventory, cause).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

async fn update_attributes(connection: &ConnectionArgs, args: UpdateAttributesArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let issue_id = parse_entity_id(field::require(row_number, &row, 0)?);
            let key = field::require(row_number, &row, 1)?;
            let value = field::require(row_number, &row, 2)?;
            issues::update_issue_attribute(&client, &issue_id, key, value).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

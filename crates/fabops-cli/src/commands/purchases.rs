//! Purchase-order commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::ops::purchases::{self, PurchaseStatus};
use fabops_graphql::run_batch;

use crate::cli::ConnectionArgs;
use crate::commands::parse_entity_id;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct PurchasesCommand {
    #[command(subcommand)]
    pub command: PurchasesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PurchasesSubcommand {
    /// Set the status of every purchase order listed in a CSV
    SetStatus(SetStatusArgs),

    /// Delete all purchase orders and lines not protected by history
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct SetStatusArgs {
    /// CSV input path (one purchase order id per row)
    #[arg(long)]
    pub csv: PathBuf,

    /// Target status (DRAFT, REQUESTED, APPROVED, ORDERED, CANCELED, RECEIVED)
    #[arg(long)]
    pub status: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Purchase order ids to leave untouched
    #[arg(long = "skip")]
    pub skip: Vec<String>,
}

pub async fn handle(connection: &ConnectionArgs, cmd: PurchasesCommand) -> Result<()> {
    match cmd.command {
        PurchasesSubcommand::SetStatus(args) => set_status(connection, args).await,
        PurchasesSubcommand::Delete(args) => delete(connection, args).await,
    }
}

async fn set_status(connection: &ConnectionArgs, args: SetStatusArgs) -> Result<()> {
    let status: PurchaseStatus = args.status.parse().context("invalid --status")?;
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let id = parse_entity_id(field::require(row_number, &row, 0)?);
            purchases::set_status(&client, &id, status).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

async fn delete(connection: &ConnectionArgs, args: DeleteArgs) -> Result<()> {
    let skip: Vec<_> = args.skip.iter().map(|raw| parse_entity_id(raw)).collect();
    let client = connect::connect(connection).await?;

    let summary = purchases::delete_purchases(&client, &skip).await?;
    output::field(
        "lines",
        &format!("{} deleted, {} skipped", summary.lines_deleted, summary.lines_skipped),
    );
    output::field(
        "orders",
        &format!("{} deleted, {} skipped", summary.orders_deleted, summary.orders_skipped),
    );
    output::entity_failures(summary.failures);
    Ok(())
}

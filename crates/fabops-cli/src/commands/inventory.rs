//! Part inventory commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::ops::inventory::{self, AbomExportRecord, LocationCountRecord};
use fabops_graphql::run_batch;

use crate::cli::ConnectionArgs;
use crate::commands::parse_entity_id;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct InventoryCommand {
    #[command(subcommand)]
    pub command: InventorySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum InventorySubcommand {
    /// Update inventory quantities from a CSV of (inventory id, quantity)
    UpdateQuantities(UpdateQuantitiesArgs),

    /// Export all inventories with their as-built children to CSV
    ExportAbom(ExportAbomArgs),

    /// Export a per-part count sheet for one location to CSV
    AtLocation(AtLocationArgs),
}

#[derive(Args, Debug)]
pub struct UpdateQuantitiesArgs {
    /// CSV input path
    #[arg(long)]
    pub csv: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportAbomArgs {
    /// CSV output path
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct AtLocationArgs {
    /// The location to count
    #[arg(long)]
    pub location_id: String,

    /// CSV output path
    #[arg(long)]
    pub out: PathBuf,
}

pub async fn handle(connection: &ConnectionArgs, cmd: InventoryCommand) -> Result<()> {
    match cmd.command {
        InventorySubcommand::UpdateQuantities(args) => update_quantities(connection, args).await,
        InventorySubcommand::ExportAbom(args) => export_abom(connection, args).await,
        InventorySubcommand::AtLocation(args) => at_location(connection, args).await,
    }
}

async fn update_quantities(connection: &ConnectionArgs, args: UpdateQuantitiesArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let id = parse_entity_id(field::require(row_number, &row, 0)?);
            let quantity =
                field::normalize_decimal(row_number, 1, field::require(row_number, &row, 1)?)?;
            inventory::update_quantity(&client, &id, &quantity).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

async fn export_abom(connection: &ConnectionArgs, args: ExportAbomArgs) -> Result<()> {
    let client = connect::connect(connection).await?;
    let records = inventory::export_inventories_with_abom(&client).await?;

    let count = csv_io::write_records(
        &args.out,
        &AbomExportRecord::CSV_HEADER,
        records.iter().map(|record| record.csv_row()),
    )?;
    output::success(&format!("wrote {} rows to {}", count, args.out.display()));
    Ok(())
}

async fn at_location(connection: &ConnectionArgs, args: AtLocationArgs) -> Result<()> {
    let client = connect::connect(connection).await?;
    let location_id = parse_entity_id(&args.location_id);
    let records = inventory::count_at_location(&client, &location_id).await?;

    let count = csv_io::write_records(
        &args.out,
        &LocationCountRecord::CSV_HEADER,
        records.iter().map(|record| record.csv_row()),
    )?;
    output::success(&format!("wrote {} rows to {}", count, args.out.display()));
    Ok(())
}

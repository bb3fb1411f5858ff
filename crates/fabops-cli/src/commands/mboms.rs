//! Manufacturing BOM commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Value, json};

use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::ops::mboms::{self, MbomNotation};
use fabops_graphql::run_batch;

use crate::cli::ConnectionArgs;
use crate::commands::parse_entity_id;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct MbomsCommand {
    #[command(subcommand)]
    pub command: MbomsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MbomsSubcommand {
    /// Add reference designators to one mBOM item from a one-column CSV
    AddReferenceDesignators(AddReferenceDesignatorsArgs),

    /// Create or update mBOM rows from a CSV in one bulk call
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct AddReferenceDesignatorsArgs {
    /// CSV input path (one designator value per row)
    #[arg(long)]
    pub csv: PathBuf,

    /// The mBOM item receiving the designators
    #[arg(long)]
    pub mbom_item_id: String,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV input path: notation, part number, revision, quantity,
    /// substitutes, made-on-assembly
    #[arg(long)]
    pub csv: PathBuf,

    /// Treat the first column as dotted level notation instead of depth
    #[arg(long)]
    pub level: bool,
}

pub async fn handle(connection: &ConnectionArgs, cmd: MbomsCommand) -> Result<()> {
    match cmd.command {
        MbomsSubcommand::AddReferenceDesignators(args) => {
            add_reference_designators(connection, args).await
        }
        MbomsSubcommand::Import(args) => import(connection, args).await,
    }
}

async fn add_reference_designators(
    connection: &ConnectionArgs,
    args: AddReferenceDesignatorsArgs,
) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let mbom_item_id = parse_entity_id(&args.mbom_item_id);
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        let mbom_item_id = mbom_item_id.clone();
        async move {
            let value = field::require(row_number, &row, 0)?;
            mboms::add_reference_designator(&client, &mbom_item_id, value).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

/// One mutation carries the whole file, so rows are validated up front and
/// server-side row errors come back labelled with the row they belong to.
async fn import(connection: &ConnectionArgs, args: ImportArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let notation = if args.level {
        MbomNotation::Level
    } else {
        MbomNotation::Depth
    };

    let mut items = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        items.push(
            import_item(notation, row_number, row)
                .with_context(|| format!("data row {}", row_number))?,
        );
    }

    let client = connect::connect(connection).await?;
    let outcome = mboms::import_mboms(&client, notation, items).await?;

    if outcome.error_messages.is_empty() {
        output::success(&format!("{} mBOM rows created", outcome.new_mbom_row_ids.len()));
    } else {
        output::warning(&format!(
            "{} rows rejected by the platform",
            outcome.error_messages.len()
        ));
        for error in &outcome.error_messages {
            eprintln!("row {}: {}", error.row_id, error.error_msg);
        }
    }
    Ok(())
}

fn import_item(notation: MbomNotation, row_number: usize, row: &[String]) -> Result<Value> {
    let tree_position: Value = match notation {
        MbomNotation::Depth => {
            json!(field::parse_i64(row_number, 0, field::require(row_number, row, 0)?)?)
        }
        MbomNotation::Level => json!(field::require(row_number, row, 0)?),
    };
    let quantity = field::parse_f64(row_number, 3, field::require(row_number, row, 3)?)?;
    let notation_key = match notation {
        MbomNotation::Depth => "depth",
        MbomNotation::Level => "level",
    };

    Ok(json!({
        notation_key: tree_position,
        "partNumber": field::require(row_number, row, 1)?,
        "revision": field::require(row_number, row, 2)?,
        "quantity": quantity,
        "substitutes": field::require(row_number, row, 4)?,
        "madeOnAssembly": field::parse_truthy(field::require(row_number, row, 5)?),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn depth_item_shape() {
        let item =
            import_item(MbomNotation::Depth, 1, &row(&["2", "P-100", "B", "1.5", "", "TRUE"]))
                .unwrap();
        assert_eq!(item["depth"], json!(2));
        assert_eq!(item["quantity"], json!(1.5));
        assert_eq!(item["madeOnAssembly"], json!(true));
    }

    #[test]
    fn level_item_keeps_dotted_string() {
        let item =
            import_item(MbomNotation::Level, 1, &row(&["1.2.1", "P-2", "A", "4", "", "false"]))
                .unwrap();
        assert_eq!(item["level"], json!("1.2.1"));
        assert_eq!(item["madeOnAssembly"], json!(false));
    }

    #[test]
    fn bad_quantity_is_a_row_error() {
        let result =
            import_item(MbomNotation::Depth, 3, &row(&["1", "P-3", "A", "many", "", "false"]));
        assert!(result.is_err());
    }
}

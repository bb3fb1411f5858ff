//! Run commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use anyhow::Context;
use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::ops::{labels, runs};
use fabops_graphql::run_batch;

use crate::cli::ConnectionArgs;
use crate::commands::parse_entity_id;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct RunsCommand {
    #[command(subcommand)]
    pub command: RunsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RunsSubcommand {
    /// Swap labels on runs from a CSV of (run id, old label, new label)
    Relabel(RelabelArgs),

    /// Upload a file to a run's first step
    AttachFile(AttachFileArgs),
}

#[derive(Args, Debug)]
pub struct RelabelArgs {
    /// CSV input path
    #[arg(long)]
    pub csv: PathBuf,
}

#[derive(Args, Debug)]
pub struct AttachFileArgs {
    /// The run to attach to
    #[arg(long)]
    pub run_id: String,

    /// File to upload
    #[arg(long)]
    pub file: PathBuf,
}

pub async fn handle(connection: &ConnectionArgs, cmd: RunsCommand) -> Result<()> {
    match cmd.command {
        RunsSubcommand::Relabel(args) => relabel(connection, args).await,
        RunsSubcommand::AttachFile(args) => attach_file(connection, args).await,
    }
}

async fn relabel(connection: &ConnectionArgs, args: RelabelArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let run_id = parse_entity_id(field::require(row_number, &row, 0)?);
            let old_value = field::require(row_number, &row, 1)?;
            let new_value = field::require(row_number, &row, 2)?;
            labels::relabel_run(&client, &run_id, old_value, new_value).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

async fn attach_file(connection: &ConnectionArgs, args: AttachFileArgs) -> Result<()> {
    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", args.file.display()))?
        .to_string();
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let client = connect::connect(connection).await?;
    let run_id = parse_entity_id(&args.run_id);
    let attachment_id = runs::attach_file_to_run(&client, &run_id, &filename, bytes).await?;
    output::success(&format!("attached {} as attachment {}", filename, attachment_id));
    Ok(())
}

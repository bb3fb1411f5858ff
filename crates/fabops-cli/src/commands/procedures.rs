//! Procedure commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use fabops_graphql::ops::procedures;

use crate::commands::parse_entity_id;
use crate::{connect, output};

#[derive(Args, Debug)]
pub struct ProceduresCommand {
    #[command(subcommand)]
    pub command: ProceduresSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProceduresSubcommand {
    /// Copy a procedure from one environment into another
    Export(ExportArgs),
}

/// Both environments come from prefixed variables (`FABOPS_SOURCE_*`,
/// `FABOPS_TARGET_*`); the global connection flags do not apply here.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// The procedure to export from the source environment
    #[arg(long)]
    pub procedure_id: String,

    /// Title for the copy (defaults to the source title)
    #[arg(long)]
    pub new_title: Option<String>,
}

pub async fn handle(cmd: ProceduresCommand) -> Result<()> {
    match cmd.command {
        ProceduresSubcommand::Export(args) => export(args).await,
    }
}

async fn export(args: ExportArgs) -> Result<()> {
    let source = connect::connect_prefixed("FABOPS_SOURCE").await?;
    let target = connect::connect_prefixed("FABOPS_TARGET").await?;

    let procedure_id = parse_entity_id(&args.procedure_id);
    let report = procedures::export_procedure(
        &source,
        &target,
        &procedure_id,
        args.new_title.as_deref(),
    )
    .await?;

    if let Some(id) = &report.procedure_id {
        output::field("new procedure", &id.to_string());
    }
    output::field("steps", &report.steps_created.to_string());
    output::field("labels", &report.labels_attached.to_string());
    output::field("attachments", &report.attachments_copied.to_string());
    output::field("dependency edges", &report.edges_created.to_string());
    output::success("procedure export complete");
    Ok(())
}

//! Role and permission-group commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use fabops_core::RowOutcome;
use fabops_core::batch::field;
use fabops_graphql::ops::roles::{self, PermissionGroup};
use fabops_graphql::run_batch;

use crate::cli::ConnectionArgs;
use crate::{connect, csv_io, output};

#[derive(Args, Debug)]
pub struct RolesCommand {
    #[command(subcommand)]
    pub command: RolesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RolesSubcommand {
    /// Attach permission groups to roles from a CSV of (role, group)
    AddPermissions(AddPermissionsArgs),

    /// Export every permission group to a CSV file
    ExportPermissionGroups(ExportPermissionGroupsArgs),
}

#[derive(Args, Debug)]
pub struct AddPermissionsArgs {
    /// CSV input path
    #[arg(long)]
    pub csv: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportPermissionGroupsArgs {
    /// CSV output path
    #[arg(long)]
    pub out: PathBuf,
}

pub async fn handle(connection: &ConnectionArgs, cmd: RolesCommand) -> Result<()> {
    match cmd.command {
        RolesSubcommand::AddPermissions(args) => add_permissions(connection, args).await,
        RolesSubcommand::ExportPermissionGroups(args) => export_groups(connection, args).await,
    }
}

async fn add_permissions(connection: &ConnectionArgs, args: AddPermissionsArgs) -> Result<()> {
    let rows = csv_io::read_rows(&args.csv)?;
    let client = connect::connect(connection).await?;

    let report = run_batch(rows, |row_number, row| {
        let client = client.clone();
        async move {
            let role = field::require(row_number, &row, 0)?;
            let group = field::require(row_number, &row, 1)?;
            roles::attach_permission_group_to_role(&client, role, group).await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await?;

    output::batch_summary(&report);
    Ok(())
}

async fn export_groups(
    connection: &ConnectionArgs,
    args: ExportPermissionGroupsArgs,
) -> Result<()> {
    let client = connect::connect(connection).await?;
    let groups = roles::all_permission_groups(&client).await?;

    let count = csv_io::write_records(
        &args.out,
        &PermissionGroup::CSV_HEADER,
        groups.iter().map(|group| group.csv_row()),
    )?;
    output::success(&format!(
        "wrote {} permission groups to {}",
        count,
        args.out.display()
    ));
    Ok(())
}

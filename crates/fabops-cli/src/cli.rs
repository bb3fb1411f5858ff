//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Bulk operations against the manufacturing platform API.
#[derive(Parser, Debug)]
#[command(name = "fabops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection overrides. Anything not given here comes from the `FABOPS_*`
/// environment, then the staging defaults. The client secret is never a
/// flag; it is read from `FABOPS_CLIENT_SECRET` or prompted for.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Platform API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Identity-provider host
    #[arg(long, global = true)]
    pub auth_server: Option<String>,

    /// OAuth2 client id
    #[arg(long, global = true)]
    pub client_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Team membership operations
    Teams(commands::teams::TeamsCommand),

    /// Role and permission-group operations
    Roles(commands::roles::RolesCommand),

    /// Manufacturing BOM operations
    Mboms(commands::mboms::MbomsCommand),

    /// Part inventory operations
    Inventory(commands::inventory::InventoryCommand),

    /// Purchase-order operations
    Purchases(commands::purchases::PurchasesCommand),

    /// Issue operations
    Issues(commands::issues::IssuesCommand),

    /// Location operations
    Locations(commands::locations::LocationsCommand),

    /// Run operations
    Runs(commands::runs::RunsCommand),

    /// Platform rule operations
    Rules(commands::rules::RulesCommand),

    /// Procedure operations
    Procedures(commands::procedures::ProceduresCommand),
}

//! Platform rule commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use fabops_core::rules::builtin_rules;
use fabops_graphql::ops::rules;

use crate::cli::ConnectionArgs;
use crate::{connect, output};

#[derive(Args, Debug)]
pub struct RulesCommand {
    #[command(subcommand)]
    pub command: RulesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RulesSubcommand {
    /// Print the built-in rule catalog
    List,

    /// Upload the built-in rules to the platform
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Upload only the rule with this title
    #[arg(long)]
    pub title: Option<String>,
}

pub async fn handle(connection: &ConnectionArgs, cmd: RulesCommand) -> Result<()> {
    match cmd.command {
        RulesSubcommand::List => list(),
        RulesSubcommand::Upload(args) => upload(connection, args).await,
    }
}

fn list() -> Result<()> {
    for rule in builtin_rules() {
        let state = if rule.enabled { "enabled" } else { "disabled" };
        println!(
            "{} [{:?}/{:?}, {}] {}",
            "-".dimmed(),
            rule.target,
            rule.event_type,
            state,
            rule.title
        );
    }
    Ok(())
}

async fn upload(connection: &ConnectionArgs, args: UploadArgs) -> Result<()> {
    let mut selected = builtin_rules();
    if let Some(title) = &args.title {
        selected.retain(|rule| &rule.title == title);
        if selected.is_empty() {
            bail!("no built-in rule titled '{}'", title);
        }
    }

    let client = connect::connect(connection).await?;
    let summary = rules::upload_rules(&client, &selected).await?;

    output::success(&format!("{} rules created", summary.created));
    output::entity_failures(summary.failures);
    Ok(())
}

use anyhow::{anyhow, Result};
use clap::Args;
use discord_api::Client;

use crate::failure::describe_failure;
use crate::output::{print_guilds_table, print_json, OutputFormat};

#[derive(Args)]
pub struct GuildsArgs {
    /// Only show guilds the user owns or administers
    #[arg(long)]
    pub admin: bool,

    /// Case-insensitive substring filter on the guild name
    #[arg(long)]
    pub search: Option<String>,
}

pub async fn run(args: &GuildsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut guilds = client
        .current_user_guilds()
        .await
        .map_err(|e| anyhow!(describe_failure(&e)))?;

    if args.admin {
        guilds.retain(|g| g.is_admin());
    }
    if let Some(search) = &args.search {
        let needle = search.to_lowercase();
        guilds.retain(|g| g.name.to_lowercase().contains(&needle));
    }

    match format {
        OutputFormat::Table => print_guilds_table(&guilds),
        OutputFormat::Json => print_json(&guilds),
    }
    Ok(())
}

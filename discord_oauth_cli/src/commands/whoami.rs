use anyhow::{anyhow, Result};
use discord_api::Client;

use crate::failure::describe_failure;
use crate::output::{print_json, print_user_table, OutputFormat};

pub async fn run(client: &Client, format: &OutputFormat) -> Result<()> {
    let user = client
        .current_user()
        .await
        .map_err(|e| anyhow!(describe_failure(&e)))?;
    match format {
        OutputFormat::Table => print_user_table(&user),
        OutputFormat::Json => print_json(&user),
    }
    Ok(())
}

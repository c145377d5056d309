mod commands;
mod failure;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use discord_api::Client;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "discord-oauth")]
#[command(about = "Inspect Discord OAuth2 access tokens and authorization callbacks")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// OAuth2 access token (defaults to DISCORD_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// API base URL (defaults to DISCORD_API_BASE_URL, then the production API)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the user the access token belongs to
    Whoami,
    /// List the guilds of the token's user
    Guilds(commands::guilds::GuildsArgs),
    /// Classify an OAuth2 redirect URL
    Callback(commands::callback::CallbackArgs),
}

impl Cli {
    fn client(&self) -> Result<Client> {
        let token = match &self.token {
            Some(token) => token.clone(),
            None => std::env::var("DISCORD_ACCESS_TOKEN")
                .context("no access token: pass --token or set DISCORD_ACCESS_TOKEN")?,
        };
        let base_url = self
            .base_url
            .clone()
            .or_else(|| std::env::var("DISCORD_API_BASE_URL").ok());
        let client = match base_url {
            Some(base_url) => Client::with_base_url(&base_url, token)?,
            None => Client::new(token)?,
        };
        Ok(client)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("discord_oauth=info".parse()?)
                .add_directive("discord_api=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Whoami => commands::whoami::run(&cli.client()?, &format).await?,
        Commands::Guilds(args) => commands::guilds::run(args, &cli.client()?, &format).await?,
        Commands::Callback(args) => commands::callback::run(args, &format)?,
    }

    Ok(())
}

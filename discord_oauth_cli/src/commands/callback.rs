use anyhow::{anyhow, Context, Result};
use clap::Args;
use discord_api::AuthorizationCallback;
use url::Url;

use crate::failure::describe_http_failure;
use crate::output::{print_callback_table, print_json, OutputFormat};

#[derive(Args)]
pub struct CallbackArgs {
    /// The full redirect URL the browser landed on
    pub redirect_url: String,

    /// The `state` value sent with the authorization request
    #[arg(long)]
    pub state: Option<String>,
}

pub fn run(args: &CallbackArgs, format: &OutputFormat) -> Result<()> {
    let url = Url::parse(&args.redirect_url)
        .with_context(|| format!("invalid redirect URL: {}", args.redirect_url))?;

    let callback = AuthorizationCallback::from_url(&url)
        .map_err(|failure| anyhow!(describe_http_failure(&failure)))?;
    if let Some(expected) = &args.state {
        callback
            .verify_state(expected)
            .map_err(|failure| anyhow!(describe_http_failure(&failure)))?;
    }

    match format {
        OutputFormat::Table => print_callback_table(&callback),
        OutputFormat::Json => print_json(&serde_json::json!({
            "code": callback.code,
            "state": callback.state,
        })),
    }
    Ok(())
}

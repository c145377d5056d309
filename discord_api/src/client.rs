//! HTTP client for the Discord REST API, authenticated with an OAuth2 access token.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    types::{PartialGuild, User},
    Error, HttpFailure, ResponseParts,
};

/// Request timeout for Discord API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Discord rejects requests without a `DiscordBot (url, version)` style user agent.
const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/discord-oauth-rs/discord-oauth, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// HTTP client for the Discord REST API.
///
/// Every failing response is classified into an [`HttpFailure`]; nothing is
/// retried. Callers that want to back off on rate limits read the hints
/// from [`HttpFailure::RateLimited`].
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to `https://discord.com/api/v10`.
    base_api_url: String,
    access_token: String,
}

impl Client {
    /// Creates a new client pointing at the production Discord API.
    pub fn new(access_token: impl Into<String>) -> Result<Self, Error> {
        Self::with_base_url("https://discord.com/api/v10", access_token)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, access_token: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.get_url(path)?;
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let parts = ResponseParts::read(resp).await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        let parts = HttpFailure::classify(parts).map_err(|failure| {
            match &failure {
                HttpFailure::RateLimited(limited) => match limited.hints() {
                    Some(hints) => tracing::warn!(
                        global = hints.global,
                        retry_after_ms = hints.retry_after_ms,
                        "Rate limited on {}: {}",
                        path,
                        limited.message()
                    ),
                    None => tracing::warn!("Rate limited on {}: {}", path, limited.message()),
                },
                other => tracing::error!("Request to {} failed: {}", path, other),
            }
            failure
        })?;

        match serde_json::from_str::<T>(&parts.text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!("Failed to parse resource: {}", e);
                Err(Error::Decode { body: parts.text })
            }
        }
    }

    /// Fetches the user the access token belongs to.
    pub async fn current_user(&self) -> Result<User, Error> {
        self.get::<User>("/users/@me").await
    }

    /// Fetches the guilds the user is a member of.
    pub async fn current_user_guilds(&self) -> Result<Vec<PartialGuild>, Error> {
        self.get::<Vec<PartialGuild>>("/users/@me/guilds").await
    }
}

//! Inspection of the OAuth2 authorization redirect.
//!
//! Discord sends the user back to the redirect URI with either a `code`
//! (and the `state` the client supplied) or an `error` parameter. A user who
//! clicks "Cancel" on the consent screen comes back with
//! `error=access_denied`.

use url::Url;

use crate::HttpFailure;

/// The parameters of a successful authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
    pub code: String,
    pub state: Option<String>,
}

impl AuthorizationCallback {
    /// Reads the callback parameters from a full redirect URL.
    pub fn from_url(url: &Url) -> Result<Self, HttpFailure> {
        Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    /// Reads the callback parameters from a raw query string (with or without `?`).
    pub fn from_query(query: &str) -> Result<Self, HttpFailure> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    fn from_pairs(pairs: impl Iterator<Item = (String, String)>) -> Result<Self, HttpFailure> {
        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut description = None;

        for (key, value) in pairs {
            match key.as_str() {
                "code" => code = Some(value),
                "state" => state = Some(value),
                "error" => error = Some(value),
                "error_description" => description = Some(value),
                _ => {}
            }
        }

        if let Some(error) = error {
            if error == "access_denied" {
                tracing::info!("User declined the authorization request");
                return Err(HttpFailure::AccessDenied);
            }
            let message = match description.filter(|d| !d.is_empty()) {
                Some(description) => format!("authorization failed: {}: {}", error, description),
                None => format!("authorization failed: {}", error),
            };
            tracing::error!("{}", message);
            return Err(HttpFailure::generic(message));
        }

        match code.filter(|c| !c.is_empty()) {
            Some(code) => Ok(Self { code, state }),
            None => Err(HttpFailure::generic(
                "authorization callback is missing the `code` parameter",
            )),
        }
    }

    /// Checks the returned `state` against the value sent with the authorization request.
    pub fn verify_state(&self, expected: &str) -> Result<(), HttpFailure> {
        match self.state.as_deref() {
            Some(state) if state == expected => Ok(()),
            _ => {
                tracing::warn!("Authorization callback state mismatch");
                Err(HttpFailure::generic(
                    "authorization callback state does not match",
                ))
            }
        }
    }
}

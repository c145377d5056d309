//! Discord REST API access for OAuth2 integrations.
//!
//! The heart of the crate is [`HttpFailure`], the classification of failed
//! HTTP exchanges (rate limit, unauthorized, user-declined consent, or a
//! generic failure) that callers match on.

pub mod callback;
mod client;
mod errors;
pub mod types;
pub use self::callback::AuthorizationCallback;
pub use self::client::Client;
pub use self::errors::{Error, HttpFailure, RateLimited, ResponseParts, RetryHints};

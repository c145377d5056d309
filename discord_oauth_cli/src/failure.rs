//! Operator-facing rendering of API failures.

use discord_api::{Error, HttpFailure};

/// Describes a failed command in a form suitable for stderr.
pub fn describe_failure(err: &Error) -> String {
    match err {
        Error::Http(failure) => describe_http_failure(failure),
        Error::Decode { .. } => "Discord returned a response this tool could not read".to_string(),
        Error::RequestFailed => "Could not reach the Discord API".to_string(),
    }
}

pub fn describe_http_failure(failure: &HttpFailure) -> String {
    match failure {
        HttpFailure::RateLimited(limited) => match limited.hints() {
            Some(hints) => format!(
                "Rate limited ({} limit): {} Retry in {:.2}s.",
                if hints.global { "global" } else { "route" },
                limited.message(),
                hints.retry_after().as_secs_f64()
            ),
            None => format!("Rate limited: {}", limited.message()),
        },
        HttpFailure::Unauthorized => format!(
            "{}. The access token may have expired or been revoked.",
            failure
        ),
        HttpFailure::AccessDenied => format!("{}.", failure),
        HttpFailure::Generic { .. } => failure.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discord_api::{RateLimited, ResponseParts};
    use reqwest::{header::HeaderMap, StatusCode, Url};

    fn rate_limited(body: &str) -> HttpFailure {
        HttpFailure::RateLimited(RateLimited::new(ResponseParts::new(
            StatusCode::TOO_MANY_REQUESTS,
            HeaderMap::new(),
            Url::parse("https://discord.com/api/v10/users/@me").unwrap(),
            body,
        )))
    }

    #[test]
    fn rate_limit_with_hints() {
        let failure = rate_limited(
            r#"{"message": "You are being rate limited.", "global": false, "retry_after": 750}"#,
        );
        assert_eq!(
            describe_http_failure(&failure),
            "Rate limited (route limit): You are being rate limited. Retry in 0.75s."
        );
    }

    #[test]
    fn global_rate_limit_in_fractional_seconds() {
        let failure = rate_limited(include_str!(
            "../../discord_api/tests/fixtures/rate_limited_global.json"
        ));
        assert_eq!(
            describe_http_failure(&failure),
            "Rate limited (global limit): You are being rate limited. Retry in 64.57s."
        );
    }

    #[test]
    fn rate_limit_without_hints() {
        assert_eq!(
            describe_http_failure(&rate_limited("rate limited")),
            "Rate limited: rate limited"
        );
    }

    #[test]
    fn unauthorized_and_denied() {
        assert_eq!(
            describe_failure(&Error::Http(HttpFailure::Unauthorized)),
            "401 Unauthorized: missing or invalid access token. The access token may have expired or been revoked."
        );
        assert_eq!(
            describe_http_failure(&HttpFailure::AccessDenied),
            "access denied: the user declined the authorization request."
        );
    }

    #[test]
    fn transport_failures() {
        assert_eq!(
            describe_failure(&Error::RequestFailed),
            "Could not reach the Discord API"
        );
        assert_eq!(
            describe_failure(&Error::Decode { body: "{".to_string() }),
            "Discord returned a response this tool could not read"
        );
    }
}

//! Shared HTTP response checks.
//!
//! 429 becomes [`LlmError::RateLimited`] with `Retry-After` parsing; any other
//! non-success status becomes [`LlmError::Api`] carrying the response body.

use crate::error::LlmError;

/// Fallback wait when `Retry-After` is absent or unparseable.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Return the response unchanged on success, or the matching error.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    if resp.status() == 429 {
        return Err(LlmError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(LlmError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[test]
    fn retry_after_header_is_parsed() {
        assert_eq!(parse_retry_after(&fake_response(429, Some("120"), "")), 120);
        assert_eq!(parse_retry_after(&fake_response(429, None, "")), 60);
        assert_eq!(parse_retry_after(&fake_response(429, Some("soon"), "")), 60);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_error() {
        let err = check_response(fake_response(429, Some("30"), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn error_status_keeps_body() {
        let err = check_response(fake_response(401, None, "invalid api key"))
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(fake_response(200, None, "{}")).await.is_ok());
    }
}

//! Shared HTTP response helpers for the PostgREST backend.

use crate::error::StoreError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`StoreError::RateLimited`], reading
///   `Retry-After` (60 s when absent or unparseable).
/// - **Non-success status** → [`StoreError::Api`] with status code and body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if resp.status() == 429 {
        return Err(StoreError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(StoreError::Api {
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
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[tokio::test]
    async fn rate_limited_reads_header_or_defaults() {
        let err = check_response(mock_response(429, Some("30"), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RateLimited { retry_after_secs: 30 }));

        let err = check_response(mock_response(429, Some("soon"), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RateLimited { retry_after_secs: 60 }));
    }

    #[tokio::test]
    async fn api_error_carries_body() {
        let err = check_response(mock_response(409, None, "duplicate key"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, StoreError::Api { status: 409, ref message } if message == "duplicate key")
        );
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(201, None, "")).await.is_ok());
    }
}

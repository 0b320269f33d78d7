use crate::error::AiError;

/// Map 429 to [`AiError::RateLimited`] and other failures to [`AiError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AiError> {
    if resp.status() == 429 {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(AiError::RateLimited { retry_after_secs });
    }
    if !resp.status().is_success() {
        return Err(AiError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn quota_errors_become_rate_limited() {
        let err = check_response(mock_response(429, "")).await.unwrap_err();
        assert!(matches!(err, AiError::RateLimited { retry_after_secs: 60 }));
    }

    #[tokio::test]
    async fn bad_request_carries_body() {
        let err = check_response(mock_response(400, "API key not valid"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Api { status: 400, ref message } if message.contains("key")));
    }
}

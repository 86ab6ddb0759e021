//! Shared HTTP response helpers for the token client.

use crate::error::TokenError;

/// Return the response unchanged on success, or [`TokenError::Api`] carrying
/// the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TokenError> {
    if !resp.status().is_success() {
        return Err(TokenError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

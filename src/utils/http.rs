//! One-shot JSON POSTs against provider endpoints.

use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::LlmError;

/// POST `body` and return the response if the status is 2xx.
///
/// Non-2xx statuses become [`LlmError::ApiError`] carrying the provider's
/// error body as `details` when it is JSON.
pub async fn send_json(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &serde_json::Value,
) -> Result<reqwest::Response, LlmError> {
    debug!(url, "sending provider request");
    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::HttpError(format!("Failed to send request: {e}")))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let details = serde_json::from_str::<serde_json::Value>(&text).ok();
    let message = details
        .as_ref()
        .and_then(extract_error_message)
        .unwrap_or(text);
    Err(LlmError::ApiError {
        code: status.as_u16(),
        message,
        details,
    })
}

/// POST `body` and parse the response as JSON.
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &serde_json::Value,
) -> Result<serde_json::Value, LlmError> {
    let response = send_json(client, url, headers, body).await?;
    let text = response
        .text()
        .await
        .map_err(|e| LlmError::HttpError(e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| LlmError::ParseError(format!("Failed to parse response JSON: {e}")))
}

/// `{"error": {"message": ...}}` or `{"error": "..."}`, the two shapes
/// providers use.
fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
}

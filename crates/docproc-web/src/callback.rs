use std::time::Duration;

use crate::models::CallbackPayload;

/// Bound on one callback delivery attempt. No retries.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// POST extraction results to the caller-supplied callback URL.
pub async fn deliver(
    client: &reqwest::Client,
    url: &str,
    payload: &CallbackPayload<'_>,
) -> Result<reqwest::StatusCode, reqwest::Error> {
    let response = client
        .post(url)
        .json(payload)
        .timeout(CALLBACK_TIMEOUT)
        .send()
        .await?;
    Ok(response.status())
}

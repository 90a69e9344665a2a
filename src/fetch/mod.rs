//! Retrieval of the raw feed over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::feed::RawPayload;

/// Default bound on a whole fetch: connect, headers and body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads and decodes the feed at `url`.
///
/// The request is abandoned after `timeout`. No retries: the caller's refresh
/// schedule decides when to try again.
#[tracing::instrument(skip(client))]
pub async fn fetch_feed<C: HttpClient>(
    client: &C,
    url: &str,
    timeout: Duration,
) -> Result<RawPayload, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let body = tokio::time::timeout(timeout, async {
        let resp = client.execute(req).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok::<_, FetchError>(resp.bytes().await?)
    })
    .await
    .map_err(|_| FetchError::Timeout(timeout))??;

    debug!(bytes = body.len(), "Feed bytes received");
    Ok(serde_json::from_slice(&body)?)
}

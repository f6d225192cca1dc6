//! Retrieval of feed archives over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use tracing::debug;

use crate::error::AnalysisError;

/// Downloads an archive, refusing bodies larger than `max_bytes` when the
/// server announces their length.
pub async fn fetch_archive<C: HttpClient>(client: &C, url: &str, max_bytes: u64) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    if let Some(size) = resp.content_length() {
        debug!(size, "Archive length announced");
        if size > max_bytes {
            return Err(AnalysisError::TooLarge {
                size,
                limit: max_bytes,
            }
            .into());
        }
    }

    Ok(resp.bytes().await?.to_vec())
}

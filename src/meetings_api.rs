// OpenF1 meetings endpoint. The scanner only sees the MeetingsSource trait, so tests swap in fakes.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use std::time::Duration;

/// Errors from fetching one year of meetings.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No response: connection refused, DNS failure, timeout.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response arrived but its body could not be read to the end.
    #[error("body read failure: {0}")]
    BodyRead(String),
}

/// Something that can return the raw meetings payload for a season.
#[async_trait]
pub trait MeetingsSource: Send + Sync {
    /// Raw response body for `year`. The HTTP status is not part of the contract.
    async fn fetch_year(&self, year: i32) -> Result<Bytes, FetchError>;
}

/// reqwest-backed client for `GET {base_url}/meetings?year={year}`.
pub struct OpenF1Client {
    client: reqwest::Client,
    base_url: String,
}

impl OpenF1Client {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openf1.org/v1";

    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn meetings_url(&self, year: i32) -> String {
        format!("{}/meetings?year={}", self.base_url, year)
    }
}

#[async_trait]
impl MeetingsSource for OpenF1Client {
    async fn fetch_year(&self, year: i32) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(self.meetings_url(year))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::BodyRead(e.to_string()))?;
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

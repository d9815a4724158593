use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// One quote as the public API serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuote {
    pub quote: String,
    pub character: String,
    pub image: String,
    #[serde(rename = "characterDirection")]
    pub character_direction: String,
}

/// Failures a fetch can produce. Network I/O only; the client never
/// touches local state, so a failed call leaves the cache as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("quote API error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed quote payload: {0}")]
    Deserialization(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Deserialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Source of quote batches, abstracted so the sync coordinator can be
/// exercised without a network.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch_batch(&self, count: u32) -> Result<Vec<RawQuote>, FetchError>;

    async fn fetch_by_character(&self, name: &str) -> Result<Vec<RawQuote>, FetchError>;
}

#[derive(Clone)]
pub struct QuoteApiClient {
    client: Client,
    base_url: String,
}

impl QuoteApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn with_shared_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_quotes(&self, url: &str) -> Result<Vec<RawQuote>, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let quotes: Vec<RawQuote> = response.json().await?;
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteFetcher for QuoteApiClient {
    async fn fetch_batch(&self, count: u32) -> Result<Vec<RawQuote>, FetchError> {
        let url = format!("{}/quotes?count={}", self.base_url, count);
        self.get_quotes(&url).await
    }

    async fn fetch_by_character(&self, name: &str) -> Result<Vec<RawQuote>, FetchError> {
        let url = format!(
            "{}/quotes?character={}",
            self.base_url,
            urlencoding::encode(name)
        );
        self.get_quotes(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_quote_deserializes_api_shape() {
        let json = r#"{
            "quote": "D'oh!",
            "character": "Homer Simpson",
            "image": "https://cdn.example/homer.png",
            "characterDirection": "Right"
        }"#;

        let raw: RawQuote = serde_json::from_str(json).unwrap();
        assert_eq!(raw.quote, "D'oh!");
        assert_eq!(raw.character, "Homer Simpson");
        assert_eq!(raw.character_direction, "Right");
    }

    #[test]
    fn fetch_error_display_includes_status() {
        let err = FetchError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("502"));
        assert!(rendered.contains("upstream down"));
    }
}

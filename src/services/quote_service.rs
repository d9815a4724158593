//! Domain service for the quote cache.
//!
//! Coordinates remote fetches against the local store and exposes the
//! cache as observable snapshots.

use crate::clients::quote_api::FetchError;
use crate::domain::QuoteId;
use crate::models::quote::QuoteRecord;
use thiserror::Error;
use tokio::sync::watch;

/// Domain errors for cache operations.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote not found: {0}")]
    NotFound(QuoteId),

    #[error("Network unavailable: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Malformed response: {0}")]
    Deserialization(String),

    #[error("Database error: {0}")]
    Storage(String),

    #[error("Unexpected failure: {0}")]
    Unknown(String),
}

impl From<FetchError> for QuoteError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(msg) => Self::Network(msg),
            FetchError::Timeout(msg) => Self::Timeout(msg),
            FetchError::Deserialization(msg) => Self::Deserialization(msg),
            FetchError::Status { status, body } => Self::Unknown(format!("{status} - {body}")),
        }
    }
}

impl From<sea_orm::DbErr> for QuoteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for QuoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Domain service trait for quote cache operations.
///
/// Abstracts the fetch/replace/observe cycle so front ends depend on
/// behavior instead of storage details.
#[async_trait::async_trait]
pub trait QuoteService: Send + Sync {
    /// Replaces the cache with a freshly fetched batch.
    ///
    /// On any fetch failure the cache is left untouched and the typed
    /// error surfaces. An empty response is a successful refresh that
    /// leaves the cache empty. Returns the number of cached rows.
    ///
    /// A replacement resets every favorite flag: the incoming rows are
    /// new records, not updates to the old ones.
    async fn refresh(&self) -> Result<usize, QuoteError>;

    /// Same pipeline as [`Self::refresh`], restricted to one character.
    ///
    /// A blank or whitespace-only name is rewritten to a full refresh.
    async fn search(&self, character: &str) -> Result<usize, QuoteError>;

    /// Flips one record's favorite flag in place and returns the
    /// updated record. Never touches the network.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::NotFound`] if the row does not exist.
    async fn toggle_favorite(&self, id: QuoteId) -> Result<QuoteRecord, QuoteError>;

    /// Current cache contents, ordered by id.
    async fn list_quotes(&self) -> Result<Vec<QuoteRecord>, QuoteError>;

    /// Cached rows with `is_favorite = true`, ordered by id.
    async fn list_favorites(&self) -> Result<Vec<QuoteRecord>, QuoteError>;

    /// Snapshot stream of the whole cache: the current contents at
    /// subscribe time plus every subsequent change.
    fn watch_quotes(&self) -> watch::Receiver<Vec<QuoteRecord>>;

    /// Snapshot stream of the favorites subset.
    fn watch_favorites(&self) -> watch::Receiver<Vec<QuoteRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_error_display() {
        let err = QuoteError::NotFound(QuoteId::new(42));
        assert_eq!(err.to_string(), "Quote not found: 42");

        let err = QuoteError::Timeout("deadline exceeded".to_string());
        assert_eq!(err.to_string(), "Request timed out: deadline exceeded");
    }

    #[test]
    fn fetch_error_maps_by_kind() {
        let err: QuoteError = FetchError::Timeout("slow upstream".to_string()).into();
        assert!(matches!(err, QuoteError::Timeout(_)));

        let err: QuoteError = FetchError::Network("dns".to_string()).into();
        assert!(matches!(err, QuoteError::Network(_)));

        let err: QuoteError = FetchError::Deserialization("bad json".to_string()).into();
        assert!(matches!(err, QuoteError::Deserialization(_)));

        let err: QuoteError = FetchError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, QuoteError::Unknown(_)));
    }
}

//! `SeaORM`-backed implementation of the `QuoteService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast, watch};
use tracing::{info, warn};

use crate::clients::quote_api::{QuoteFetcher, RawQuote};
use crate::config::Config;
use crate::db::Store;
use crate::domain::QuoteId;
use crate::domain::events::NotificationEvent;
use crate::models::quote::{NewQuote, QuoteRecord};
use crate::services::quote_service::{QuoteError, QuoteService};

pub struct SeaOrmQuoteService {
    store: Store,
    fetcher: Arc<dyn QuoteFetcher>,
    config: Arc<RwLock<Config>>,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmQuoteService {
    #[must_use]
    pub fn new(
        store: Store,
        fetcher: Arc<dyn QuoteFetcher>,
        config: Arc<RwLock<Config>>,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
            event_bus,
        }
    }

    fn map_raw_to_new(raw: RawQuote) -> NewQuote {
        NewQuote {
            quote_text: raw.quote,
            character_name: raw.character,
            image_url: raw.image,
            character_page_url: raw.character_direction,
        }
    }

    /// Swaps the fetched batch into the cache. Only reached after a
    /// successful fetch, so a failed fetch can never wipe the cache.
    async fn replace_cache(&self, batch: Vec<RawQuote>) -> Result<usize, QuoteError> {
        let records: Vec<NewQuote> = batch.into_iter().map(Self::map_raw_to_new).collect();
        let count = self.store.replace_quotes(&records).await?;
        Ok(count)
    }

    fn emit(&self, event: NotificationEvent) {
        let _ = self.event_bus.send(event);
    }
}

#[async_trait]
impl QuoteService for SeaOrmQuoteService {
    async fn refresh(&self) -> Result<usize, QuoteError> {
        self.emit(NotificationEvent::RefreshStarted);

        let fetch_count = self.config.read().await.quotes.fetch_count;

        match self.fetcher.fetch_batch(fetch_count).await {
            Ok(batch) => {
                let count = self.replace_cache(batch).await?;
                info!("Refreshed quote cache ({} records)", count);
                self.emit(NotificationEvent::RefreshFinished { count });
                Ok(count)
            }
            Err(err) => {
                warn!("Refresh failed, keeping cached quotes: {}", err);
                self.emit(NotificationEvent::Error {
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    async fn search(&self, character: &str) -> Result<usize, QuoteError> {
        let character = character.trim();
        if character.is_empty() {
            return self.refresh().await;
        }

        self.emit(NotificationEvent::SearchStarted {
            character: character.to_string(),
        });

        match self.fetcher.fetch_by_character(character).await {
            Ok(batch) => {
                let count = self.replace_cache(batch).await?;
                info!("Cached {} quotes for character '{}'", count, character);
                self.emit(NotificationEvent::SearchFinished {
                    character: character.to_string(),
                    count,
                });
                Ok(count)
            }
            Err(err) => {
                warn!(
                    "Search for '{}' failed, keeping cached quotes: {}",
                    character, err
                );
                self.emit(NotificationEvent::Error {
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    async fn toggle_favorite(&self, id: QuoteId) -> Result<QuoteRecord, QuoteError> {
        let mut record = self
            .store
            .get_quote(id.value())
            .await?
            .ok_or(QuoteError::NotFound(id))?;

        record.is_favorite = !record.is_favorite;
        self.store.update_quote(&record).await?;

        self.emit(NotificationEvent::FavoriteToggled {
            id: record.id,
            favorite: record.is_favorite,
        });

        Ok(record)
    }

    async fn list_quotes(&self) -> Result<Vec<QuoteRecord>, QuoteError> {
        Ok(self.store.list_quotes().await?)
    }

    async fn list_favorites(&self) -> Result<Vec<QuoteRecord>, QuoteError> {
        Ok(self.store.list_favorites().await?)
    }

    fn watch_quotes(&self) -> watch::Receiver<Vec<QuoteRecord>> {
        self.store.watch_quotes()
    }

    fn watch_favorites(&self) -> watch::Receiver<Vec<QuoteRecord>> {
        self.store.watch_favorites()
    }
}

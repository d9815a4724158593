use crate::models::quote::{NewQuote, QuoteRecord};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// Handle to the local quote cache.
///
/// Explicitly constructed and passed to whoever needs it; cloning is
/// cheap and every clone shares the pool and the snapshot channels.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    quotes_tx: Arc<watch::Sender<Vec<QuoteRecord>>>,
    favorites_tx: Arc<watch::Sender<Vec<QuoteRecord>>>,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        let (quotes_tx, _) = watch::channel(Vec::new());
        let (favorites_tx, _) = watch::channel(Vec::new());

        let store = Self {
            conn,
            quotes_tx: Arc::new(quotes_tx),
            favorites_tx: Arc::new(favorites_tx),
        };

        // Seed the channels so the first subscriber sees whatever a
        // persisted database already holds.
        store.publish_snapshots().await?;

        Ok(store)
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn quote_repo(&self) -> repositories::quote::QuoteRepository {
        repositories::quote::QuoteRepository::new(self.conn.clone())
    }

    pub async fn get_quote(&self, id: i32) -> Result<Option<QuoteRecord>> {
        self.quote_repo().get(id).await
    }

    pub async fn list_quotes(&self) -> Result<Vec<QuoteRecord>> {
        self.quote_repo().list_all().await
    }

    pub async fn list_favorites(&self) -> Result<Vec<QuoteRecord>> {
        self.quote_repo().list_favorites().await
    }

    /// Transactional delete-then-insert of the whole cache, then a
    /// snapshot publish for every subscriber.
    pub async fn replace_quotes(&self, records: &[NewQuote]) -> Result<usize> {
        let count = self.quote_repo().replace_all(records).await?;
        self.publish_snapshots().await?;
        Ok(count)
    }

    /// Single-row upsert by id, then a snapshot publish.
    pub async fn update_quote(&self, record: &QuoteRecord) -> Result<()> {
        self.quote_repo().upsert(record).await?;
        self.publish_snapshots().await?;
        Ok(())
    }

    pub async fn clear_quotes(&self) -> Result<u64> {
        let removed = self.quote_repo().clear().await?;
        self.publish_snapshots().await?;
        Ok(removed)
    }

    /// Current snapshot plus every subsequent change, for the lifetime
    /// of the receiver. `borrow()` yields the snapshot immediately.
    #[must_use]
    pub fn watch_quotes(&self) -> watch::Receiver<Vec<QuoteRecord>> {
        self.quotes_tx.subscribe()
    }

    /// Same contract as [`Self::watch_quotes`], filtered to rows with
    /// `is_favorite = true`.
    #[must_use]
    pub fn watch_favorites(&self) -> watch::Receiver<Vec<QuoteRecord>> {
        self.favorites_tx.subscribe()
    }

    async fn publish_snapshots(&self) -> Result<()> {
        let all = self.quote_repo().list_all().await?;
        let favorites: Vec<QuoteRecord> = all
            .iter()
            .filter(|record| record.is_favorite)
            .cloned()
            .collect();

        self.quotes_tx.send_replace(all);
        self.favorites_tx.send_replace(favorites);
        Ok(())
    }
}

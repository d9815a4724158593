use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

use crate::clients::auth::AuthClient;
use crate::clients::quote_api::{QuoteApiClient, QuoteFetcher};
use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    AuthService, QuoteService, RestAuthService, RetryPolicy, SeaOrmQuoteService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client is reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent("Quotarr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub quotes_client: Arc<QuoteApiClient>,

    pub auth_client: Arc<AuthClient>,

    pub quote_service: Arc<dyn QuoteService>,

    pub auth_service: Arc<dyn AuthService>,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        Self::init_with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        Self::init_with_event_bus(config, event_bus).await
    }

    async fn init_with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.quotes.request_timeout_seconds.into())?;

        let quotes_client = Arc::new(QuoteApiClient::with_shared_client(
            http_client.clone(),
            config.quotes.base_url.clone(),
        ));

        let auth_client = Arc::new(AuthClient::with_shared_client(
            http_client,
            config.auth.base_url.clone(),
            config.auth.api_key.clone(),
        ));

        let retry = RetryPolicy::new(
            config.auth.retry_max_attempts,
            Duration::from_secs(config.auth.retry_delay_seconds),
        );
        let session_path = config.auth.session_path.clone();

        let config_arc = Arc::new(RwLock::new(config));

        let quote_service = Arc::new(SeaOrmQuoteService::new(
            store.clone(),
            quotes_client.clone() as Arc<dyn QuoteFetcher>,
            config_arc.clone(),
            event_bus.clone(),
        )) as Arc<dyn QuoteService + Send + Sync + 'static>;

        let auth_service = Arc::new(RestAuthService::new(
            auth_client.clone(),
            retry,
            session_path,
            event_bus.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config: config_arc,
            store,
            quotes_client,
            auth_client,
            quote_service,
            auth_service,
            event_bus,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}

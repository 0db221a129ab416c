//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the document store, token service, and payment client.

use std::path::PathBuf;
use std::sync::Arc;

use hub_auth::TokenService;
use hub_core::{HubError, HubResult};
use hub_store::{BoxedStore, JsonStore};
use hub_stripe::PaymentIntents;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    /// Optional JSON snapshot file for the document store
    pub data_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> HubResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| HubError::Configuration("JWT_SECRET not set".to_string()))?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            jwt_secret,
            data_path: std::env::var("HUB_DATA_PATH").ok().map(PathBuf::from),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> HubResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            HubError::Configuration(format!(
                "invalid bind address {}:{}",
                self.host, self.port
            ))
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store
    pub store: BoxedStore,
    /// Access token service
    pub tokens: Arc<TokenService>,
    /// Stripe payment-intent client
    pub payments: Arc<PaymentIntents>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment: document store (snapshot
    /// file when `HUB_DATA_PATH` is set), token service, Stripe client.
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store: BoxedStore = match &config.data_path {
            Some(path) => Arc::new(JsonStore::open(path.clone()).await?),
            None => Arc::new(JsonStore::new()),
        };

        let tokens = Arc::new(TokenService::new(&config.jwt_secret));

        let payments = PaymentIntents::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self {
            store,
            tokens,
            payments: Arc::new(payments),
            config,
        })
    }
}

//! Application state - shared across all handlers.

use std::sync::Arc;

use nce_core::ports::ErrorRecordRepository;
use nce_infra::database::InMemoryErrorRecordRepository;

#[cfg(feature = "postgres")]
use nce_infra::database::{PostgresErrorRecordRepository, connect};

use crate::config::{AppConfig, ListingConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub errors: Arc<dyn ErrorRecordRepository>,
    pub listing: ListingConfig,
}

impl AppState {
    /// Build the application state with the configured repository.
    ///
    /// Without `DATABASE_URL` the server runs on the in-memory store. A
    /// configured database that cannot be reached is a startup failure.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let listing = config.listing;

        #[cfg(feature = "postgres")]
        let errors: Arc<dyn ErrorRecordRepository> = match &config.database {
            Some(db_config) => {
                let conn = connect(db_config).await.map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    std::io::Error::other(e.to_string())
                })?;
                Arc::new(PostgresErrorRecordRepository::with_order(
                    conn,
                    listing.order,
                ))
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryErrorRecordRepository::with_order(listing.order))
            }
        };

        #[cfg(not(feature = "postgres"))]
        let errors: Arc<dyn ErrorRecordRepository> = {
            if config.database.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
            Arc::new(InMemoryErrorRecordRepository::with_order(listing.order))
        };

        tracing::info!(order = %listing.order, "Application state initialized");

        Ok(Self::with_repository(errors, listing))
    }

    /// Build state around an existing repository.
    pub fn with_repository(errors: Arc<dyn ErrorRecordRepository>, listing: ListingConfig) -> Self {
        Self { errors, listing }
    }
}

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use nce_core::domain::SortOrder;
use nce_infra::database::DatabaseConfig;

/// Listing behaviour for `GET /api/errors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    /// Order of records by `error_id`.
    pub order: SortOrder,
    /// `limit` used when the query string has none.
    pub default_limit: u64,
    /// Upper bound applied to any requested `limit`.
    pub max_limit: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            order: SortOrder::Descending,
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub listing: ListingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let defaults = DatabaseConfig::new(url);
                DatabaseConfig {
                    max_connections: parse_or(
                        &lookup,
                        "DB_MAX_CONNECTIONS",
                        defaults.max_connections,
                    ),
                    min_connections: parse_or(
                        &lookup,
                        "DB_MIN_CONNECTIONS",
                        defaults.min_connections,
                    ),
                    connect_timeout: Duration::from_secs(parse_or(
                        &lookup,
                        "DB_CONNECT_TIMEOUT_SECS",
                        defaults.connect_timeout.as_secs(),
                    )),
                    ..defaults
                }
            });

        let listing_defaults = ListingConfig::default();
        let max_limit = parse_or(&lookup, "MAX_PAGE_LIMIT", listing_defaults.max_limit).max(1);
        let listing = ListingConfig {
            order: parse_or(&lookup, "ERRORS_SORT_ORDER", listing_defaults.order),
            default_limit: parse_or(&lookup, "DEFAULT_PAGE_LIMIT", listing_defaults.default_limit)
                .clamp(1, max_limit),
            max_limit,
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 5000),
            database,
            listing,
        }
    }
}

/// Parse `key` if set, falling back to `default` (with a warning) when the
/// value does not parse.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

//! `NexusSuite` - data aggregation and caching for a multilingual portal
//!
//! This library fetches weather, exchange rates, news headlines and place
//! names from third-party providers, normalizes them, and memoizes the results
//! in a shared TTL cache.

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod exchange;
pub mod geocoding;
pub mod http;
pub mod locale;
pub mod logging;
pub mod models;
pub mod news;
pub mod status_map;
pub mod translation;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use aggregator::{Aggregator, Dashboard, DashboardRequest};
pub use cache::{Cache, Clock, ManualClock, SystemClock, Ttl};
pub use config::NexusConfig;
pub use error::{ErrorKind, NexusError, Provider};
pub use exchange::{ExchangeRateFetcher, convert};
pub use geocoding::GeocodingResolver;
pub use http::ApiClient;
pub use locale::Language;
pub use models::{ExchangeRate, GeoResult, NewsArticle, NewsCategory, WeatherDataType, WeatherSnapshot};
pub use news::NewsFetcher;
pub use translation::{NameTranslator, TranslationKind};
pub use weather::WeatherFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NexusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

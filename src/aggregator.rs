//! Composition of all fetchers behind one handle
//!
//! The presentation layer holds an [`Aggregator`] and asks it for individual
//! sections or a whole dashboard. Dashboard sections fail independently; each
//! carries either data or a localized error message.

use crate::cache::{Cache, Ttl};
use crate::config::NexusConfig;
use crate::exchange::ExchangeRateFetcher;
use crate::geocoding::GeocodingResolver;
use crate::http::ApiClient;
use crate::locale::Language;
use crate::models::{ExchangeRate, NewsArticle, NewsCategory, WeatherDataType, WeatherSnapshot};
use crate::news::NewsFetcher;
use crate::translation::NameTranslator;
use crate::weather::WeatherFetcher;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Aggregator {
    pub geocoder: GeocodingResolver,
    pub translator: NameTranslator,
    pub weather: WeatherFetcher,
    pub exchange: ExchangeRateFetcher,
    pub news: NewsFetcher,
}

/// What one dashboard render needs
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub city: String,
    pub language: Language,
    pub data_type: WeatherDataType,
    pub category: NewsCategory,
    pub country: String,
    pub currencies: Option<HashSet<String>>,
}

/// Data of one section, or the message shown instead
#[derive(Debug, Clone, Serialize)]
pub struct Section<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Section<T> {
    fn from_result(result: crate::Result<T>, language: Language, section: &str) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(e) => {
                warn!(section, "Dashboard section failed: {e}");
                Self {
                    data: None,
                    error: Some(e.user_message(language)),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub weather: Section<WeatherSnapshot>,
    pub rates: Section<Vec<ExchangeRate>>,
    pub news: Section<Vec<NewsArticle>>,
}

impl Aggregator {
    /// Wire every fetcher to the configured endpoints over one HTTP client
    /// and one cache.
    pub fn from_config(config: &NexusConfig, cache: Cache) -> crate::Result<Self> {
        for provider in config.missing_api_keys() {
            warn!("No {provider} API key configured; requests to it will be rejected upstream");
        }

        let client = ApiClient::new(&config.http)?;
        let key = |value: &Option<String>| value.clone().unwrap_or_default();

        let geocoder = GeocodingResolver::new(
            client.clone(),
            cache.clone(),
            &config.geocoding.base_url,
            key(&config.geocoding.api_key),
        );
        let translator = NameTranslator::new(
            client.clone(),
            cache.clone(),
            &config.translation.base_url,
            Ttl::hours(config.cache.translation_ttl_hours),
        );
        let weather = WeatherFetcher::new(
            client.clone(),
            cache.clone(),
            geocoder.clone(),
            translator.clone(),
            &config.weather.base_url,
            key(&config.weather.api_key),
        );
        let exchange = ExchangeRateFetcher::new(client.clone(), cache.clone(), &config.exchange.base_url);
        let news = NewsFetcher::new(client, cache, &config.news.base_url, key(&config.news.api_key));

        info!(cache_backend = %config.cache.backend, "Aggregator ready");
        Ok(Self {
            geocoder,
            translator,
            weather,
            exchange,
            news,
        })
    }

    /// Weather, rates and news for one page. Never fails as a whole.
    pub async fn dashboard(&self, request: &DashboardRequest) -> Dashboard {
        let language = request.language;
        let (weather, rates, news) = tokio::join!(
            self.weather.fetch(&request.city, language, request.data_type),
            self.exchange.fetch_rates(request.currencies.as_ref()),
            self.news.fetch(request.category, &request.country),
        );

        Dashboard {
            weather: Section::from_result(weather, language, "weather"),
            rates: Section::from_result(rates, language, "rates"),
            news: Section::from_result(news, language, "news"),
        }
    }
}

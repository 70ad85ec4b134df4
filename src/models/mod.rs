//! Data models for NexusSuite
//!
//! Snapshots produced by the fetchers, organized by concern:
//! - Geo: resolved cities and their coordinates
//! - Weather: current conditions and the short-range forecast
//! - Rates: exchange rates and conversion outcomes
//! - News: headlines per category and country
//!
//! All of them are immutable once built; a cache miss always produces a
//! wholly new value.

pub mod geo;
pub mod news;
pub mod rates;
pub mod weather;

pub use geo::GeoResult;
pub use news::{NewsArticle, NewsCategory};
pub use rates::{ConversionError, ExchangeRate};
pub use weather::{
    Astro, Condition, CurrentConditions, ForecastDay, HourlyEntry, PlaceNames, WeatherDataType,
    WeatherSnapshot,
};

//! Resolved city model

use serde::{Deserialize, Serialize};

/// Canonical English description of a city as resolved by geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    /// City name in English
    pub city_en: String,
    /// Country code (ISO 3166-1 alpha-2, upper case)
    pub country_code: String,
    /// Country name in English
    pub country_name: String,
    /// State, province or region, when the provider reports one
    pub region: Option<String>,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl GeoResult {
    /// Query value the weather provider expects for these coordinates
    #[must_use]
    pub fn coordinates_query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

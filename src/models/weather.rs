//! Weather snapshot model
//!
//! Numeric readings are rounded for display at fetch time. A reading the
//! provider did not send is `None` and renders as the snapshot's placeholder;
//! missing text fields already hold the placeholder.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoResult;
use crate::locale::{DayLabel, Language};

/// Which parts of the weather to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherDataType {
    Current,
    Forecast,
    #[default]
    Both,
}

impl WeatherDataType {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current" => Some(Self::Current),
            "forecast" => Some(Self::Forecast),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Forecast => "forecast",
            Self::Both => "both",
        }
    }

    #[must_use]
    pub fn includes_current(self) -> bool {
        matches!(self, Self::Current | Self::Both)
    }

    #[must_use]
    pub fn includes_forecast(self) -> bool {
        matches!(self, Self::Forecast | Self::Both)
    }
}

impl fmt::Display for WeatherDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon_url: String,
}

/// Current conditions at the resolved city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: Option<i64>,
    pub temperature_f: Option<i64>,
    pub feelslike_c: Option<i64>,
    pub feelslike_f: Option<i64>,
    pub dewpoint_c: Option<i64>,
    pub dewpoint_f: Option<i64>,
    pub condition: Condition,
    pub humidity: Option<i64>,
    pub wind_kph: Option<i64>,
    pub wind_mph: Option<i64>,
    /// Derived from km/h
    pub wind_mps: Option<i64>,
    pub wind_dir: String,
    pub pressure_mb: Option<i64>,
    pub pressure_in: Option<i64>,
    /// Derived from millibars, in mmHg
    pub pressure_mm: Option<i64>,
    pub visibility_km: Option<i64>,
    pub visibility_miles: Option<i64>,
    pub uv_index: Option<i64>,
    pub update_time: String,
    pub localtime: String,
    pub tz_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    /// Phase as reported upstream (English)
    pub moon_phase: String,
    /// Phase in the snapshot's language
    pub moon_phase_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub temp_c: Option<i64>,
    pub temp_f: Option<i64>,
    pub wind_kph: Option<i64>,
    pub wind_mps: Option<i64>,
    pub pressure_mb: Option<i64>,
    pub pressure_mm: Option<i64>,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub label: DayLabel,
    pub max_temp_c: Option<i64>,
    pub max_temp_f: Option<i64>,
    pub min_temp_c: Option<i64>,
    pub min_temp_f: Option<i64>,
    pub condition: Condition,
    pub astro: Astro,
    /// Ordered by time
    pub hours: Vec<HourlyEntry>,
}

/// City, region and country names of one origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceNames {
    pub city: String,
    pub region: String,
    pub country: String,
}

/// Everything the portal shows about the weather in one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub language: Language,
    pub data_type: WeatherDataType,
    pub placeholder: String,
    /// Geocoding result the readings belong to
    pub geo: GeoResult,
    /// Place names in the snapshot's language
    pub display: PlaceNames,
    /// Place names as the weather provider reported them
    pub reported: Option<PlaceNames>,
    pub current: Option<CurrentConditions>,
    /// At most three days, earliest first
    pub forecast: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    /// Render a reading, using the placeholder when it is missing
    #[must_use]
    pub fn show(&self, reading: Option<i64>) -> String {
        reading.map_or_else(|| self.placeholder.clone(), |v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("current", Some(WeatherDataType::Current))]
    #[case("Forecast", Some(WeatherDataType::Forecast))]
    #[case("both", Some(WeatherDataType::Both))]
    #[case("hourly", None)]
    fn test_data_type_parse(#[case] input: &str, #[case] expected: Option<WeatherDataType>) {
        assert_eq!(WeatherDataType::parse(input), expected);
    }

    #[test]
    fn test_data_type_parts() {
        assert!(WeatherDataType::Both.includes_current());
        assert!(WeatherDataType::Both.includes_forecast());
        assert!(!WeatherDataType::Current.includes_forecast());
        assert!(!WeatherDataType::Forecast.includes_current());
    }
}

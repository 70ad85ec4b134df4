//! Weather fetcher
//!
//! Looks up current conditions and a three-day forecast from weatherapi.com
//! for a geocoded city, normalizes units and fills gaps with the language's
//! placeholder. Snapshots are cached for an hour per city, language and data
//! type.

use crate::cache::{Cache, Ttl, cache_key};
use crate::error::NexusError;
use crate::geocoding::GeocodingResolver;
use crate::http::ApiClient;
use crate::locale::Language;
use crate::models::{GeoResult, WeatherDataType, WeatherSnapshot};
use crate::status_map;
use crate::translation::NameTranslator;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const WEATHER_TTL: Ttl = Ttl::Seconds(3600);
const FORECAST_DAYS: usize = 3;

const KPH_PER_MPS: f64 = 3.6;
const MMHG_PER_MB: f64 = 0.750_062;

/// Wind speed in metres per second
#[must_use]
pub fn kph_to_mps(kph: f64) -> f64 {
    kph / KPH_PER_MPS
}

/// Pressure in millimetres of mercury
#[must_use]
pub fn mb_to_mmhg(mb: f64) -> f64 {
    mb * MMHG_PER_MB
}

#[allow(clippy::cast_possible_truncation)]
fn rounded(value: Option<f64>) -> Option<i64> {
    value.filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

#[derive(Clone)]
pub struct WeatherFetcher {
    client: ApiClient,
    cache: Cache,
    geocoder: GeocodingResolver,
    translator: NameTranslator,
    base_url: String,
    api_key: String,
}

impl WeatherFetcher {
    pub fn new(
        client: ApiClient,
        cache: Cache,
        geocoder: GeocodingResolver,
        translator: NameTranslator,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cache,
            geocoder,
            translator,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Weather snapshot for `city`.
    ///
    /// Geocoding and upstream failures come back wrapped in
    /// [`NexusError::UnableToRetrieveWeather`]; a response whose `current`
    /// section is absent or empty is [`NexusError::IncompleteWeatherData`].
    /// Snapshots are cached per resolved city, not per spelling.
    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        city: &str,
        language: Language,
        data_type: WeatherDataType,
    ) -> crate::Result<WeatherSnapshot> {
        let geo = self
            .geocoder
            .resolve(city, None)
            .await
            .map_err(NexusError::unable_to_retrieve_weather)?;

        // Spellings that resolve to the same place share one entry
        let key = cache_key(
            "weather",
            &[
                &geo.city_en.to_lowercase(),
                &geo.country_code,
                language.code(),
                data_type.as_str(),
            ],
        );

        let this = self.clone();
        self.cache
            .get_or_try_insert_with(&key, WEATHER_TTL, move || async move {
                this.fetch_uncached(geo, language, data_type).await
            })
            .await
    }

    async fn fetch_uncached(
        &self,
        geo: GeoResult,
        language: Language,
        data_type: WeatherDataType,
    ) -> crate::Result<WeatherSnapshot> {
        let placeholder = language.placeholder();

        let mut reported = None;
        let mut current = None;
        if data_type.includes_current() {
            let mut data: weatherapi::CurrentResponse = self.call("current.json", &geo, language, None).await?;
            let Some(raw) = data.conditions()? else {
                return Err(NexusError::IncompleteWeatherData {
                    message: format!("no current conditions for {}", geo.city_en),
                });
            };
            current = Some(raw.normalize(data.location.as_ref(), placeholder));
            reported = data.location.map(|l| l.place_names(placeholder));
        }

        let mut forecast = Vec::new();
        if data_type.includes_forecast() {
            let data: weatherapi::ForecastResponse = self
                .call("forecast.json", &geo, language, Some(FORECAST_DAYS))
                .await?;
            if reported.is_none() {
                reported = data.location.map(|l| l.place_names(placeholder));
            }
            forecast = data
                .forecast
                .map(|f| f.forecastday)
                .unwrap_or_default()
                .into_iter()
                .take(FORECAST_DAYS)
                .filter_map(|day| day.normalize(language))
                .collect();
        }

        let display = self.translator.place_names(&geo, language).await;
        debug!(
            city = %geo.city_en,
            has_current = current.is_some(),
            forecast_days = forecast.len(),
            "Built weather snapshot"
        );

        Ok(WeatherSnapshot {
            language,
            data_type,
            placeholder: placeholder.to_string(),
            geo,
            display,
            reported,
            current,
            forecast,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        geo: &GeoResult,
        language: Language,
        days: Option<usize>,
    ) -> crate::Result<T> {
        let mut url = format!(
            "{}/{endpoint}?key={}&q={}&lang={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&geo.coordinates_query()),
            language.code()
        );
        if let Some(days) = days {
            url.push_str(&format!("&days={days}"));
        }
        self.client
            .get_json(&status_map::WEATHER, &url)
            .await
            .map_err(NexusError::unable_to_retrieve_weather)
    }
}

/// Raw weatherapi.com structures and their normalization
mod weatherapi {
    use super::{kph_to_mps, mb_to_mmhg, rounded};
    use crate::locale::{DayLabel, Language};
    use crate::models::{Astro, Condition, CurrentConditions, ForecastDay, HourlyEntry, PlaceNames};
    use crate::error::{ErrorKind, NexusError, Provider};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::Deserialize;
    use serde_json::{Map, Value};
    use tracing::warn;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub location: Option<Location>,
        pub current: Option<Map<String, Value>>,
    }

    impl CurrentResponse {
        /// Takes the `current` section; an absent, null or empty one is `None`.
        pub fn conditions(&mut self) -> crate::Result<Option<Current>> {
            match self.current.take() {
                Some(fields) if !fields.is_empty() => serde_json::from_value(Value::Object(fields))
                    .map(Some)
                    .map_err(|e| {
                        NexusError::unable_to_retrieve_weather(NexusError::api(
                            Provider::Weather,
                            ErrorKind::InvalidResponse,
                            None,
                            format!("malformed current section: {e}"),
                        ))
                    }),
                _ => Ok(None),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub location: Option<Location>,
        pub forecast: Option<Forecast>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Location {
        pub name: Option<String>,
        pub region: Option<String>,
        pub country: Option<String>,
        pub tz_id: Option<String>,
        pub localtime: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct RawCondition {
        pub text: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub temp_c: Option<f64>,
        pub temp_f: Option<f64>,
        pub feelslike_c: Option<f64>,
        pub feelslike_f: Option<f64>,
        pub dewpoint_c: Option<f64>,
        pub dewpoint_f: Option<f64>,
        pub condition: Option<RawCondition>,
        pub humidity: Option<f64>,
        pub wind_kph: Option<f64>,
        pub wind_mph: Option<f64>,
        pub wind_dir: Option<String>,
        pub pressure_mb: Option<f64>,
        pub pressure_in: Option<f64>,
        pub vis_km: Option<f64>,
        pub vis_miles: Option<f64>,
        pub uv: Option<f64>,
        pub last_updated: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Forecast {
        #[serde(default)]
        pub forecastday: Vec<RawForecastDay>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RawForecastDay {
        pub date: String,
        #[serde(default)]
        pub day: Day,
        pub astro: Option<RawAstro>,
        #[serde(default)]
        pub hour: Vec<RawHour>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Day {
        pub maxtemp_c: Option<f64>,
        pub maxtemp_f: Option<f64>,
        pub mintemp_c: Option<f64>,
        pub mintemp_f: Option<f64>,
        pub condition: Option<RawCondition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RawAstro {
        pub sunrise: Option<String>,
        pub sunset: Option<String>,
        pub moon_phase: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RawHour {
        pub time: String,
        pub temp_c: Option<f64>,
        pub temp_f: Option<f64>,
        pub wind_kph: Option<f64>,
        pub pressure_mb: Option<f64>,
        pub condition: Option<RawCondition>,
    }

    fn text_or(value: Option<&String>, placeholder: &str) -> String {
        value
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(placeholder)
            .to_string()
    }

    impl Location {
        pub fn place_names(self, placeholder: &str) -> PlaceNames {
            PlaceNames {
                city: text_or(self.name.as_ref(), placeholder),
                region: text_or(self.region.as_ref(), placeholder),
                country: text_or(self.country.as_ref(), placeholder),
            }
        }
    }

    impl RawCondition {
        fn normalize(self, placeholder: &str) -> Condition {
            let icon_url = match self.icon.as_deref().map(str::trim) {
                Some(icon) if icon.starts_with("//") => format!("http:{icon}"),
                Some(icon) => icon.to_string(),
                None => String::new(),
            };
            Condition {
                text: text_or(self.text.as_ref(), placeholder),
                icon_url,
            }
        }
    }

    impl Current {
        pub fn normalize(self, location: Option<&Location>, placeholder: &str) -> CurrentConditions {
            CurrentConditions {
                temperature_c: rounded(self.temp_c),
                temperature_f: rounded(self.temp_f),
                feelslike_c: rounded(self.feelslike_c),
                feelslike_f: rounded(self.feelslike_f),
                dewpoint_c: rounded(self.dewpoint_c),
                dewpoint_f: rounded(self.dewpoint_f),
                condition: self.condition.unwrap_or_default().normalize(placeholder),
                humidity: rounded(self.humidity),
                wind_kph: rounded(self.wind_kph),
                wind_mph: rounded(self.wind_mph),
                wind_mps: rounded(self.wind_kph.map(kph_to_mps)),
                wind_dir: text_or(self.wind_dir.as_ref(), placeholder),
                pressure_mb: rounded(self.pressure_mb),
                pressure_in: rounded(self.pressure_in),
                pressure_mm: rounded(self.pressure_mb.map(mb_to_mmhg)),
                visibility_km: rounded(self.vis_km),
                visibility_miles: rounded(self.vis_miles),
                uv_index: rounded(self.uv),
                update_time: text_or(self.last_updated.as_ref(), placeholder),
                localtime: text_or(location.and_then(|l| l.localtime.as_ref()), placeholder),
                tz_id: location
                    .and_then(|l| l.tz_id.clone())
                    .filter(|tz| !tz.trim().is_empty())
                    .unwrap_or_else(|| "UTC".to_string()),
            }
        }
    }

    impl RawHour {
        fn normalize(self, placeholder: &str) -> Option<HourlyEntry> {
            let time = match NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%d %H:%M") {
                Ok(time) => time,
                Err(e) => {
                    warn!(time = %self.time, "Skipping hour with unparseable time: {e}");
                    return None;
                }
            };
            Some(HourlyEntry {
                time,
                temp_c: rounded(self.temp_c),
                temp_f: rounded(self.temp_f),
                wind_kph: rounded(self.wind_kph),
                wind_mps: rounded(self.wind_kph.map(kph_to_mps)),
                pressure_mb: rounded(self.pressure_mb),
                pressure_mm: rounded(self.pressure_mb.map(mb_to_mmhg)),
                condition: self.condition.unwrap_or_default().normalize(placeholder),
            })
        }
    }

    impl RawForecastDay {
        pub fn normalize(self, language: Language) -> Option<ForecastDay> {
            let placeholder = language.placeholder();
            let date = match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    warn!(date = %self.date, "Skipping forecast day with unparseable date: {e}");
                    return None;
                }
            };

            let (sunrise, sunset, moon_phase) = match self.astro {
                Some(a) => (a.sunrise, a.sunset, a.moon_phase),
                None => (None, None, None),
            };
            let moon_phase_display = moon_phase
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map_or_else(|| placeholder.to_string(), |p| language.moon_phase(p));

            let mut hours: Vec<HourlyEntry> = self
                .hour
                .into_iter()
                .filter_map(|h| h.normalize(placeholder))
                .collect();
            hours.sort_by_key(|h| h.time);

            Some(ForecastDay {
                date,
                label: DayLabel::new(date, language),
                max_temp_c: rounded(self.day.maxtemp_c),
                max_temp_f: rounded(self.day.maxtemp_f),
                min_temp_c: rounded(self.day.mintemp_c),
                min_temp_f: rounded(self.day.mintemp_f),
                condition: self.day.condition.unwrap_or_default().normalize(placeholder),
                astro: Astro {
                    sunrise: text_or(sunrise.as_ref(), placeholder),
                    sunset: text_or(sunset.as_ref(), placeholder),
                    moon_phase: text_or(moon_phase.as_ref(), placeholder),
                    moon_phase_display,
                },
                hours,
            })
        }
    }
}

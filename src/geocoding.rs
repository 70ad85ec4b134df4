//! Geocoding resolver
//!
//! Resolves free-text city input into a [`GeoResult`] through the OpenCage
//! forward-geocoding API. Results are cached for an hour per lowercased input
//! and country hint.

use crate::cache::{Cache, Ttl, cache_key};
use crate::error::{ErrorKind, NexusError, Provider};
use crate::http::ApiClient;
use crate::models::GeoResult;
use crate::status_map;
use tracing::{debug, info, instrument};

const GEOCODE_TTL: Ttl = Ttl::Seconds(3600);

/// Region reported for Kyiv regardless of what upstream says
const KYIV_REGION: &str = "Kyiv Oblast";

#[derive(Clone)]
pub struct GeocodingResolver {
    client: ApiClient,
    cache: Cache,
    base_url: String,
    api_key: String,
}

impl GeocodingResolver {
    pub fn new(client: ApiClient, cache: Cache, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Resolve a city name, optionally narrowed by a country hint.
    ///
    /// Fails with [`NexusError::CityNotFound`] when upstream has no match and
    /// with [`NexusError::GeocodingService`] for any other upstream failure.
    #[instrument(skip(self))]
    pub async fn resolve(&self, city: &str, country_hint: Option<&str>) -> crate::Result<GeoResult> {
        let city = city.trim();
        if city.is_empty() {
            return Err(NexusError::CityNotFound {
                city: city.to_string(),
            });
        }

        let hint = country_hint.map(str::trim).filter(|h| !h.is_empty());
        let key = cache_key("geocode", &[&city.to_lowercase(), hint.unwrap_or_default()]);

        let this = self.clone();
        let city = city.to_string();
        let hint = hint.map(str::to_string);
        self.cache
            .get_or_try_insert_with(&key, GEOCODE_TTL, move || async move {
                this.lookup(&city, hint.as_deref()).await
            })
            .await
    }

    async fn lookup(&self, city: &str, hint: Option<&str>) -> crate::Result<GeoResult> {
        let query = match hint {
            Some(hint) => format!("{city}, {hint}"),
            None => city.to_string(),
        };
        let url = format!(
            "{}/json?q={}&key={}&language=en",
            self.base_url,
            urlencoding::encode(&query),
            urlencoding::encode(&self.api_key)
        );

        let response: opencage::Response = self
            .client
            .get_json(&status_map::GEOCODING, &url)
            .await
            .map_err(NexusError::geocoding_service)?;

        let Some(first) = response.results.into_iter().next() else {
            info!(city, "No geocoding results");
            return Err(NexusError::CityNotFound {
                city: city.to_string(),
            });
        };

        let geo = first.into_geo_result(city)?;
        debug!(
            "Resolved '{}' to {} ({}) at ({:.4}, {:.4})",
            city, geo.city_en, geo.country_code, geo.lat, geo.lon
        );
        Ok(geo)
    }
}

/// Raw OpenCage response structures
mod opencage {
    use super::{ErrorKind, GeoResult, KYIV_REGION, NexusError, Provider};
    use crate::locale::Language;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Response {
        #[serde(default)]
        pub results: Vec<GeocodeResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        #[serde(default)]
        pub components: Components,
        pub geometry: Option<Geometry>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Components {
        pub city: Option<String>,
        pub town: Option<String>,
        pub village: Option<String>,
        pub state_district: Option<String>,
        pub country_code: Option<String>,
        pub country: Option<String>,
        pub state: Option<String>,
        pub province: Option<String>,
        pub region: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub lat: f64,
        pub lng: f64,
    }

    fn first_present(candidates: [&Option<String>; 4]) -> Option<String> {
        candidates
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    impl GeocodeResult {
        pub fn into_geo_result(self, input: &str) -> crate::Result<GeoResult> {
            let Some(geometry) = self.geometry else {
                return Err(NexusError::geocoding_service(NexusError::api(
                    Provider::Geocoding,
                    ErrorKind::InvalidResponse,
                    None,
                    "result has no geometry",
                )));
            };
            let c = self.components;

            let city_en = first_present([&c.city, &c.town, &c.village, &c.state_district])
                .unwrap_or_else(|| input.to_string());
            let country_code = c.country_code.unwrap_or_default().trim().to_uppercase();
            let country_name = c
                .country
                .filter(|name| !name.trim().is_empty())
                .or_else(|| Language::En.country_name(&country_code).map(str::to_string))
                .unwrap_or_else(|| country_code.clone());

            let region = if city_en.trim().eq_ignore_ascii_case("kyiv") {
                Some(KYIV_REGION.to_string())
            } else {
                first_present([&c.state, &c.province, &c.region, &None])
            };

            Ok(GeoResult {
                city_en,
                country_code,
                country_name,
                region,
                lat: geometry.lat,
                lon: geometry.lng,
            })
        }
    }
}

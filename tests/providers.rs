//! Integration tests for the provider fetchers against mocked upstreams

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use nexussuite::cache::MemoryStore;
use nexussuite::config::HttpConfig;
use nexussuite::{
    Aggregator, ApiClient, Cache, DashboardRequest, ErrorKind, ExchangeRateFetcher, GeocodingResolver, Language,
    ManualClock, NameTranslator, NewsCategory, NewsFetcher, NexusConfig, NexusError, TranslationKind, Ttl,
    WeatherDataType, WeatherFetcher,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    clock: Arc<ManualClock>,
    cache: Cache,
    client: ApiClient,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let cache = Cache::new(Arc::new(MemoryStore::new()), clock.clone());
    let client = ApiClient::new(&HttpConfig::default()).unwrap();
    Harness {
        server,
        clock,
        cache,
        client,
    }
}

impl Harness {
    fn geocoder(&self) -> GeocodingResolver {
        GeocodingResolver::new(self.client.clone(), self.cache.clone(), self.server.uri(), "geo-key")
    }

    fn translator(&self) -> NameTranslator {
        NameTranslator::new(self.client.clone(), self.cache.clone(), self.server.uri(), Ttl::hours(720))
    }

    fn weather(&self) -> WeatherFetcher {
        WeatherFetcher::new(
            self.client.clone(),
            self.cache.clone(),
            self.geocoder(),
            self.translator(),
            self.server.uri(),
            "weather-key",
        )
    }

    fn exchange(&self) -> ExchangeRateFetcher {
        ExchangeRateFetcher::new(self.client.clone(), self.cache.clone(), self.server.uri())
    }

    fn news(&self) -> NewsFetcher {
        NewsFetcher::new(self.client.clone(), self.cache.clone(), self.server.uri(), "news-key")
    }
}

fn geocode_body(city: &str, state: &str) -> Value {
    json!({
        "results": [{
            "components": {
                "city": city,
                "country_code": "ua",
                "country": "Ukraine",
                "state": state
            },
            "geometry": {"lat": 49.84, "lng": 24.03}
        }],
        "status": {"code": 200, "message": "OK"}
    })
}

async fn mount_geocode(server: &MockServer, query: &str, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/json"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn current_body() -> Value {
    json!({
        "location": {"name": "Lviv", "region": "L'vivs'ka Oblast'", "country": "Ukraine",
                     "tz_id": "Europe/Kyiv", "localtime": "2024-07-06 15:04"},
        "current": {
            "last_updated": "2024-07-06 15:00",
            "temp_c": 24.3, "temp_f": 75.7,
            "condition": {"text": "Sunny", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png"},
            "wind_kph": 36.0, "wind_mph": 22.4, "wind_dir": "W",
            "pressure_mb": 1000.0, "pressure_in": 29.53,
            "humidity": 41, "feelslike_c": 25.1, "vis_km": 10.0, "vis_miles": 6.0, "uv": 6.0
        }
    })
}

fn forecast_body() -> Value {
    let day = |date: &str| {
        json!({
            "date": date,
            "day": {"maxtemp_c": 27.0, "mintemp_c": 14.0, "condition": {"text": "Sunny", "icon": "//x/113.png"}},
            "astro": {"sunrise": "05:10 AM", "sunset": "09:15 PM", "moon_phase": "Full Moon"},
            "hour": [{"time": format!("{date} 00:00"), "temp_c": 15.0, "wind_kph": 7.2, "pressure_mb": 1012.0}]
        })
    };
    json!({
        "location": {"name": "Lviv", "region": "L'vivs'ka Oblast'", "country": "Ukraine"},
        "forecast": {"forecastday": [day("2024-07-06"), day("2024-07-07"), day("2024-07-08"), day("2024-07-09")]}
    })
}

async fn mount_weather(server: &MockServer, endpoint: &str, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{endpoint}")))
        .and(query_param("key", "weather-key"))
        .and(query_param("q", "49.84,24.03"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_langlink(server: &MockServer, title: &str, translated: Option<&str>) {
    let links = match translated {
        Some(name) => json!([{"lang": "uk", "*": name}]),
        None => json!([]),
    };
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("titles", title))
        .and(query_param("lllang", "uk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": "",
            "query": {"pages": {"101": {"pageid": 101, "title": title, "langlinks": links}}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_geocoding_cache_hit_skips_network() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;

    let geocoder = h.geocoder();
    let first = geocoder.resolve("Lviv", None).await.unwrap();
    let second = geocoder.resolve("  LVIV ", None).await;

    assert_eq!(first.city_en, "Lviv");
    assert_eq!(first.country_code, "UA");
    assert_eq!(first.region.as_deref(), Some("Lviv Oblast"));
    // Second lookup differs only in case and whitespace: served from cache
    assert_eq!(second.unwrap(), first);
}

#[tokio::test]
async fn test_geocoding_refetches_after_ttl() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 2).await;

    let geocoder = h.geocoder();
    geocoder.resolve("Lviv", None).await.unwrap();
    h.clock.advance(Duration::from_secs(3599));
    geocoder.resolve("Lviv", None).await.unwrap();
    h.clock.advance(Duration::from_secs(2));
    geocoder.resolve("Lviv", None).await.unwrap();
}

#[tokio::test]
async fn test_geocoding_country_hint_is_part_of_query() {
    let h = harness().await;
    mount_geocode(&h.server, "Paris, FR", geocode_body("Paris", "Ile-de-France"), 1).await;

    let geo = h.geocoder().resolve("Paris", Some("FR")).await.unwrap();
    assert_eq!(geo.city_en, "Paris");
}

#[tokio::test]
async fn test_kyiv_region_is_overridden() {
    let h = harness().await;
    mount_geocode(&h.server, "Kyiv", geocode_body("Kyiv", "Kyiv City"), 1).await;

    let geo = h.geocoder().resolve("Kyiv", None).await.unwrap();
    assert_eq!(geo.region.as_deref(), Some("Kyiv Oblast"));
}

#[tokio::test]
async fn test_city_not_found_is_not_cached() {
    let h = harness().await;
    mount_geocode(&h.server, "Atlantis", json!({"results": []}), 2).await;

    let geocoder = h.geocoder();
    for _ in 0..2 {
        let err = geocoder.resolve("Atlantis", None).await.unwrap_err();
        assert!(matches!(err, NexusError::CityNotFound { ref city } if city == "Atlantis"));
    }
}

#[tokio::test]
async fn test_geocoding_upstream_failure_is_service_error() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"status": {"code": 401, "message": "invalid API key"}})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.geocoder().resolve("Lviv", None).await.unwrap_err();
    assert!(matches!(err, NexusError::GeocodingService { .. }));
    assert_eq!(err.kind(), Some(ErrorKind::InvalidApiKey));
}

#[tokio::test]
async fn test_weather_snapshot_is_normalized_and_cached() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", current_body(), 1).await;
    mount_weather(&h.server, "forecast.json", forecast_body(), 1).await;

    let fetcher = h.weather();
    let snapshot = fetcher.fetch("Lviv", Language::En, WeatherDataType::Both).await.unwrap();
    let again = fetcher.fetch("lviv", Language::En, WeatherDataType::Both).await.unwrap();
    assert_eq!(snapshot, again);

    let current = snapshot.current.as_ref().unwrap();
    assert_eq!(current.wind_mps, Some(10));
    assert_eq!(current.pressure_mm, Some(750));
    assert_eq!(current.temperature_c, Some(24));
    assert_eq!(snapshot.show(current.dewpoint_c), "N/A");
    assert_eq!(current.condition.icon_url, "http://cdn.weatherapi.com/weather/64x64/day/113.png");

    assert_eq!(snapshot.forecast.len(), 3);
    assert_eq!(snapshot.forecast[0].label.weekday, "Saturday");
    assert_eq!(snapshot.forecast[2].hours[0].wind_mps, Some(2));

    assert_eq!(snapshot.display.city, "Lviv");
    assert_eq!(snapshot.display.region, "Lviv Oblast");
    let reported = snapshot.reported.as_ref().unwrap();
    assert_eq!(reported.region, "L'vivs'ka Oblast'");
}

#[tokio::test]
async fn test_weather_current_only_skips_forecast_call() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", current_body(), 1).await;
    mount_weather(&h.server, "forecast.json", forecast_body(), 0).await;

    let snapshot = h
        .weather()
        .fetch("Lviv", Language::En, WeatherDataType::Current)
        .await
        .unwrap();
    assert!(snapshot.current.is_some());
    assert!(snapshot.forecast.is_empty());
}

#[tokio::test]
async fn test_weather_in_ukrainian_translates_place_names() {
    let h = harness().await;
    mount_geocode(&h.server, "Львів", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", current_body(), 1).await;
    mount_weather(&h.server, "forecast.json", forecast_body(), 1).await;
    mount_langlink(&h.server, "Lviv", Some("Львів")).await;
    mount_langlink(&h.server, "Lviv Oblast", Some("Львівська область")).await;

    let snapshot = h
        .weather()
        .fetch("Львів", Language::Uk, WeatherDataType::Both)
        .await
        .unwrap();

    assert_eq!(snapshot.placeholder, "н/д");
    assert_eq!(snapshot.display.city, "Львів");
    assert_eq!(snapshot.display.region, "Львівська область");
    assert_eq!(snapshot.display.country, "Україна");
    assert_eq!(snapshot.forecast[0].label.month, "липня");
}

#[tokio::test]
async fn test_weather_invalid_key_is_wrapped() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"code": 2006, "message": "API key provided is invalid"}})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h
        .weather()
        .fetch("Lviv", Language::En, WeatherDataType::Current)
        .await
        .unwrap_err();
    assert!(matches!(err, NexusError::UnableToRetrieveWeather { .. }));
    assert_eq!(err.kind(), Some(ErrorKind::InvalidApiKey));
}

#[tokio::test]
async fn test_weather_unknown_city_is_wrapped() {
    let h = harness().await;
    mount_geocode(&h.server, "Atlantis", json!({"results": []}), 1).await;

    let err = h
        .weather()
        .fetch("Atlantis", Language::En, WeatherDataType::Both)
        .await
        .unwrap_err();
    assert!(matches!(err, NexusError::UnableToRetrieveWeather { .. }));
    assert_eq!(err.user_message(Language::En), "City 'Atlantis' not found.");
}

#[tokio::test]
async fn test_weather_without_current_section_is_incomplete() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", json!({"location": {"name": "Lviv"}}), 1).await;

    let err = h
        .weather()
        .fetch("Lviv", Language::En, WeatherDataType::Both)
        .await
        .unwrap_err();
    assert!(matches!(err, NexusError::IncompleteWeatherData { .. }));
    assert_eq!(err.kind(), Some(ErrorKind::IncompleteData));
}

#[tokio::test]
async fn test_weather_with_empty_current_section_is_incomplete() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", json!({"location": {"name": "Lviv"}, "current": {}}), 1).await;

    let err = h
        .weather()
        .fetch("Lviv", Language::En, WeatherDataType::Current)
        .await
        .unwrap_err();
    assert!(matches!(err, NexusError::IncompleteWeatherData { .. }));
}

#[tokio::test]
async fn test_weather_spellings_of_one_city_share_a_snapshot() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_geocode(&h.server, "Lviv, Ukraine", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", current_body(), 1).await;

    let fetcher = h.weather();
    let first = fetcher.fetch("Lviv", Language::En, WeatherDataType::Current).await.unwrap();
    let second = fetcher
        .fetch("Lviv, Ukraine", Language::En, WeatherDataType::Current)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_weather_malformed_body_is_invalid_response() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&h.server)
        .await;

    let err = h
        .weather()
        .fetch("Lviv", Language::En, WeatherDataType::Current)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidResponse));
}

fn rates_body() -> Value {
    json!({
        "date": "06.07.2024",
        "bank": "PB",
        "baseCurrency": 980,
        "baseCurrencyLit": "UAH",
        "exchangeRate": [
            {"baseCurrency": "UAH", "saleRateNB": 1.0, "purchaseRateNB": 1.0},
            {"baseCurrency": "UAH", "currency": "CZK", "saleRateNB": 1.74, "purchaseRateNB": 1.74,
             "saleRate": 1.8, "purchaseRate": 1.7},
            {"baseCurrency": "UAH", "currency": "UAH", "saleRateNB": 1.0, "purchaseRateNB": 1.0},
            {"baseCurrency": "UAH", "currency": "USD", "saleRateNB": 40.5, "purchaseRateNB": 40.5,
             "saleRate": 41.0, "purchaseRate": 40.4},
            {"baseCurrency": "UAH", "currency": "GBP", "saleRateNB": 51.8, "purchaseRateNB": 51.8,
             "saleRate": 52.5, "purchaseRate": 51.0},
            {"baseCurrency": "UAH", "currency": "EUR", "saleRateNB": 43.8, "purchaseRateNB": 43.8,
             "saleRate": 44.3, "purchaseRate": 43.5}
        ]
    })
}

#[tokio::test]
async fn test_exchange_rates_sorted_filtered_and_shared() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/exchange_rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .expect(1)
        .mount(&h.server)
        .await;

    let fetcher = h.exchange();
    let all = fetcher.fetch_rates(None).await.unwrap();
    let order: Vec<_> = all.iter().map(|r| r.currency.as_str()).collect();
    assert_eq!(order, ["USD", "EUR", "GBP", "CZK"]);

    let wanted: HashSet<String> = ["EUR".to_string(), "CZK".to_string()].into();
    let filtered = fetcher.fetch_rates(Some(&wanted)).await.unwrap();
    let order: Vec<_> = filtered.iter().map(|r| r.currency.as_str()).collect();
    assert_eq!(order, ["EUR", "CZK"]);

    assert_eq!(nexussuite::convert(100.0, "USD", "UAH", &all), Ok(4040.0));
}

#[tokio::test]
async fn test_exchange_rates_expire_after_ten_minutes() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/exchange_rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .expect(2)
        .mount(&h.server)
        .await;

    let fetcher = h.exchange();
    fetcher.fetch_rates(None).await.unwrap();
    h.clock.advance(Duration::from_secs(601));
    fetcher.fetch_rates(None).await.unwrap();
}

#[tokio::test]
async fn test_empty_rate_list_is_not_cached() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/exchange_rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "06.07.2024",
            "bank": "PB",
            "exchangeRate": []
        })))
        .expect(2)
        .mount(&h.server)
        .await;

    let fetcher = h.exchange();
    assert!(fetcher.fetch_rates(None).await.unwrap().is_empty());
    assert!(fetcher.fetch_rates(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_exchange_server_error() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/exchange_rates"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})))
        .mount(&h.server)
        .await;

    let err = h.exchange().fetch_rates(None).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ServerError));
}

#[tokio::test]
async fn test_news_titles_split_and_cached() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("country", "us"))
        .and(query_param("category", "science"))
        .and(query_param("apiKey", "news-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {"source": {"id": null, "name": "Other"}, "title": "Some Headline - Reuters",
                 "url": "https://example.com/1", "publishedAt": "2024-07-06T15:04:05Z"},
                {"source": {"id": null, "name": "NASA"}, "title": "Plain headline",
                 "url": "https://example.com/2", "publishedAt": "2024-07-06T12:00:00Z"},
                {"source": {"id": null, "name": "Ghost"}, "title": null, "url": null, "publishedAt": null}
            ]
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let fetcher = h.news();
    let articles = fetcher.fetch(NewsCategory::Science, "US").await.unwrap();
    let cached = fetcher.fetch(NewsCategory::Science, "us").await.unwrap();
    assert_eq!(articles, cached);

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Some Headline");
    assert_eq!(articles[0].source, "Reuters");
    assert_eq!(articles[1].title, "Plain headline");
    assert_eq!(articles[1].source, "NASA");
    assert!(articles.iter().all(|a| !a.title.is_empty() && !a.url.is_empty()));
}

#[tokio::test]
async fn test_empty_headlines_are_not_cached() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 0,
            "articles": []
        })))
        .expect(2)
        .mount(&h.server)
        .await;

    let fetcher = h.news();
    assert!(fetcher.fetch(NewsCategory::General, "ua").await.unwrap().is_empty());
    assert!(fetcher.fetch(NewsCategory::General, "ua").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_news_rate_limit() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "status": "error",
            "code": "rateLimited",
            "message": "You have made too many requests recently."
        })))
        .expect(2)
        .mount(&h.server)
        .await;

    let fetcher = h.news();
    for _ in 0..2 {
        let err = fetcher.fetch(NewsCategory::General, "ua").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RateLimit));
    }
}

#[tokio::test]
async fn test_translation_falls_back_to_alternatives() {
    let h = harness().await;
    mount_langlink(&h.server, "Springfield", None).await;
    mount_langlink(&h.server, "Springfield, Illinois", Some("Спрингфілд (Іллінойс)")).await;

    let translated = h
        .translator()
        .translate(
            "Springfield",
            &["Springfield, Illinois".to_string()],
            TranslationKind::City,
            Language::Uk,
        )
        .await;
    assert_eq!(translated, "Спрингфілд");
}

#[tokio::test]
async fn test_translation_exhaustion_returns_original() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": {"pages": {"-1": {"missing": ""}}}})))
        .expect(4)
        .mount(&h.server)
        .await;

    let translator = h.translator();
    let alternatives = ["Nowhere Oblast".to_string()];
    for _ in 0..2 {
        let name = translator
            .translate("Nowhere", &alternatives, TranslationKind::Region, Language::Uk)
            .await;
        assert_eq!(name, "Nowhere");
    }
}

#[tokio::test]
async fn test_translation_success_is_cached() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("titles", "Odesa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": {"7": {"langlinks": [{"lang": "uk", "*": "Одеса"}]}}}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let translator = h.translator();
    for _ in 0..3 {
        let name = translator
            .translate("Odesa", &[], TranslationKind::City, Language::Uk)
            .await;
        assert_eq!(name, "Одеса");
    }
    assert_eq!(
        translator.translate("Odesa", &[], TranslationKind::City, Language::En).await,
        "Odesa"
    );
}

#[tokio::test]
async fn test_dashboard_sections_fail_independently() {
    let h = harness().await;
    mount_geocode(&h.server, "Lviv", geocode_body("Lviv", "Lviv Oblast"), 1).await;
    mount_weather(&h.server, "current.json", current_body(), 1).await;
    mount_weather(&h.server, "forecast.json", forecast_body(), 1).await;
    Mock::given(method("GET"))
        .and(path("/exchange_rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"status": "error", "message": "boom"})))
        .mount(&h.server)
        .await;

    let mut config = NexusConfig::default();
    for provider in [
        &mut config.geocoding,
        &mut config.weather,
        &mut config.news,
        &mut config.exchange,
        &mut config.translation,
    ] {
        provider.base_url = h.server.uri();
    }
    config.geocoding.api_key = Some("geo-key".to_string());
    config.weather.api_key = Some("weather-key".to_string());
    config.apply_defaults();

    let aggregator = Aggregator::from_config(&config, h.cache.clone()).unwrap();
    let dashboard = aggregator
        .dashboard(&DashboardRequest {
            city: "Lviv".to_string(),
            language: Language::En,
            data_type: WeatherDataType::Both,
            category: NewsCategory::General,
            country: "ua".to_string(),
            currencies: Some(["USD".to_string()].into()),
        })
        .await;

    assert!(dashboard.weather.data.is_some());
    assert_eq!(dashboard.rates.data.as_ref().map(Vec::len), Some(1));
    assert!(dashboard.news.data.is_none());
    assert_eq!(
        dashboard.news.error.as_deref(),
        Some("The service is experiencing problems.")
    );
}

//! JSON endpoints over the [`Aggregator`]

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregator::{Aggregator, Dashboard, DashboardRequest};
use crate::error::{ErrorKind, NexusError};
use crate::exchange;
use crate::locale::Language;
use crate::models::{ConversionError, ExchangeRate, NewsArticle, NewsCategory, WeatherDataType, WeatherSnapshot};

pub type AppState = Arc<Aggregator>;

const DEFAULT_CITY: &str = "Kyiv";
const DEFAULT_COUNTRY: &str = "ua";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/news", get(get_news))
        .route("/rates", get(get_rates))
        .route("/convert", get(get_conversion))
        .route("/dashboard", get(get_dashboard))
        .with_state(state)
}

/// Error body `{ "error": <localized message> }` with a matching status
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn from_nexus(err: &NexusError, language: Language) -> Self {
        tracing::warn!("Request failed: {err}");
        Self {
            status: status_for(err),
            message: err.user_message(language),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn status_for(err: &NexusError) -> StatusCode {
    match err {
        NexusError::CityNotFound { .. } => StatusCode::NOT_FOUND,
        NexusError::Cache { .. } | NexusError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => match err.kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::RateLimit | ErrorKind::QuotaExceeded) => StatusCode::TOO_MANY_REQUESTS,
            Some(ErrorKind::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

fn language_of(lang: Option<&str>) -> Language {
    lang.map(Language::from_code).unwrap_or_default()
}

fn parse_category(value: Option<&str>) -> Result<NewsCategory, ApiError> {
    match value {
        None => Ok(NewsCategory::default()),
        Some(raw) => NewsCategory::parse(raw).ok_or_else(|| ApiError::bad_request(format!("Unknown category '{raw}'"))),
    }
}

fn parse_data_type(value: Option<&str>) -> Result<WeatherDataType, ApiError> {
    match value {
        None => Ok(WeatherDataType::default()),
        Some(raw) => WeatherDataType::parse(raw).ok_or_else(|| ApiError::bad_request(format!("Unknown data type '{raw}'"))),
    }
}

/// Comma-separated currency codes; an empty list means "all"
fn parse_currencies(value: Option<&str>) -> Option<HashSet<String>> {
    let set: HashSet<String> = value?
        .split(',')
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

/// A query value that must be present and non-blank
fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing '{name}' parameter")))
}

fn parse_amount(value: Option<&str>, language: Language) -> Result<f64, ApiError> {
    required(value, "amount")?
        .parse::<f64>()
        .map_err(|_| ApiError::bad_request(ConversionError::InvalidAmount.user_message(language).to_string()))
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lang: Option<String>,
    pub data_type: Option<String>,
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let language = language_of(params.lang.as_deref());
    let data_type = parse_data_type(params.data_type.as_deref())?;
    let city = params.city.as_deref().unwrap_or(DEFAULT_CITY);

    state
        .weather
        .fetch(city, language, data_type)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_nexus(&e, language))
}

#[derive(Debug, Deserialize)]
pub struct NewsParams {
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
}

async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<Vec<NewsArticle>>, ApiError> {
    let language = language_of(params.lang.as_deref());
    let category = parse_category(params.category.as_deref())?;
    let country = params.country.as_deref().unwrap_or(DEFAULT_COUNTRY);

    state
        .news
        .fetch(category, country)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_nexus(&e, language))
}

#[derive(Debug, Deserialize)]
pub struct RatesParams {
    pub currencies: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiRate {
    #[serde(flatten)]
    pub rate: ExchangeRate,
    pub name: Option<&'static str>,
}

async fn get_rates(
    State(state): State<AppState>,
    Query(params): Query<RatesParams>,
) -> Result<Json<Vec<ApiRate>>, ApiError> {
    let language = language_of(params.lang.as_deref());
    let filter = parse_currencies(params.currencies.as_deref());

    let rates = state
        .exchange
        .fetch_rates(filter.as_ref())
        .await
        .map_err(|e| ApiError::from_nexus(&e, language))?;

    Ok(Json(
        rates
            .into_iter()
            .map(|rate| ApiRate {
                name: language.currency_name(&rate.currency),
                rate,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    pub amount: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: Option<f64>,
    pub error: Option<String>,
}

/// Conversion failures are part of a successful response
async fn get_conversion(
    State(state): State<AppState>,
    Query(params): Query<ConvertParams>,
) -> Result<Json<ConversionResponse>, ApiError> {
    let language = language_of(params.lang.as_deref());
    let amount = parse_amount(params.amount.as_deref(), language)?;
    let from = required(params.from.as_deref(), "from")?.to_uppercase();
    let to = required(params.to.as_deref(), "to")?.to_uppercase();

    let rates = state
        .exchange
        .fetch_rates(None)
        .await
        .map_err(|e| ApiError::from_nexus(&e, language))?;

    let (converted, error) = match exchange::convert(amount, &from, &to, &rates) {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(e.user_message(language).to_string())),
    };

    Ok(Json(ConversionResponse {
        amount,
        from,
        to,
        converted,
        error,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub city: Option<String>,
    pub lang: Option<String>,
    pub data_type: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub currencies: Option<String>,
}

async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError> {
    let request = DashboardRequest {
        city: params.city.unwrap_or_else(|| DEFAULT_CITY.to_string()),
        language: language_of(params.lang.as_deref()),
        data_type: parse_data_type(params.data_type.as_deref())?,
        category: parse_category(params.category.as_deref())?,
        country: params.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        currencies: parse_currencies(params.currencies.as_deref()),
    };
    Ok(Json(state.dashboard(&request).await))
}

//! Exchange-rate fetcher and converter
//!
//! Daily PrivatBank rates against the hryvnia, cached for ten minutes under
//! one shared key and sorted by a fixed currency priority. Filtering is done
//! after the cache so every caller shares the same entry.

use crate::cache::{Cache, Ttl};
use crate::http::ApiClient;
use crate::models::{ConversionError, ExchangeRate};
use crate::status_map;
use chrono::Local;
use std::collections::HashSet;
use tracing::{debug, instrument};

const RATES_KEY: &str = "exchange_rates";
const RATES_TTL: Ttl = Ttl::Seconds(600);

/// The hryvnia is the implicit base of every rate
pub const BASE_CURRENCY: &str = "UAH";

const CURRENCY_PRIORITY: [(&str, u32); 6] = [
    ("USD", 1),
    ("EUR", 2),
    ("GBP", 3),
    ("CHF", 4),
    ("PLN", 5),
    ("CZK", 6),
];

fn priority(currency: &str) -> u32 {
    CURRENCY_PRIORITY
        .iter()
        .find(|(code, _)| *code == currency)
        .map_or(999, |(_, rank)| *rank)
}

/// Stable sort by the display priority table, unknown currencies last
pub fn sort_by_priority(rates: &mut [ExchangeRate]) {
    rates.sort_by_key(|rate| priority(&rate.currency));
}

#[derive(Clone)]
pub struct ExchangeRateFetcher {
    client: ApiClient,
    cache: Cache,
    base_url: String,
}

impl ExchangeRateFetcher {
    pub fn new(client: ApiClient, cache: Cache, base_url: impl Into<String>) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.into(),
        }
    }

    /// Today's rates, optionally restricted to the given currency codes.
    /// An empty filter is the same as no filter.
    #[instrument(skip(self))]
    pub async fn fetch_rates(&self, filter: Option<&HashSet<String>>) -> crate::Result<Vec<ExchangeRate>> {
        let this = self.clone();
        let rates: Vec<ExchangeRate> = self
            .cache
            .get_or_try_insert_where(
                RATES_KEY,
                RATES_TTL,
                move || async move { this.fetch_uncached().await },
                |rates: &Vec<ExchangeRate>| !rates.is_empty(),
            )
            .await?;

        Ok(match filter {
            Some(wanted) if !wanted.is_empty() => rates
                .into_iter()
                .filter(|rate| wanted.contains(&rate.currency))
                .collect(),
            _ => rates,
        })
    }

    async fn fetch_uncached(&self) -> crate::Result<Vec<ExchangeRate>> {
        let today = Local::now().date_naive().format("%d.%m.%Y");
        let url = format!("{}/exchange_rates?json&date={today}", self.base_url);

        let response: privatbank::Response = self.client.get_json(&status_map::EXCHANGE, &url).await?;
        let mut rates: Vec<ExchangeRate> = response
            .exchange_rate
            .into_iter()
            .filter_map(privatbank::RawRate::into_rate)
            .filter(|rate| rate.currency != BASE_CURRENCY)
            .collect();
        sort_by_priority(&mut rates);

        debug!(count = rates.len(), "Fetched exchange rates");
        Ok(rates)
    }
}

/// Convert `amount` between two currencies through the hryvnia.
///
/// The source currency is bought at its purchase rate and the target sold at
/// its sale rate, each falling back to the other. `UAH` is 1.0 unless the list
/// says otherwise. The result is rounded to two decimals.
pub fn convert(amount: f64, from: &str, to: &str, rates: &[ExchangeRate]) -> Result<f64, ConversionError> {
    if !amount.is_finite() {
        return Err(ConversionError::InvalidAmount);
    }
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();

    let find = |code: &str| rates.iter().find(|rate| rate.currency == code);
    let base = |code: &str| (code == BASE_CURRENCY).then_some(1.0);

    let from_rate = find(&from)
        .and_then(ExchangeRate::buy_rate)
        .or_else(|| base(&from))
        .ok_or_else(|| ConversionError::RateNotFound { currency: from.clone() })?;
    let to_rate = find(&to)
        .and_then(ExchangeRate::sell_rate)
        .or_else(|| base(&to))
        .ok_or_else(|| ConversionError::RateNotFound { currency: to.clone() })?;

    if to_rate == 0.0 {
        return Err(ConversionError::DivisionByZero);
    }

    let cents = (amount * from_rate / to_rate * 100.0).round();
    if !cents.is_finite() {
        return Err(ConversionError::InvalidAmount);
    }
    Ok(cents / 100.0)
}

/// Raw PrivatBank archive structures
mod privatbank {
    use crate::models::ExchangeRate;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Response {
        #[serde(rename = "exchangeRate", default)]
        pub exchange_rate: Vec<RawRate>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawRate {
        pub currency: Option<String>,
        pub sale_rate: Option<f64>,
        pub purchase_rate: Option<f64>,
        #[serde(rename = "saleRateNB")]
        pub sale_rate_nb: Option<f64>,
        #[serde(rename = "purchaseRateNB")]
        pub purchase_rate_nb: Option<f64>,
    }

    impl RawRate {
        pub fn into_rate(self) -> Option<ExchangeRate> {
            let currency = self.currency?.trim().to_uppercase();
            if currency.is_empty() {
                return None;
            }
            Some(ExchangeRate {
                currency,
                purchase_rate: self.purchase_rate,
                sale_rate: self.sale_rate,
                purchase_rate_nb: self.purchase_rate_nb,
                sale_rate_nb: self.sale_rate_nb,
            })
        }
    }
}

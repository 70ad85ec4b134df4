//! Exchange-rate model

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locale::Language;

/// Rates of one currency against the hryvnia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// ISO 4217 code
    pub currency: String,
    /// Commercial buy rate
    pub purchase_rate: Option<f64>,
    /// Commercial sell rate
    pub sale_rate: Option<f64>,
    /// National bank reference buy rate
    pub purchase_rate_nb: Option<f64>,
    /// National bank reference sell rate
    pub sale_rate_nb: Option<f64>,
}

impl ExchangeRate {
    /// Rate used when selling this currency for hryvnia
    #[must_use]
    pub fn buy_rate(&self) -> Option<f64> {
        self.purchase_rate.or(self.sale_rate)
    }

    /// Rate used when buying this currency with hryvnia
    #[must_use]
    pub fn sell_rate(&self) -> Option<f64> {
        self.sale_rate.or(self.purchase_rate)
    }
}

/// Why a conversion produced no amount. Shown inline, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("conversion rate not found for {currency}")]
    RateNotFound { currency: String },
    #[error("conversion would divide by zero")]
    DivisionByZero,
    #[error("amount must be a finite number")]
    InvalidAmount,
}

impl ConversionError {
    #[must_use]
    pub fn user_message(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::RateNotFound { .. }, Language::En) => "Conversion rate not found.",
            (Self::RateNotFound { .. }, Language::Uk) => "Курс для конвертації не знайдено.",
            (Self::DivisionByZero, Language::En) => "Conversion error: division by zero.",
            (Self::DivisionByZero, Language::Uk) => "Помилка конвертації: ділення на нуль.",
            (Self::InvalidAmount, Language::En) => "Please enter a valid amount.",
            (Self::InvalidAmount, Language::Uk) => "Введіть коректну суму.",
        }
    }
}

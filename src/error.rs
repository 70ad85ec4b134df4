//! Error types and handling for the aggregation layer
//!
//! Every upstream integration reports failures through [`NexusError`]. The
//! fine-grained classification lives in [`ErrorKind`], which is shared by all
//! providers so the presentation layer can react to "rate limited" without
//! caring whether the news feed or the weather service said so.

use crate::locale::Language;
use std::fmt;
use thiserror::Error;

/// Upstream integration a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    News,
    Exchange,
    Geocoding,
    Weather,
    Translation,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::News => "news",
            Provider::Exchange => "exchange-rate",
            Provider::Geocoding => "geocoding",
            Provider::Weather => "weather",
            Provider::Translation => "translation",
        };
        f.write_str(name)
    }
}

/// Unified failure taxonomy across providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    MissingApiKey,
    InvalidApiKey,
    Authentication,
    QuotaExceeded,
    ApiKeyDisabled,
    Forbidden,
    InvalidEndpoint,
    NotFound,
    MethodNotAllowed,
    Timeout,
    RequestTooLong,
    UpgradeRequired,
    RateLimit,
    ServerError,
    InvalidResponse,
    IncompleteData,
    Unexpected,
}

impl ErrorKind {
    /// Whether the failure is a credentials problem of any flavour
    #[must_use]
    pub fn is_authentication(self) -> bool {
        matches!(
            self,
            ErrorKind::MissingApiKey | ErrorKind::InvalidApiKey | ErrorKind::Authentication
        )
    }

    fn message(self, language: Language) -> &'static str {
        match (self, language) {
            (ErrorKind::InvalidRequest, Language::En) => "Invalid request.",
            (ErrorKind::InvalidRequest, Language::Uk) => "Некоректний запит.",
            (ErrorKind::MissingApiKey, Language::En) => "API key is missing.",
            (ErrorKind::MissingApiKey, Language::Uk) => "Відсутній ключ API.",
            (ErrorKind::InvalidApiKey, Language::En) => "Invalid API key.",
            (ErrorKind::InvalidApiKey, Language::Uk) => "Недійсний ключ API.",
            (ErrorKind::Authentication, Language::En) => "Authentication with the service failed.",
            (ErrorKind::Authentication, Language::Uk) => "Помилка автентифікації в сервісі.",
            (ErrorKind::QuotaExceeded, Language::En) => "The service quota has been exceeded.",
            (ErrorKind::QuotaExceeded, Language::Uk) => "Перевищено квоту сервісу.",
            (ErrorKind::ApiKeyDisabled, Language::En) => "The API key has been disabled.",
            (ErrorKind::ApiKeyDisabled, Language::Uk) => "Ключ API вимкнено.",
            (ErrorKind::Forbidden, Language::En) => "Access to the service was denied.",
            (ErrorKind::Forbidden, Language::Uk) => "Доступ до сервісу заборонено.",
            (ErrorKind::InvalidEndpoint, Language::En) => "The requested endpoint does not exist.",
            (ErrorKind::InvalidEndpoint, Language::Uk) => "Запитаний ресурс не існує.",
            (ErrorKind::NotFound, Language::En) => "Nothing was found for this request.",
            (ErrorKind::NotFound, Language::Uk) => "За цим запитом нічого не знайдено.",
            (ErrorKind::MethodNotAllowed, Language::En) => "Request method is not allowed.",
            (ErrorKind::MethodNotAllowed, Language::Uk) => "Метод запиту не дозволено.",
            (ErrorKind::Timeout, Language::En) => "The service did not respond in time.",
            (ErrorKind::Timeout, Language::Uk) => "Сервіс не відповів вчасно.",
            (ErrorKind::RequestTooLong, Language::En) => "The request is too long.",
            (ErrorKind::RequestTooLong, Language::Uk) => "Запит занадто довгий.",
            (ErrorKind::UpgradeRequired, Language::En) => "The service requires a protocol upgrade.",
            (ErrorKind::UpgradeRequired, Language::Uk) => "Сервіс вимагає оновлення протоколу.",
            (ErrorKind::RateLimit, Language::En) => "Too many requests. Please try again later.",
            (ErrorKind::RateLimit, Language::Uk) => "Забагато запитів. Спробуйте пізніше.",
            (ErrorKind::ServerError, Language::En) => "The service is experiencing problems.",
            (ErrorKind::ServerError, Language::Uk) => "Сервіс має технічні проблеми.",
            (ErrorKind::InvalidResponse, Language::En) => "The service returned an invalid response.",
            (ErrorKind::InvalidResponse, Language::Uk) => "Сервіс повернув некоректну відповідь.",
            (ErrorKind::IncompleteData, Language::En) => "Incomplete data received.",
            (ErrorKind::IncompleteData, Language::Uk) => "Отримано неповні дані.",
            (ErrorKind::Unexpected, Language::En) => "Unknown error.",
            (ErrorKind::Unexpected, Language::Uk) => "Невідома помилка.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Main error type of the aggregation layer
#[derive(Error, Debug)]
pub enum NexusError {
    /// Upstream answered with a non-success status (or an unusable body)
    #[error("{provider} API error ({kind}): {message}")]
    Api {
        provider: Provider,
        kind: ErrorKind,
        status: Option<u16>,
        message: String,
    },

    /// Upstream could not be reached
    #[error("Network error contacting {provider} service: {message}")]
    Network { provider: Provider, message: String },

    /// Geocoding returned zero results
    #[error("City '{city}' not found")]
    CityNotFound { city: String },

    /// Geocoding failed for a reason other than "no results"
    #[error("Error contacting geocoding service: {source}")]
    GeocodingService {
        #[source]
        source: Box<NexusError>,
    },

    /// Weather lookup failed, wrapping the geocoding or upstream cause
    #[error("Unable to retrieve weather data: {source}")]
    UnableToRetrieveWeather {
        #[source]
        source: Box<NexusError>,
    },

    /// Weather response lacked a whole section
    #[error("Incomplete weather data: {message}")]
    IncompleteWeatherData { message: String },

    /// Cache backend errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl NexusError {
    pub fn api<S: Into<String>>(
        provider: Provider,
        kind: ErrorKind,
        status: Option<u16>,
        message: S,
    ) -> Self {
        Self::Api {
            provider,
            kind,
            status,
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(provider: Provider, message: S) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn geocoding_service(source: NexusError) -> Self {
        Self::GeocodingService {
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn unable_to_retrieve_weather(source: NexusError) -> Self {
        Self::UnableToRetrieveWeather {
            source: Box::new(source),
        }
    }

    /// Taxonomy kind of this failure, looking through wrappers
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            NexusError::Api { kind, .. } => Some(*kind),
            NexusError::CityNotFound { .. } => Some(ErrorKind::NotFound),
            NexusError::IncompleteWeatherData { .. } => Some(ErrorKind::IncompleteData),
            NexusError::GeocodingService { source }
            | NexusError::UnableToRetrieveWeather { source } => source.kind(),
            NexusError::Network { .. } | NexusError::Cache { .. } | NexusError::Config { .. } => {
                None
            }
        }
    }

    /// Message suitable for showing to the end user
    #[must_use]
    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (NexusError::Api { kind, .. }, _) => kind.message(language).to_string(),
            (NexusError::Network { .. }, Language::En) => {
                "Unable to connect to external services. Please try again later.".to_string()
            }
            (NexusError::Network { .. }, Language::Uk) => {
                "Не вдалося з'єднатися із зовнішніми сервісами. Спробуйте пізніше.".to_string()
            }
            (NexusError::CityNotFound { city }, Language::En) => format!("City '{city}' not found."),
            (NexusError::CityNotFound { city }, Language::Uk) => format!("Місто '{city}' не знайдено."),
            (NexusError::GeocodingService { source }, Language::En) => format!(
                "Error contacting geocoding service: {}",
                source.user_message(language)
            ),
            (NexusError::GeocodingService { source }, Language::Uk) => format!(
                "Помилка звернення до сервісу геокодування: {}",
                source.user_message(language)
            ),
            (NexusError::UnableToRetrieveWeather { source }, Language::En) => match source.as_ref() {
                NexusError::CityNotFound { .. } => source.user_message(language),
                _ => "Unable to retrieve weather data".to_string(),
            },
            (NexusError::UnableToRetrieveWeather { source }, Language::Uk) => match source.as_ref() {
                NexusError::CityNotFound { .. } => source.user_message(language),
                _ => "Не вдалося отримати дані про погоду".to_string(),
            },
            (NexusError::IncompleteWeatherData { .. }, Language::En) => {
                "Incomplete weather data".to_string()
            }
            (NexusError::IncompleteWeatherData { .. }, Language::Uk) => {
                "Неповні дані про погоду".to_string()
            }
            (NexusError::Cache { .. }, Language::En) => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            (NexusError::Cache { .. }, Language::Uk) => {
                "Помилка кешу. Можливо, його потрібно очистити.".to_string()
            }
            (NexusError::Config { .. }, Language::En) => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            (NexusError::Config { .. }, Language::Uk) => {
                "Помилка конфігурації. Перевірте файл налаштувань та ключі API.".to_string()
            }
        }
    }
}

//! Upstream status mapping
//!
//! Each provider reports failures with an HTTP status and, sometimes, a vendor
//! error code inside the JSON body. A [`StatusTable`] turns that pair into an
//! [`ErrorKind`]; the per-provider tables below are plain data.

use crate::error::{ErrorKind, NexusError, Provider};
use serde_json::Value;

/// One row of a mapping table
#[derive(Debug, Clone, Copy)]
pub struct StatusRule {
    pub status: u16,
    /// Vendor error code this row is restricted to; `None` matches any code
    pub code: Option<&'static str>,
    pub kind: ErrorKind,
}

const fn rule(status: u16, code: Option<&'static str>, kind: ErrorKind) -> StatusRule {
    StatusRule { status, code, kind }
}

/// Status and vendor-code mapping for one provider
#[derive(Debug, Clone, Copy)]
pub struct StatusTable {
    pub provider: Provider,
    pub rules: &'static [StatusRule],
    /// Kind used when no row matches
    pub fallback: ErrorKind,
}

impl StatusTable {
    /// Look up the kind for a status and optional vendor code.
    ///
    /// Rows with a matching code win over code-less rows of the same status.
    #[must_use]
    pub fn lookup(&self, status: u16, code: Option<&str>) -> ErrorKind {
        let mut generic = None;
        for rule in self.rules.iter().filter(|r| r.status == status) {
            match (rule.code, code) {
                (Some(expected), Some(actual)) if expected == actual => return rule.kind,
                (None, _) if generic.is_none() => generic = Some(rule.kind),
                _ => {}
            }
        }
        generic.unwrap_or(self.fallback)
    }

    /// Build the error for a non-success response
    #[must_use]
    pub fn classify(&self, status: u16, body: &[u8]) -> NexusError {
        let Ok(data) = serde_json::from_slice::<Value>(body) else {
            return NexusError::api(
                self.provider,
                ErrorKind::InvalidResponse,
                Some(status),
                "response body is not valid JSON",
            );
        };

        let code = vendor_code(&data);
        let kind = self.lookup(status, code.as_deref());
        let message = vendor_message(&data).unwrap_or_else(|| format!("HTTP status {status}"));

        tracing::debug!(
            provider = %self.provider,
            status,
            code = code.as_deref().unwrap_or("-"),
            %kind,
            "Mapped upstream error"
        );

        NexusError::api(self.provider, kind, Some(status), message)
    }
}

/// Vendor error code from `error.code` or a top-level `code`, numbers as text
fn vendor_code(data: &Value) -> Option<String> {
    let raw = data
        .get("error")
        .and_then(|e| e.get("code"))
        .or_else(|| data.get("code"))?;
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn vendor_message(data: &Value) -> Option<String> {
    data.get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| data.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

use ErrorKind::*;

pub const WEATHER: StatusTable = StatusTable {
    provider: Provider::Weather,
    rules: &[
        rule(400, Some("1003"), InvalidRequest),
        rule(400, Some("1005"), InvalidEndpoint),
        rule(400, Some("1006"), NotFound),
        rule(400, Some("9000"), InvalidRequest),
        rule(400, Some("9001"), RequestTooLong),
        rule(400, None, InvalidRequest),
        rule(401, Some("1002"), MissingApiKey),
        rule(401, Some("2006"), InvalidApiKey),
        rule(401, None, Authentication),
        rule(402, None, QuotaExceeded),
        rule(403, Some("2008"), ApiKeyDisabled),
        rule(403, Some("2009"), Forbidden),
        rule(403, None, Forbidden),
        rule(404, None, InvalidEndpoint),
        rule(405, None, MethodNotAllowed),
        rule(408, None, Timeout),
        rule(410, None, RequestTooLong),
        rule(426, None, UpgradeRequired),
        rule(429, None, RateLimit),
        rule(500, None, ServerError),
        rule(502, None, ServerError),
        rule(503, None, ServerError),
    ],
    fallback: Unexpected,
};

pub const NEWS: StatusTable = StatusTable {
    provider: Provider::News,
    rules: &[
        rule(400, Some("parametersMissing"), InvalidRequest),
        rule(400, Some("parameterInvalid"), InvalidRequest),
        rule(400, None, InvalidRequest),
        rule(401, Some("apiKeyMissing"), MissingApiKey),
        rule(401, Some("apiKeyInvalid"), InvalidApiKey),
        rule(401, Some("apiKeyDisabled"), ApiKeyDisabled),
        rule(401, None, Authentication),
        rule(429, None, RateLimit),
        rule(500, None, ServerError),
    ],
    fallback: Unexpected,
};

pub const EXCHANGE: StatusTable = StatusTable {
    provider: Provider::Exchange,
    rules: &[
        rule(400, None, InvalidRequest),
        rule(403, None, Forbidden),
        rule(404, None, InvalidEndpoint),
        rule(429, None, RateLimit),
        rule(500, None, ServerError),
        rule(502, None, ServerError),
        rule(503, None, ServerError),
    ],
    fallback: Unexpected,
};

pub const GEOCODING: StatusTable = StatusTable {
    provider: Provider::Geocoding,
    rules: &[
        rule(400, None, InvalidRequest),
        rule(401, None, InvalidApiKey),
        rule(402, None, QuotaExceeded),
        rule(403, None, ApiKeyDisabled),
        rule(404, None, InvalidEndpoint),
        rule(405, None, MethodNotAllowed),
        rule(408, None, Timeout),
        rule(410, None, RequestTooLong),
        rule(426, None, UpgradeRequired),
        rule(429, None, RateLimit),
        rule(503, None, ServerError),
    ],
    fallback: Unexpected,
};

pub const TRANSLATION: StatusTable = StatusTable {
    provider: Provider::Translation,
    rules: &[
        rule(429, None, RateLimit),
        rule(500, None, ServerError),
        rule(502, None, ServerError),
        rule(503, None, ServerError),
    ],
    fallback: Unexpected,
};

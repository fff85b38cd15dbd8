//! Error taxonomy for the search pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Non-success status reported by the geocoding or place-search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderStatus {
    NoMatch,
    RateLimited,
    AccessDenied,
    BadRequest,
    Unknown,
}

/// Classification of a provider `status` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Ok,
    Failed(ProviderStatus),
}

impl ProviderStatus {
    /// Classify the `status` field of a geocoding or places response.
    pub fn classify(code: &str) -> StatusClass {
        match code {
            "OK" => StatusClass::Ok,
            "ZERO_RESULTS" => StatusClass::Failed(Self::NoMatch),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => StatusClass::Failed(Self::RateLimited),
            "REQUEST_DENIED" => StatusClass::Failed(Self::AccessDenied),
            "INVALID_REQUEST" => StatusClass::Failed(Self::BadRequest),
            _ => StatusClass::Failed(Self::Unknown),
        }
    }

    /// Map a non-2xx HTTP status to the closest provider status.
    pub fn from_http(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 | 403 => Self::AccessDenied,
            404 => Self::NoMatch,
            429 => Self::RateLimited,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "no results"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::BadRequest => write!(f, "malformed request"),
            Self::Unknown => write!(f, "unknown provider error"),
        }
    }
}

/// Failures of a single provider call. Always handled where they occur:
/// logged and turned into an empty or terminal result.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    MalformedResponse(String),
    #[error("Provider error ({status}){}", message_suffix(.message))]
    Provider {
        status: ProviderStatus,
        message: Option<String>,
    },
    #[error("Geocoding returned no usable coordinate for '{0}'")]
    NoCoordinate(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl SearchError {
    pub fn provider(status: ProviderStatus, message: Option<String>) -> Self {
        Self::Provider { status, message }
    }

    /// Provider status carried by this error, if any.
    pub fn status(&self) -> Option<ProviderStatus> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_codes() {
        assert_eq!(ProviderStatus::classify("OK"), StatusClass::Ok);
        assert_eq!(ProviderStatus::classify("ZERO_RESULTS"), StatusClass::Failed(ProviderStatus::NoMatch));
        assert_eq!(ProviderStatus::classify("OVER_QUERY_LIMIT"), StatusClass::Failed(ProviderStatus::RateLimited));
        assert_eq!(ProviderStatus::classify("OVER_DAILY_LIMIT"), StatusClass::Failed(ProviderStatus::RateLimited));
        assert_eq!(ProviderStatus::classify("REQUEST_DENIED"), StatusClass::Failed(ProviderStatus::AccessDenied));
        assert_eq!(ProviderStatus::classify("INVALID_REQUEST"), StatusClass::Failed(ProviderStatus::BadRequest));
        assert_eq!(ProviderStatus::classify("UNKNOWN_ERROR"), StatusClass::Failed(ProviderStatus::Unknown));
        assert_eq!(ProviderStatus::classify(""), StatusClass::Failed(ProviderStatus::Unknown));
    }

    #[test]
    fn test_http_mapping() {
        assert_eq!(ProviderStatus::from_http(400), ProviderStatus::BadRequest);
        assert_eq!(ProviderStatus::from_http(403), ProviderStatus::AccessDenied);
        assert_eq!(ProviderStatus::from_http(429), ProviderStatus::RateLimited);
        assert_eq!(ProviderStatus::from_http(503), ProviderStatus::Unknown);
    }

    #[test]
    fn test_error_messages() {
        let e = SearchError::provider(ProviderStatus::AccessDenied, Some("The provided API key is invalid.".into()));
        assert_eq!(e.to_string(), "Provider error (access denied): The provided API key is invalid.");
        assert_eq!(e.status(), Some(ProviderStatus::AccessDenied));

        let e = SearchError::provider(ProviderStatus::NoMatch, None);
        assert_eq!(e.to_string(), "Provider error (no results)");
        assert_eq!(SearchError::Network("timed out".into()).status(), None);
    }
}

//! Client error types

use std::collections::BTreeMap;

use thiserror::Error;
use warden_core::CoreError;

/// Client error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server rejected the payload with field-level messages
    #[error("Validation failed ({status}): {}", summarize(.fields))]
    Validation {
        status: u16,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Bad request without a field map
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token storage or claim inspection error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The token refresh protocol failed
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Create error from HTTP status code and response body
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = detail_message(&body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.clone()
            }
        });

        match status.as_u16() {
            400 => match validation_fields(&body) {
                Some(fields) => Self::Validation {
                    status: 400,
                    fields,
                },
                None => Self::BadRequest(message),
            },
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether this is a rejected credential the refresh protocol may recover
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

/// Failure of the token refresh protocol
///
/// Cloneable so every caller joined on a single in-flight refresh observes
/// the same outcome. Always fatal to the session: the caller must log out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// No refresh token is persisted; there is no session to refresh
    #[error("No refresh token available")]
    MissingToken,

    /// The refresh endpoint rejected the token
    #[error("Token refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport, storage, or post-refresh profile fetch failure
    #[error("Token refresh failed: {message}")]
    Failed { message: String },
}

impl RefreshError {
    pub(crate) fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::Refresh(inner) => inner.clone(),
            ApiError::AuthenticationFailed(message) => Self::Rejected {
                status: 401,
                message: message.clone(),
            },
            ApiError::Forbidden(message) => Self::Rejected {
                status: 403,
                message: message.clone(),
            },
            ApiError::BadRequest(message) => Self::Rejected {
                status: 400,
                message: message.clone(),
            },
            ApiError::Validation { status, fields } => Self::Rejected {
                status: *status,
                message: summarize(fields),
            },
            other => Self::Failed {
                message: other.to_string(),
            },
        }
    }
}

/// Structured field errors recorded for the login/registration forms
///
/// Mirrors the server's validation payload: a map from field name to its
/// messages, with non-field failures under a `detail` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// A single non-field message under `detail`
    pub fn detail(message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("detail".to_string(), vec![message.into()]);
        Self(fields)
    }

    /// Build from a failed operation, falling back to a generic message for
    /// errors that carry no server payload (e.g. transport failures)
    pub fn from_error(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Validation { fields, .. } => Self(fields.clone()),
            ApiError::BadRequest(message)
            | ApiError::AuthenticationFailed(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message) => Self::detail(message.clone()),
            _ => Self::detail(fallback),
        }
    }

    /// The first message, in field order
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join("; ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a djoser-style validation payload: an object mapping field names to
/// a message or list of messages.
fn validation_fields(body: &str) -> Option<BTreeMap<String, Vec<String>>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let mut fields = BTreeMap::new();
    for (field, messages) in object {
        match messages {
            serde_json::Value::String(message) => {
                fields.insert(field.clone(), vec![message.clone()]);
            }
            serde_json::Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.as_str().map(ToString::to_string))
                    .collect();
                if messages.is_empty() {
                    return None;
                }
                fields.insert(field.clone(), messages);
            }
            _ => return None,
        }
    }

    if fields.is_empty() { None } else { Some(fields) }
}

/// Extract a `detail` message from an error payload, if present
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(ToString::to_string)
}

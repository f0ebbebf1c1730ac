//! Error types for the employee API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! record does not exist" from "the server returned an unexpected status."
//! Both carry the `message` field of the backend's error body when one was
//! sent, which is what the views display. Client-side form checks have their
//! own [`ValidationError`] since they never reach the network.

use serde::Deserialize;
use std::collections::HashMap;

/// Errors returned by `EmployeeClient` parse methods and transports.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    NotFound { message: Option<String> },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http {
        status: u16,
        body: String,
        message: Option<String>,
    },

    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Message supplied by the backend, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the backend message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Error body the backend sends with every non-2xx response. Only `message`
/// is consumed for display; the rest is kept for diagnostics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<HashMap<String, String>>,
}

impl ErrorBody {
    /// Lenient parse: anything that is not a JSON object yields `None`.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// Form input rejected before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmail,
}

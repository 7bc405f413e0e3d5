//! Backend API errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to the clinic backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message reported by the backend, or a generic one naming the status.
        message: String,
    },

    /// The request never produced a response, or its body could not be decoded.
    #[error("backend request failed")]
    Network(#[from] reqwest::Error),

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid backend base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Build a rejection from a response status and raw body.
    ///
    /// The message is taken from the body's `message` field when present.
    pub(crate) fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Self::Rejected { status, message }
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(error) => error.status().map(|status| status.as_u16()),
            Self::InvalidBaseUrl(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

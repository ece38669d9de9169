//! Error types for icon pack generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a failed call to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceClassification {
    RateLimited,
    Unavailable,
    Unknown,
}

impl ServiceClassification {
    /// Classify an HTTP status code returned by the service.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => ServiceClassification::RateLimited,
            500 | 502 | 503 | 504 => ServiceClassification::Unavailable,
            _ => ServiceClassification::Unknown,
        }
    }

    /// Sentence appended to the aggregate failure message.
    pub fn user_hint(self) -> &'static str {
        match self {
            ServiceClassification::RateLimited => {
                "Too many requests. Please try again in a moment."
            }
            ServiceClassification::Unavailable => "The AI service is temporarily unavailable.",
            ServiceClassification::Unknown => "Unknown error occurred.",
        }
    }
}

impl fmt::Display for ServiceClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceClassification::RateLimited => "rate_limited",
            ServiceClassification::Unavailable => "unavailable",
            ServiceClassification::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Batch-scoped errors raised by a single generation call.
///
/// These never reach the caller of `generate_icon_pack` directly; the scheduler
/// retries them and then collapses them into an empty batch outcome.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("Invalid icon count {count}: must be between 1 and {max}")]
    InvalidCount { count: usize, max: usize },

    #[error("Empty response from generation service")]
    EmptyResponse,

    #[error("Failed to parse generation response: {0}")]
    ParseError(String),

    #[error("Generation service error ({classification}): {message}")]
    ServiceError {
        classification: ServiceClassification,
        message: String,
    },
}

impl ClientError {
    pub fn service(classification: ServiceClassification, message: impl Into<String>) -> Self {
        ClientError::ServiceError {
            classification,
            message: message.into(),
        }
    }

    /// Classification carried into the aggregate failure when retries run out.
    pub fn classification(&self) -> ServiceClassification {
        match self {
            ClientError::ServiceError { classification, .. } => *classification,
            _ => ServiceClassification::Unknown,
        }
    }

    /// Check if another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::InvalidCount { .. } => false, // Same input, same rejection
            ClientError::EmptyResponse => true,
            ClientError::ParseError(_) => true,
            ClientError::ServiceError { .. } => true,
        }
    }
}

/// Request-scoped errors surfaced by the public API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to generate icon pack. {}", .cause.user_hint())]
    NoIconsGenerated { cause: ServiceClassification },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Generation was cancelled before any icons were generated.")]
    Cancelled,
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

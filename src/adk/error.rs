// SPDX-License-Identifier: MIT

//! Typed errors for the model layer
//!
//! Provider clients and agents report failures through [`ModelError`] so
//! callers can tell a missing API key apart from a bad response.

use thiserror::Error;

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for provider {provider}: set {env_var}")]
    ApiKeyMissing { provider: String, env_var: String },

    /// Provider name not recognised
    #[error("Unknown model provider: {0}")]
    UnsupportedProvider(String),

    /// Non-success response from the provider API
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// HTTP transport errors; the request URL is stripped
    #[error(transparent)]
    Http(reqwest::Error),

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

impl ModelError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a missing API key error
    pub fn api_key_missing(provider: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self::ApiKeyMissing {
            provider: provider.into(),
            env_var: env_var.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

// SPDX-License-Identifier: MIT

//! Typed error handling for the article pipeline
//!
//! Which errors are recoverable is decided by the workflow, not here:
//! [`FetchError`] and [`ResearchParseError`] degrade the run, while
//! [`WritingParseError`] and [`PersistenceError`] end it.

use crate::adk::error::ModelError;
use crate::scribe::decode::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for scribe-rs
#[derive(Debug, Error)]
pub enum ScribeError {
    /// Web page could not be fetched or yielded no text
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Research model output could not be decoded
    #[error(transparent)]
    ResearchParse(#[from] ResearchParseError),

    /// Writing model output could not be decoded
    #[error(transparent)]
    WritingParse(#[from] WritingParseError),

    /// Article file could not be written
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Model transport or provider failure
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Workflow state invariant violated
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    Input(String),

    /// Article file front matter is missing or malformed
    #[error("Invalid front matter: {0}")]
    FrontMatter(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ScribeError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an input error
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Create a front matter error
    pub fn front_matter(message: impl Into<String>) -> Self {
        Self::FrontMatter(message.into())
    }
}

/// Web fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL did not parse or is not http(s)
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network failure, timeout or client construction failure
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Page had no extractable text
    #[error("No readable content found at {url}")]
    EmptyContent { url: String },
}

/// Research response did not match the expected shape
#[derive(Debug, Error)]
#[error("Could not parse research findings: {0}")]
pub struct ResearchParseError(#[from] pub DecodeError);

/// Writing response did not match the expected shape
#[derive(Debug, Error)]
#[error("Could not parse written article: {0}")]
pub struct WritingParseError(#[from] pub DecodeError);

/// Article could not be written to disk
#[derive(Debug, Error)]
#[error("Failed to save article to {}: {source}", .path.display())]
pub struct PersistenceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Workflow state invariant violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("article cannot be set before research findings exist")]
    ArticleBeforeFindings,

    #[error("output path cannot be set before an article exists")]
    OutputBeforeArticle,
}

// SPDX-License-Identifier: MIT

//! Model module - defines LLM model trait and implementations
//!
//! This module provides the core Model trait and shared types.
//! Model implementations are in their own submodules:
//! - [anthropic] - Anthropic's Claude API
//! - [gemini] - Google's Gemini API
//! - [openai] - OpenAI's ChatGPT API

pub mod anthropic;
pub mod gemini;
pub mod openai;

use crate::adk::error::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}

impl GenerationConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Default::default()
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, skipping thinking output
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Thinking/reasoning content from thinking models
    Thinking(String),
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    /// Name of the underlying model, used in logs
    fn model_name(&self) -> &str;

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError>;
}

/// Supported completion API providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
    Gemini,
}

impl Provider {
    /// Infer the provider from a model name prefix
    pub fn infer(model_name: &str) -> Self {
        let lower = model_name.to_ascii_lowercase();
        if lower.starts_with("claude") {
            Provider::Anthropic
        } else if lower.starts_with("gemini") {
            Provider::Gemini
        } else {
            Provider::OpenAI
        }
    }
}

impl FromStr for Provider {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" => Ok(Provider::OpenAI),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(ModelError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Anthropic => write!(f, "Anthropic"),
            Provider::Gemini => write!(f, "Gemini"),
        }
    }
}

/// Create a model client.
///
/// An explicit provider wins; otherwise the provider is inferred from the
/// model name prefix. API keys are read from the environment by each client.
pub fn create_model(
    provider: Option<Provider>,
    model_name: &str,
) -> Result<Arc<dyn Model>, ModelError> {
    let provider = provider.unwrap_or_else(|| Provider::infer(model_name));
    log::debug!("Using provider '{}' with model '{}'", provider, model_name);

    let model: Arc<dyn Model> = match provider {
        Provider::OpenAI => Arc::new(openai::OpenAIModel::new(model_name.to_string())?),
        Provider::Anthropic => Arc::new(anthropic::AnthropicModel::new(model_name.to_string())?),
        Provider::Gemini => Arc::new(gemini::GeminiModel::new(model_name.to_string())?),
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_provider_from_model_name() {
        assert_eq!(Provider::infer("gpt-4o-mini"), Provider::OpenAI);
        assert_eq!(Provider::infer("claude-sonnet-4-5"), Provider::Anthropic);
        assert_eq!(Provider::infer("gemini-2.0-flash"), Provider::Gemini);
        assert_eq!(Provider::infer("o3-mini"), Provider::OpenAI);
    }

    #[test]
    fn test_provider_from_str_aliases() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(" Claude ".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_deserializes_lowercase() {
        let p: Provider = serde_yaml::from_str("openai").unwrap();
        assert_eq!(p, Provider::OpenAI);
        let p: Provider = serde_yaml::from_str("anthropic").unwrap();
        assert_eq!(p, Provider::Anthropic);
    }

    #[test]
    fn test_content_text_skips_thinking() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Thinking("hmm".to_string()),
                Part::Text("Hello ".to_string()),
                Part::Text("world".to_string()),
            ],
        };
        assert_eq!(content.text(), "Hello world");
    }
}

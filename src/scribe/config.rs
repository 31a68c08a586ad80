// SPDX-License-Identifier: MIT

//! Configuration loading
//!
//! Values resolve in order: built-in defaults, YAML file, environment
//! variables, then command-line flags (applied by the binary).

use crate::adk::model::{GenerationConfig, Provider};
use crate::scribe::error::ScribeError;
use crate::scribe::state::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "scribe.yaml";

pub const RESEARCH_TEMPERATURE: f32 = 0.3;
pub const WRITING_TEMPERATURE: f32 = 0.7;

/// Model settings for one agent role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleConfig {
    pub model: String,
    /// Falls back to the role's default when unset
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl RoleConfig {
    fn research_default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: Some(RESEARCH_TEMPERATURE),
            max_output_tokens: None,
        }
    }

    fn writing_default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: Some(WRITING_TEMPERATURE),
            max_output_tokens: Some(4096),
        }
    }

    fn generation_config(&self, default_temperature: f32) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(self.temperature.unwrap_or(default_temperature)),
            max_output_tokens: self.max_output_tokens,
            ..Default::default()
        }
    }
}

/// Web fetch settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Source text passed to the research model is cut to this many characters
    pub max_source_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            max_source_chars: 10_000,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScribeConfig {
    /// Explicit provider; inferred from each model name when absent
    pub provider: Option<Provider>,
    pub research: RoleConfig,
    pub writing: RoleConfig,
    pub articles_dir: PathBuf,
    /// Byline and voice of the articles
    pub publisher: String,
    /// Regional angle the writer highlights when relevant
    pub region_focus: Option<String>,
    pub default_category: String,
    pub fetch: FetchConfig,
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            provider: None,
            research: RoleConfig::research_default(),
            writing: RoleConfig::writing_default(),
            articles_dir: PathBuf::from("content/articles"),
            publisher: "FoxGlove CPA".to_string(),
            region_focus: Some(
                "Washington (no state income tax) and Oregon (state income tax)".to_string(),
            ),
            default_category: DEFAULT_CATEGORY.to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

impl ScribeConfig {
    /// Parse configuration from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Self, ScribeError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScribeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScribeError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse_yaml(&content)
    }

    /// Load from an explicit path, else `./scribe.yaml` when present, else defaults.
    /// Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self, ScribeError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from {}", default_path.display());
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn research_generation(&self) -> GenerationConfig {
        self.research.generation_config(RESEARCH_TEMPERATURE)
    }

    pub fn writing_generation(&self) -> GenerationConfig {
        self.writing.generation_config(WRITING_TEMPERATURE)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ScribeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("MODEL_PROVIDER").filter(|v| !v.is_empty()) {
            self.provider = Some(
                provider
                    .parse()
                    .map_err(|e| ScribeError::config(format!("MODEL_PROVIDER: {}", e)))?,
            );
        }
        if let Some(model) = lookup("SCRIBE_RESEARCH_MODEL").filter(|v| !v.is_empty()) {
            self.research.model = model;
        }
        if let Some(model) = lookup("SCRIBE_WRITING_MODEL").filter(|v| !v.is_empty()) {
            self.writing.model = model;
        }
        if let Some(dir) = lookup("SCRIBE_ARTICLES_DIR").filter(|v| !v.is_empty()) {
            self.articles_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

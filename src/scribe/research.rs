// SPDX-License-Identifier: MIT

//! Research Agent - gathers structured findings for a topic
//!
//! With a source URL the page text is analyzed; without one (or when the
//! fetch fails) the model researches the topic from its own knowledge and
//! the findings are flagged as non-sourced.

use crate::adk::agent::{preview, Agent, LLMAgent};
use crate::adk::model::{GenerationConfig, Model};
use crate::scribe::config::{ScribeConfig, RESEARCH_TEMPERATURE};
use crate::scribe::decode::{self, require_non_empty, DecodeError, Schema};
use crate::scribe::error::{FetchError, ResearchParseError, ScribeError};
use crate::scribe::fetch::{FetchedPage, WebFetcher};
use crate::scribe::state::{ResearchFindings, SourceUsed};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

/// Shape the research model is asked to return
#[derive(Debug, Deserialize, JsonSchema)]
struct ResearchDraft {
    /// Structured research brief on the topic
    summary: String,
    /// Standalone facts: definitions, figures, thresholds, examples, pitfalls
    #[serde(default)]
    key_points: Vec<String>,
}

impl Schema for ResearchDraft {
    fn validate(&self) -> Result<(), DecodeError> {
        require_non_empty(&self.summary, "summary")
    }
}

/// Result of one research pass.
///
/// `fallback` holds the fetch failure that forced the knowledge-only path;
/// it is reported even when `findings` is an error.
#[derive(Debug)]
pub struct ResearchOutcome {
    pub findings: Result<ResearchFindings, ScribeError>,
    pub fallback: Option<FetchError>,
}

pub struct ResearchAgent {
    /// Analyzes fetched source material
    analyst: LLMAgent,
    /// Researches from background knowledge
    knowledge: LLMAgent,
    fetcher: Arc<dyn WebFetcher>,
    publisher: String,
    region_focus: Option<String>,
    max_source_chars: usize,
}

impl ResearchAgent {
    pub fn new(model: Arc<dyn Model>, fetcher: Arc<dyn WebFetcher>) -> Self {
        let defaults = ScribeConfig::default();
        let config = GenerationConfig::with_temperature(RESEARCH_TEMPERATURE);
        Self {
            analyst: LLMAgent::new("source_analyst", "", model.clone()).with_config(config.clone()),
            knowledge: LLMAgent::new("topic_researcher", "", model).with_config(config),
            fetcher,
            publisher: defaults.publisher,
            region_focus: defaults.region_focus,
            max_source_chars: defaults.fetch.max_source_chars,
        }
        .refresh_instructions()
    }

    /// Build from configuration with the given model and fetcher
    pub fn from_config(
        config: &ScribeConfig,
        model: Arc<dyn Model>,
        fetcher: Arc<dyn WebFetcher>,
    ) -> Self {
        Self::new(model, fetcher)
            .with_generation(config.research_generation())
            .with_publisher(config.publisher.clone())
            .with_region_focus(config.region_focus.clone())
            .with_max_source_chars(config.fetch.max_source_chars)
    }

    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.analyst = self.analyst.with_config(config.clone());
        self.knowledge = self.knowledge.with_config(config);
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self.refresh_instructions()
    }

    pub fn with_region_focus(mut self, region_focus: Option<String>) -> Self {
        self.region_focus = region_focus;
        self.refresh_instructions()
    }

    pub fn with_max_source_chars(mut self, max_source_chars: usize) -> Self {
        self.max_source_chars = max_source_chars;
        self
    }

    fn refresh_instructions(mut self) -> Self {
        let analysis = self.analysis_instruction();
        let knowledge = self.knowledge_instruction();
        self.analyst = self.analyst.with_instruction(analysis);
        self.knowledge = self.knowledge.with_instruction(knowledge);
        self
    }

    /// Research `topic`, from `source_url` when given.
    ///
    /// A failed fetch does not fail the pass: it is returned in
    /// [`ResearchOutcome::fallback`] and knowledge-only research is used.
    pub async fn research(
        &self,
        topic: &str,
        source_url: Option<&str>,
        context: &str,
    ) -> ResearchOutcome {
        let mut fallback = None;

        if let Some(url) = source_url {
            log::info!("Researching from URL: {}", url);
            match self.fetcher.fetch(url).await {
                Ok(page) => {
                    return ResearchOutcome {
                        findings: self.analyze_page(topic, &page).await,
                        fallback: None,
                    };
                }
                Err(e) => {
                    log::warn!("{}. Falling back to topic-based research", e);
                    fallback = Some(e);
                }
            }
        }

        ResearchOutcome {
            findings: self.research_topic(topic, context).await,
            fallback,
        }
    }

    async fn analyze_page(
        &self,
        topic: &str,
        page: &FetchedPage,
    ) -> Result<ResearchFindings, ScribeError> {
        let content = preview(&page.content, self.max_source_chars);
        if content.len() < page.content.len() {
            log::debug!(
                "Source text truncated to {} characters",
                self.max_source_chars
            );
        }

        let input = format!(
            "Topic: {}\n\nSource Material:\nTitle: {}\n\n{}\n\n\
             Please analyze this content and provide key insights for our article.",
            topic, page.title, content
        );
        let response = self.analyst.run(input).await?;
        Self::parse_findings(&response, SourceUsed::Url)
    }

    async fn research_topic(
        &self,
        topic: &str,
        context: &str,
    ) -> Result<ResearchFindings, ScribeError> {
        log::info!("Agent {} researching topic: {}", self.knowledge.name(), topic);

        let context = if context.trim().is_empty() {
            "None provided"
        } else {
            context.trim()
        };
        let input = format!(
            "Topic: {}\n\nAdditional Context: {}\n\n\
             Please provide comprehensive research on this topic.",
            topic, context
        );
        let response = self.knowledge.run(input).await?;
        Self::parse_findings(&response, SourceUsed::Knowledge)
    }

    fn parse_findings(
        response: &str,
        source_used: SourceUsed,
    ) -> Result<ResearchFindings, ScribeError> {
        let draft: ResearchDraft = decode::decode(response).map_err(ResearchParseError)?;
        Ok(ResearchFindings {
            summary: draft.summary.trim().to_string(),
            key_points: draft
                .key_points
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            source_used,
        })
    }

    fn role_preamble(&self) -> String {
        let mut text = format!(
            "You are a research analyst for {}, a CPA firm specializing in tax planning \
             and accounting for small businesses.",
            self.publisher
        );
        if let Some(region) = &self.region_focus {
            text.push_str(&format!(" The firm's clients are in {}.", region));
        }
        text
    }

    fn focus_list(&self, numbers_note: &str) -> String {
        let region = match &self.region_focus {
            Some(region) => format!("- Regional considerations (especially {})\n", region),
            None => "- Regional considerations\n".to_string(),
        };
        format!(
            "Focus on:\n\
             - Key concepts and definitions\n\
             - Specific numbers, percentages, or thresholds{}\n\
             - Real-world examples or scenarios\n\
             - Common mistakes or pitfalls\n\
             - Best practices\n{}",
            numbers_note, region
        )
    }

    fn analysis_instruction(&self) -> String {
        format!(
            "{}\n\nYour task is to analyze source material and extract key insights, \
             statistics, and concepts that would be valuable for writing an article on \
             the given topic.\n\n{}\nBe thorough but concise.\n\n{}",
            self.role_preamble(),
            self.focus_list(""),
            decode::response_format_instruction::<ResearchDraft>()
        )
    }

    fn knowledge_instruction(&self) -> String {
        format!(
            "{}\n\nNo source document is available. Provide comprehensive research on the \
             given topic, drawing from your knowledge of accounting, tax law, and small \
             business best practices. This is background knowledge, not a cited source.\n\n\
             {}\n\n{}",
            self.role_preamble(),
            self.focus_list(" (especially the current tax year)"),
            decode::response_format_instruction::<ResearchDraft>()
        )
    }
}

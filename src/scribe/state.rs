// SPDX-License-Identifier: MIT

//! Workflow data model
//!
//! - `ArticleRequest` - what the caller asked for
//! - `WorkflowState` - the single object threaded through every stage
//! - `ResearchFindings` / `Article` - results produced by the agents

use crate::scribe::error::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "Tax Planning";

/// Caller input for one article run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRequest {
    pub topic: String,
    pub source_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub requirements: String,
    pub filename: Option<String>,
}

impl ArticleRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            source_url: None,
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            requirements: String::new(),
            filename: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = requirements.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Workflow stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Start,
    Research,
    Write,
    Save,
    End,
}

impl Stage {
    /// Unconditional successor; `End` is terminal
    pub fn next(self) -> Stage {
        match self {
            Stage::Start => Stage::Research,
            Stage::Research => Stage::Write,
            Stage::Write => Stage::Save,
            Stage::Save | Stage::End => Stage::End,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::End
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "START",
            Stage::Research => "RESEARCH",
            Stage::Write => "WRITE",
            Stage::Save => "SAVE",
            Stage::End => "END",
        };
        f.write_str(name)
    }
}

/// Where research findings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceUsed {
    Url,
    Knowledge,
}

/// Structured research result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchFindings {
    pub summary: String,
    pub key_points: Vec<String>,
    pub source_used: SourceUsed,
}

impl ResearchFindings {
    /// Substitute findings used when research fails
    pub fn minimal(topic: &str) -> Self {
        Self {
            summary: format!(
                "No research findings are available for \"{}\". \
                 Draw on general knowledge of the topic.",
                topic
            ),
            key_points: Vec::new(),
            source_used: SourceUsed::Knowledge,
        }
    }

    /// Render findings as prompt text
    pub fn to_prompt_text(&self) -> String {
        let mut text = String::new();
        if self.source_used == SourceUsed::Knowledge {
            text.push_str(
                "(Background knowledge only; not sourced from a reference document.)\n\n",
            );
        }
        text.push_str(&self.summary);
        if !self.key_points.is_empty() {
            text.push_str("\n\nKey points:\n");
            for point in &self.key_points {
                text.push_str("- ");
                text.push_str(point);
                text.push('\n');
            }
        }
        text
    }
}

/// A written article with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
    pub slug: String,
    pub author: String,
    pub published_at: String,
}

/// Mutable state owned by one workflow run
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub run_id: Uuid,
    pub topic: String,
    pub source_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub requirements: String,
    pub filename: Option<String>,
    stage: Stage,
    research_findings: Option<ResearchFindings>,
    article: Option<Article>,
    output_path: Option<PathBuf>,
    errors: Vec<String>,
}

impl WorkflowState {
    /// Fresh state for one invocation
    pub fn new(request: ArticleRequest) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            topic: request.topic,
            source_url: request.source_url.filter(|u| !u.trim().is_empty()),
            category: request.category,
            tags: normalize_tags(request.tags),
            requirements: request.requirements,
            filename: request.filename.filter(|f| !f.trim().is_empty()),
            stage: Stage::Start,
            research_findings: None,
            article: None,
            output_path: None,
            errors: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub fn research_findings(&self) -> Option<&ResearchFindings> {
        self.research_findings.as_ref()
    }

    pub fn set_research_findings(&mut self, findings: ResearchFindings) {
        self.research_findings = Some(findings);
    }

    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    pub fn set_article(&mut self, article: Article) -> Result<(), StateError> {
        if self.research_findings.is_none() {
            return Err(StateError::ArticleBeforeFindings);
        }
        self.article = Some(article);
        Ok(())
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn set_output_path(&mut self, path: PathBuf) -> Result<(), StateError> {
        if self.article.is_none() {
            return Err(StateError::OutputBeforeArticle);
        }
        self.output_path = Some(path);
        Ok(())
    }

    /// Append a diagnostic; entries are never removed
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("[{}] {}", self.run_id, message);
        self.errors.push(message);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Split a comma-separated tag list
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}

/// Trim, drop empties and de-duplicate while keeping first-seen order
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

// SPDX-License-Identifier: MIT

//! Writing Agent - turns research findings into a finished article
//!
//! The model writes the title, description, body and suggested tags; all
//! other metadata (category, author, date, slug) is filled in here so the
//! caller's choices always win.

use crate::adk::agent::{Agent, LLMAgent};
use crate::adk::model::{GenerationConfig, Model};
use crate::scribe::config::{ScribeConfig, WRITING_TEMPERATURE};
use crate::scribe::decode::{self, require_non_empty, DecodeError, Schema};
use crate::scribe::error::{ScribeError, WritingParseError};
use crate::scribe::persistence::slugify;
use crate::scribe::state::{normalize_tags, Article, ResearchFindings};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

/// Shape the writing model is asked to return
#[derive(Debug, Deserialize, JsonSchema)]
struct ArticleDraft {
    /// Article headline
    title: String,
    /// One or two sentence summary for previews and SEO
    #[serde(default)]
    description: String,
    /// Full article in Markdown/MDX, without front matter
    body: String,
    /// Lowercase, dash-separated topic tags
    #[serde(default)]
    tags: Vec<String>,
}

impl Schema for ArticleDraft {
    fn validate(&self) -> Result<(), DecodeError> {
        require_non_empty(&self.title, "title")?;
        require_non_empty(strip_front_matter(&self.body), "body")
    }
}

/// Everything the writer needs for one article
#[derive(Debug, Clone, Copy)]
pub struct WriteRequest<'a> {
    pub topic: &'a str,
    pub findings: &'a ResearchFindings,
    pub category: &'a str,
    /// Caller tags; the model's suggestions are used when empty
    pub tags: &'a [String],
    pub requirements: &'a str,
}

pub struct WritingAgent {
    /// Drafts new articles in the house style
    writer: LLMAgent,
    /// Applies revision feedback
    editor: LLMAgent,
    publisher: String,
    region_focus: Option<String>,
}

impl WritingAgent {
    pub fn new(model: Arc<dyn Model>) -> Self {
        let defaults = ScribeConfig::default();
        let config = GenerationConfig::with_temperature(WRITING_TEMPERATURE);
        Self {
            writer: LLMAgent::new("writing_agent", "", model.clone()).with_config(config.clone()),
            editor: LLMAgent::new("editing_agent", "", model).with_config(config),
            publisher: defaults.publisher,
            region_focus: defaults.region_focus,
        }
        .refresh_instructions()
    }

    /// Build from configuration with the given model
    pub fn from_config(config: &ScribeConfig, model: Arc<dyn Model>) -> Self {
        Self::new(model)
            .with_generation(config.writing_generation())
            .with_publisher(config.publisher.clone())
            .with_region_focus(config.region_focus.clone())
    }

    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.writer = self.writer.with_config(config.clone());
        self.editor = self.editor.with_config(config);
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

    fn refresh_instructions(mut self) -> Self {
        let style = self.style_instruction();
        let revision = self.revision_instruction();
        self.writer = self.writer.with_instruction(style);
        self.editor = self.editor.with_instruction(revision);
        self
    }

    /// Write a complete article
    pub async fn write(&self, request: &WriteRequest<'_>) -> Result<Article, ScribeError> {
        log::info!("Writing article on: {}", request.topic);

        let published_at = today();
        let input = self.write_input(request, &published_at);
        let response = self.writer.run(input).await?;
        let draft: ArticleDraft = decode::decode(&response).map_err(WritingParseError)?;

        let tags = if request.tags.is_empty() {
            normalize_tags(&draft.tags)
        } else {
            request.tags.to_vec()
        };

        log::info!("Article written successfully");
        Ok(self.assemble(draft, request.category, tags, published_at))
    }

    /// Revise an article according to `feedback`.
    ///
    /// Category, tags, author and date carry over; the slug follows the
    /// revised title.
    pub async fn revise(
        &self,
        article: &Article,
        feedback: &str,
    ) -> Result<Article, ScribeError> {
        log::info!(
            "Agent {} revising article '{}' based on feedback",
            self.editor.name(),
            article.title
        );

        let input = format!(
            "Current Article:\nTitle: {}\nDescription: {}\n\n{}\n\nRevision Notes:\n{}\n\n\
             Please provide the complete revised article.",
            article.title,
            article.description,
            article.body,
            feedback.trim()
        );
        let response = self.editor.run(input).await?;
        let draft: ArticleDraft = decode::decode(&response).map_err(WritingParseError)?;

        let mut revised = self.assemble(
            draft,
            &article.category,
            article.tags.clone(),
            article.published_at.clone(),
        );
        revised.author = article.author.clone();

        log::info!("Article revised successfully");
        Ok(revised)
    }

    fn assemble(
        &self,
        draft: ArticleDraft,
        category: &str,
        tags: Vec<String>,
        published_at: String,
    ) -> Article {
        let title = draft.title.trim().to_string();
        Article {
            slug: slugify(&title),
            title,
            description: draft.description.trim().to_string(),
            body: strip_front_matter(&draft.body).trim().to_string(),
            category: category.to_string(),
            tags,
            author: self.publisher.clone(),
            published_at,
        }
    }

    fn write_input(&self, request: &WriteRequest<'_>, published_at: &str) -> String {
        let tags_info = if request.tags.is_empty() {
            "Generate appropriate tags based on the content".to_string()
        } else {
            format!("Suggested tags: {}", request.tags.join(", "))
        };

        format!(
            "Write an article on the following topic:\n\nTopic: {}\n\n\
             Research Findings:\n{}\n\n\
             Use these research findings as the foundation for your article, but write in \
             your own voice and structure. Feel free to add context, examples, or insights \
             based on your knowledge of tax and accounting topics.\n\n\
             Additional Requirements:\nCategory: {}\n{}\nAuthor: {}\nPublished Date: {}\n\n{}",
            request.topic,
            request.findings.to_prompt_text(),
            request.category,
            tags_info,
            self.publisher,
            published_at,
            request.requirements.trim()
        )
    }

    fn style_instruction(&self) -> String {
        let mut text = format!(
            "You are a professional content writer for {}, a CPA firm specializing in tax \
             planning and accounting for small businesses.\n\n\
             Your writing style is:\n\
             - Professional but approachable, like a knowledgeable friend explaining complex topics\n\
             - Clear and practical: actionable insights, not jargon\n\
             - Conversational without being casual: use \"you\" and \"we\", occasional rhetorical questions\n\
             - Example-driven, with real-world scenarios and specific dollar amounts\n\
             - Includes specific numbers, thresholds, and percentages when relevant\n\n\
             Structure the body as:\n\
             1. Opening hook (1-2 paragraphs addressing why the reader should care)\n\
             2. Well-structured content with ## headings\n\
             3. Practical examples with ### subheadings\n\
             4. Conclusion with key takeaways\n\
             5. A clear call-to-action pointing to {}'s services\n\n\
             Use bold sparingly for key points. Write the body as Markdown/MDX without \
             front matter; metadata goes in the JSON fields.",
            self.publisher, self.publisher
        );
        if let Some(region) = &self.region_focus {
            text.push_str(&format!(
                "\n\nRegional focus: highlight differences between {} when relevant to the topic.",
                region
            ));
        }
        text.push_str("\n\n");
        text.push_str(&decode::response_format_instruction::<ArticleDraft>());
        text
    }

    fn revision_instruction(&self) -> String {
        format!(
            "You are a professional editor for {}. Revise the article according to the \
             feedback while keeping the professional but approachable tone and the \
             Markdown/MDX body structure.\n\n{}",
            self.publisher,
            decode::response_format_instruction::<ArticleDraft>()
        )
    }
}

/// Today's date as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Drop a front matter block the model may have added to the body
fn strip_front_matter(body: &str) -> &str {
    let Some(rest) = body
        .trim_start()
        .strip_prefix("---")
        .and_then(|r| r.strip_prefix('\n').or_else(|| r.strip_prefix("\r\n")))
    else {
        return body;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "---" {
            return &rest[offset..];
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scribe::state::SourceUsed;
    use crate::scribe::testing::ScriptedModel;

    const DRAFT: &str = r###"```json
{
  "title": "Quarterly Tax Planning Tips",
  "description": "Stay ahead of estimated payments.",
  "body": "## Why it matters\n\nMissing a deadline costs you.",
  "tags": ["Estimated Taxes", "planning", "planning"]
}
```"###;

    fn findings() -> ResearchFindings {
        ResearchFindings {
            summary: "Estimated taxes are due quarterly.".to_string(),
            key_points: vec!["Safe harbor rules".to_string()],
            source_used: SourceUsed::Knowledge,
        }
    }

    fn request<'a>(findings: &'a ResearchFindings, tags: &'a [String]) -> WriteRequest<'a> {
        WriteRequest {
            topic: "Quarterly tax planning",
            findings,
            category: "Tax Planning",
            tags,
            requirements: "Keep it under 1500 words",
        }
    }

    #[tokio::test]
    async fn test_write_builds_article() {
        let model = Arc::new(ScriptedModel::new(vec![DRAFT]));
        let agent = WritingAgent::new(model.clone());
        let findings = findings();

        let article = agent.write(&request(&findings, &[])).await.unwrap();

        assert_eq!(article.title, "Quarterly Tax Planning Tips");
        assert_eq!(article.slug, "quarterly-tax-planning-tips");
        assert_eq!(article.category, "Tax Planning");
        assert_eq!(article.author, "FoxGlove CPA");
        assert_eq!(article.tags, vec!["Estimated Taxes", "planning"]);
        assert!(article.body.starts_with("## Why it matters"));
        assert!(chrono::NaiveDate::parse_from_str(&article.published_at, "%Y-%m-%d").is_ok());

        let (system, user) = model.prompt(0);
        assert!(system.contains("professional content writer for FoxGlove CPA"));
        assert!(system.contains("Washington"));
        assert!(user.contains("Generate appropriate tags"));
        assert!(user.contains("Safe harbor rules"));
        assert!(user.contains("Keep it under 1500 words"));
    }

    #[tokio::test]
    async fn test_caller_tags_override_model_tags() {
        let model = Arc::new(ScriptedModel::new(vec![DRAFT]));
        let agent = WritingAgent::new(model.clone());
        let findings = findings();
        let tags = vec!["quarterly-taxes".to_string(), "deadlines".to_string()];

        let article = agent.write(&request(&findings, &tags)).await.unwrap();

        assert_eq!(article.tags, tags);
        let (_, user) = model.prompt(0);
        assert!(user.contains("Suggested tags: quarterly-taxes, deadlines"));
    }

    #[tokio::test]
    async fn test_unparsable_response_is_writing_parse_error() {
        let model = Arc::new(ScriptedModel::new(vec!["# Just markdown, sorry"]));
        let agent = WritingAgent::new(model);
        let findings = findings();

        let err = agent.write(&request(&findings, &[])).await.unwrap_err();
        assert!(matches!(err, ScribeError::WritingParse(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_writing_parse_error() {
        let model = Arc::new(ScriptedModel::new(vec![r#"{"title": "T", "body": ""}"#]));
        let agent = WritingAgent::new(model);
        let findings = findings();

        let err = agent.write(&request(&findings, &[])).await.unwrap_err();
        assert!(matches!(
            err,
            ScribeError::WritingParse(WritingParseError(DecodeError::Invalid("body")))
        ));
    }

    #[tokio::test]
    async fn test_revise_keeps_metadata() {
        let model = Arc::new(ScriptedModel::new(vec![
            DRAFT,
            r###"{"title": "Quarterly Tax Planning, Revised", "body": "## Shorter", "tags": ["other"]}"###,
        ]));
        let agent = WritingAgent::new(model.clone()).with_publisher("Acme Accounting");
        let findings = findings();
        let tags = vec!["deadlines".to_string()];

        let original = agent.write(&request(&findings, &tags)).await.unwrap();
        let revised = agent.revise(&original, "Make it shorter").await.unwrap();

        assert_eq!(revised.title, "Quarterly Tax Planning, Revised");
        assert_eq!(revised.slug, "quarterly-tax-planning-revised");
        assert_eq!(revised.body, "## Shorter");
        assert_eq!(revised.tags, original.tags);
        assert_eq!(revised.category, original.category);
        assert_eq!(revised.published_at, original.published_at);
        assert_eq!(revised.author, "Acme Accounting");

        let (system, user) = model.prompt(1);
        assert!(system.contains("editor for Acme Accounting"));
        assert!(user.contains("Make it shorter"));
        assert!(user.contains("## Why it matters"));
    }

    #[test]
    fn test_strip_front_matter() {
        assert_eq!(
            strip_front_matter("---\ntitle: x\n---\n\n## Body"),
            "\n## Body"
        );
        assert_eq!(strip_front_matter("## Body\n---\n"), "## Body\n---\n");
        assert_eq!(strip_front_matter("---\r\ntitle: x\r\n---\r\nBody"), "Body");
        assert_eq!(strip_front_matter("---\ntitle: x\n---"), "");
    }

    #[tokio::test]
    async fn test_front_matter_only_body_is_writing_parse_error() {
        let model = Arc::new(ScriptedModel::new(vec![
            r#"{"title": "T", "body": "---\ntitle: T\ncategory: x\n---\n"}"#,
        ]));
        let agent = WritingAgent::new(model);
        let findings = findings();

        let err = agent.write(&request(&findings, &[])).await.unwrap_err();
        assert!(matches!(
            err,
            ScribeError::WritingParse(WritingParseError(DecodeError::Invalid("body")))
        ));
    }
}

// SPDX-License-Identifier: MIT

//! LLM Agent - single-turn prompt agent
//!
//! Sends the fixed instruction plus one user message to the model and
//! returns the text of the reply. No tools, no follow-up turns.

use super::Agent;
use crate::adk::error::ModelError;
use crate::adk::model::{Content, GenerationConfig, Model};
use async_trait::async_trait;
use std::sync::Arc;

const PREVIEW_CHARS: usize = 100;

/// Single-turn LLM agent
pub struct LLMAgent {
    pub name: String,
    pub instruction: String,
    pub model: Arc<dyn Model>,
    pub config: GenerationConfig,
}

impl LLMAgent {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        model: Arc<dyn Model>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            model,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }
}

#[async_trait]
impl Agent for LLMAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: String) -> Result<String, ModelError> {
        let history = vec![Content::system(self.instruction.as_str()), Content::user(input)];

        log::info!(
            "Agent {} calling model {}",
            self.name,
            self.model.model_name()
        );
        let response = self
            .model
            .generate_content(&history, Some(&self.config))
            .await?;

        let text = response.text();
        if text.trim().is_empty() {
            log::warn!("Agent {} received empty response", self.name);
            return Err(ModelError::invalid_response(format!(
                "{} received an empty response from {}",
                self.name,
                self.model.model_name()
            )));
        }

        log::debug!(
            "Agent {} returning text response (length: {}, preview: '{}')",
            self.name,
            text.len(),
            preview(&text, PREVIEW_CHARS)
        );
        Ok(text)
    }
}

/// First `max_chars` characters of `text`, on a char boundary
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adk::model::Part;
    use std::sync::Mutex;

    struct EchoModel {
        seen: Mutex<Vec<Content>>,
        reply: Vec<Part>,
    }

    #[async_trait]
    impl Model for EchoModel {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn generate_content(
            &self,
            history: &[Content],
            _config: Option<&GenerationConfig>,
        ) -> Result<Content, ModelError> {
            self.seen.lock().unwrap().extend(history.iter().cloned());
            Ok(Content {
                role: "model".to_string(),
                parts: self.reply.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_run_sends_instruction_and_input() {
        let model = Arc::new(EchoModel {
            seen: Mutex::new(vec![]),
            reply: vec![Part::Text("done".to_string())],
        });
        let agent = LLMAgent::new("tester", "Be terse.", model.clone());

        let out = agent.run("hello".to_string()).await.unwrap();
        assert_eq!(out, "done");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, "system");
        assert_eq!(seen[0].text(), "Be terse.");
        assert_eq!(seen[1].text(), "hello");
    }

    #[tokio::test]
    async fn test_thinking_only_response_is_an_error() {
        let model = Arc::new(EchoModel {
            seen: Mutex::new(vec![]),
            reply: vec![Part::Thinking("...".to_string())],
        });
        let agent = LLMAgent::new("tester", "x", model);

        let err = agent.run("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("abc", 10), "abc");
    }
}

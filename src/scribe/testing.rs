// SPDX-License-Identifier: MIT

//! Scripted collaborators for unit tests

use crate::adk::error::ModelError;
use crate::adk::model::{Content, GenerationConfig, Model};
use crate::scribe::error::FetchError;
use crate::scribe::fetch::{FetchedPage, WebFetcher};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replies with queued responses in order; records every prompt it sees
pub struct ScriptedModel {
    responses: Vec<Result<String, String>>,
    index: AtomicUsize,
    pub prompts: Mutex<Vec<Vec<Content>>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: responses.into_iter().map(|r| Ok(r.to_string())).collect(),
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every call fails
    pub fn failing(message: &str) -> Self {
        Self {
            responses: vec![Err(message.to_string())],
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// System and user text of the nth call
    pub fn prompt(&self, call: usize) -> (String, String) {
        let prompts = self.prompts.lock().unwrap();
        let history = &prompts[call];
        (history[0].text(), history[1].text())
    }
}

#[async_trait]
impl Model for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate_content(
        &self,
        history: &[Content],
        _config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError> {
        self.prompts.lock().unwrap().push(history.to_vec());
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        let last = self.responses.len().saturating_sub(1);
        match &self.responses[idx.min(last)] {
            Ok(text) => Ok(Content::model(text.clone())),
            Err(message) => Err(ModelError::api("scripted", message.clone())),
        }
    }
}

/// Serves one fixed page, or fails every fetch with a 404
pub struct StaticFetcher {
    page: Option<FetchedPage>,
}

impl StaticFetcher {
    pub fn serving(title: &str, content: &str) -> Self {
        Self {
            page: Some(FetchedPage {
                url: String::new(),
                title: title.to_string(),
                content: content.to_string(),
            }),
        }
    }

    pub fn unreachable() -> Self {
        Self { page: None }
    }
}

#[async_trait]
impl WebFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match &self.page {
            Some(page) => Ok(FetchedPage {
                url: url.to_string(),
                ..page.clone()
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

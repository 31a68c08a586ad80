// SPDX-License-Identifier: MIT

//! Gemini Model - Google's Gemini API implementation

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::ModelError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

/// Google Gemini model implementation
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model_name: String,
}

impl GeminiModel {
    /// Create a new GeminiModel
    ///
    /// Requires `GOOGLE_API_KEY` environment variable to be set.
    pub fn new(model_name: String) -> Result<Self, ModelError> {
        let api_key = env::var("GOOGLE_API_KEY")
            .map_err(|_| ModelError::api_key_missing("Gemini", "GOOGLE_API_KEY"))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
        })
    }

    /// The API key travels in the `x-goog-api-key` header, never in the URL
    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model_name
        )
    }

    fn build_request_body(
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = history
            .iter()
            .filter(|c| c.role != "system")
            .map(|c| {
                let parts: Vec<serde_json::Value> =
                    c.parts.iter().filter_map(part_to_gemini_json).collect();
                json!({ "role": c.role, "parts": parts })
            })
            .collect();

        let mut body = json!({
            "contents": contents
        });

        let system: Vec<serde_json::Value> = history
            .iter()
            .filter(|c| c.role == "system")
            .flat_map(|c| c.parts.iter().filter_map(part_to_gemini_json))
            .collect();
        if !system.is_empty() {
            body["systemInstruction"] = json!({ "parts": system });
        }

        if let Some(cfg) = config {
            let mut generation = serde_json::Map::new();
            if let Some(temp) = cfg.temperature {
                generation.insert("temperature".to_string(), json!(temp));
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                generation.insert("maxOutputTokens".to_string(), json!(max_tokens));
            }
            if let Some(top_p) = cfg.top_p {
                generation.insert("topP".to_string(), json!(top_p));
            }
            if let Some(top_k) = cfg.top_k {
                generation.insert("topK".to_string(), json!(top_k));
            }
            if !generation.is_empty() {
                body["generationConfig"] = serde_json::Value::Object(generation);
            }
        }

        body
    }

    fn parse_gemini_response(resp_json: &serde_json::Value) -> Result<Content, ModelError> {
        let candidate = resp_json["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ModelError::invalid_response("No candidates in Gemini response"))?;

        if let Some(finish_reason) = candidate.get("finishReason").and_then(|v| v.as_str()) {
            log::debug!("Gemini finish reason: {}", finish_reason);
            if finish_reason == "SAFETY" {
                return Err(ModelError::invalid_response(
                    "Gemini blocked response due to safety filters",
                ));
            }
        }

        let parts_json = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                log::error!("No content parts in candidate: {}", candidate);
                ModelError::invalid_response("No content parts in Gemini response")
            })?;

        Ok(Content {
            role: "model".to_string(),
            parts: parts_json.iter().flat_map(parse_gemini_part).collect(),
        })
    }
}

#[async_trait]
impl Model for GeminiModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError> {
        let url = self.endpoint();
        let body = Self::build_request_body(history, config);

        log::debug!(
            "Gemini request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await?;
            return Err(ModelError::api("Gemini", format!("{}: {}", status, text)));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("Gemini response: {}", resp_json);

        Self::parse_gemini_response(&resp_json)
    }
}

/// Serialize a Part to Gemini API JSON format
/// Returns None for parts that shouldn't be sent (e.g., Thinking)
pub fn part_to_gemini_json(part: &Part) -> Option<serde_json::Value> {
    match part {
        Part::Text(t) => Some(json!({ "text": t })),
        Part::Thinking(_) => None,
    }
}

/// Parse a Gemini API JSON part into Parts
///
/// Thinking models flag reasoning parts with `"thought": true`.
pub fn parse_gemini_part(p: &serde_json::Value) -> Vec<Part> {
    let mut parts = Vec::new();
    let is_thought = p.get("thought").and_then(|t| t.as_bool()).unwrap_or(false);

    if let Some(text) = p["text"].as_str() {
        if is_thought {
            if !text.is_empty() {
                parts.push(Part::Thinking(text.to_string()));
            }
        } else {
            parts.push(Part::Text(text.to_string()));
        }
    }

    parts
}

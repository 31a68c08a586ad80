// SPDX-License-Identifier: MIT

//! Schema-validated decoding of model responses
//!
//! Prompts embed the JSON Schema of the expected shape (generated with
//! `schemars`); responses go through [`decode`], which locates the JSON
//! object in the reply, deserializes it and runs the type's own validation.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Reasons a model response could not be turned into a typed value
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response does not contain a JSON object")]
    NoJsonObject,

    #[error("response JSON does not match the schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field '{0}' is missing or empty")]
    Invalid(&'static str),
}

/// A structured shape a model is asked to produce
pub trait Schema: DeserializeOwned + JsonSchema {
    /// Reject values that parse but are unusable
    fn validate(&self) -> Result<(), DecodeError>;
}

/// Pretty-printed JSON Schema for `T`, for embedding in prompts
pub fn schema_json<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Standard instruction telling the model how to format its reply
pub fn response_format_instruction<T: JsonSchema>() -> String {
    format!(
        "Respond with a single JSON object and nothing else. \
         It must validate against this JSON Schema:\n{}",
        schema_json::<T>()
    )
}

/// Decode and validate a model response
pub fn decode<T: Schema>(response: &str) -> Result<T, DecodeError> {
    let json = extract_json_object(response).ok_or(DecodeError::NoJsonObject)?;
    let value: T = serde_json::from_str(json)?;
    value.validate()?;
    Ok(value)
}

/// Locate the first complete JSON object in a free-text reply.
///
/// Each `{` is tried as the start of an object and the JSON parser decides
/// where it ends, so fences and prose (including prose with braces) on
/// either side are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
        match stream.next() {
            Some(Ok(serde_json::Value::Object(_))) => {
                Some(&text[start..start + stream.byte_offset()])
            }
            _ => None,
        }
    })
}

/// Validation helper: a trimmed string must not be empty
pub fn require_non_empty(value: &str, field: &'static str) -> Result<(), DecodeError> {
    if value.trim().is_empty() {
        Err(DecodeError::Invalid(field))
    } else {
        Ok(())
    }
}

// SPDX-License-Identifier: MIT

//! Article pipeline: research a topic, write the article, save it to disk

pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod interactive;
pub mod persistence;
pub mod research;
pub mod state;
pub mod workflow;
pub mod writing;

#[cfg(test)]
mod testing;

pub use config::ScribeConfig;
pub use error::ScribeError;
pub use state::{Article, ArticleRequest, ResearchFindings, SourceUsed, Stage, WorkflowState};
pub use workflow::{ArticleWorkflow, WorkflowOutcome};

// SPDX-License-Identifier: MIT

//! Article workflow - START -> RESEARCH -> WRITE -> SAVE -> END
//!
//! Stages run one at a time over a single [`WorkflowState`]. A research
//! failure degrades the run to minimal findings; a write or save failure
//! jumps straight to END and is returned as the outcome's failure.

use crate::adk::agent::preview;
use crate::adk::model::create_model;
use crate::scribe::config::ScribeConfig;
use crate::scribe::error::{ScribeError, StateError};
use crate::scribe::fetch::HttpFetcher;
use crate::scribe::persistence;
use crate::scribe::research::ResearchAgent;
use crate::scribe::state::{ArticleRequest, ResearchFindings, Stage, WorkflowState};
use crate::scribe::writing::{WriteRequest, WritingAgent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const PREVIEW_CHARS: usize = 500;

/// Final state of a run plus the failure that ended it, if any
#[derive(Debug)]
pub struct WorkflowOutcome {
    pub state: WorkflowState,
    pub failure: Option<ScribeError>,
}

impl WorkflowOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct ArticleWorkflow {
    researcher: ResearchAgent,
    writer: WritingAgent,
    articles_dir: PathBuf,
}

impl ArticleWorkflow {
    pub fn new(
        researcher: ResearchAgent,
        writer: WritingAgent,
        articles_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            researcher,
            writer,
            articles_dir: articles_dir.into(),
        }
    }

    /// Production pipeline: provider models for both roles and the HTTP fetcher
    pub fn from_config(config: &ScribeConfig) -> Result<Self, ScribeError> {
        let research_model = create_model(config.provider, &config.research.model)?;
        let writing_model = create_model(config.provider, &config.writing.model)?;
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);

        log::info!(
            "Using research model {} and writing model {}",
            config.research.model,
            config.writing.model
        );

        Ok(Self::new(
            ResearchAgent::from_config(config, research_model, fetcher),
            WritingAgent::from_config(config, writing_model),
            config.articles_dir.clone(),
        ))
    }

    pub fn articles_dir(&self) -> &Path {
        &self.articles_dir
    }

    /// The writer, for follow-up revisions of a produced article
    pub fn writer(&self) -> &WritingAgent {
        &self.writer
    }

    /// Run one article request to completion
    pub async fn run(&self, request: ArticleRequest) -> WorkflowOutcome {
        let mut state = WorkflowState::new(request);
        let run_started = Instant::now();
        let mut failure = None;

        log::info!(
            "[{}] Starting article workflow for topic: {}",
            state.run_id,
            state.topic
        );

        while !state.stage().is_terminal() {
            let stage = state.stage();
            let stage_started = Instant::now();

            let result = match stage {
                Stage::Research => {
                    banner(&state, "PHASE 1: RESEARCH");
                    self.research_step(&mut state).await;
                    Ok(())
                }
                Stage::Write => {
                    banner(&state, "PHASE 2: WRITING");
                    self.write_step(&mut state).await
                }
                Stage::Save => {
                    banner(&state, "PHASE 3: SAVING");
                    self.save_step(&mut state)
                }
                Stage::Start | Stage::End => Ok(()),
            };

            match result {
                Ok(()) => {
                    if stage != Stage::Start {
                        log::info!(
                            "[{}] {} finished in {:.2?}",
                            state.run_id,
                            stage,
                            stage_started.elapsed()
                        );
                    }
                    state.set_stage(stage.next());
                }
                Err(e) => {
                    log::error!("[{}] {} failed: {}", state.run_id, stage, e);
                    failure = Some(e);
                    state.set_stage(Stage::End);
                }
            }
        }

        match state.output_path() {
            Some(path) if failure.is_none() => log::info!(
                "[{}] Workflow complete in {:.2?}: {}",
                state.run_id,
                run_started.elapsed(),
                path.display()
            ),
            _ => log::error!(
                "[{}] Workflow ended without an article after {:.2?}",
                state.run_id,
                run_started.elapsed()
            ),
        }

        WorkflowOutcome { state, failure }
    }

    /// Never fails: errors are recorded and minimal findings substituted
    async fn research_step(&self, state: &mut WorkflowState) {
        let outcome = self
            .researcher
            .research(&state.topic, state.source_url.as_deref(), &state.requirements)
            .await;

        if let Some(fetch_error) = outcome.fallback {
            state.record_error(format!(
                "Could not research from URL, used background knowledge: {}",
                fetch_error
            ));
        }
        let findings = outcome.findings.unwrap_or_else(|e| {
            state.record_error(format!("Research failed, using minimal findings: {}", e));
            ResearchFindings::minimal(&state.topic)
        });

        log::info!(
            "[{}] Research complete ({:?}, {} key points)",
            state.run_id,
            findings.source_used,
            findings.key_points.len()
        );
        log::debug!(
            "Research preview: {}",
            preview(&findings.summary, PREVIEW_CHARS)
        );
        state.set_research_findings(findings);
    }

    async fn write_step(&self, state: &mut WorkflowState) -> Result<(), ScribeError> {
        let article = {
            let findings = state
                .research_findings()
                .ok_or(StateError::ArticleBeforeFindings)?;
            let request = WriteRequest {
                topic: &state.topic,
                findings,
                category: &state.category,
                tags: &state.tags,
                requirements: &state.requirements,
            };
            self.writer.write(&request).await?
        };

        log::info!("[{}] Article title: {}", state.run_id, article.title);
        log::debug!("Article preview: {}", preview(&article.body, PREVIEW_CHARS));
        state.set_article(article)?;
        Ok(())
    }

    fn save_step(&self, state: &mut WorkflowState) -> Result<(), ScribeError> {
        let article = state.article().ok_or(StateError::OutputBeforeArticle)?;
        let path = persistence::save(article, state.filename.as_deref(), &self.articles_dir)?;
        state.set_output_path(path)?;
        Ok(())
    }
}

fn banner(state: &WorkflowState, title: &str) {
    log::info!("{}", "=".repeat(60));
    log::info!("[{}] {}", state.run_id, title);
    log::info!("{}", "=".repeat(60));
}

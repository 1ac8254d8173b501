//! Glue between the in-memory canvas and the remote workspace API.
//!
//! The canvas itself never performs I/O. [`CanvasSync`] owns a [`Canvas`]
//! and a [`WorkspaceRemote`] and runs the collaborator side of each flow:
//!
//! - refresh: cancel any gesture, fetch, then full-replace load;
//! - moves: apply locally, persist, and on failure apply the inverse move;
//!   a move naming an id the canvas doesn't know triggers a reload;
//! - regeneration: synthesize for the current actors, then mark synthesized.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::assignment::AssignmentResult;
use crate::canvas::Canvas;
use crate::drag::DragOutcome;
use crate::error::CanvasError;
use crate::models::{AssignTarget, WorkspaceSnapshot};

/// What the synthesis endpoint reports back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisOutcome {
    pub rationale: Option<String>,
    /// The server regenerated the journey steps, so the workspace must be
    /// fetched again.
    pub steps_regenerated: bool,
}

/// The remote API as seen by the canvas.
#[allow(async_fn_in_trait)]
pub trait WorkspaceRemote {
    async fn fetch_workspace(&self) -> Result<WorkspaceSnapshot>;

    async fn persist_assignment(&self, feature_id: Uuid, step_id: Option<Uuid>) -> Result<()>;

    async fn synthesize_value_path(&self, actor_ids: &BTreeSet<Uuid>) -> Result<SynthesisOutcome>;
}

pub struct CanvasSync<R> {
    canvas: Canvas,
    remote: R,
}

impl<R: WorkspaceRemote> CanvasSync<R> {
    pub fn new(canvas: Canvas, remote: R) -> Self {
        Self { canvas, remote }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Fetch the workspace and replace local state with it.
    pub async fn refresh(&mut self) -> Result<()> {
        if self.canvas.drag_state().is_active() {
            tracing::warn!("Cancelling active drag session before reload");
            self.canvas.cancel_drag();
        }
        let snapshot = self
            .remote
            .fetch_workspace()
            .await
            .context("Failed to fetch workspace")?;
        self.canvas.load(snapshot)?;
        Ok(())
    }

    /// Finish the current gesture and persist the move it produced.
    pub async fn release_drag(&mut self) -> Result<DragOutcome> {
        let outcome = match self.canvas.release() {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.recover(e).await),
        };
        if let DragOutcome::Committed(result) = outcome {
            self.persist(result).await?;
        }
        Ok(outcome)
    }

    /// Move a feature without a gesture and persist it.
    pub async fn move_feature(
        &mut self,
        feature_id: Uuid,
        target: AssignTarget,
    ) -> Result<AssignmentResult> {
        let result = match self.canvas.assign(feature_id, target) {
            Ok(result) => result,
            Err(e) => return Err(self.recover(e).await),
        };
        self.persist(result).await?;
        Ok(result)
    }

    /// Regenerate the value path for the current actor selection.
    ///
    /// The actor set is captured before the remote call and is what gets
    /// recorded on success. On failure the canvas stays stale.
    pub async fn regenerate(&mut self) -> Result<()> {
        let actor_ids = self.canvas.current_actor_ids();
        let outcome = self
            .remote
            .synthesize_value_path(&actor_ids)
            .await
            .context("Value path synthesis failed")?;

        self.canvas.mark_synthesized(&actor_ids, outcome.rationale);
        if outcome.steps_regenerated {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Unknown ids mean the local view is behind the server; reload before
    /// handing the error back.
    async fn recover(&mut self, e: CanvasError) -> anyhow::Error {
        if e.needs_reload() {
            tracing::warn!(error = %e, "Local view is stale, reloading");
            if let Err(reload) = self.refresh().await {
                return reload.context(e);
            }
        }
        e.into()
    }

    async fn persist(&mut self, result: AssignmentResult) -> Result<()> {
        if !result.changed {
            return Ok(());
        }
        let persisted = self
            .remote
            .persist_assignment(result.feature_id, result.new_step_id)
            .await;
        if let Err(e) = persisted {
            tracing::warn!(
                feature = %result.feature_id,
                error = %e,
                "Persisting assignment failed, rolling back"
            );
            self.canvas
                .assign(result.feature_id, result.inverse())
                .context("Failed to roll back feature assignment")?;
            return Err(e.context("Failed to persist feature assignment"));
        }
        Ok(())
    }
}

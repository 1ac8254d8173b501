//! Scripted gesture replay.
//!
//! A script is a JSON array of [`GestureStep`]s applied to a [`Canvas`] in
//! order, the same calls a view layer would make. A failing step is recorded
//! in its [`ReplayOutcome`] and the script carries on, so conflicts and
//! unknown ids can be demonstrated without aborting.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::AssignmentResult;
use crate::canvas::Canvas;
use crate::drag::DragOutcome;
use crate::error::CanvasError;
use crate::models::{AssignTarget, WorkspaceSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GestureStep {
    Lift {
        feature_id: Uuid,
    },
    Hover {
        step_id: Uuid,
    },
    HoverPool,
    HoverNone,
    Release,
    Cancel,
    /// Direct move without a gesture. `step_id: null` targets the pool.
    Assign {
        feature_id: Uuid,
        #[serde(default)]
        step_id: Option<Uuid>,
    },
    /// Record a synthesis for the currently selected actors.
    MarkSynthesized {
        #[serde(default)]
        rationale: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEffect {
    Lifted,
    Hovered,
    Drag(DragOutcome),
    Assigned(AssignmentResult),
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub step: GestureStep,
    pub result: Result<StepEffect, CanvasError>,
}

impl fmt::Display for ReplayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let effect = match &self.result {
            Ok(StepEffect::Lifted) => "lifted".to_string(),
            Ok(StepEffect::Hovered) => "hovering".to_string(),
            Ok(StepEffect::Drag(DragOutcome::Committed(r))) | Ok(StepEffect::Assigned(r)) => {
                describe_move(r)
            }
            Ok(StepEffect::Drag(DragOutcome::Cancelled { .. })) => "cancelled".to_string(),
            Ok(StepEffect::Drag(DragOutcome::NoSession)) => "no active session".to_string(),
            Ok(StepEffect::Synthesized) => "synthesized".to_string(),
            Err(e) => format!("error: {}", e),
        };
        write!(f, "{:?} -> {}", self.step, effect)
    }
}

fn describe_move(result: &AssignmentResult) -> String {
    if !result.changed {
        return "unchanged".to_string();
    }
    let place = |step: Option<Uuid>| step.map_or("pool".to_string(), |id| id.to_string());
    format!(
        "moved {} from {} to {}",
        result.feature_id,
        place(result.previous_step_id),
        place(result.new_step_id)
    )
}

/// Apply `script` to `canvas`, one outcome per step.
pub fn replay(canvas: &mut Canvas, script: &[GestureStep]) -> Vec<ReplayOutcome> {
    script
        .iter()
        .map(|step| ReplayOutcome {
            step: step.clone(),
            result: apply(canvas, step),
        })
        .collect()
}

fn apply(canvas: &mut Canvas, step: &GestureStep) -> Result<StepEffect, CanvasError> {
    match step {
        GestureStep::Lift { feature_id } => canvas.lift(*feature_id).map(|()| StepEffect::Lifted),
        GestureStep::Hover { step_id } => {
            canvas.hover(Some(AssignTarget::Step(*step_id)));
            Ok(StepEffect::Hovered)
        }
        GestureStep::HoverPool => {
            canvas.hover(Some(AssignTarget::Unassigned));
            Ok(StepEffect::Hovered)
        }
        GestureStep::HoverNone => {
            canvas.hover(None);
            Ok(StepEffect::Hovered)
        }
        GestureStep::Release => canvas.release().map(StepEffect::Drag),
        GestureStep::Cancel => Ok(StepEffect::Drag(canvas.cancel_drag())),
        GestureStep::Assign {
            feature_id,
            step_id,
        } => canvas
            .assign(*feature_id, AssignTarget::from(*step_id))
            .map(StepEffect::Assigned),
        GestureStep::MarkSynthesized { rationale } => {
            let actor_ids = canvas.current_actor_ids();
            canvas.mark_synthesized(&actor_ids, rationale.clone());
            Ok(StepEffect::Synthesized)
        }
    }
}

pub fn read_snapshot(path: &Path) -> Result<WorkspaceSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read workspace file {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse workspace file")
}

pub fn read_script(path: &Path) -> Result<Vec<GestureStep>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse script file")
}

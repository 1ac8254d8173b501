//! Drag session controller.
//!
//! Models one pointer-driven reassignment gesture independent of any input
//! library. The view layer translates raw pointer events into three calls:
//! [`DragController::lift`], [`DragController::hover`] and
//! [`DragController::release`]. Nothing touches the store until release.
//!
//! ```text
//! Idle ──lift──▶ Lifted ──hover──▶ Hovering ──hover──▶ Hovering
//!  ▲               │                  │
//!  │            release/cancel     release over target ──▶ assign()
//!  └───────────────┴──────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::AssignmentResult;
use crate::error::{CanvasError, Result};
use crate::models::AssignTarget;
use crate::store::EntityStore;

/// Where a gesture currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    /// A feature chip has been picked up but not moved over any target yet.
    Lifted { feature_id: Uuid },
    /// The gesture is over `candidate`, or over nothing droppable.
    Hovering {
        feature_id: Uuid,
        candidate: Option<AssignTarget>,
    },
}

impl DragState {
    /// The feature being dragged, if a session is active.
    pub fn feature_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Lifted { feature_id } | Self::Hovering { feature_id, .. } => Some(*feature_id),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Released over a target; the assignment engine ran.
    Committed(AssignmentResult),
    /// Released over nothing, or cancelled. No assignment happened.
    Cancelled { feature_id: Uuid },
    /// Release arrived with no active session.
    NoSession,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Start a session for `feature_id`.
    ///
    /// Only one session may exist; the caller must cancel the current one
    /// before starting another.
    pub fn lift(&mut self, feature_id: Uuid) -> Result<()> {
        if let Some(active) = self.state.feature_id() {
            tracing::warn!(%active, requested = %feature_id, "Drag session conflict");
            return Err(CanvasError::SessionConflict { active });
        }
        tracing::debug!(feature = %feature_id, "Drag lifted");
        self.state = DragState::Lifted { feature_id };
        Ok(())
    }

    /// Update the drop target under the pointer. Last write wins.
    ///
    /// Hover events with no active session are dropped.
    pub fn hover(&mut self, candidate: Option<AssignTarget>) {
        match self.state.feature_id() {
            Some(feature_id) => {
                self.state = DragState::Hovering {
                    feature_id,
                    candidate,
                };
            }
            None => tracing::trace!("Ignoring hover with no drag session"),
        }
    }

    /// End the gesture.
    ///
    /// Over a target this commits through the assignment engine; the
    /// controller returns to idle whether or not the assignment succeeded.
    pub fn release(&mut self, store: &mut EntityStore) -> Result<DragOutcome> {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Idle => Ok(DragOutcome::NoSession),
            DragState::Hovering {
                feature_id,
                candidate: Some(target),
            } => {
                tracing::debug!(feature = %feature_id, %target, "Drag committing");
                store
                    .assignments()
                    .assign(feature_id, target)
                    .map(DragOutcome::Committed)
            }
            DragState::Lifted { feature_id }
            | DragState::Hovering {
                feature_id,
                candidate: None,
            } => {
                tracing::debug!(feature = %feature_id, "Drag released over no target");
                Ok(DragOutcome::Cancelled { feature_id })
            }
        }
    }

    /// Abandon the session, e.g. on Escape. Safe to call when idle.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state).feature_id() {
            Some(feature_id) => {
                tracing::debug!(feature = %feature_id, "Drag cancelled");
                DragOutcome::Cancelled { feature_id }
            }
            None => DragOutcome::NoSession,
        }
    }
}

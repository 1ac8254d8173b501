//! The assignment engine: the only mutator of the feature → step mapping.
//!
//! A move removes the feature from its previous step (or the pool), records
//! the new assignment and appends the feature to the end of the target's
//! projection, all within one call. Moving a feature onto the target it is
//! already on is a no-op reported as `changed: false`, so callers can skip
//! the persistence round-trip.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CanvasError, Result};
use crate::models::AssignTarget;
use crate::store::EntityStore;

/// Outcome of a single `assign` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub feature_id: Uuid,
    /// False when the feature already sat on the requested target.
    pub changed: bool,
    pub previous_step_id: Option<Uuid>,
    pub new_step_id: Option<Uuid>,
}

impl AssignmentResult {
    fn unchanged(feature_id: Uuid, step_id: Option<Uuid>) -> Self {
        Self {
            feature_id,
            changed: false,
            previous_step_id: step_id,
            new_step_id: step_id,
        }
    }

    /// The target that undoes this move. Used to roll back local state when
    /// persisting the move fails.
    pub fn inverse(&self) -> AssignTarget {
        AssignTarget::from(self.previous_step_id)
    }
}

/// A single move in a bulk reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub feature_id: Uuid,
    pub target: AssignTarget,
}

/// Borrowing handle that applies reassignments to an [`EntityStore`].
pub struct AssignmentEngine<'s> {
    store: &'s mut EntityStore,
}

impl<'s> AssignmentEngine<'s> {
    pub fn new(store: &'s mut EntityStore) -> Self {
        Self { store }
    }

    /// Move `feature_id` onto `target`.
    ///
    /// Fails with `UnknownEntity` if the feature or target step is not
    /// loaded. Any legal move succeeds, including repeating the same one.
    pub fn assign(&mut self, feature_id: Uuid, target: AssignTarget) -> Result<AssignmentResult> {
        self.validate(feature_id, target)?;

        let current = self.store.step_of(feature_id)?;
        let new_step_id = target.step_id();
        if current == new_step_id {
            tracing::debug!(feature = %feature_id, %target, "Feature already on target");
            return Ok(AssignmentResult::unchanged(feature_id, current));
        }

        let previous_step_id = self.store.set_assignment(feature_id, new_step_id)?;
        Ok(AssignmentResult {
            feature_id,
            changed: true,
            previous_step_id,
            new_step_id,
        })
    }

    /// Apply several moves in order.
    ///
    /// Every move is validated before the first one is applied, so an
    /// unknown id leaves the store untouched. Later moves of the same
    /// feature win.
    pub fn assign_many(&mut self, moves: &[Move]) -> Result<Vec<AssignmentResult>> {
        for m in moves {
            self.validate(m.feature_id, m.target)?;
        }
        moves
            .iter()
            .map(|m| self.assign(m.feature_id, m.target))
            .collect()
    }

    fn validate(&self, feature_id: Uuid, target: AssignTarget) -> Result<()> {
        if !self.store.contains_feature(feature_id) {
            tracing::warn!(feature = %feature_id, "Rejected move of unknown feature");
            return Err(CanvasError::unknown_feature(feature_id));
        }
        if let AssignTarget::Step(step_id) = target {
            if !self.store.contains_step(step_id) {
                tracing::warn!(step = %step_id, "Rejected move onto unknown step");
                return Err(CanvasError::unknown_step(step_id));
            }
        }
        Ok(())
    }
}

impl EntityStore {
    /// Borrow the assignment engine for this store.
    pub fn assignments(&mut self) -> AssignmentEngine<'_> {
        AssignmentEngine::new(self)
    }
}

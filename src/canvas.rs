//! The canvas: entity store, drag controller and event feed behind one owner.
//!
//! A view layer holds a single [`Canvas`], forwards gestures into it and
//! drains [`CanvasEvent`]s to know what to re-render. All methods are
//! synchronous; awaiting remote calls happens in [`crate::sync`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::{AssignmentResult, Move};
use crate::drag::{DragController, DragOutcome, DragState};
use crate::error::Result;
use crate::models::*;
use crate::store::{EntityStore, OrphanPolicy};

/// Changes a subscribed view should react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// State was replaced by a load.
    Loaded,
    /// A feature changed step. Only emitted for `changed: true` moves.
    FeatureMoved(AssignmentResult),
    /// The value path flipped between trustworthy and outdated.
    StalenessChanged { stale: bool },
    /// A synthesis completed for this actor set.
    Synthesized { actor_ids: BTreeSet<Uuid> },
}

#[derive(Debug, Default)]
pub struct Canvas {
    store: EntityStore,
    drag: DragController,
    events: Vec<CanvasEvent>,
    stale: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orphan_policy(orphan_policy: OrphanPolicy) -> Self {
        Self {
            store: EntityStore::with_orphan_policy(orphan_policy),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Drain pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // ============================================================
    // Loading
    // ============================================================

    /// Replace all state from a snapshot.
    ///
    /// An active drag session is cancelled first, even if the load fails.
    pub fn load(&mut self, snapshot: WorkspaceSnapshot) -> Result<()> {
        if let Some(feature_id) = self.drag.state().feature_id() {
            tracing::warn!(feature = %feature_id, "Cancelling drag session for reload");
            self.drag.cancel();
        }
        self.store.load_snapshot(snapshot)?;
        self.events.push(CanvasEvent::Loaded);
        self.refresh_staleness();
        Ok(())
    }

    // ============================================================
    // Direct moves
    // ============================================================

    /// Move a feature without a gesture, e.g. from a context menu.
    pub fn assign(&mut self, feature_id: Uuid, target: AssignTarget) -> Result<AssignmentResult> {
        let result = self.store.assignments().assign(feature_id, target)?;
        self.record_move(result);
        Ok(result)
    }

    pub fn assign_many(&mut self, moves: &[Move]) -> Result<Vec<AssignmentResult>> {
        let results = self.store.assignments().assign_many(moves)?;
        for result in &results {
            self.record_move(*result);
        }
        Ok(results)
    }

    // ============================================================
    // Gestures
    // ============================================================

    /// Pick up a feature chip. The feature must be loaded.
    pub fn lift(&mut self, feature_id: Uuid) -> Result<()> {
        self.store.feature(feature_id)?;
        self.drag.lift(feature_id)
    }

    pub fn hover(&mut self, candidate: Option<AssignTarget>) {
        self.drag.hover(candidate);
    }

    pub fn release(&mut self) -> Result<DragOutcome> {
        let outcome = self.drag.release(&mut self.store)?;
        if let DragOutcome::Committed(result) = outcome {
            self.record_move(result);
        }
        Ok(outcome)
    }

    pub fn cancel_drag(&mut self) -> DragOutcome {
        self.drag.cancel()
    }

    // ============================================================
    // Synthesis
    // ============================================================

    /// The actor set a regeneration should be requested for.
    pub fn current_actor_ids(&self) -> BTreeSet<Uuid> {
        self.store.actor_ids()
    }

    /// Record that the value path was regenerated for `actor_ids`.
    pub fn mark_synthesized(&mut self, actor_ids: &BTreeSet<Uuid>, rationale: Option<String>) {
        self.store.mark_synthesized(actor_ids, rationale);
        self.events.push(CanvasEvent::Synthesized {
            actor_ids: actor_ids.clone(),
        });
        self.refresh_staleness();
    }

    fn record_move(&mut self, result: AssignmentResult) {
        if result.changed {
            self.events.push(CanvasEvent::FeatureMoved(result));
        }
    }

    fn refresh_staleness(&mut self) {
        let stale = self.store.is_synthesis_stale();
        if stale != self.stale {
            tracing::info!(stale, "Value path staleness changed");
            self.stale = stale;
            self.events.push(CanvasEvent::StalenessChanged { stale });
        }
    }
}

//! The entity store: single source of truth for one workspace's canvas.
//!
//! The store owns features, journey steps, selected actors and the last
//! synthesis record. It maintains two projections incrementally so that
//! reads never have to filter the full feature list:
//!
//! - per step, the ids of the features mapped onto it, in assignment order;
//! - the unassigned pool, in load order.
//!
//! Only [`crate::assignment::AssignmentEngine`] mutates the assignment,
//! through the crate-private [`EntityStore::set_assignment`].

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CanvasError, Result};
use crate::models::*;
use crate::staleness::SynthesisTracker;

/// What `load` does with a feature that points at a step missing from the
/// same snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Reject the whole load with `UnknownEntity`.
    #[default]
    Reject,
    /// Move the feature into the unassigned pool and keep loading.
    Unassign,
}

#[derive(Debug, Default)]
pub struct EntityStore {
    /// Features in load order.
    features: Vec<Feature>,
    feature_pos: HashMap<Uuid, usize>,
    /// Steps sorted by `step_index`.
    steps: Vec<JourneyStep>,
    step_pos: HashMap<Uuid, usize>,
    actors: Vec<Actor>,
    actor_pos: HashMap<Uuid, usize>,
    /// Feature ids per step, in the order they were assigned.
    step_features: HashMap<Uuid, Vec<Uuid>>,
    /// Load positions of unassigned features.
    pool: BTreeSet<usize>,
    tracker: SynthesisTracker,
    orphan_policy: OrphanPolicy,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orphan_policy(orphan_policy: OrphanPolicy) -> Self {
        Self {
            orphan_policy,
            ..Self::default()
        }
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    // ============================================================
    // Loading
    // ============================================================

    /// Replace all state with the given entities.
    ///
    /// The snapshot is validated in full before anything is swapped in, so a
    /// failed load leaves the previous state untouched. Steps may arrive in
    /// any order; they are kept sorted by `step_index`, which must be dense
    /// and start at zero.
    pub fn load(
        &mut self,
        features: Vec<Feature>,
        steps: Vec<JourneyStep>,
        actors: Vec<Actor>,
        synthesis: Option<SynthesisRecord>,
    ) -> Result<()> {
        let mut steps = steps;
        steps.sort_by_key(|s| s.step_index);

        let mut step_pos = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if step_pos.insert(step.id, i).is_some() {
                return Err(CanvasError::InvalidLoad(format!(
                    "duplicate step id {}",
                    step.id
                )));
            }
            if step.step_index as usize != i {
                return Err(CanvasError::InvalidLoad(format!(
                    "step indices must be dense from 0, found {} at position {}",
                    step.step_index, i
                )));
            }
        }

        let mut actor_pos = HashMap::with_capacity(actors.len());
        for (i, actor) in actors.iter().enumerate() {
            if actor_pos.insert(actor.id, i).is_some() {
                return Err(CanvasError::InvalidLoad(format!(
                    "duplicate actor id {}",
                    actor.id
                )));
            }
        }

        let mut features = features;
        let mut feature_pos = HashMap::with_capacity(features.len());
        let mut step_features: HashMap<Uuid, Vec<Uuid>> =
            steps.iter().map(|s| (s.id, Vec::new())).collect();
        let mut pool = BTreeSet::new();

        for (i, feature) in features.iter_mut().enumerate() {
            if feature_pos.insert(feature.id, i).is_some() {
                return Err(CanvasError::InvalidLoad(format!(
                    "duplicate feature id {}",
                    feature.id
                )));
            }

            match feature.assigned_step_id {
                Some(step_id) => match step_features.get_mut(&step_id) {
                    Some(ids) => ids.push(feature.id),
                    None => match self.orphan_policy {
                        OrphanPolicy::Reject => return Err(CanvasError::unknown_step(step_id)),
                        OrphanPolicy::Unassign => {
                            tracing::warn!(
                                feature = %feature.id,
                                step = %step_id,
                                "Feature references a missing step, moving it to the pool"
                            );
                            feature.assigned_step_id = None;
                            pool.insert(i);
                        }
                    },
                },
                None => {
                    pool.insert(i);
                }
            }
        }

        tracing::info!(
            features = features.len(),
            steps = steps.len(),
            actors = actors.len(),
            synthesized = synthesis.is_some(),
            "Loaded workspace"
        );

        self.features = features;
        self.feature_pos = feature_pos;
        self.steps = steps;
        self.step_pos = step_pos;
        self.actors = actors;
        self.actor_pos = actor_pos;
        self.step_features = step_features;
        self.pool = pool;
        self.tracker.replace(synthesis);

        debug_assert!(self.is_consistent());
        Ok(())
    }

    pub fn load_snapshot(&mut self, snapshot: WorkspaceSnapshot) -> Result<()> {
        self.load(
            snapshot.features,
            snapshot.steps,
            snapshot.actors,
            snapshot.synthesis,
        )
    }

    /// Export the current state in the same shape `load_snapshot` accepts.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            features: self.features.clone(),
            steps: self.steps.clone(),
            actors: self.actors.clone(),
            synthesis: self.tracker.record().cloned(),
        }
    }

    // ============================================================
    // Feature and step reads
    // ============================================================

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Steps in `step_index` order.
    pub fn steps(&self) -> &[JourneyStep] {
        &self.steps
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn feature(&self, id: Uuid) -> Result<&Feature> {
        self.feature_pos
            .get(&id)
            .map(|&pos| &self.features[pos])
            .ok_or_else(|| CanvasError::unknown_feature(id))
    }

    pub fn step(&self, id: Uuid) -> Result<&JourneyStep> {
        self.step_pos
            .get(&id)
            .map(|&pos| &self.steps[pos])
            .ok_or_else(|| CanvasError::unknown_step(id))
    }

    pub fn actor(&self, id: Uuid) -> Result<&Actor> {
        self.actor_pos
            .get(&id)
            .map(|&pos| &self.actors[pos])
            .ok_or_else(|| CanvasError::unknown_actor(id))
    }

    pub fn contains_feature(&self, id: Uuid) -> bool {
        self.feature_pos.contains_key(&id)
    }

    pub fn contains_step(&self, id: Uuid) -> bool {
        self.step_pos.contains_key(&id)
    }

    /// The step a feature is currently mapped to.
    pub fn step_of(&self, feature_id: Uuid) -> Result<Option<Uuid>> {
        self.feature(feature_id).map(|f| f.assigned_step_id)
    }

    /// Unassigned features in load order.
    ///
    /// The iterator is lazy and `Clone`, so a caller can walk it again
    /// without asking the store twice.
    pub fn unassigned_features(&self) -> impl Iterator<Item = &Feature> + Clone + '_ {
        self.pool.iter().map(move |&pos| &self.features[pos])
    }

    /// Features mapped onto `step_id`, in the order they were assigned.
    pub fn features_for_step(
        &self,
        step_id: Uuid,
    ) -> Result<impl Iterator<Item = &Feature> + Clone + '_> {
        let ids = self
            .step_features
            .get(&step_id)
            .ok_or_else(|| CanvasError::unknown_step(step_id))?;
        Ok(ids
            .iter()
            .filter_map(move |id| self.feature_pos.get(id).map(|&pos| &self.features[pos])))
    }

    /// Number of MVP features on a step, shown on the step header.
    pub fn mvp_count_for_step(&self, step_id: Uuid) -> Result<usize> {
        Ok(self.features_for_step(step_id)?.filter(|f| f.is_mvp).count())
    }

    // ============================================================
    // Actors and synthesis
    // ============================================================

    /// The current actor selection as a set.
    pub fn actor_ids(&self) -> BTreeSet<Uuid> {
        self.actors.iter().map(|a| a.id).collect()
    }

    pub fn synthesis(&self) -> Option<&SynthesisRecord> {
        self.tracker.record()
    }

    /// Whether the value path no longer matches the selected actors.
    pub fn is_synthesis_stale(&self) -> bool {
        self.tracker.is_stale(&self.actor_ids())
    }

    /// Record a completed synthesis for `actor_ids`.
    pub fn mark_synthesized<'a>(
        &mut self,
        actor_ids: impl IntoIterator<Item = &'a Uuid>,
        rationale: Option<String>,
    ) -> &SynthesisRecord {
        self.tracker.mark_synthesized(actor_ids, rationale)
    }

    // ============================================================
    // Assignment primitive
    // ============================================================

    /// Move a feature to `step_id` (or the pool), returning its previous step.
    ///
    /// Callers outside the assignment engine must not use this; it does not
    /// short-circuit when the target equals the current step.
    pub(crate) fn set_assignment(
        &mut self,
        feature_id: Uuid,
        step_id: Option<Uuid>,
    ) -> Result<Option<Uuid>> {
        let pos = *self
            .feature_pos
            .get(&feature_id)
            .ok_or_else(|| CanvasError::unknown_feature(feature_id))?;
        if let Some(step_id) = step_id {
            if !self.step_pos.contains_key(&step_id) {
                return Err(CanvasError::unknown_step(step_id));
            }
        }

        let previous = self.features[pos].assigned_step_id;
        match previous {
            Some(prev) => {
                if let Some(ids) = self.step_features.get_mut(&prev) {
                    ids.retain(|id| *id != feature_id);
                }
            }
            None => {
                self.pool.remove(&pos);
            }
        }

        match step_id {
            Some(step_id) => self
                .step_features
                .entry(step_id)
                .or_default()
                .push(feature_id),
            None => {
                self.pool.insert(pos);
            }
        }
        self.features[pos].assigned_step_id = step_id;

        tracing::debug!(
            feature = %feature_id,
            from = ?previous,
            to = ?step_id,
            "Feature assignment updated"
        );
        debug_assert!(self.is_consistent());
        Ok(previous)
    }

    /// Verify that every feature appears in exactly one place (one step's
    /// projection or the pool) and that it agrees with `assigned_step_id`.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.features.len());

        for (step_id, ids) in &self.step_features {
            if !self.step_pos.contains_key(step_id) {
                return false;
            }
            for id in ids {
                let Some(&pos) = self.feature_pos.get(id) else {
                    return false;
                };
                if !seen.insert(*id) || self.features[pos].assigned_step_id != Some(*step_id) {
                    return false;
                }
            }
        }

        for &pos in &self.pool {
            let Some(feature) = self.features.get(pos) else {
                return false;
            };
            if !seen.insert(feature.id) || feature.assigned_step_id.is_some() {
                return false;
            }
        }

        seen.len() == self.features.len()
    }
}

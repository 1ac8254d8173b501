//! Value-path staleness tracking.
//!
//! A synthesized value path is only trustworthy for the actor selection it
//! was generated from. The tracker compares the current selection against
//! the last [`SynthesisRecord`] using set semantics: order is irrelevant,
//! and primary and secondary actors count alike.

use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::models::SynthesisRecord;

/// Decide whether the displayed value path is stale for `current_actor_ids`.
///
/// - no record and at least one actor: stale (nothing synthesized yet)
/// - a record whose actor set differs from the current one in any element: stale
/// - otherwise, including no record and no actors: not stale
pub fn compute_stale(current_actor_ids: &BTreeSet<Uuid>, record: Option<&SynthesisRecord>) -> bool {
    match record {
        None => !current_actor_ids.is_empty(),
        Some(record) => current_actor_ids
            .symmetric_difference(&record.synthesized_actor_ids)
            .next()
            .is_some(),
    }
}

/// Holds the last synthesis record and answers staleness queries against it.
///
/// The tracker never triggers synthesis. It exposes the stale flag and the
/// snapshot primitive; the collaborator calls the remote endpoint and then
/// reports success through [`SynthesisTracker::mark_synthesized`].
#[derive(Debug, Clone, Default)]
pub struct SynthesisTracker {
    record: Option<SynthesisRecord>,
}

impl SynthesisTracker {
    pub fn new(record: Option<SynthesisRecord>) -> Self {
        Self { record }
    }

    pub fn record(&self) -> Option<&SynthesisRecord> {
        self.record.as_ref()
    }

    pub fn is_stale(&self, current_actor_ids: &BTreeSet<Uuid>) -> bool {
        compute_stale(current_actor_ids, self.record.as_ref())
    }

    /// Replace the record with a snapshot of `actor_ids`.
    ///
    /// The ids are copied, so later changes to the caller's selection do not
    /// leak into the record.
    pub fn mark_synthesized<'a>(
        &mut self,
        actor_ids: impl IntoIterator<Item = &'a Uuid>,
        rationale: Option<String>,
    ) -> &SynthesisRecord {
        let record = SynthesisRecord {
            synthesized_actor_ids: actor_ids.into_iter().copied().collect(),
            rationale,
            synthesized_at: Some(Utc::now()),
        };
        tracing::info!(
            actors = record.synthesized_actor_ids.len(),
            "Value path marked as synthesized"
        );
        self.record.insert(record)
    }

    /// Swap in a record received from the server, wholesale.
    pub fn replace(&mut self, record: Option<SynthesisRecord>) {
        self.record = record;
    }
}

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata from the last value-path synthesis.
///
/// The record captures which actors were selected when the path was
/// generated. Whether the path is stale is derived by comparing this set
/// against the current selection; it is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SynthesisRecord {
    pub synthesized_actor_ids: BTreeSet<Uuid>,
    /// Free-text explanation produced alongside the path. Opaque here.
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub synthesized_at: Option<DateTime<Utc>>,
}

impl SynthesisRecord {
    pub fn new(actor_ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            synthesized_actor_ids: actor_ids.into_iter().collect(),
            rationale: None,
            synthesized_at: None,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Actor, Feature, JourneyStep, SynthesisRecord};

/// Everything the canvas needs for one workspace, as handed over by the
/// fetch collaborator. Loading a snapshot replaces all canvas state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub steps: Vec<JourneyStep>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub synthesis: Option<SynthesisRecord>,
}

/// Where a feature can be placed: onto a journey step or back into the pool.
///
/// This is also the drop-target vocabulary of a drag gesture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssignTarget {
    Step(Uuid),
    Unassigned,
}

impl AssignTarget {
    pub fn step_id(&self) -> Option<Uuid> {
        match self {
            Self::Step(id) => Some(*id),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<Uuid>> for AssignTarget {
    fn from(step_id: Option<Uuid>) -> Self {
        step_id.map_or(Self::Unassigned, Self::Step)
    }
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(id) => write!(f, "step {}", id),
            Self::Unassigned => f.write_str("unassigned pool"),
        }
    }
}

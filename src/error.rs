//! Errors raised by the canvas core.
//!
//! Every error here is synchronous and local. A no-op reassignment is not an
//! error; see [`crate::assignment::AssignmentResult::changed`].

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Canvas core errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// A referenced id is not in the currently loaded set. The local view is
    /// stale and should be reloaded.
    #[error("Unknown {kind}: {id}")]
    UnknownEntity { kind: EntityKind, id: Uuid },

    /// A drag session was started while another one is still active.
    #[error("A drag session is already active for feature {active}")]
    SessionConflict { active: Uuid },

    /// The snapshot handed to `load` breaks a data model invariant.
    #[error("Invalid workspace snapshot: {0}")]
    InvalidLoad(String),
}

impl CanvasError {
    pub fn unknown_feature(id: Uuid) -> Self {
        Self::UnknownEntity {
            kind: EntityKind::Feature,
            id,
        }
    }

    pub fn unknown_step(id: Uuid) -> Self {
        Self::UnknownEntity {
            kind: EntityKind::Step,
            id,
        }
    }

    pub fn unknown_actor(id: Uuid) -> Self {
        Self::UnknownEntity {
            kind: EntityKind::Actor,
            id,
        }
    }

    /// Whether the caller should reload the workspace to recover.
    pub fn needs_reload(&self) -> bool {
        matches!(self, Self::UnknownEntity { .. })
    }
}

/// The kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Feature,
    Step,
    Actor,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Feature => "feature",
            Self::Step => "step",
            Self::Actor => "actor",
        })
    }
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;

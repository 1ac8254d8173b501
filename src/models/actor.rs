use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persona selected onto the canvas. The set of selected actors is the
/// input to value-path synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    /// Job title or stakeholder role, free text.
    #[serde(default)]
    pub role: String,
    pub canvas_role: CanvasRole,
}

impl Actor {
    pub fn new(id: Uuid, name: impl Into<String>, canvas_role: CanvasRole) -> Self {
        Self {
            id,
            name: name.into(),
            role: String::new(),
            canvas_role,
        }
    }
}

/// How prominently an actor features on the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CanvasRole {
    Primary,
    Secondary,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered stage of the customer value path.
///
/// Steps are synthesized upstream and never reordered here. The features
/// mapped onto a step are a projection held by the entity store, not a
/// field of the step itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JourneyStep {
    pub id: Uuid,
    /// Zero-based position in the path. Dense and unique within a workspace.
    pub step_index: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The persona performing this step, if one was attributed.
    #[serde(default)]
    pub actor_persona_id: Option<Uuid>,
}

impl JourneyStep {
    pub fn new(id: Uuid, step_index: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            step_index,
            title: title.into(),
            description: None,
            actor_persona_id: None,
        }
    }
}

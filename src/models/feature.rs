use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A discrete candidate product capability discovered for the client.
///
/// Features are mapped onto journey steps on the canvas. A feature belongs to
/// at most one step at a time; `assigned_step_id == None` places it in the
/// unassigned pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the feature is part of the minimum viable product.
    #[serde(default)]
    pub is_mvp: bool,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
    /// The journey step this feature is mapped to, if any.
    #[serde(default)]
    pub assigned_step_id: Option<Uuid>,
}

impl Feature {
    /// Create an unassigned, AI-generated feature with the given name.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            is_mvp: false,
            confirmation_status: ConfirmationStatus::default(),
            assigned_step_id: None,
        }
    }

    /// Builder-style helper used when constructing snapshots by hand.
    pub fn assigned_to(mut self, step_id: Uuid) -> Self {
        self.assigned_step_id = Some(step_id);
        self
    }

    pub fn mvp(mut self) -> Self {
        self.is_mvp = true;
        self
    }
}

/// Who has vouched for a feature.
///
/// - `AiGenerated`: extracted automatically, nobody has reviewed it
/// - `NeedsConfirmation`: flagged for consultant review
/// - `NeedsClient`: waiting on the client to confirm
/// - `ConfirmedConsultant`: confirmed by the consultant
/// - `ConfirmedClient`: confirmed by the client
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    #[default]
    AiGenerated,
    NeedsConfirmation,
    NeedsClient,
    ConfirmedConsultant,
    ConfirmedClient,
}

//! Plain-text rendering of the canvas board.

use crate::models::{ConfirmationStatus, Feature};
use crate::store::EntityStore;

const AI_GENERATED: char = '◇';
const NEEDS_CONFIRMATION: char = '?';
const NEEDS_CLIENT: char = '○';
const CONFIRMED_CONSULTANT: char = '◐';
const CONFIRMED_CLIENT: char = '●';

fn status_symbol(status: ConfirmationStatus) -> char {
    match status {
        ConfirmationStatus::AiGenerated => AI_GENERATED,
        ConfirmationStatus::NeedsConfirmation => NEEDS_CONFIRMATION,
        ConfirmationStatus::NeedsClient => NEEDS_CLIENT,
        ConfirmationStatus::ConfirmedConsultant => CONFIRMED_CONSULTANT,
        ConfirmationStatus::ConfirmedClient => CONFIRMED_CLIENT,
    }
}

/// Render steps with their features, then the pool, then synthesis status.
///
/// Example output:
/// ```text
/// 1. Discover
/// ├── ● Search [MVP]
/// └── ◇ Saved filters
/// 2. Purchase
/// Unassigned
/// └── ? Gift cards
/// Value path: outdated
/// ```
pub fn render_board(store: &EntityStore) -> String {
    let mut output = String::new();

    for step in store.steps() {
        output.push_str(&format!("{}. {}\n", step.step_index + 1, step.title));
        if let Ok(features) = store.features_for_step(step.id) {
            render_features(&mut output, features);
        }
    }

    output.push_str("Unassigned\n");
    render_features(&mut output, store.unassigned_features());

    let status = match (store.synthesis(), store.is_synthesis_stale()) {
        (_, true) => "outdated",
        (Some(_), false) => "current",
        (None, false) => "not generated",
    };
    output.push_str(&format!("Value path: {}\n", status));
    output
}

fn render_features<'a>(output: &mut String, features: impl Iterator<Item = &'a Feature>) {
    let features: Vec<_> = features.collect();
    for (i, feature) in features.iter().enumerate() {
        let branch = if i == features.len() - 1 { "└── " } else { "├── " };
        output.push_str(branch);
        output.push(status_symbol(feature.confirmation_status));
        output.push(' ');
        output.push_str(&feature.name);
        if feature.is_mvp {
            output.push_str(" [MVP]");
        }
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_board() {
        let store = EntityStore::new();
        assert_eq!(render_board(&store), "Unassigned\nValue path: not generated\n");
    }

    #[test]
    fn test_steps_pool_and_status() {
        let s1 = Uuid::new_v4();
        let s2 = Uuid::new_v4();
        let actor = Uuid::new_v4();

        let mut search = Feature::new(Uuid::new_v4(), "Search").assigned_to(s1).mvp();
        search.confirmation_status = ConfirmationStatus::ConfirmedClient;
        let filters = Feature::new(Uuid::new_v4(), "Saved filters").assigned_to(s1);
        let mut gifts = Feature::new(Uuid::new_v4(), "Gift cards");
        gifts.confirmation_status = ConfirmationStatus::NeedsConfirmation;

        let mut store = EntityStore::new();
        store
            .load(
                vec![search, filters, gifts],
                vec![
                    JourneyStep::new(s2, 1, "Purchase"),
                    JourneyStep::new(s1, 0, "Discover"),
                ],
                vec![Actor::new(actor, "Buyer", CanvasRole::Primary)],
                None,
            )
            .expect("load should succeed");

        let expected = "1. Discover\n├── ● Search [MVP]\n└── ◇ Saved filters\n2. Purchase\nUnassigned\n└── ? Gift cards\nValue path: outdated\n";
        assert_eq!(render_board(&store), expected);
    }
}

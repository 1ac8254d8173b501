//! Value canvas: maps discovered product features onto the steps of a
//! customer value path and tracks when that path needs regenerating.
//!
//! - [`store::EntityStore`] holds features, steps, actors and projections.
//! - [`assignment::AssignmentEngine`] is the only way to move a feature.
//! - [`drag::DragController`] models a drag gesture as a small state machine.
//! - [`staleness`] decides whether the value path matches the actor selection.
//! - [`canvas::Canvas`] ties these together for a view layer, and
//!   [`sync::CanvasSync`] adds the remote fetch/persist/synthesis flows.

pub mod assignment;
pub mod canvas;
pub mod config;
pub mod drag;
pub mod error;
pub mod models;
pub mod render;
pub mod replay;
pub mod staleness;
pub mod store;
pub mod sync;

pub use canvas::{Canvas, CanvasEvent};
pub use error::{CanvasError, EntityKind};

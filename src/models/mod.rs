//! Domain models for the value canvas.
//!
//! # Core Concepts
//!
//! - [`Feature`]: A candidate product capability. Mapped onto at most one
//!   journey step, or left in the unassigned pool.
//! - [`JourneyStep`]: An ordered stage of the customer value path. Steps are
//!   synthesized upstream; the canvas never reorders them.
//! - [`Actor`]: A persona selected onto the canvas, primary or secondary.
//! - [`SynthesisRecord`]: Which actors were selected when the value path was
//!   last generated.
//!
//! [`WorkspaceSnapshot`] bundles all of these for a full load.

mod actor;
mod feature;
mod step;
mod synthesis;
mod workspace;

pub use actor::*;
pub use feature::*;
pub use step::*;
pub use synthesis::*;
pub use workspace::*;

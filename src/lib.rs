//! Grid model, placement rules, text codecs and step walking for a
//! quantum-circuit layout editor.
//!
//! Rows are qubit lines and columns are time steps. Gate symbols come from
//! the static [`catalog`]; [`session::Session`] ties the pieces together for
//! a front end.

pub mod catalog;
pub mod codec;
pub mod error;
pub mod grid;
pub mod placement;
pub mod session;
pub mod stats;
pub mod stepper;

pub use catalog::{GateSpec, Rgb, Span};
pub use codec::{Decoded, Diagnostic, Encoding};
pub use error::{GridError, GridResult};
pub use grid::CircuitGrid;
pub use placement::{Placement, PlacementState};
pub use session::Session;
pub use stats::UsageStats;
pub use stepper::{StepReport, StepSimulator};

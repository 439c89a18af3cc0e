//! Growth projector: year-by-year compounding of a balance plus contributions

mod state;
mod engine;
mod points;

pub use state::ProjectionState;
pub use engine::{future_value, GrowthInputs, ProjectionConfig, ProjectionEngine};
pub use points::{ProjectionPoint, ProjectionResult, ProjectionSummary};

//! Advisory Planner - household financial-planning core
//!
//! This library provides:
//! - Net-worth growth projections under optimistic / expected / conservative scenarios
//! - Retirement readiness scoring under a withdrawal-rate rule
//! - Age-based glide paths and allocation drift
//! - Goal progress, time-horizon buckets and life-event import
//! - Multi-year project ledgers with re-keying and funding gaps
//! - Rule-based action timelines

pub mod error;
pub mod profile;
pub mod assumptions;
pub mod allocation;
pub mod projection;
pub mod scenario;
pub mod retirement;
pub mod goals;
pub mod ledger;
pub mod timeline;
pub mod pipeline;

// Re-export commonly used types
pub use error::{PlanningError, ValidationIssue};
pub use profile::{ClientProfile, RetirementProfile};
pub use assumptions::PlanningAssumptions;
pub use allocation::{AssetAllocation, generate_glide_path};
pub use projection::{ProjectionEngine, ProjectionResult, ProjectionPoint};
pub use scenario::ScenarioRunner;
pub use retirement::{ReadinessAnalyzer, ReadinessReport};
pub use goals::{FinancialGoal, import_life_events};
pub use ledger::{ProjectPlan, calculate_funding_gap};
pub use timeline::{ActionableTimelineItem, Timing};
pub use pipeline::{PlanningSession, PlanOutputs, compute_plan, generate_actions};

//! Project ledgers: year-keyed cost and funding series, re-keying and funding gaps

mod funding;
mod project;
mod series;

pub use funding::{calculate_funding_gap, FundingStatus, FundingSummary, YearFunding};
pub use project::{CostCategory, FundingSource, FundingSourceType, ProjectPlan, ProjectType};
pub use series::{YearSeries, YearWindow};

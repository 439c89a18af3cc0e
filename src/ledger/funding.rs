//! Funding gap of a project plan

use serde::{Deserialize, Serialize};

use super::project::ProjectPlan;
use super::series::YearWindow;

/// Gaps smaller than a cent count as fully funded
const FUNDING_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingStatus {
    Shortfall,
    Surplus,
    FullyFunded,
}

impl FundingStatus {
    pub fn from_gap(gap: f64) -> Self {
        if gap > FUNDING_TOLERANCE {
            FundingStatus::Shortfall
        } else if gap < -FUNDING_TOLERANCE {
            FundingStatus::Surplus
        } else {
            FundingStatus::FullyFunded
        }
    }
}

/// One row of the funding schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearFunding {
    pub year: i32,
    pub cost: f64,
    pub funding: f64,
    /// Cost to date minus funding to date
    pub cumulative_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingSummary {
    pub project_id: String,
    pub total_cost: f64,
    pub total_funding: f64,
    /// Positive = shortfall, negative = surplus
    pub funding_gap: f64,
    pub status: FundingStatus,
    /// Funding as a share of cost, capped at 100 (100 when there is no cost)
    pub funded_pct: f64,
    pub years: Vec<YearFunding>,
}

/// Total cost over the project years against total funding over every funding year,
/// pre-project accumulation years included.
pub fn calculate_funding_gap(plan: &ProjectPlan) -> FundingSummary {
    let project = plan.project_window();
    // Schedule covers the funding window plus any stray funding years
    let funding_years: Vec<i32> = plan.funding_sources.iter().flat_map(|s| s.amounts.years()).collect();
    let window = plan.funding_window();
    let first = funding_years.iter().copied().min().map_or(window.start, |y| y.min(window.start));
    let last = funding_years.iter().copied().max().map_or(window.end(), |y| (y + 1).max(window.end()));
    let schedule = YearWindow::spanning(first, last);

    let total_cost: f64 = plan
        .cost_categories
        .iter()
        .map(|c| c.amounts.total_within(project))
        .sum();
    let total_funding: f64 = plan
        .funding_sources
        .iter()
        .map(|s| s.amounts.total())
        .sum();
    let funding_gap = total_cost - total_funding;

    let mut cumulative_gap = 0.0;
    let years = schedule
        .years()
        .map(|year| {
            let cost = if project.contains(year) {
                plan.cost_categories.iter().map(|c| c.amounts.get(year)).sum()
            } else {
                0.0
            };
            let funding: f64 = plan.funding_sources.iter().map(|s| s.amounts.get(year)).sum();
            cumulative_gap += cost - funding;
            YearFunding {
                year,
                cost,
                funding,
                cumulative_gap,
            }
        })
        .collect();

    let funded_pct = if total_cost > 0.0 {
        (total_funding / total_cost * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    log::debug!(
        "{}: cost {:.2}, funding {:.2}, gap {:.2}",
        plan.id,
        total_cost,
        total_funding,
        funding_gap
    );

    FundingSummary {
        project_id: plan.id.clone(),
        total_cost,
        total_funding,
        funding_gap,
        status: FundingStatus::from_gap(funding_gap),
        funded_pct,
        years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{FundingSourceType, ProjectType, YearSeries, YearWindow};
    use approx::assert_relative_eq;

    fn plan_with_funding(annual_funding: f64) -> ProjectPlan {
        ProjectPlan::new("p1", "College", ProjectType::Education, 2026, 4, 2024)
            .with_cost_category("Tuition", YearSeries::filled(YearWindow::new(2026, 4), 45_000.0))
            .with_funding_source(
                "529 plan",
                FundingSourceType::Plan529,
                YearSeries::filled(YearWindow::new(2024, 6), annual_funding),
            )
    }

    #[test]
    fn test_shortfall_counts_pre_funding_years() {
        let summary = calculate_funding_gap(&plan_with_funding(25_000.0));

        assert_relative_eq!(summary.total_cost, 180_000.0);
        assert_relative_eq!(summary.total_funding, 150_000.0);
        assert_relative_eq!(summary.funding_gap, 30_000.0);
        assert_eq!(summary.status, FundingStatus::Shortfall);
        assert_relative_eq!(summary.funded_pct, 150_000.0 / 180_000.0 * 100.0);

        assert_eq!(summary.years.len(), 6);
        assert_eq!(summary.years[0].cost, 0.0);
        assert_relative_eq!(summary.years[5].cumulative_gap, 30_000.0);
    }

    #[test]
    fn test_surplus_and_exact() {
        let surplus = calculate_funding_gap(&plan_with_funding(40_000.0));
        assert_relative_eq!(surplus.funding_gap, -60_000.0);
        assert_eq!(surplus.status, FundingStatus::Surplus);
        assert_eq!(surplus.funded_pct, 100.0);

        let exact = calculate_funding_gap(&plan_with_funding(30_000.0));
        assert_eq!(exact.status, FundingStatus::FullyFunded);
    }

    #[test]
    fn test_funding_outside_window_still_counts() {
        let json = r#"{
            "id": "p3",
            "name": "Car",
            "project_type": "Vehicle",
            "start_year": 2028,
            "duration_years": 1,
            "funding_start_year": 2027,
            "cost_categories": [{ "label": "Price", "amounts": { "2028": 30000 } }],
            "funding_sources": [
                { "label": "Savings", "source_type": "Savings", "amounts": { "2025": 5000, "2027": 10000, "2028": 10000 } }
            ]
        }"#;
        let plan: ProjectPlan = serde_json::from_str(json).unwrap();
        let summary = calculate_funding_gap(&plan);

        assert_relative_eq!(summary.total_funding, 25_000.0);
        assert_relative_eq!(summary.funding_gap, 5_000.0);
        assert_eq!(summary.years.first().map(|y| y.year), Some(2025));
        assert_relative_eq!(summary.years.last().unwrap().cumulative_gap, summary.funding_gap);

        let issues = plan.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "projects[p3].funding[Savings]");
    }

    #[test]
    fn test_empty_plan() {
        let plan = ProjectPlan::new("p2", "Trip", ProjectType::Travel, 2027, 1, 2026);
        let summary = calculate_funding_gap(&plan);
        assert_eq!(summary.funding_gap, 0.0);
        assert_eq!(summary.status, FundingStatus::FullyFunded);
        assert_eq!(summary.funded_pct, 100.0);
    }
}

//! Retirement readiness: required portfolio under the withdrawal-rate rule,
//! projected savings at retirement, a 0-100 score and the annual income gap

use serde::{Deserialize, Serialize};

use crate::assumptions::{ActionThresholds, PlanningAssumptions, RetirementDefaults};
use crate::profile::RetirementProfile;
use crate::projection::{future_value, GrowthInputs, ProjectionConfig, ProjectionEngine, ProjectionPoint};

/// Readiness banding for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessStatus {
    OnTrack,
    NeedsAttention,
    AtRisk,
}

impl ReadinessStatus {
    pub fn from_score(score: u8, thresholds: &ActionThresholds) -> Self {
        if score >= thresholds.on_track_score {
            ReadinessStatus::OnTrack
        } else if score >= thresholds.at_risk_score {
            ReadinessStatus::NeedsAttention
        } else {
            ReadinessStatus::AtRisk
        }
    }
}

/// Result of the readiness analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    /// Portfolio needed to fund the income shortfall at the withdrawal rate
    pub required_portfolio: f64,
    /// Current retirement savings grown to the retirement date
    pub projected_savings: f64,
    /// 0-100
    pub readiness_score: u8,
    /// Income the projected savings sustain at the withdrawal rate
    pub projected_portfolio_income: f64,
    /// Social security + pension + portfolio income
    pub total_projected_income: f64,
    /// Desired income not covered, never negative
    pub income_gap: f64,
    pub years_to_retirement: u32,
    pub retirement_years: u32,
    /// Guaranteed income alone meets the desired income
    pub fully_covered: bool,
    pub status: ReadinessStatus,
    /// Savings path from today to retirement, for the chart renderer
    pub trajectory: Vec<ProjectionPoint>,
}

/// Readiness analyzer
#[derive(Debug, Clone)]
pub struct ReadinessAnalyzer {
    defaults: RetirementDefaults,
    thresholds: ActionThresholds,
}

impl ReadinessAnalyzer {
    pub fn new(defaults: RetirementDefaults, thresholds: ActionThresholds) -> Self {
        Self { defaults, thresholds }
    }

    pub fn with_assumptions(assumptions: &PlanningAssumptions) -> Self {
        Self::new(assumptions.retirement, assumptions.thresholds)
    }

    /// Accumulation rate in use, never negative
    pub fn accumulation_rate(&self) -> f64 {
        if self.defaults.accumulation_rate.is_finite() && self.defaults.accumulation_rate > 0.0 {
            self.defaults.accumulation_rate
        } else {
            0.0
        }
    }

    /// Run the analysis. `start_year` anchors the trajectory's year axis.
    pub fn analyze(&self, profile: &RetirementProfile, start_year: i32) -> ReadinessReport {
        let withdrawal_rate = if self.defaults.withdrawal_rate > 0.0 {
            self.defaults.withdrawal_rate
        } else {
            log::warn!(
                "withdrawal rate {} is not positive, using 4%",
                self.defaults.withdrawal_rate
            );
            RetirementDefaults::default().withdrawal_rate
        };
        let profile = &profile.with_defaults(&self.defaults);
        let rate = self.accumulation_rate();
        let years_to_retirement = profile.years_to_retirement();

        let desired = non_negative(profile.desired_retirement_income);
        let guaranteed = profile.guaranteed_income();
        let savings = non_negative(profile.current_retirement_savings);

        let net_need = desired - guaranteed;
        let projected_savings = future_value(savings, 0.0, rate, years_to_retirement);
        let projected_portfolio_income = projected_savings * withdrawal_rate;

        let (required_portfolio, readiness_score, income_gap, fully_covered) = if net_need <= 0.0 {
            // Guaranteed income covers everything: nothing to fund
            (0.0, 100, 0.0, true)
        } else {
            let required = net_need / withdrawal_rate;
            let score = (projected_savings / required * 100.0).round().clamp(0.0, 100.0) as u8;
            let gap = (net_need - projected_portfolio_income).max(0.0);
            (required, score, gap, false)
        };

        let trajectory = ProjectionEngine::new(ProjectionConfig::new(start_year, years_to_retirement, rate))
            .project(&GrowthInputs::new(savings, 0.0))
            .map(|r| r.points)
            .unwrap_or_default();

        log::debug!(
            "readiness: required {:.0}, projected {:.0}, score {}",
            required_portfolio,
            projected_savings,
            readiness_score
        );

        ReadinessReport {
            required_portfolio,
            projected_savings,
            readiness_score,
            projected_portfolio_income,
            total_projected_income: guaranteed + projected_portfolio_income,
            income_gap,
            years_to_retirement,
            retirement_years: profile.retirement_years(),
            fully_covered,
            status: ReadinessStatus::from_score(readiness_score, &self.thresholds),
            trajectory,
        }
    }
}

impl Default for ReadinessAnalyzer {
    fn default() -> Self {
        Self::new(RetirementDefaults::default(), ActionThresholds::default())
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn profile(current_age: u32, savings: f64, desired: f64, social_security: f64) -> RetirementProfile {
        RetirementProfile {
            current_age,
            retirement_age: Some(65),
            life_expectancy: Some(90),
            desired_retirement_income: desired,
            social_security_estimate: social_security,
            pension_income: 0.0,
            current_retirement_savings: savings,
        }
    }

    #[test]
    fn test_reference_household() {
        let report = ReadinessAnalyzer::default().analyze(&profile(45, 500_000.0, 80_000.0, 24_000.0), 2026);

        assert_relative_eq!(report.required_portfolio, 1_400_000.0, max_relative = 1e-12);
        assert_relative_eq!(report.projected_savings, 1_603_567.74, epsilon = 0.01);
        assert_eq!(report.readiness_score, 100);
        assert_eq!(report.income_gap, 0.0);
        assert_eq!(report.years_to_retirement, 20);
        assert_eq!(report.retirement_years, 25);
        assert_eq!(report.status, ReadinessStatus::OnTrack);
        assert_relative_eq!(
            report.total_projected_income,
            24_000.0 + report.projected_savings * 0.04,
            max_relative = 1e-12
        );

        assert_eq!(report.trajectory.len(), 21);
        assert_eq!(report.trajectory.last().unwrap().year, 2046);
    }

    #[test]
    fn test_partial_readiness() {
        // 200k at 6% for 20 years ≈ 641k against a 1.4M requirement
        let report = ReadinessAnalyzer::default().analyze(&profile(45, 200_000.0, 80_000.0, 24_000.0), 2026);

        assert_eq!(report.readiness_score, 46);
        assert_eq!(report.status, ReadinessStatus::AtRisk);
        assert_relative_eq!(report.income_gap, 56_000.0 - report.projected_portfolio_income, max_relative = 1e-12);
        assert!(report.income_gap > 0.0);
    }

    #[test]
    fn test_guaranteed_income_covers_everything() {
        let report = ReadinessAnalyzer::default().analyze(&profile(60, 0.0, 30_000.0, 36_000.0), 2026);

        assert!(report.fully_covered);
        assert_eq!(report.required_portfolio, 0.0);
        assert_eq!(report.readiness_score, 100);
        assert_eq!(report.income_gap, 0.0);
    }

    #[test]
    fn test_already_retired_and_no_savings() {
        let report = ReadinessAnalyzer::default().analyze(&profile(70, 0.0, 50_000.0, 10_000.0), 2026);

        assert_eq!(report.years_to_retirement, 0);
        assert_eq!(report.projected_savings, 0.0);
        assert_eq!(report.readiness_score, 0);
        assert_eq!(report.income_gap, 40_000.0);
        assert_eq!(report.trajectory.len(), 1);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_score_and_gap_are_bounded(
            current_age in 18u32..90,
            savings in 0u32..5_000_000,
            desired in 0u32..300_000,
            social_security in 0u32..80_000,
            pension in 0u32..80_000
        ) {
            let mut p = profile(current_age, savings as f64, desired as f64, social_security as f64);
            p.pension_income = pension as f64;
            let report = ReadinessAnalyzer::default().analyze(&p, 2026);

            prop_assert!(report.readiness_score <= 100);
            prop_assert!(report.income_gap >= 0.0);
            prop_assert!(report.required_portfolio.is_finite());
            prop_assert!(report.total_projected_income.is_finite());
        }
    }
}

//! Growth projection engine: fixed-rate compounding with annual contributions

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, Result};
use super::state::ProjectionState;
use super::points::{ProjectionPoint, ProjectionResult};

/// Future value of a present balance plus end-of-year contributions after `periods` years.
///
/// FV(n) = PV·(1+r)^n + C·((1+r)^n − 1)/r, with the r = 0 limit PV + C·n.
///
/// The annuity factor is accumulated as Σ (1+r)^k instead of divided out, which
/// equals the closed form, needs no r = 0 branch, and keeps the result monotone
/// in both `annual_rate` and `periods` under floating point rounding.
pub fn future_value(present_value: f64, annual_contribution: f64, annual_rate: f64, periods: u32) -> f64 {
    let mut growth = 1.0;
    let mut annuity = 0.0;
    for _ in 0..periods {
        annuity += growth;
        growth *= 1.0 + annual_rate;
    }
    present_value * growth + annual_contribution * annuity
}

/// Starting position for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthInputs {
    /// Balance today
    pub present_value: f64,

    /// Contribution added at the end of each year
    pub annual_contribution: f64,
}

impl GrowthInputs {
    pub fn new(present_value: f64, annual_contribution: f64) -> Self {
        Self {
            present_value,
            annual_contribution,
        }
    }

    /// Both amounts must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("present_value", self.present_value)?;
        ensure_non_negative("annual_contribution", self.annual_contribution)?;
        Ok(())
    }
}

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Calendar year of period 0
    pub start_year: i32,

    /// Number of years to project (the result has periods + 1 points)
    pub periods: u32,

    /// Fixed annual growth rate
    pub annual_rate: f64,
}

impl ProjectionConfig {
    pub fn new(start_year: i32, periods: u32, annual_rate: f64) -> Self {
        Self {
            start_year,
            periods,
            annual_rate,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection. Negative or non-finite inputs are rejected.
    pub fn project(&self, inputs: &GrowthInputs) -> Result<ProjectionResult> {
        inputs.validate()?;
        ensure_non_negative("annual_rate", self.config.annual_rate)?;

        let mut result = ProjectionResult::new(self.config.annual_rate);
        let mut state = ProjectionState::initial(inputs, self.config.start_year);
        result.add_point(self.record(&state, inputs));

        for _period in 1..=self.config.periods {
            state.advance_year(inputs, self.config.annual_rate);
            result.add_point(self.record(&state, inputs));
        }

        log::debug!(
            "projected {} periods at {:.2}%: {:.2} -> {:.2}",
            self.config.periods,
            self.config.annual_rate * 100.0,
            inputs.present_value,
            state.balance
        );

        Ok(result)
    }

    fn record(&self, state: &ProjectionState, inputs: &GrowthInputs) -> ProjectionPoint {
        let mut point = ProjectionPoint::new(state.period, state.year);
        point.value = state.balance;
        point.contributions_to_date = state.contributions_to_date;
        point.growth_to_date = state.growth_to_date(inputs);
        point
    }
}

//! Running state of a growth projection

use super::engine::{future_value, GrowthInputs};

/// State of a projected balance at the end of a period
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Periods elapsed (0 = today)
    pub period: u32,

    /// Calendar year of this period
    pub year: i32,

    /// Balance at end of period
    pub balance: f64,

    /// Cumulative contributions made since period 0
    pub contributions_to_date: f64,
}

impl ProjectionState {
    /// Initialize state at the projection start
    pub fn initial(inputs: &GrowthInputs, start_year: i32) -> Self {
        Self {
            period: 0,
            year: start_year,
            balance: inputs.present_value,
            contributions_to_date: 0.0,
        }
    }

    /// Advance one year. The balance is recomputed from the starting position
    /// so every period agrees with `future_value` exactly.
    pub fn advance_year(&mut self, inputs: &GrowthInputs, annual_rate: f64) {
        self.period += 1;
        self.year += 1;
        self.contributions_to_date += inputs.annual_contribution;
        self.balance = future_value(
            inputs.present_value,
            inputs.annual_contribution,
            annual_rate,
            self.period,
        );
    }

    /// Growth earned so far: everything that is not principal or contributions
    pub fn growth_to_date(&self, inputs: &GrowthInputs) -> f64 {
        self.balance - inputs.present_value - self.contributions_to_date
    }
}

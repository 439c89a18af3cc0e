//! Scenario runner: optimistic / expected / conservative projections plus a real-terms series
//!
//! Holds the scenario rates and inflation once, then runs the growth projector
//! for each rate over a shared year axis.

use serde::{Deserialize, Serialize};

use crate::assumptions::{PlanningAssumptions, ScenarioRates};
use crate::error::Result;
use crate::projection::{GrowthInputs, ProjectionConfig, ProjectionEngine, ProjectionResult};

/// One year across all scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub period: u32,
    pub year: i32,
    pub optimistic: f64,
    pub expected: f64,
    pub conservative: f64,
    /// Expected series deflated to today's money
    pub real: f64,
}

/// Final values of each series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub final_year: i32,
    pub optimistic: f64,
    pub expected: f64,
    pub conservative: f64,
    pub real: f64,
    /// Purchasing power lost to inflation on the expected path
    pub inflation_drag: f64,
    /// Spread between the optimistic and conservative outcomes
    pub range: f64,
}

/// All four series on a shared year axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub rates: ScenarioRates,
    pub inflation: f64,
    pub rows: Vec<ScenarioRow>,
}

impl ScenarioProjection {
    pub fn summary(&self) -> Option<ScenarioSummary> {
        let last = self.rows.last()?;
        Some(ScenarioSummary {
            final_year: last.year,
            optimistic: last.optimistic,
            expected: last.expected,
            conservative: last.conservative,
            real: last.real,
            inflation_drag: last.expected - last.real,
            range: last.optimistic - last.conservative,
        })
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }
}

/// Pre-configured scenario runner
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    rates: ScenarioRates,
    inflation: f64,
}

impl ScenarioRunner {
    /// Create runner with the default planning assumptions
    pub fn new() -> Self {
        Self::with_assumptions(&PlanningAssumptions::default_planning())
    }

    pub fn with_assumptions(assumptions: &PlanningAssumptions) -> Self {
        Self::with_rates(assumptions.scenario_rates, assumptions.inflation)
    }

    pub fn with_rates(rates: ScenarioRates, inflation: f64) -> Self {
        let inflation = if inflation.is_finite() && inflation > -1.0 {
            inflation
        } else {
            log::warn!("inflation {} cannot deflate a series, using 0", inflation);
            0.0
        };
        Self { rates, inflation }
    }

    pub fn rates(&self) -> &ScenarioRates {
        &self.rates
    }

    /// Run a single projection at an arbitrary rate
    pub fn run_rate(
        &self,
        inputs: &GrowthInputs,
        start_year: i32,
        periods: u32,
        annual_rate: f64,
    ) -> Result<ProjectionResult> {
        ProjectionEngine::new(ProjectionConfig::new(start_year, periods, annual_rate)).project(inputs)
    }

    /// Run the three scenarios and derive the real-terms series
    pub fn run(&self, inputs: &GrowthInputs, start_year: i32, periods: u32) -> Result<ScenarioProjection> {
        let optimistic = self.run_rate(inputs, start_year, periods, self.rates.optimistic)?;
        let expected = self.run_rate(inputs, start_year, periods, self.rates.expected)?;
        let conservative = self.run_rate(inputs, start_year, periods, self.rates.conservative)?;

        let rows = expected
            .points
            .iter()
            .zip(optimistic.points.iter())
            .zip(conservative.points.iter())
            .map(|((e, o), c)| ScenarioRow {
                period: e.period,
                year: e.year,
                optimistic: o.value,
                expected: e.value,
                conservative: c.value,
                real: e.value / (1.0 + self.inflation).powi(e.period as i32),
            })
            .collect();

        Ok(ScenarioProjection {
            rates: self.rates,
            inflation: self.inflation,
            rows,
        })
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

//! Planning assumptions: scenario rates, retirement defaults and action thresholds

pub mod loader;

pub use loader::{load_assumption_values, DEFAULT_ASSUMPTIONS_PATH};

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result, ValidationIssue};

/// Fixed annual growth rates for the three projection scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRates {
    pub optimistic: f64,
    pub expected: f64,
    pub conservative: f64,
}

impl Default for ScenarioRates {
    fn default() -> Self {
        Self {
            optimistic: 0.08,
            expected: 0.06,
            conservative: 0.04,
        }
    }
}

impl ScenarioRates {
    /// Flag rates that are negative or out of order.
    /// Out-of-order rates still project, but the series lose their ordering guarantee.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (field, rate) in [
            ("scenario_rates.optimistic", self.optimistic),
            ("scenario_rates.expected", self.expected),
            ("scenario_rates.conservative", self.conservative),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                issues.push(ValidationIssue::invalid(field, format!("rate {} must be >= 0", rate)));
            }
        }
        if !(self.optimistic >= self.expected && self.expected >= self.conservative) {
            issues.push(ValidationIssue::warning(
                "scenario_rates",
                "expected optimistic >= expected >= conservative",
            ));
        }
        issues
    }
}

/// Defaults applied when a retirement profile is partial, plus the 4%-rule parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementDefaults {
    pub retirement_age: u32,
    pub life_expectancy: u32,
    /// Annual growth assumed on retirement savings until retirement
    pub accumulation_rate: f64,
    /// Sustainable withdrawal rate (the "4% rule")
    pub withdrawal_rate: f64,
}

impl Default for RetirementDefaults {
    fn default() -> Self {
        Self {
            retirement_age: 65,
            life_expectancy: 90,
            accumulation_rate: 0.06,
            withdrawal_rate: 0.04,
        }
    }
}

/// Thresholds used by the action timeline rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionThresholds {
    /// Minimum healthy savings rate in percent
    pub target_savings_rate: f64,
    /// Allocation drift in percentage points that triggers a rebalance item
    pub drift_threshold: f64,
    /// Stock drift vs the glide path that flags "needs rebalancing"
    pub glide_path_threshold: f64,
    /// Contribution below `multiple × employer match` counts as missing the match
    pub employer_match_multiple: f64,
    /// Readiness score at or above which a household is on track
    pub on_track_score: u8,
    /// Readiness score below which a household is at risk
    pub at_risk_score: u8,
}

impl Default for ActionThresholds {
    fn default() -> Self {
        Self {
            target_savings_rate: 15.0,
            drift_threshold: 10.0,
            glide_path_threshold: 10.0,
            employer_match_multiple: 2.0,
            on_track_score: 80,
            at_risk_score: 50,
        }
    }
}

/// Container for all planning assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningAssumptions {
    pub scenario_rates: ScenarioRates,
    /// Annual inflation used for the real-terms series
    pub inflation: f64,
    pub retirement: RetirementDefaults,
    pub thresholds: ActionThresholds,
}

impl Default for PlanningAssumptions {
    fn default() -> Self {
        Self::default_planning()
    }
}

impl PlanningAssumptions {
    /// Advisor-facing defaults
    pub fn default_planning() -> Self {
        Self {
            scenario_rates: ScenarioRates::default(),
            inflation: 0.03,
            retirement: RetirementDefaults::default(),
            thresholds: ActionThresholds::default(),
        }
    }

    /// Load assumptions from `planning_assumptions.csv` in a specific directory.
    /// Keys missing from the file keep their defaults.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let values = load_assumption_values(path)?;
        Self::from_loaded(&values)
    }

    /// Build assumptions from loaded key/value pairs on top of the defaults
    pub fn from_loaded(values: &HashMap<String, f64>) -> Result<Self> {
        let mut assumptions = Self::default_planning();

        // Sorted so the first unknown key reported is deterministic
        let mut keys: Vec<&String> = values.keys().collect();
        keys.sort();

        for key in keys {
            let value = values[key];
            match key.as_str() {
                "optimistic_rate" => assumptions.scenario_rates.optimistic = value,
                "expected_rate" => assumptions.scenario_rates.expected = value,
                "conservative_rate" => assumptions.scenario_rates.conservative = value,
                "inflation" => assumptions.inflation = value,
                "retirement_age" => assumptions.retirement.retirement_age = as_age(key, value)?,
                "life_expectancy" => assumptions.retirement.life_expectancy = as_age(key, value)?,
                "accumulation_rate" => assumptions.retirement.accumulation_rate = value,
                "withdrawal_rate" => assumptions.retirement.withdrawal_rate = value,
                "target_savings_rate" => assumptions.thresholds.target_savings_rate = value,
                "drift_threshold" => assumptions.thresholds.drift_threshold = value,
                "glide_path_threshold" => assumptions.thresholds.glide_path_threshold = value,
                "employer_match_multiple" => assumptions.thresholds.employer_match_multiple = value,
                "on_track_score" => assumptions.thresholds.on_track_score = as_score(key, value)?,
                "at_risk_score" => assumptions.thresholds.at_risk_score = as_score(key, value)?,
                other => return Err(PlanningError::UnknownAssumption(other.to_string())),
            }
        }

        log::debug!("loaded {} assumption overrides", values.len());
        Ok(assumptions)
    }

    /// Non-fatal checks on the loaded values
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = self.scenario_rates.validate();
        if !self.inflation.is_finite() || self.inflation <= -1.0 {
            issues.push(ValidationIssue::invalid("inflation", "inflation must be > -100%"));
        }
        if self.retirement.withdrawal_rate <= 0.0 {
            issues.push(ValidationIssue::invalid(
                "withdrawal_rate",
                "withdrawal rate must be positive",
            ));
        }
        if self.retirement.life_expectancy <= self.retirement.retirement_age {
            issues.push(ValidationIssue::invalid(
                "life_expectancy",
                "default life expectancy must exceed default retirement age",
            ));
        }
        issues
    }
}

fn as_age(key: &str, value: f64) -> Result<u32> {
    if value.is_finite() && value >= 0.0 && value <= 130.0 && value.fract() == 0.0 {
        Ok(value as u32)
    } else {
        Err(PlanningError::invalid("assumptions", format!("{} = {} is not an age", key, value)))
    }
}

fn as_score(key: &str, value: f64) -> Result<u8> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value.round() as u8)
    } else {
        Err(PlanningError::invalid("assumptions", format!("{} = {} is not a 0-100 score", key, value)))
    }
}

//! Financial goals, time-horizon classification and life-event import

mod events;
mod horizon;
mod import;

pub use events::{CostEstimate, FinancialProjection, LifeEvent, RecommendedFundingSource};
pub use horizon::{classify_goals, classify_horizon, whole_years_until, years_until, HorizonBuckets, TimeHorizon};
pub use import::{import_life_events, ImportOutcome, SkipReason};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationIssue;
use crate::ledger::ProjectType;

/// What a goal is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalType {
    Retirement,
    Legacy,
    Education,
    Home,
    Business,
    Wedding,
    Vehicle,
    Travel,
    Medical,
    Emergency,
    Custom,
}

impl From<ProjectType> for GoalType {
    fn from(project_type: ProjectType) -> Self {
        match project_type {
            ProjectType::Education => GoalType::Education,
            ProjectType::Home => GoalType::Home,
            ProjectType::Business => GoalType::Business,
            ProjectType::Wedding => GoalType::Wedding,
            ProjectType::Vehicle => GoalType::Vehicle,
            ProjectType::Travel => GoalType::Travel,
            ProjectType::Medical => GoalType::Medical,
            ProjectType::Other => GoalType::Custom,
        }
    }
}

/// A savings goal tracked for the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: String,
    pub name: String,
    pub goal_type: GoalType,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub target_date: NaiveDate,
    /// Lower value = higher priority
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub monthly_contribution: f64,
    /// Id of the detected life event this goal was imported from (not owned)
    #[serde(default)]
    pub linked_event_id: Option<String>,
    /// Explicit horizon; when absent the horizon is derived from `target_date`
    #[serde(default)]
    pub time_horizon: Option<TimeHorizon>,
}

impl FinancialGoal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        goal_type: GoalType,
        target_amount: f64,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            goal_type,
            target_amount,
            current_amount: 0.0,
            target_date,
            priority: 0,
            monthly_contribution: 0.0,
            linked_event_id: None,
            time_horizon: None,
        }
    }

    /// Progress toward the target in percent, always within [0, 100]
    pub fn progress_pct(&self) -> f64 {
        if !(self.target_amount > 0.0) || !self.current_amount.is_finite() {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }

    pub fn remaining_amount(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Explicit override, else classified from the target date
    pub fn effective_horizon(&self, today: NaiveDate) -> TimeHorizon {
        self.time_horizon
            .unwrap_or_else(|| classify_horizon(self.target_date, today))
    }

    /// Months of contributions needed to close the gap, if contributing at all
    pub fn months_to_target(&self) -> Option<u32> {
        let remaining = self.remaining_amount();
        if remaining <= 0.0 {
            return Some(0);
        }
        if self.monthly_contribution > 0.0 {
            Some((remaining / self.monthly_contribution).ceil() as u32)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if !(self.target_amount > 0.0) {
            issues.push(ValidationIssue::invalid(
                format!("goals[{}].target_amount", self.id),
                format!("{} needs a target amount above zero", self.name),
            ));
        }
        if self.current_amount < 0.0 || self.monthly_contribution < 0.0 {
            issues.push(ValidationIssue::invalid(
                format!("goals[{}]", self.id),
                format!("{} has a negative amount", self.name),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut goal = FinancialGoal::new("g1", "College", GoalType::Education, 100_000.0, date(2035, 9, 1));
        goal.current_amount = 25_000.0;
        assert_eq!(goal.progress_pct(), 25.0);

        goal.current_amount = 150_000.0;
        assert_eq!(goal.progress_pct(), 100.0);
        assert_eq!(goal.remaining_amount(), 0.0);

        goal.current_amount = -10.0;
        assert_eq!(goal.progress_pct(), 0.0);
    }

    #[test]
    fn test_zero_target_is_flagged_not_divided() {
        let mut goal = FinancialGoal::new("g2", "Someday", GoalType::Custom, 0.0, date(2030, 1, 1));
        goal.current_amount = 500.0;
        assert_eq!(goal.progress_pct(), 0.0);
        assert_eq!(goal.validate().len(), 1);
    }

    #[test]
    fn test_horizon_override() {
        let today = date(2026, 10, 18);
        let mut goal = FinancialGoal::new("g3", "Boat", GoalType::Custom, 40_000.0, date(2028, 1, 1));
        assert_eq!(goal.effective_horizon(today), TimeHorizon::Short);

        goal.time_horizon = Some(TimeHorizon::Mid);
        assert_eq!(goal.effective_horizon(today), TimeHorizon::Mid);
    }

    #[test]
    fn test_months_to_target() {
        let mut goal = FinancialGoal::new("g4", "Car", GoalType::Vehicle, 12_000.0, date(2028, 1, 1));
        goal.current_amount = 2_000.0;
        assert_eq!(goal.months_to_target(), None);
        goal.monthly_contribution = 750.0;
        assert_eq!(goal.months_to_target(), Some(14));
    }
}

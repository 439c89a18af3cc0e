//! Rule-ordered action timeline for a household profile
//!
//! Rules run in a fixed order and each appends zero or more items:
//! account capacity and limits, employer match, savings rate, allocation drift,
//! retirement income gap, then age-banded milestones. The order is the default
//! display order; item ids are stable for identical input.

use chrono::{Datelike, NaiveDate};

use super::{ActionableTimelineItem, Timing};
use crate::assumptions::{ActionThresholds, PlanningAssumptions, RetirementDefaults};
use crate::profile::ClientProfile;
use crate::retirement::ReadinessAnalyzer;

/// Age at which retirement-plan catch-up contributions open
const CATCH_UP_AGE: u32 = 50;
/// Years before retirement at which the income plan is reviewed
const INCOME_PLAN_LEAD_YEARS: u32 = 5;
/// Age at which required minimum distributions begin
const RMD_AGE: u32 = 73;

#[derive(Debug, Clone)]
pub struct ActionTimelineGenerator {
    thresholds: ActionThresholds,
    analyzer: ReadinessAnalyzer,
    defaults: RetirementDefaults,
}

impl ActionTimelineGenerator {
    pub fn with_assumptions(assumptions: &PlanningAssumptions) -> Self {
        Self {
            thresholds: assumptions.thresholds,
            analyzer: ReadinessAnalyzer::with_assumptions(assumptions),
            defaults: assumptions.retirement,
        }
    }

    /// Run every rule against the profile
    pub fn generate(&self, profile: &ClientProfile, today: NaiveDate) -> Vec<ActionableTimelineItem> {
        let year = today.year();
        let mut items = Vec::new();

        self.account_capacity(profile, year, &mut items);
        self.employer_match(profile, year, &mut items);
        self.savings_rate(profile, year, &mut items);
        self.allocation_drift(profile, year, &mut items);
        self.income_gap(profile, year, &mut items);
        self.milestones(profile, year, &mut items);

        log::debug!("generated {} action items for {:?}", items.len(), profile.client_name);
        items
    }

    fn account_capacity(&self, profile: &ClientProfile, year: i32, items: &mut Vec<ActionableTimelineItem>) {
        for (i, account) in profile.accounts.iter().enumerate() {
            if account.is_over_limit() {
                items.push(ActionableTimelineItem::new(
                    format!("account-{}-limit", i),
                    Timing::immediate(year),
                    format!(
                        "Reduce {} contributions from ${:.0} to the ${:.0} annual limit",
                        account.label, account.annual_contribution, account.max_contribution
                    ),
                ));
            } else if account.unused_capacity() > 0.0 {
                items.push(ActionableTimelineItem::new(
                    format!("account-{}-capacity", i),
                    Timing::immediate(year),
                    format!(
                        "Contribute up to ${:.0} more per year to {} ({})",
                        account.unused_capacity(),
                        account.label,
                        account.account_type.as_str()
                    ),
                ));
            }
        }
    }

    fn employer_match(&self, profile: &ClientProfile, year: i32, items: &mut Vec<ActionableTimelineItem>) {
        let multiple = self.thresholds.employer_match_multiple;
        for (i, account) in profile.accounts.iter().enumerate() {
            if !account.misses_employer_match(multiple) {
                continue;
            }
            let needed = account.employer_match.unwrap_or(0.0) * multiple;
            items.push(ActionableTimelineItem::new(
                format!("account-{}-match", i),
                Timing::immediate(year),
                format!(
                    "Raise {} contributions to at least ${:.0} to capture the full employer match",
                    account.label, needed
                ),
            ));
        }
    }

    fn savings_rate(&self, profile: &ClientProfile, year: i32, items: &mut Vec<ActionableTimelineItem>) {
        if profile.monthly_income() <= 0.0 {
            return;
        }
        let rate = profile.savings_rate();
        let target = self.thresholds.target_savings_rate;
        if rate < target {
            let monthly_shortfall = (target - rate) / 100.0 * profile.monthly_income();
            items.push(ActionableTimelineItem::new(
                "savings-rate",
                Timing::immediate(year),
                format!(
                    "Increase savings rate from {:.1}% to {:.0}% (about ${:.0} more per month)",
                    rate, target, monthly_shortfall
                ),
            ));
        }
    }

    fn allocation_drift(&self, profile: &ClientProfile, year: i32, items: &mut Vec<ActionableTimelineItem>) {
        // An all-zero allocation means none was entered
        if profile.current_allocation.total() <= 0.0 {
            return;
        }
        let target = profile.effective_target_allocation();
        let (bucket, drift) = profile.current_allocation.max_drift(&target);
        if drift > self.thresholds.drift_threshold {
            items.push(ActionableTimelineItem::new(
                "rebalance",
                Timing::immediate(year),
                format!(
                    "Rebalance portfolio: {} is {:.1} points from its {:.0}% target",
                    bucket.as_str(),
                    drift,
                    target.get(bucket)
                ),
            ));
        }
    }

    fn income_gap(&self, profile: &ClientProfile, year: i32, items: &mut Vec<ActionableTimelineItem>) {
        let report = self.analyzer.analyze(&profile.retirement, year);
        if report.income_gap > 0.0 {
            items.push(ActionableTimelineItem::new(
                "retirement-gap",
                Timing::ongoing(),
                format!(
                    "Close the projected ${:.0}/year retirement income gap (readiness score {})",
                    report.income_gap, report.readiness_score
                ),
            ));
        }
    }

    fn milestones(&self, profile: &ClientProfile, year: i32, items: &mut Vec<ActionableTimelineItem>) {
        let retirement = profile.retirement.with_defaults(&self.defaults);
        let retirement_age = retirement.retirement_age();
        let age = retirement.current_age;
        let year_at = |target_age: u32| year + (target_age as i32 - age as i32);

        if retirement.is_retired() {
            items.push(ActionableTimelineItem::new(
                "milestone-withdrawals",
                Timing::ongoing(),
                format!(
                    "Review portfolio withdrawals each year against the {:.1}% sustainable rate",
                    self.defaults.withdrawal_rate * 100.0
                ),
            ));
            if age < RMD_AGE {
                items.push(ActionableTimelineItem::new(
                    "milestone-rmd",
                    Timing::at_age(RMD_AGE, year_at(RMD_AGE)),
                    "Begin required minimum distributions from tax-deferred accounts",
                ));
            }
            return;
        }

        // Pre-retirement window: catch-up contributions
        if age < CATCH_UP_AGE && retirement_age > CATCH_UP_AGE {
            items.push(ActionableTimelineItem::new(
                "milestone-catch-up",
                Timing::at_age(CATCH_UP_AGE, year_at(CATCH_UP_AGE)),
                "Start catch-up contributions to retirement accounts",
            ));
        }

        // Near-retirement window: income plan
        let years_left = retirement.years_to_retirement();
        if years_left > INCOME_PLAN_LEAD_YEARS {
            let review_age = retirement_age - INCOME_PLAN_LEAD_YEARS;
            items.push(ActionableTimelineItem::new(
                "milestone-income-plan",
                Timing::at_age(review_age, year_at(review_age)),
                "Build a retirement income plan and choose a Social Security claiming age",
            ));
        } else {
            items.push(ActionableTimelineItem::new(
                "milestone-income-plan",
                Timing::immediate(year),
                format!(
                    "Finalize the retirement income plan: {} year(s) to retirement",
                    years_left
                ),
            ));
        }

        items.push(ActionableTimelineItem::new(
            "milestone-retirement",
            Timing::at_age(retirement_age, year_at(retirement_age)),
            "Retire: shift the portfolio to the retirement glide path and start withdrawals",
        ));
    }
}

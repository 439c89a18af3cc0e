//! Time-horizon buckets for goals

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::FinancialGoal;

/// Years at or beyond which a goal is long-term
const LONG_HORIZON_YEARS: i32 = 10;
/// Years at or beyond which a goal is mid-term
const MID_HORIZON_YEARS: i32 = 3;
const DAYS_PER_YEAR: f64 = 365.25;

/// Goal horizon bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeHorizon {
    /// 10 years or more
    Long,
    /// 3 to 10 years
    Mid,
    /// Under 3 years (including past-due)
    Short,
}

impl TimeHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizon::Long => "long",
            TimeHorizon::Mid => "mid",
            TimeHorizon::Short => "short",
        }
    }
}

/// Whole calendar years from `today` to `target`, counted by anniversary (negative when past)
pub fn whole_years_until(target: NaiveDate, today: NaiveDate) -> i32 {
    let years = target.year() - today.year();
    if (target.month(), target.day()) < (today.month(), today.day()) {
        years - 1
    } else {
        years
    }
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let months = Months::new(years.unsigned_abs() * 12);
    let shifted = if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Fractional years from `today` to `target`: whole years plus the remaining days
pub fn years_until(target: NaiveDate, today: NaiveDate) -> f64 {
    let whole = whole_years_until(target, today);
    let anniversary = shift_years(today, whole);
    whole as f64 + (target - anniversary).num_days() as f64 / DAYS_PER_YEAR
}

pub fn classify_horizon(target: NaiveDate, today: NaiveDate) -> TimeHorizon {
    let years = whole_years_until(target, today);
    if years >= LONG_HORIZON_YEARS {
        TimeHorizon::Long
    } else if years >= MID_HORIZON_YEARS {
        TimeHorizon::Mid
    } else {
        TimeHorizon::Short
    }
}

/// Goal ids grouped by horizon, each group ordered by priority
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizonBuckets {
    pub long: Vec<String>,
    pub mid: Vec<String>,
    pub short: Vec<String>,
}

impl HorizonBuckets {
    pub fn get(&self, horizon: TimeHorizon) -> &[String] {
        match horizon {
            TimeHorizon::Long => &self.long,
            TimeHorizon::Mid => &self.mid,
            TimeHorizon::Short => &self.short,
        }
    }

    pub fn len(&self) -> usize {
        self.long.len() + self.mid.len() + self.short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket every goal by its effective horizon
pub fn classify_goals(goals: &[FinancialGoal], today: NaiveDate) -> HorizonBuckets {
    let mut ordered: Vec<&FinancialGoal> = goals.iter().collect();
    // Stable: equal priorities keep their list order
    ordered.sort_by_key(|g| g.priority);

    let mut buckets = HorizonBuckets::default();
    for goal in ordered {
        let bucket = match goal.effective_horizon(today) {
            TimeHorizon::Long => &mut buckets.long,
            TimeHorizon::Mid => &mut buckets.mid,
            TimeHorizon::Short => &mut buckets.short,
        };
        bucket.push(goal.id.clone());
    }
    buckets
}

//! Age-based glide path: target stocks/bonds/cash by age
//!
//! Three phases:
//! - Accumulation (10+ years out): stocks = max(50, 110 - age), bonds capped at 40
//! - Pre-retirement (0-10 years out): stocks decay linearly toward 45 at retirement
//! - Retirement: stocks keep decaying with years retired, floored at 20
//!
//! Percentages are whole numbers and cash is always the residual, so every
//! point totals exactly 100.

use serde::{Deserialize, Serialize};

use super::AssetAllocation;

/// Stock ceiling for very young ages, leaving room for the cash floor
const MAX_STOCKS: i64 = 95;
/// Stock floor during accumulation
const ACCUMULATION_STOCK_FLOOR: i64 = 50;
/// Cash kept aside before retirement
const CASH_FLOOR: i64 = 5;
/// Bond cap while accumulating
const ACCUMULATION_BOND_CAP: i64 = 40;
/// Bond cap inside the pre-retirement window
const PRE_RETIREMENT_BOND_CAP: i64 = 50;
/// Length of the pre-retirement window in years
const PRE_RETIREMENT_YEARS: i64 = 10;
/// Stock weight reached at the retirement date
const RETIREMENT_STOCKS: i64 = 45;
/// Stocks lost per year spent in retirement
const RETIRED_STOCK_DECAY: f64 = 1.5;
/// Stock floor in retirement
const RETIRED_STOCK_FLOOR: i64 = 20;
/// Bond band in retirement
const RETIRED_BOND_FLOOR: i64 = 40;
const RETIRED_BOND_CAP: i64 = 60;
/// Years shown past retirement, and minimum path length from today
const YEARS_PAST_RETIREMENT: u32 = 15;
const MIN_PATH_YEARS: u32 = 30;

/// Which rule produced a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlidePhase {
    Accumulation,
    PreRetirement,
    Retirement,
}

/// Target allocation for one age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlidePathPoint {
    pub age: u32,
    pub stocks: u8,
    pub bonds: u8,
    pub cash: u8,
    pub phase: GlidePhase,
}

impl GlidePathPoint {
    pub fn total(&self) -> u32 {
        self.stocks as u32 + self.bonds as u32 + self.cash as u32
    }
}

/// Outcome of comparing the current stock weight against the path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSignal {
    pub age: u32,
    pub current_stocks: f64,
    pub target_stocks: u8,
    /// current - target, in percentage points
    pub drift: f64,
    pub needs_rebalancing: bool,
}

/// The full age-indexed glide path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlidePath {
    pub current_age: u32,
    pub retirement_age: u32,
    pub points: Vec<GlidePathPoint>,
}

impl GlidePath {
    /// Target for a specific age, if the path covers it
    pub fn target_at(&self, age: u32) -> Option<&GlidePathPoint> {
        let index = age.checked_sub(self.current_age)? as usize;
        self.points.get(index)
    }

    /// Compare a current allocation against today's target
    pub fn rebalance_signal(&self, current: &AssetAllocation, threshold: f64) -> RebalanceSignal {
        let target = self
            .target_at(self.current_age)
            .copied()
            .unwrap_or_else(|| point_for_age(self.current_age, self.retirement_age));
        let drift = current.stocks - target.stocks as f64;
        RebalanceSignal {
            age: self.current_age,
            current_stocks: current.stocks,
            target_stocks: target.stocks,
            drift,
            needs_rebalancing: drift.abs() > threshold,
        }
    }
}

/// Build the path from `current_age` to max(retirement + 15, current + 30)
pub fn generate_glide_path(current_age: u32, retirement_age: u32) -> GlidePath {
    let last_age = (retirement_age + YEARS_PAST_RETIREMENT).max(current_age + MIN_PATH_YEARS);
    let points = (current_age..=last_age)
        .map(|age| point_for_age(age, retirement_age))
        .collect();

    GlidePath {
        current_age,
        retirement_age,
        points,
    }
}

fn accumulation_stocks(age: i64) -> i64 {
    (110 - age).clamp(ACCUMULATION_STOCK_FLOOR, MAX_STOCKS)
}

/// Apply the piecewise rule for one age
fn point_for_age(age: u32, retirement_age: u32) -> GlidePathPoint {
    let age_i = age as i64;
    let years_to_retirement = retirement_age as i64 - age_i;

    let (stocks, bonds, phase) = if years_to_retirement >= PRE_RETIREMENT_YEARS {
        let stocks = accumulation_stocks(age_i);
        let bonds = ACCUMULATION_BOND_CAP.min(100 - stocks - CASH_FLOOR);
        (stocks, bonds, GlidePhase::Accumulation)
    } else if years_to_retirement > 0 {
        let window_start = accumulation_stocks(retirement_age as i64 - PRE_RETIREMENT_YEARS);
        let fraction = years_to_retirement as f64 / PRE_RETIREMENT_YEARS as f64;
        let stocks = (RETIREMENT_STOCKS as f64
            + (window_start - RETIREMENT_STOCKS) as f64 * fraction)
            .round() as i64;
        let bonds = PRE_RETIREMENT_BOND_CAP.min(100 - stocks - CASH_FLOOR);
        (stocks, bonds, GlidePhase::PreRetirement)
    } else {
        let years_retired = -years_to_retirement;
        let stocks = ((RETIREMENT_STOCKS as f64 - RETIRED_STOCK_DECAY * years_retired as f64).round()
            as i64)
            .max(RETIRED_STOCK_FLOOR);
        let bonds = (50 + years_retired)
            .clamp(RETIRED_BOND_FLOOR, RETIRED_BOND_CAP)
            .min(100 - stocks);
        (stocks, bonds, GlidePhase::Retirement)
    };

    let bonds = bonds.max(0);
    let cash = 100 - stocks - bonds;

    GlidePathPoint {
        age,
        stocks: stocks as u8,
        bonds: bonds as u8,
        cash: cash as u8,
        phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_path_range() {
        let path = generate_glide_path(45, 65);
        assert_eq!(path.points.first().unwrap().age, 45);
        assert_eq!(path.points.last().unwrap().age, 80); // 65 + 15 > 45 + 30

        let path = generate_glide_path(60, 62);
        assert_eq!(path.points.last().unwrap().age, 90); // 60 + 30 > 62 + 15
    }

    #[test]
    fn test_accumulation_rule() {
        let path = generate_glide_path(30, 65);
        let p30 = path.target_at(30).unwrap();
        assert_eq!((p30.stocks, p30.bonds, p30.cash), (80, 15, 5));
        assert_eq!(p30.phase, GlidePhase::Accumulation);

        let p45 = path.target_at(45).unwrap();
        assert_eq!((p45.stocks, p45.bonds, p45.cash), (65, 30, 5));

        // Age 55 is exactly ten years out: still accumulation
        let p55 = path.target_at(55).unwrap();
        assert_eq!((p55.stocks, p55.bonds, p55.cash), (55, 40, 5));
    }

    #[test]
    fn test_pre_retirement_decay() {
        let path = generate_glide_path(30, 65);
        let p60 = path.target_at(60).unwrap();
        assert_eq!(p60.phase, GlidePhase::PreRetirement);
        assert_eq!((p60.stocks, p60.bonds, p60.cash), (50, 45, 5));

        let stocks: Vec<u8> = (55..=65).map(|a| path.target_at(a).unwrap().stocks).collect();
        assert!(stocks.windows(2).all(|w| w[1] <= w[0]), "stocks should decay: {:?}", stocks);
        assert!((40..=50).contains(&path.target_at(64).unwrap().stocks));
    }

    #[test]
    fn test_retirement_phase() {
        let path = generate_glide_path(30, 65);
        let p65 = path.target_at(65).unwrap();
        assert_eq!(p65.phase, GlidePhase::Retirement);
        assert_eq!((p65.stocks, p65.bonds, p65.cash), (45, 50, 5));

        let p75 = path.target_at(75).unwrap();
        assert_eq!((p75.stocks, p75.bonds, p75.cash), (30, 60, 10));

        let p80 = path.target_at(80).unwrap();
        assert_eq!(p80.stocks, 23);
        assert!(path.target_at(95).is_none());

        let late = generate_glide_path(70, 65);
        let p95 = late.target_at(95).unwrap();
        assert_eq!((p95.stocks, p95.bonds, p95.cash), (20, 60, 20));
    }

    #[test]
    fn test_very_young_age_keeps_cash_floor() {
        let path = generate_glide_path(5, 65);
        let p5 = path.target_at(5).unwrap();
        assert_eq!((p5.stocks, p5.bonds, p5.cash), (95, 0, 5));
    }

    #[test]
    fn test_rebalance_signal() {
        let path = generate_glide_path(45, 65);
        let current = AssetAllocation::new(80.0, 15.0, 5.0, 0.0, 0.0);
        let signal = path.rebalance_signal(&current, 10.0);
        assert_eq!(signal.target_stocks, 65);
        assert!(signal.needs_rebalancing);

        let close = AssetAllocation::new(70.0, 25.0, 5.0, 0.0, 0.0);
        assert!(!path.rebalance_signal(&close, 10.0).needs_rebalancing);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_every_point_totals_100(current_age in 0u32..100, span in 0u32..50) {
            let retirement_age = current_age + span;
            let path = generate_glide_path(current_age, retirement_age);
            for point in &path.points {
                prop_assert_eq!(point.total(), 100, "age {} sums to {}", point.age, point.total());
            }
        }

        #[test]
        fn prop_already_retired_paths_are_valid(current_age in 40u32..100, retired_for in 0u32..40) {
            let retirement_age = current_age.saturating_sub(retired_for);
            let path = generate_glide_path(current_age, retirement_age);
            prop_assert!(path.points.iter().all(|p| p.phase == GlidePhase::Retirement));
            prop_assert!(path.points.iter().all(|p| p.total() == 100 && p.stocks >= 20));
        }
    }
}

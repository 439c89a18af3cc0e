//! Asset allocation buckets, slider adjustment and drift, plus the age-based glide path

mod glide_path;

pub use glide_path::{GlidePath, GlidePathPoint, GlidePhase, RebalanceSignal, generate_glide_path};

use serde::{Deserialize, Serialize};

use crate::error::ValidationIssue;

/// Tolerance when checking that bucket percentages total 100
const TOTAL_TOLERANCE: f64 = 0.01;

/// The five named allocation buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationBucket {
    Stocks,
    Bonds,
    Cash,
    RealEstate,
    Other,
}

impl AllocationBucket {
    pub const ALL: [AllocationBucket; 5] = [
        AllocationBucket::Stocks,
        AllocationBucket::Bonds,
        AllocationBucket::Cash,
        AllocationBucket::RealEstate,
        AllocationBucket::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationBucket::Stocks => "stocks",
            AllocationBucket::Bonds => "bonds",
            AllocationBucket::Cash => "cash",
            AllocationBucket::RealEstate => "real estate",
            AllocationBucket::Other => "other",
        }
    }
}

/// Percentage split of a portfolio across the five buckets.
/// Current and target allocations are independent instances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetAllocation {
    #[serde(default)]
    pub stocks: f64,
    #[serde(default)]
    pub bonds: f64,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub real_estate: f64,
    #[serde(default)]
    pub other: f64,
}

impl AssetAllocation {
    pub fn new(stocks: f64, bonds: f64, cash: f64, real_estate: f64, other: f64) -> Self {
        Self {
            stocks,
            bonds,
            cash,
            real_estate,
            other,
        }
    }

    pub fn get(&self, bucket: AllocationBucket) -> f64 {
        match bucket {
            AllocationBucket::Stocks => self.stocks,
            AllocationBucket::Bonds => self.bonds,
            AllocationBucket::Cash => self.cash,
            AllocationBucket::RealEstate => self.real_estate,
            AllocationBucket::Other => self.other,
        }
    }

    fn set(&mut self, bucket: AllocationBucket, value: f64) {
        match bucket {
            AllocationBucket::Stocks => self.stocks = value,
            AllocationBucket::Bonds => self.bonds = value,
            AllocationBucket::Cash => self.cash = value,
            AllocationBucket::RealEstate => self.real_estate = value,
            AllocationBucket::Other => self.other = value,
        }
    }

    pub fn total(&self) -> f64 {
        AllocationBucket::ALL.iter().map(|&b| self.get(b)).sum()
    }

    /// An allocation is valid when its buckets total 100
    pub fn is_valid(&self) -> bool {
        (self.total() - 100.0).abs() <= TOTAL_TOLERANCE
    }

    /// Slider adjustment: set one bucket, clamped so the total never exceeds 100.
    /// The other buckets are left as they are.
    pub fn with_bucket(&self, bucket: AllocationBucket, value: f64) -> Self {
        let others = self.total() - self.get(bucket);
        let headroom = (100.0 - others).max(0.0);
        let requested = if value.is_finite() { value } else { 0.0 };
        let clamped = requested.clamp(0.0, headroom);

        if clamped != requested {
            log::debug!(
                "{} slider clamped from {} to {} (other buckets hold {})",
                bucket.as_str(),
                requested,
                clamped,
                others
            );
        }

        let mut adjusted = *self;
        adjusted.set(bucket, clamped);
        adjusted
    }

    /// Signed drift of each bucket from a target, in percentage points (self - target)
    pub fn drift_from(&self, target: &AssetAllocation) -> Vec<(AllocationBucket, f64)> {
        AllocationBucket::ALL
            .iter()
            .map(|&b| (b, self.get(b) - target.get(b)))
            .collect()
    }

    /// The bucket furthest from target and its absolute drift
    pub fn max_drift(&self, target: &AssetAllocation) -> (AllocationBucket, f64) {
        self.drift_from(target)
            .into_iter()
            .map(|(b, d)| (b, d.abs()))
            .fold((AllocationBucket::Stocks, 0.0), |best, cur| {
                if cur.1 > best.1 { cur } else { best }
            })
    }

    /// Non-fatal checks: negative buckets and totals other than 100
    pub fn validate(&self, field: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for bucket in AllocationBucket::ALL {
            let value = self.get(bucket);
            if !value.is_finite() || value < 0.0 || value > 100.0 {
                issues.push(ValidationIssue::invalid(
                    format!("{}.{}", field, bucket.as_str()),
                    format!("{} must be between 0 and 100", value),
                ));
            }
        }
        if !self.is_valid() {
            issues.push(ValidationIssue::invalid(
                field,
                format!("allocation totals {:.2}%, expected 100%", self.total()),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> AssetAllocation {
        AssetAllocation::new(70.0, 20.0, 5.0, 5.0, 0.0)
    }

    #[test]
    fn test_valid_allocation() {
        assert!(sample().is_valid());
        assert!(sample().validate("current_allocation").is_empty());

        let short = AssetAllocation::new(60.0, 20.0, 5.0, 5.0, 0.0);
        assert!(!short.is_valid());
        assert_eq!(short.validate("current_allocation").len(), 1);
    }

    #[test]
    fn test_slider_clamps_to_remaining_headroom() {
        // Other buckets hold 30, so stocks cannot move past 70
        let adjusted = sample().with_bucket(AllocationBucket::Stocks, 80.0);
        assert_abs_diff_eq!(adjusted.stocks, 70.0);
        assert!(adjusted.total() <= 100.0);

        // Lowering is always allowed
        let lowered = sample().with_bucket(AllocationBucket::Stocks, 60.0);
        assert_abs_diff_eq!(lowered.stocks, 60.0);
        assert_abs_diff_eq!(lowered.total(), 90.0);

        // Freed headroom can be taken by another bucket, but no more
        let bonds = lowered.with_bucket(AllocationBucket::Bonds, 45.0);
        assert_abs_diff_eq!(bonds.bonds, 30.0);
        assert_abs_diff_eq!(bonds.total(), 100.0);
    }

    #[test]
    fn test_slider_rejects_negative_and_nan() {
        let adjusted = sample().with_bucket(AllocationBucket::Cash, -4.0);
        assert_eq!(adjusted.cash, 0.0);
        let adjusted = sample().with_bucket(AllocationBucket::Cash, f64::NAN);
        assert_eq!(adjusted.cash, 0.0);
    }

    #[test]
    fn test_max_drift() {
        let current = AssetAllocation::new(82.0, 10.0, 3.0, 5.0, 0.0);
        let (bucket, drift) = current.max_drift(&sample());
        assert_eq!(bucket, AllocationBucket::Stocks);
        assert_abs_diff_eq!(drift, 12.0);
    }
}

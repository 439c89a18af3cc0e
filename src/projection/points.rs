//! Output structures for growth projections

use serde::{Deserialize, Serialize};

/// A single year of projection output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    // Timing
    pub period: u32,
    pub year: i32,

    /// Balance at the end of this period
    pub value: f64,

    // Decomposition of the balance
    pub contributions_to_date: f64,
    pub growth_to_date: f64,
}

impl ProjectionPoint {
    pub fn new(period: u32, year: i32) -> Self {
        Self {
            period,
            year,
            value: 0.0,
            contributions_to_date: 0.0,
            growth_to_date: 0.0,
        }
    }
}

/// Complete projection result, one point per period starting at period 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub annual_rate: f64,
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionResult {
    pub fn new(annual_rate: f64) -> Self {
        Self {
            annual_rate,
            points: Vec::new(),
        }
    }

    /// Add a point
    pub fn add_point(&mut self, point: ProjectionPoint) {
        self.points.push(point);
    }

    /// Value at a given period, if projected that far
    pub fn value_at(&self, period: u32) -> Option<f64> {
        self.points.get(period as usize).map(|p| p.value)
    }

    /// Year-indexed values, as consumed by the chart renderer
    pub fn series(&self) -> Vec<(i32, f64)> {
        self.points.iter().map(|p| (p.year, p.value)).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let first = self.points.first();
        let last = self.points.last();

        ProjectionSummary {
            periods: self.points.len().saturating_sub(1) as u32,
            starting_value: first.map(|p| p.value).unwrap_or(0.0),
            final_value: last.map(|p| p.value).unwrap_or(0.0),
            total_contributions: last.map(|p| p.contributions_to_date).unwrap_or(0.0),
            total_growth: last.map(|p| p.growth_to_date).unwrap_or(0.0),
            final_year: last.map(|p| p.year),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub periods: u32,
    pub starting_value: f64,
    pub final_value: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub final_year: Option<i32>,
}

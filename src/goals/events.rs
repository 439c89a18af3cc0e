//! Life events as supplied by the external life-event detector

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{FundingSourceType, ProjectType};

/// One cost category of a projected event, amounts keyed by calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub category: String,
    #[serde(default)]
    pub amounts_by_year: BTreeMap<i32, f64>,
}

impl CostEstimate {
    pub fn total(&self) -> f64 {
        self.amounts_by_year.values().sum()
    }
}

/// A funding source suggested by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedFundingSource {
    pub label: String,
    pub source_type: FundingSourceType,
    #[serde(default)]
    pub suggested_annual_amount: f64,
    #[serde(default)]
    pub rationale: String,
}

/// Financial projection payload attached to a detected event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjection {
    pub project_type: ProjectType,
    pub start_year: i32,
    pub duration_years: u32,
    #[serde(default)]
    pub estimated_costs: Vec<CostEstimate>,
    #[serde(default)]
    pub current_savings: f64,
    #[serde(default)]
    pub recommended_monthly_contribution: f64,
    #[serde(default)]
    pub recommended_funding_sources: Vec<RecommendedFundingSource>,
}

impl FinancialProjection {
    pub fn total_estimated_cost(&self) -> f64 {
        self.estimated_costs.iter().map(|c| c.total()).sum()
    }
}

/// A life event detected from the household's activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub id: String,
    pub event_name: String,
    /// Detector confidence, 0.0 - 1.0
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub projection: Option<FinancialProjection>,
}

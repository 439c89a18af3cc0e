//! Multi-year project plans: cost categories, funding sources and their timeline

use serde::{Deserialize, Serialize};

use super::series::{YearSeries, YearWindow};
use crate::error::ValidationIssue;
use crate::goals::LifeEvent;
use crate::timeline::{ActionableTimelineItem, Timing, TimingPhase};

/// Kind of project a household is funding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    Education,
    Home,
    Business,
    Wedding,
    Vehicle,
    Travel,
    Medical,
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Education => "Education",
            ProjectType::Home => "Home",
            ProjectType::Business => "Business",
            ProjectType::Wedding => "Wedding",
            ProjectType::Vehicle => "Vehicle",
            ProjectType::Travel => "Travel",
            ProjectType::Medical => "Medical",
            ProjectType::Other => "Other",
        }
    }
}

/// Tag on a funding source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingSourceType {
    Savings,
    Investment,
    Gift,
    Loan,
    Grant,
    Scholarship,
    StudentLoan,
    Plan529,
    Mortgage,
    DownPaymentAssistance,
    BusinessLoan,
    Other,
}

impl FundingSourceType {
    pub const ALL: [FundingSourceType; 12] = [
        FundingSourceType::Savings,
        FundingSourceType::Investment,
        FundingSourceType::Gift,
        FundingSourceType::Loan,
        FundingSourceType::Grant,
        FundingSourceType::Scholarship,
        FundingSourceType::StudentLoan,
        FundingSourceType::Plan529,
        FundingSourceType::Mortgage,
        FundingSourceType::DownPaymentAssistance,
        FundingSourceType::BusinessLoan,
        FundingSourceType::Other,
    ];

    /// Whether this source type may fund a project of the given type
    pub fn allowed_for(&self, project_type: ProjectType) -> bool {
        match self {
            FundingSourceType::Plan529
            | FundingSourceType::Scholarship
            | FundingSourceType::StudentLoan
            | FundingSourceType::Grant => project_type == ProjectType::Education,
            FundingSourceType::Mortgage | FundingSourceType::DownPaymentAssistance => {
                project_type == ProjectType::Home
            }
            FundingSourceType::BusinessLoan => project_type == ProjectType::Business,
            FundingSourceType::Savings
            | FundingSourceType::Investment
            | FundingSourceType::Gift
            | FundingSourceType::Loan
            | FundingSourceType::Other => true,
        }
    }

    /// Source types offered for a project type
    pub fn available_for(project_type: ProjectType) -> Vec<FundingSourceType> {
        Self::ALL
            .iter()
            .copied()
            .filter(|t| t.allowed_for(project_type))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCategory {
    pub label: String,
    #[serde(default)]
    pub amounts: YearSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingSource {
    pub label: String,
    pub source_type: FundingSourceType,
    #[serde(default)]
    pub amounts: YearSeries,
}

/// A project's cost and funding ledger.
///
/// Cost amounts live on the project window `[start_year, start_year + duration_years)`.
/// Funding amounts live on the funding window, which opens at `funding_start_year`
/// (the year planning began, at most `start_year`) and closes with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub id: String,
    pub name: String,
    pub project_type: ProjectType,
    pub start_year: i32,
    pub duration_years: u32,
    pub funding_start_year: i32,
    #[serde(default)]
    pub cost_categories: Vec<CostCategory>,
    #[serde(default)]
    pub funding_sources: Vec<FundingSource>,
    #[serde(default)]
    pub timeline: Vec<ActionableTimelineItem>,
    #[serde(default)]
    pub linked_event_id: Option<String>,
}

impl ProjectPlan {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        project_type: ProjectType,
        start_year: i32,
        duration_years: u32,
        current_year: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_type,
            start_year,
            duration_years,
            funding_start_year: current_year.min(start_year),
            cost_categories: Vec::new(),
            funding_sources: Vec::new(),
            timeline: Vec::new(),
            linked_event_id: None,
        }
    }

    pub fn project_window(&self) -> YearWindow {
        YearWindow::new(self.start_year, self.duration_years)
    }

    pub fn funding_window(&self) -> YearWindow {
        YearWindow::spanning(self.funding_start_year, self.project_window().end())
    }

    /// Funding years before the project starts
    pub fn pre_funding_years(&self) -> u32 {
        (self.start_year - self.funding_start_year).max(0) as u32
    }

    /// Add a cost category, fitting its amounts to the project window
    pub fn with_cost_category(&self, label: impl Into<String>, amounts: YearSeries) -> Self {
        let mut plan = self.clone();
        plan.cost_categories.push(CostCategory {
            label: label.into(),
            amounts: YearSeries::fitted(self.project_window(), amounts.iter()),
        });
        plan
    }

    /// Add a funding source, fitting its amounts to the funding window
    pub fn with_funding_source(
        &self,
        label: impl Into<String>,
        source_type: FundingSourceType,
        amounts: YearSeries,
    ) -> Self {
        let mut plan = self.clone();
        plan.funding_sources.push(FundingSource {
            label: label.into(),
            source_type,
            amounts: YearSeries::fitted(self.funding_window(), amounts.iter()),
        });
        plan
    }

    pub fn with_timeline(&self, timeline: Vec<ActionableTimelineItem>) -> Self {
        let mut plan = self.clone();
        plan.timeline = timeline;
        plan
    }

    /// Seed a plan from a detected life event's financial projection.
    /// Returns None when the event carries no projection.
    pub fn from_life_event(event: &LifeEvent, current_year: i32) -> Option<Self> {
        let projection = event.projection.as_ref()?;

        let mut plan = ProjectPlan::new(
            format!("project-{}", event.id),
            event.event_name.clone(),
            projection.project_type,
            projection.start_year,
            projection.duration_years,
            current_year,
        );
        plan.linked_event_id = Some(event.id.clone());

        for estimate in &projection.estimated_costs {
            let amounts: YearSeries = estimate.amounts_by_year.iter().map(|(&y, &a)| (y, a)).collect();
            plan = plan.with_cost_category(estimate.category.clone(), amounts);
        }

        if projection.current_savings > 0.0 {
            let seed = YearSeries::new().with_amount(plan.funding_start_year, projection.current_savings);
            plan = plan.with_funding_source("Current savings", FundingSourceType::Savings, seed);
        }

        for source in &projection.recommended_funding_sources {
            if !source.source_type.allowed_for(plan.project_type) {
                log::warn!(
                    "{:?} is not available for {} projects, skipping {:?}",
                    source.source_type,
                    plan.project_type.as_str(),
                    source.label
                );
                continue;
            }
            let amounts = YearSeries::filled(plan.funding_window(), source.suggested_annual_amount.max(0.0));
            plan = plan.with_funding_source(source.label.clone(), source.source_type, amounts);
        }

        let timeline = plan.default_timeline();
        Some(plan.with_timeline(timeline))
    }

    /// Pre-project, one item per project year, post-project
    pub fn default_timeline(&self) -> Vec<ActionableTimelineItem> {
        let mut items = Vec::new();

        if self.pre_funding_years() > 0 {
            items.push(ActionableTimelineItem::new(
                format!("{}-pre", self.id),
                Timing::pre_project(self.funding_start_year),
                format!("Open a dedicated savings account for {}", self.name),
            ));
        }

        items.extend(self.year_items());

        items.push(ActionableTimelineItem::new(
            format!("{}-post", self.id),
            Timing::post_project(self.project_window().end()),
            format!("Close out {} and redirect remaining funds", self.name),
        ));

        items
    }

    /// Default review item for each project year
    fn year_items(&self) -> impl Iterator<Item = ActionableTimelineItem> + '_ {
        self.project_window().years().enumerate().map(move |(n, year)| {
            let n = n as u32 + 1;
            ActionableTimelineItem::new(
                format!("{}-y{}", self.id, n),
                Timing::project_year(n, year),
                format!("Review {} costs and funding for year {}", self.name, n),
            )
        })
    }

    /// Earliest funding year in the window holding a non-zero amount
    fn earliest_funded_year(&self) -> Option<i32> {
        let window = self.funding_window();
        self.funding_sources
            .iter()
            .flat_map(|source| source.amounts.iter())
            .filter(|&(year, amount)| amount != 0.0 && window.contains(year))
            .map(|(year, _)| year)
            .min()
    }

    /// Move the plan to a new start year and duration.
    ///
    /// Costs and funding keep their offset from the project start. The funding window opens
    /// at `current_year` (or the new start if earlier), extended back far enough to keep
    /// every funded pre-project year. Timeline items are realigned as data; project-year
    /// items past the new duration are dropped and new years get default items.
    pub fn retimeline(&self, new_start: i32, new_duration: u32, current_year: i32) -> Self {
        let old_project = self.project_window();
        let old_funding = self.funding_window();
        let shift = new_start - self.start_year;

        let mut plan = self.clone();
        plan.start_year = new_start;
        plan.duration_years = new_duration;
        plan.funding_start_year = match self.earliest_funded_year() {
            Some(year) => current_year.min(new_start).min(year + shift),
            None => current_year.min(new_start),
        };

        let new_project = plan.project_window();
        let new_funding = plan.funding_window();

        let mut dropped_cost = 0.0;
        plan.cost_categories = self
            .cost_categories
            .iter()
            .map(|category| {
                let (amounts, dropped) =
                    category.amounts.rekeyed(old_project, self.start_year, new_project, new_start);
                dropped_cost += dropped;
                CostCategory {
                    label: category.label.clone(),
                    amounts,
                }
            })
            .collect();

        let mut dropped_funding = 0.0;
        plan.funding_sources = self
            .funding_sources
            .iter()
            .map(|source| {
                let (amounts, dropped) =
                    source.amounts.rekeyed(old_funding, self.start_year, new_funding, new_start);
                dropped_funding += dropped;
                FundingSource {
                    label: source.label.clone(),
                    source_type: source.source_type,
                    amounts,
                }
            })
            .collect();

        if dropped_cost != 0.0 || dropped_funding != 0.0 {
            log::warn!(
                "retimeline of {} dropped {:.2} cost and {:.2} funding outside the new window",
                self.id,
                dropped_cost,
                dropped_funding
            );
        }

        plan.timeline = self
            .timeline
            .iter()
            .filter(|item| match item.timing.phase {
                TimingPhase::ProjectYear(n) => n <= new_duration,
                _ => true,
            })
            .map(|item| {
                item.with_timing(item.timing.realigned(
                    self.start_year,
                    self.duration_years,
                    new_start,
                    new_duration,
                ))
            })
            .collect();
        let has_year_items = self
            .timeline
            .iter()
            .any(|item| matches!(item.timing.phase, TimingPhase::ProjectYear(_)));
        if new_duration > self.duration_years && has_year_items {
            let added: Vec<ActionableTimelineItem> = plan
                .year_items()
                .skip(self.duration_years as usize)
                .collect();
            // New years go before the close-out items
            let at = plan
                .timeline
                .iter()
                .position(|item| matches!(item.timing.phase, TimingPhase::PostProject))
                .unwrap_or(plan.timeline.len());
            let tail = plan.timeline.split_off(at);
            plan.timeline.extend(added);
            plan.timeline.extend(tail);
        }

        log::debug!(
            "retimelined {} from {}+{} to {}+{}",
            self.id,
            self.start_year,
            self.duration_years,
            new_start,
            new_duration
        );
        plan
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let field = format!("projects[{}]", self.id);

        if self.duration_years == 0 {
            issues.push(ValidationIssue::warning(&field, format!("{} has no project years", self.name)));
        }

        for category in &self.cost_categories {
            if category.amounts.iter().any(|(_, a)| a < 0.0 || !a.is_finite()) {
                issues.push(ValidationIssue::invalid(
                    format!("{}.cost[{}]", field, category.label),
                    "cost amounts must be non-negative",
                ));
            }
            if category.amounts.iter().any(|(y, a)| a != 0.0 && !self.project_window().contains(y)) {
                issues.push(ValidationIssue::warning(
                    format!("{}.cost[{}]", field, category.label),
                    "amounts outside the project years are not counted",
                ));
            }
        }

        for source in &self.funding_sources {
            if !source.source_type.allowed_for(self.project_type) {
                issues.push(ValidationIssue::invalid(
                    format!("{}.funding[{}]", field, source.label),
                    format!("{:?} cannot fund a {} project", source.source_type, self.project_type.as_str()),
                ));
            }
            if source.amounts.iter().any(|(_, a)| a < 0.0 || !a.is_finite()) {
                issues.push(ValidationIssue::invalid(
                    format!("{}.funding[{}]", field, source.label),
                    "funding amounts must be non-negative",
                ));
            }
            if source.amounts.iter().any(|(y, a)| a != 0.0 && !self.funding_window().contains(y)) {
                issues.push(ValidationIssue::warning(
                    format!("{}.funding[{}]", field, source.label),
                    "amounts outside the funding years are counted but dropped on retimeline",
                ));
            }
        }

        issues
    }
}

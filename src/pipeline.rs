//! Profile -> derived outputs
//!
//! `PlanningSession` is an immutable value: every edit returns a new session.
//! `compute_plan` recomputes every derived quantity from the session; the host
//! calls it again whenever it observes a change. The action timeline is a
//! separate call since it is only generated on request.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::allocation::{generate_glide_path, AllocationBucket, GlidePath, RebalanceSignal};
use crate::assumptions::PlanningAssumptions;
use crate::error::{PlanningError, Result, ValidationIssue};
use crate::goals::{classify_goals, import_life_events, FinancialGoal, HorizonBuckets, ImportOutcome, LifeEvent, TimeHorizon};
use crate::ledger::{calculate_funding_gap, FundingSummary, ProjectPlan};
use crate::profile::{ClientProfile, RetirementProfile};
use crate::projection::GrowthInputs;
use crate::retirement::{ReadinessAnalyzer, ReadinessReport};
use crate::scenario::{ScenarioProjection, ScenarioRunner, ScenarioSummary};
use crate::timeline::{ActionTimelineGenerator, ActionableTimelineItem};

/// Net-worth projections run at least this many years
const MIN_PROJECTION_YEARS: u32 = 10;
const MAX_PROJECTION_YEARS: u32 = 60;

/// One household's planning state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSession {
    pub profile: ClientProfile,
    pub assumptions: PlanningAssumptions,
}

impl PlanningSession {
    pub fn new(profile: ClientProfile, assumptions: PlanningAssumptions) -> Self {
        Self { profile, assumptions }
    }

    pub fn with_profile(&self, profile: ClientProfile) -> Self {
        Self {
            profile,
            assumptions: self.assumptions.clone(),
        }
    }

    pub fn with_assumptions(&self, assumptions: PlanningAssumptions) -> Self {
        Self {
            profile: self.profile.clone(),
            assumptions,
        }
    }

    pub fn with_goals(&self, goals: Vec<FinancialGoal>) -> Self {
        self.with_profile(self.profile.with_goals(goals))
    }

    /// Slider edit of one current-allocation bucket, clamped so the total stays within 100
    pub fn with_allocation_bucket(&self, bucket: AllocationBucket, value: f64) -> Self {
        let allocation = self.profile.current_allocation.with_bucket(bucket, value);
        self.with_profile(self.profile.with_current_allocation(allocation))
    }

    pub fn with_retirement(&self, retirement: RetirementProfile) -> Self {
        self.with_profile(self.profile.with_retirement(retirement))
    }

    /// Insert or replace a project (matched by id)
    pub fn with_project(&self, project: ProjectPlan) -> Self {
        self.with_profile(self.profile.with_project(project))
    }

    /// Move one project to a new start year and duration
    pub fn retimeline_project(
        &self,
        project_id: &str,
        new_start: i32,
        new_duration: u32,
        current_year: i32,
    ) -> Result<Self> {
        let project = self
            .profile
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| PlanningError::UnknownLabel {
                kind: "project",
                value: project_id.to_string(),
            })?;
        Ok(self.with_project(project.retimeline(new_start, new_duration, current_year)))
    }

    /// Import detected life events as goals, seeding a project plan for each new one.
    /// Re-running with the same events changes nothing.
    pub fn import_events(&self, events: &[LifeEvent], today: NaiveDate) -> (Self, ImportOutcome) {
        let outcome = import_life_events(&self.profile.goals, events, today);
        let mut profile = self.profile.with_goals(outcome.goals.clone());

        for event in events {
            let imported = outcome.imported.iter().any(|id| *id == format!("event-{}", event.id));
            let has_project = profile
                .projects
                .iter()
                .any(|p| p.linked_event_id.as_deref() == Some(event.id.as_str()));
            if !imported || has_project {
                continue;
            }
            if let Some(project) = ProjectPlan::from_life_event(event, today.year()) {
                profile = profile.with_project(project);
            }
        }

        log::info!(
            "imported {} of {} life events for {:?}",
            outcome.imported.len(),
            events.len(),
            profile.client_name
        );
        (self.with_profile(profile), outcome)
    }
}

/// Display status of one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalStatus {
    pub id: String,
    pub name: String,
    pub progress_pct: f64,
    pub remaining_amount: f64,
    pub horizon: TimeHorizon,
    pub months_to_target: Option<u32>,
}

impl GoalStatus {
    fn of(goal: &FinancialGoal, today: NaiveDate) -> Self {
        Self {
            id: goal.id.clone(),
            name: goal.name.clone(),
            progress_pct: goal.progress_pct(),
            remaining_amount: goal.remaining_amount(),
            horizon: goal.effective_horizon(today),
            months_to_target: goal.months_to_target(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketDrift {
    pub bucket: AllocationBucket,
    pub current: f64,
    pub target: f64,
    /// current - target, in percentage points
    pub drift: f64,
}

/// Snapshot of every derived value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutputs {
    pub as_of: NaiveDate,
    pub client_name: String,
    pub net_worth: f64,
    pub monthly_expenses: f64,
    pub savings_rate: f64,
    pub annual_savings: f64,
    pub scenarios: ScenarioProjection,
    pub scenario_summary: Option<ScenarioSummary>,
    pub glide_path: GlidePath,
    /// Only when a current allocation was entered
    pub rebalance: Option<RebalanceSignal>,
    pub readiness: ReadinessReport,
    pub goals: Vec<GoalStatus>,
    pub horizon_buckets: HorizonBuckets,
    pub projects: Vec<FundingSummary>,
    pub allocation_drift: Vec<BucketDrift>,
    pub issues: Vec<ValidationIssue>,
}

/// Recompute every derived output of the session
pub fn compute_plan(session: &PlanningSession, today: NaiveDate) -> PlanOutputs {
    let profile = &session.profile;
    let assumptions = &session.assumptions;
    let year = today.year();

    // Unset retirement ages take the configured defaults everywhere below
    let retirement = profile.retirement.with_defaults(&assumptions.retirement);

    let mut issues = assumptions.validate();
    issues.extend(profile.with_retirement(retirement.clone()).validate());

    let net_worth = profile.net_worth();
    let annual_savings = profile.annual_savings();
    let periods = retirement
        .years_to_retirement()
        .clamp(MIN_PROJECTION_YEARS, MAX_PROJECTION_YEARS);

    // A negative net worth projects from zero
    let inputs = GrowthInputs::new(net_worth.max(0.0), annual_savings);
    let scenarios = ScenarioRunner::with_assumptions(assumptions)
        .run(&inputs, year, periods)
        .unwrap_or_else(|e| {
            log::warn!("net worth projection skipped: {}", e);
            issues.push(ValidationIssue::invalid("scenarios", e.to_string()));
            ScenarioProjection {
                rates: assumptions.scenario_rates,
                inflation: assumptions.inflation,
                rows: Vec::new(),
            }
        });
    let scenario_summary = scenarios.summary();

    let glide_path = generate_glide_path(retirement.current_age, retirement.retirement_age());
    let has_allocation = profile.current_allocation.total() > 0.0;
    let rebalance = has_allocation.then(|| {
        glide_path.rebalance_signal(&profile.current_allocation, assumptions.thresholds.glide_path_threshold)
    });

    let readiness = ReadinessAnalyzer::with_assumptions(assumptions).analyze(&retirement, year);

    let goals = profile.goals.iter().map(|g| GoalStatus::of(g, today)).collect();
    let horizon_buckets = classify_goals(&profile.goals, today);
    let projects = profile.projects.iter().map(calculate_funding_gap).collect();

    let allocation_drift = if has_allocation {
        let target = profile.effective_target_allocation();
        profile
            .current_allocation
            .drift_from(&target)
            .into_iter()
            .map(|(bucket, drift)| BucketDrift {
                bucket,
                current: profile.current_allocation.get(bucket),
                target: target.get(bucket),
                drift,
            })
            .collect()
    } else {
        Vec::new()
    };

    log::debug!(
        "computed plan for {:?}: {} scenario rows, readiness {}, {} issue(s)",
        profile.client_name,
        scenarios.rows.len(),
        readiness.readiness_score,
        issues.len()
    );

    PlanOutputs {
        as_of: today,
        client_name: profile.client_name.clone(),
        net_worth,
        monthly_expenses: profile.monthly_expenses(),
        savings_rate: profile.savings_rate(),
        annual_savings,
        scenarios,
        scenario_summary,
        glide_path,
        rebalance,
        readiness,
        goals,
        horizon_buckets,
        projects,
        allocation_drift,
        issues,
    }
}

/// Run the action timeline rules for the session's profile
pub fn generate_actions(session: &PlanningSession, today: NaiveDate) -> Vec<ActionableTimelineItem> {
    ActionTimelineGenerator::with_assumptions(&session.assumptions).generate(&session.profile, today)
}

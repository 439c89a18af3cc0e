//! End-to-end: profile fixture -> plan outputs, edits and action timeline

use std::path::Path;

use advisory_planner::assumptions::PlanningAssumptions;
use advisory_planner::goals::{GoalType, TimeHorizon};
use advisory_planner::ledger::{calculate_funding_gap, FundingStatus};
use advisory_planner::pipeline::{compute_plan, generate_actions, PlanningSession};
use advisory_planner::profile::{load_life_events, load_profile};
use advisory_planner::retirement::ReadinessStatus;
use approx::assert_relative_eq;
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn session() -> PlanningSession {
    let profile = load_profile("tests/fixtures/household.json").unwrap();
    let assumptions = PlanningAssumptions::from_csv_path(Path::new("data")).unwrap();
    PlanningSession::new(profile, assumptions)
}

#[test]
fn test_shipped_assumptions_match_defaults() {
    let loaded = PlanningAssumptions::from_csv_path(Path::new("data")).unwrap();
    assert_eq!(loaded, PlanningAssumptions::default_planning());
}

#[test]
fn test_full_plan_from_fixture() {
    let plan = compute_plan(&session(), today());

    assert_eq!(plan.client_name, "Okafor household");
    assert_relative_eq!(plan.net_worth, 251_799.50, epsilon = 1e-6);
    assert_relative_eq!(plan.monthly_expenses, 9_700.0);
    assert_relative_eq!(plan.savings_rate, 5_300.0 / 15_000.0 * 100.0, epsilon = 1e-9);
    assert_relative_eq!(plan.annual_savings, 63_600.0);

    // 23 years to retirement: 24 points on a shared axis
    assert_eq!(plan.scenarios.rows.len(), 24);
    assert_eq!(plan.scenarios.rows[0].year, 2026);
    for row in &plan.scenarios.rows {
        assert!(row.optimistic >= row.expected && row.expected >= row.conservative);
        assert!(row.real.is_finite() && row.real <= row.expected);
    }

    let readiness = &plan.readiness;
    assert_relative_eq!(readiness.required_portfolio, 1_500_000.0);
    assert_eq!(readiness.readiness_score, 97);
    assert_eq!(readiness.status, ReadinessStatus::OnTrack);
    assert!(readiness.income_gap > 0.0 && readiness.income_gap < 5_000.0);

    // 110 - 42 = 68 target stocks, 78 held: exactly at the threshold
    let rebalance = plan.rebalance.unwrap();
    assert_eq!(rebalance.target_stocks, 68);
    assert!(!rebalance.needs_rebalancing);

    assert_eq!(plan.horizon_buckets.get(TimeHorizon::Short), ["emergency".to_string()]);
    assert_eq!(plan.horizon_buckets.get(TimeHorizon::Mid), ["house".to_string()]);
    assert_eq!(plan.goals[0].progress_pct, 100.0);

    let kitchen = &plan.projects[0];
    assert_relative_eq!(kitchen.total_cost, 60_000.0);
    assert_relative_eq!(kitchen.total_funding, 50_000.0);
    assert_relative_eq!(kitchen.funding_gap, 10_000.0);
    assert_eq!(kitchen.status, FundingStatus::Shortfall);

    assert!(plan.issues.is_empty(), "unexpected issues: {:?}", plan.issues);
    assert!(serde_json::to_string(&plan).is_ok());
}

#[test]
fn test_retimeline_fixture_project() {
    let moved = session().retimeline_project("kitchen", 2029, 1, 2026).unwrap();
    let kitchen = &moved.profile.projects[0];

    let labels: Vec<String> = kitchen.timeline.iter().map(|i| i.label()).collect();
    assert_eq!(labels, vec!["Pre-Project (2027)", "Year 1 (2029)"]);

    let savings = &kitchen.funding_sources[0].amounts;
    assert_eq!(savings.get(2026), 0.0);
    assert_eq!(savings.get(2027), 20_000.0);
    assert_eq!(savings.get(2029), 10_000.0);

    let funding = calculate_funding_gap(kitchen);
    assert_relative_eq!(funding.funding_gap, 10_000.0);

    // and back again
    let restored = moved.retimeline_project("kitchen", 2028, 1, 2026).unwrap();
    assert_eq!(restored.profile.projects[0].cost_categories, session().profile.projects[0].cost_categories);
    assert_eq!(restored.profile.projects[0].funding_sources, session().profile.projects[0].funding_sources);
}

#[test]
fn test_life_event_import_is_idempotent() {
    let events = load_life_events("tests/fixtures/life_events.json").unwrap();
    let (imported, outcome) = session().import_events(&events, today());

    assert_eq!(
        outcome.imported,
        vec!["event-evt-college".to_string(), "event-evt-promotion".to_string()]
    );
    assert!(outcome.skipped.is_empty());
    assert_eq!(imported.profile.goals.len(), 4);

    let college = &imported.profile.goals[2];
    assert_relative_eq!(college.target_amount, 160_000.0);
    assert_eq!(college.priority, 3);

    // no projection: a custom goal waiting for a target, and no project
    let promotion = &imported.profile.goals[3];
    assert_eq!(promotion.goal_type, GoalType::Custom);
    assert_eq!(promotion.target_amount, 0.0);
    assert_eq!(imported.profile.projects.len(), 2);

    let plan = compute_plan(&imported, today());
    assert_eq!(plan.horizon_buckets.get(TimeHorizon::Mid).len(), 2);
    assert_eq!(plan.horizon_buckets.get(TimeHorizon::Short).len(), 2);
    assert!(plan.issues.iter().any(|i| i.field == "goals[event-evt-promotion].target_amount"));
    let college_funding = plan.projects.iter().find(|p| p.project_id == "project-evt-college").unwrap();
    // 18k seed + 7.8k a year over 2026..2035
    assert_relative_eq!(college_funding.total_funding, 96_000.0);
    assert_relative_eq!(college_funding.funding_gap, 64_000.0);

    let (again, second) = imported.import_events(&events, today());
    assert!(second.imported.is_empty());
    assert_eq!(again, imported);
}

#[test]
fn test_action_timeline_for_fixture() {
    let actions = generate_actions(&session(), today());
    let ids: Vec<&str> = actions.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "account-0-capacity",
            "rebalance",
            "retirement-gap",
            "milestone-catch-up",
            "milestone-income-plan",
            "milestone-retirement",
        ]
    );
    assert_eq!(actions, generate_actions(&session(), today()));
}

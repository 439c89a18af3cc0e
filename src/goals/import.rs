//! Turn detected life events into goals
//!
//! Import is idempotent: an event already linked to a goal (by event id) or whose
//! name matches an existing goal is skipped, and existing goals are never modified.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FinancialGoal, GoalType, LifeEvent};

/// Why an event did not produce a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    AlreadyImported,
    InvalidStartYear(i32),
}

/// Result of one import pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Existing goals followed by newly imported ones
    pub goals: Vec<FinancialGoal>,
    /// Ids of the goals created by this pass
    pub imported: Vec<String>,
    /// (event id, reason) for each event that was not imported
    pub skipped: Vec<(String, SkipReason)>,
}

/// Goal id derived from the event id so re-imports are recognisable
fn goal_id_for(event: &LifeEvent) -> String {
    format!("event-{}", event.id)
}

fn already_imported(goals: &[FinancialGoal], event: &LifeEvent) -> bool {
    goals.iter().any(|g| {
        g.linked_event_id.as_deref() == Some(event.id.as_str())
            || g.name.trim().eq_ignore_ascii_case(event.event_name.trim())
    })
}

/// Create one goal per new event. Events without a financial projection become a
/// custom goal dated `today` with no target, left for the advisor to fill in.
pub fn import_life_events(existing: &[FinancialGoal], events: &[LifeEvent], today: NaiveDate) -> ImportOutcome {
    let mut goals = existing.to_vec();
    let mut imported = Vec::new();
    let mut skipped = Vec::new();
    let mut next_priority = existing.iter().map(|g| g.priority + 1).max().unwrap_or(1);

    for event in events {
        if already_imported(&goals, event) {
            skipped.push((event.id.clone(), SkipReason::AlreadyImported));
            continue;
        }

        let goal = match &event.projection {
            Some(projection) => {
                let Some(target_date) = NaiveDate::from_ymd_opt(projection.start_year, 1, 1) else {
                    skipped.push((event.id.clone(), SkipReason::InvalidStartYear(projection.start_year)));
                    continue;
                };
                FinancialGoal {
                    id: goal_id_for(event),
                    name: event.event_name.clone(),
                    goal_type: GoalType::from(projection.project_type),
                    target_amount: projection.total_estimated_cost(),
                    current_amount: projection.current_savings.max(0.0),
                    target_date,
                    priority: next_priority,
                    monthly_contribution: projection.recommended_monthly_contribution.max(0.0),
                    linked_event_id: Some(event.id.clone()),
                    time_horizon: None,
                }
            }
            None => {
                log::debug!("event {:?} has no financial projection, importing without a target", event.event_name);
                FinancialGoal {
                    priority: next_priority,
                    linked_event_id: Some(event.id.clone()),
                    ..FinancialGoal::new(goal_id_for(event), event.event_name.clone(), GoalType::Custom, 0.0, today)
                }
            }
        };
        next_priority += 1;

        log::debug!("imported goal {} from event {:?}", goal.id, event.event_name);
        imported.push(goal.id.clone());
        goals.push(goal);
    }

    ImportOutcome {
        goals,
        imported,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::{CostEstimate, FinancialProjection};
    use crate::ledger::ProjectType;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn event(id: &str, name: &str, with_projection: bool) -> LifeEvent {
        let projection = with_projection.then(|| FinancialProjection {
            project_type: ProjectType::Education,
            start_year: 2030,
            duration_years: 4,
            estimated_costs: vec![CostEstimate {
                category: "Tuition".into(),
                amounts_by_year: BTreeMap::from([(2030, 30_000.0), (2031, 31_000.0)]),
            }],
            current_savings: 12_000.0,
            recommended_monthly_contribution: 600.0,
            recommended_funding_sources: Vec::new(),
        });
        LifeEvent {
            id: id.into(),
            event_name: name.into(),
            confidence: 0.8,
            projection,
        }
    }

    #[test]
    fn test_import_creates_linked_goal() {
        let outcome = import_life_events(&[], &[event("e1", "Maya's college", true)], today());

        assert_eq!(outcome.imported, vec!["event-e1".to_string()]);
        let goal = &outcome.goals[0];
        assert_eq!(goal.goal_type, GoalType::Education);
        assert_eq!(goal.target_amount, 61_000.0);
        assert_eq!(goal.current_amount, 12_000.0);
        assert_eq!(goal.linked_event_id.as_deref(), Some("e1"));
        assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    }

    #[test]
    fn test_import_is_idempotent() {
        let events = vec![event("e1", "Maya's college", true), event("e2", "New home", true)];
        let first = import_life_events(&[], &events, today());
        let second = import_life_events(&first.goals, &events, today());

        assert_eq!(second.goals, first.goals);
        assert!(second.imported.is_empty());
        assert_eq!(second.skipped.len(), 2);
    }

    #[test]
    fn test_import_preserves_user_edits() {
        let first = import_life_events(&[], &[event("e1", "Maya's college", true)], today());
        let mut edited = first.goals.clone();
        edited[0].target_amount = 95_000.0;
        edited[0].name = "College fund".into();

        // Renamed, but still linked by event id
        let second = import_life_events(&edited, &[event("e1", "Maya's college", true)], today());
        assert_eq!(second.goals.len(), 1);
        assert_eq!(second.goals[0].target_amount, 95_000.0);
    }

    #[test]
    fn test_dedupe_by_name_and_within_batch() {
        let manual = FinancialGoal::new(
            "manual",
            "new home",
            GoalType::Home,
            100_000.0,
            NaiveDate::from_ymd_opt(2029, 1, 1).unwrap(),
        );
        let events = vec![event("e2", "New Home", true), event("e3", "Wedding", true), event("e4", "Wedding", true)];
        let outcome = import_life_events(&[manual], &events, today());

        assert_eq!(outcome.imported, vec!["event-e3".to_string()]);
        assert_eq!(outcome.goals.len(), 2);
        assert_eq!(outcome.goals[1].priority, 1);
    }

    #[test]
    fn test_event_without_projection_imports_custom_goal() {
        let outcome = import_life_events(&[], &[event("e5", "Job change", false)], today());
        assert_eq!(outcome.imported, vec!["event-e5".to_string()]);
        assert!(outcome.skipped.is_empty());

        let goal = &outcome.goals[0];
        assert_eq!(goal.goal_type, GoalType::Custom);
        assert_eq!(goal.target_amount, 0.0);
        assert_eq!(goal.target_date, today());
        assert_eq!(goal.linked_event_id.as_deref(), Some("e5"));
        // flagged for a target rather than dropped
        assert_eq!(goal.validate().len(), 1);

        let again = import_life_events(&outcome.goals, &[event("e5", "Job change", false)], today());
        assert!(again.imported.is_empty());
    }
}

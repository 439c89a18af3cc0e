//! Action timeline: dated checklist items for the household and its projects

mod generator;
mod timing;

pub use generator::ActionTimelineGenerator;
pub use timing::{Timing, TimingPhase};

use serde::{Deserialize, Serialize};

/// One checklist item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionableTimelineItem {
    pub id: String,
    pub timing: Timing,
    pub action: String,
    #[serde(default)]
    pub completed: bool,
}

impl ActionableTimelineItem {
    pub fn new(id: impl Into<String>, timing: Timing, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timing,
            action: action.into(),
            completed: false,
        }
    }

    pub fn with_timing(&self, timing: Timing) -> Self {
        Self {
            timing,
            ..self.clone()
        }
    }

    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    pub fn label(&self) -> String {
        self.timing.label()
    }
}

/// Stable sort by timing; items with equal timing keep their rule order
pub fn sort_items(items: &[ActionableTimelineItem]) -> Vec<ActionableTimelineItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| a.timing.cmp(&b.timing));
    sorted
}

/// Group items under their phase label ("Year 2", "Ongoing", ...), groups in timing order
pub fn group_items(items: &[ActionableTimelineItem]) -> Vec<(String, Vec<ActionableTimelineItem>)> {
    let mut groups: Vec<(TimingPhase, Vec<ActionableTimelineItem>)> = Vec::new();
    for item in sort_items(items) {
        match groups.last_mut() {
            Some((phase, members)) if *phase == item.timing.phase => members.push(item),
            _ => groups.push((item.timing.phase, vec![item])),
        }
    }
    groups
        .into_iter()
        .map(|(phase, members)| (phase.group_label(), members))
        .collect()
}

/// Completed share of the items in percent (0 for an empty list)
pub fn completion_pct(items: &[ActionableTimelineItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let done = items.iter().filter(|i| i.completed).count();
    done as f64 / items.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ActionableTimelineItem> {
        vec![
            ActionableTimelineItem::new("c", Timing::ongoing(), "Review annually"),
            ActionableTimelineItem::new("b", Timing::project_year(1, 2026), "Pay deposit"),
            ActionableTimelineItem::new("a", Timing::pre_project(2025), "Open account"),
            ActionableTimelineItem::new("d", Timing::project_year(1, 2026), "Apply for aid").with_completed(true),
        ]
    }

    #[test]
    fn test_sort_is_stable() {
        let ids: Vec<String> = sort_items(&items()).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_group_items() {
        let groups = group_items(&items());
        let labels: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Pre-Project", "Year 1", "Ongoing"]);
        assert_eq!(groups[1].1.len(), 2);
    }

    #[test]
    fn test_completion() {
        assert_eq!(completion_pct(&items()), 25.0);
        assert_eq!(completion_pct(&[]), 0.0);
    }

    #[test]
    fn test_item_accepts_legacy_label() {
        let item: ActionableTimelineItem =
            serde_json::from_str(r#"{"id":"x","timing":"Pre-Project (2025)","action":"Open account"}"#).unwrap();
        assert_eq!(item.timing, Timing::pre_project(2025));
        assert!(!item.completed);
    }
}

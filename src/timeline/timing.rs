//! Structured timing for timeline items
//!
//! A phase plus an optional calendar year. Display labels such as
//! "Year 2 (2027)" are rendered from the structure, and shifting a project's
//! timeline moves the year as data.

use std::cmp::Ordering;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Where an item sits relative to a project or the household's life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingPhase {
    Immediate,
    PreProject,
    /// 1-based project year
    ProjectYear(u32),
    /// A milestone at a given age
    Age(u32),
    PostProject,
    Ongoing,
}

impl TimingPhase {
    fn rank(&self) -> (u8, u32) {
        match self {
            TimingPhase::Immediate => (0, 0),
            TimingPhase::PreProject => (1, 0),
            TimingPhase::ProjectYear(n) => (2, *n),
            TimingPhase::Age(age) => (3, *age),
            TimingPhase::PostProject => (4, 0),
            TimingPhase::Ongoing => (5, 0),
        }
    }

    /// Label of the group this phase is displayed under
    pub fn group_label(&self) -> String {
        match self {
            TimingPhase::Immediate => "Immediate".to_string(),
            TimingPhase::PreProject => "Pre-Project".to_string(),
            TimingPhase::ProjectYear(n) => format!("Year {}", n),
            TimingPhase::Age(age) => format!("Age {}", age),
            TimingPhase::PostProject => "Post-Project".to_string(),
            TimingPhase::Ongoing => "Ongoing".to_string(),
        }
    }
}

/// Phase plus explicit calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Timing {
    pub phase: TimingPhase,
    pub year: Option<i32>,
}

impl Timing {
    pub fn new(phase: TimingPhase, year: Option<i32>) -> Self {
        Self { phase, year }
    }

    pub fn immediate(year: i32) -> Self {
        Self::new(TimingPhase::Immediate, Some(year))
    }

    pub fn pre_project(year: i32) -> Self {
        Self::new(TimingPhase::PreProject, Some(year))
    }

    pub fn project_year(n: u32, year: i32) -> Self {
        Self::new(TimingPhase::ProjectYear(n), Some(year))
    }

    pub fn at_age(age: u32, year: i32) -> Self {
        Self::new(TimingPhase::Age(age), Some(year))
    }

    pub fn post_project(year: i32) -> Self {
        Self::new(TimingPhase::PostProject, Some(year))
    }

    pub fn ongoing() -> Self {
        Self::new(TimingPhase::Ongoing, None)
    }

    /// Display label, e.g. "Year 2 (2027)" or "Ongoing"
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.phase.group_label(), year),
            None => self.phase.group_label(),
        }
    }

    /// Re-anchor to a new project window.
    /// Project years are recomputed from the new start, pre-project items move
    /// with the start and post-project items move with the end.
    pub fn realigned(&self, old_start: i32, old_duration: u32, new_start: i32, new_duration: u32) -> Self {
        let start_shift = new_start - old_start;
        let end_shift = (new_start + new_duration as i32) - (old_start + old_duration as i32);

        let year = match self.phase {
            TimingPhase::ProjectYear(n) => Some(new_start + n as i32 - 1),
            TimingPhase::PreProject => self.year.map(|y| y + start_shift),
            TimingPhase::PostProject => self.year.map(|y| y + end_shift),
            TimingPhase::Immediate | TimingPhase::Age(_) | TimingPhase::Ongoing => self.year,
        };

        Self { phase: self.phase, year }
    }

    /// Parse a legacy free-text label ("Year 2 (2027)", "Pre-Project (2025)", "Ongoing").
    /// Returns None for labels that match no known pattern.
    pub fn parse(label: &str) -> Option<Self> {
        let text = label.trim();
        let (head, year) = split_trailing_year(text);
        let head = head.trim().to_ascii_lowercase();

        let phase = if head == "immediate" || head == "now" {
            TimingPhase::Immediate
        } else if head == "pre-project" || head == "pre project" {
            TimingPhase::PreProject
        } else if head == "post-project" || head == "post project" {
            TimingPhase::PostProject
        } else if head == "ongoing" {
            TimingPhase::Ongoing
        } else if let Some(rest) = head.strip_prefix("year ") {
            TimingPhase::ProjectYear(rest.trim().parse().ok()?)
        } else if let Some(rest) = head.strip_prefix("age ") {
            TimingPhase::Age(rest.trim().parse().ok()?)
        } else {
            return None;
        };

        Some(Self { phase, year })
    }
}

/// Split "Label (2027)" into ("Label", Some(2027))
fn split_trailing_year(text: &str) -> (&str, Option<i32>) {
    if let Some(stripped) = text.strip_suffix(')') {
        if let Some(open) = stripped.rfind('(') {
            if let Ok(year) = stripped[open + 1..].trim().parse::<i32>() {
                return (&stripped[..open], Some(year));
            }
        }
    }
    (text, None)
}

/// Accepts the structured form or a legacy label string
impl<'de> Deserialize<'de> for Timing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Structured {
                phase: TimingPhase,
                #[serde(default)]
                year: Option<i32>,
            },
            Label(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Structured { phase, year } => Ok(Timing { phase, year }),
            Repr::Label(label) => {
                Timing::parse(&label).ok_or_else(|| D::Error::custom(format!("unrecognised timing label {:?}", label)))
            }
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl PartialOrd for Timing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Phase order first, then year (undated items last within a phase)
impl Ord for Timing {
    fn cmp(&self, other: &Self) -> Ordering {
        self.phase
            .rank()
            .cmp(&other.phase.rank())
            .then_with(|| self.year.unwrap_or(i32::MAX).cmp(&other.year.unwrap_or(i32::MAX)))
    }
}

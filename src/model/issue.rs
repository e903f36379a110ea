use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issue as fetched from the tracker. Optional fields stay optional all
/// the way through; the chart pipeline applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    /// Human-readable code, e.g. "ENG-42".
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: WorkflowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: String,
    pub name: String,
    pub state_type: StateType,
}

/// Workflow state category. Trackers report this as a free-form string;
/// anything unrecognized maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    Unstarted,
    Backlog,
    Started,
    Completed,
    #[serde(alias = "cancelled")]
    Canceled,
    #[serde(other)]
    Unknown,
}

impl StateType {
    pub fn from_api(s: &str) -> Self {
        match s {
            "unstarted" => StateType::Unstarted,
            "backlog" => StateType::Backlog,
            "started" => StateType::Started,
            "completed" => StateType::Completed,
            "canceled" | "cancelled" => StateType::Canceled,
            _ => StateType::Unknown,
        }
    }

    /// Progress percentage shown on chart bars.
    pub fn progress(self) -> u8 {
        match self {
            StateType::Completed => 100,
            StateType::Started => 50,
            _ => 0,
        }
    }

    /// Fixed ordering used as a sort tiebreak: unstarted < backlog <
    /// started < completed < canceled, with unknown types last.
    pub fn sort_priority(self) -> u16 {
        match self {
            StateType::Unstarted => 0,
            StateType::Backlog => 1,
            StateType::Started => 2,
            StateType::Completed => 3,
            StateType::Canceled => 4,
            StateType::Unknown => 999,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRef {
    pub id: String,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: String,
    pub title: String,
    pub identifier: String,
}

/// A time-boxed period (sprint) with inclusive day-aligned bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: String,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub key: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_follows_state_type() {
        assert_eq!(StateType::Completed.progress(), 100);
        assert_eq!(StateType::Started.progress(), 50);
        assert_eq!(StateType::Unstarted.progress(), 0);
        assert_eq!(StateType::Backlog.progress(), 0);
        assert_eq!(StateType::Canceled.progress(), 0);
        assert_eq!(StateType::Unknown.progress(), 0);
    }

    #[test]
    fn canceled_spellings_parse_to_same_variant() {
        assert_eq!(StateType::from_api("canceled"), StateType::Canceled);
        assert_eq!(StateType::from_api("cancelled"), StateType::Canceled);
        let parsed: StateType = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, StateType::Canceled);
    }

    #[test]
    fn unknown_state_types_sort_last() {
        assert_eq!(StateType::from_api("triage"), StateType::Unknown);
        assert_eq!(StateType::Unknown.sort_priority(), 999);
        assert!(StateType::Canceled.sort_priority() < StateType::Unknown.sort_priority());
    }
}

//! Turns the raw issue list into sorted, display-ready timeline items.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::core::consts::UNASSIGNED_SORT_KEY;
use crate::core::date::end_of_day;
use crate::core::hierarchy::Hierarchy;
use crate::model::issue::{Assignee, Cycle, Issue, ParentRef, WorkflowState};

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub id: String,
    pub title: String,
    pub identifier: String,
    pub assignee: Option<Assignee>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub state: WorkflowState,
    pub progress: u8,
    pub estimate: Option<f64>,
    pub parent: Option<ParentRef>,
    pub has_children: bool,
    pub hierarchy_level: usize,
    pub hierarchy_path: String,
}

/// Build and sort timeline items for the current snapshot. The issue list
/// is expected to be pre-filtered (cycle/assignee filters live upstream).
pub fn build_timeline(
    issues: &[Issue],
    selected_cycle: Option<&Cycle>,
    now: DateTime<Utc>,
) -> Vec<TimelineItem> {
    let hierarchy = Hierarchy::resolve(issues);

    let mut items: Vec<TimelineItem> = issues
        .iter()
        .map(|issue| {
            let (level, path) = match hierarchy.info(&issue.id) {
                Some(info) => (info.level, info.path.clone()),
                None => (0, issue.identifier.clone()),
            };
            TimelineItem {
                id: issue.id.clone(),
                title: issue.title.clone(),
                identifier: issue.identifier.clone(),
                assignee: issue.assignee.clone(),
                start_date: Some(resolve_start_date(issue, selected_cycle)),
                end_date: Some(resolve_end_date(issue, now)),
                state: issue.state.clone(),
                progress: issue.state.state_type.progress(),
                estimate: issue.estimate,
                parent: issue.parent.clone(),
                has_children: hierarchy.has_children(&issue.id),
                hierarchy_level: level,
                hierarchy_path: path,
            }
        })
        .collect();

    items.sort_by(compare_items);
    items
}

/// Effective start: `started_at` wins; otherwise `created_at`, clamped to
/// the cycle start when it falls before a selected cycle. The late side is
/// deliberately left unclamped.
fn resolve_start_date(issue: &Issue, selected_cycle: Option<&Cycle>) -> DateTime<Utc> {
    if let Some(started) = issue.started_at {
        return started;
    }
    if let Some(cycle) = selected_cycle {
        if issue.created_at < cycle.starts_at {
            return cycle.starts_at;
        }
    }
    issue.created_at
}

/// Effective end: the due date, or the end of today for issues without one.
fn resolve_end_date(issue: &Issue, now: DateTime<Utc>) -> DateTime<Utc> {
    issue.due_date.unwrap_or_else(|| end_of_day(now))
}

/// Total order over timeline items: assignee, hierarchy path, start date,
/// state priority, identifier. The identifier tiebreak guarantees no two
/// distinct issues ever compare equal.
pub fn compare_items(a: &TimelineItem, b: &TimelineItem) -> Ordering {
    compare_assignees(a, b)
        .then_with(|| fold_cmp(&a.hierarchy_path, &b.hierarchy_path))
        .then_with(|| compare_start_dates(a.start_date, b.start_date))
        .then_with(|| {
            a.state
                .state_type
                .sort_priority()
                .cmp(&b.state.state_type.sort_priority())
        })
        .then_with(|| fold_cmp(&a.identifier, &b.identifier))
}

fn assignee_key(item: &TimelineItem) -> &str {
    item.assignee
        .as_ref()
        .map(|a| a.display_name.as_str())
        .unwrap_or(UNASSIGNED_SORT_KEY)
}

fn compare_assignees(a: &TimelineItem, b: &TimelineItem) -> Ordering {
    // Unassigned strictly last, independent of how display names compare.
    match (&a.assignee, &b.assignee) {
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        _ => fold_cmp(assignee_key(a), assignee_key(b)),
    }
}

fn compare_start_dates(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
) -> Ordering {
    // A missing start sorts before any real date.
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

/// Case-folded string comparison with the raw string as tiebreak, so the
/// order is stable for strings that fold to the same form.
pub fn fold_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::issue::StateType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn state(state_type: StateType) -> WorkflowState {
        WorkflowState {
            id: "st".into(),
            name: format!("{state_type:?}"),
            state_type,
        }
    }

    fn assignee(name: &str) -> Option<Assignee> {
        Some(Assignee {
            id: format!("user-{name}"),
            name: name.to_lowercase(),
            display_name: name.into(),
        })
    }

    fn issue(id: &str, identifier: &str) -> Issue {
        Issue {
            id: id.into(),
            title: format!("Issue {identifier}"),
            identifier: identifier.into(),
            description: None,
            state: state(StateType::Unstarted),
            assignee: None,
            cycle: None,
            parent: None,
            created_at: now() - Duration::days(5),
            updated_at: now(),
            due_date: None,
            started_at: None,
            estimate: None,
        }
    }

    fn cycle(start: DateTime<Utc>, end: DateTime<Utc>) -> Cycle {
        Cycle {
            id: "cyc".into(),
            name: "Cycle 3".into(),
            starts_at: start,
            ends_at: end,
            number: 3,
        }
    }

    fn item(identifier: &str) -> TimelineItem {
        TimelineItem {
            id: identifier.to_lowercase(),
            title: identifier.into(),
            identifier: identifier.into(),
            assignee: None,
            start_date: None,
            end_date: None,
            state: state(StateType::Unstarted),
            progress: 0,
            estimate: None,
            parent: None,
            has_children: false,
            hierarchy_level: 0,
            hierarchy_path: identifier.into(),
        }
    }

    #[test]
    fn started_at_wins_over_created_at() {
        let mut i = issue("a", "ENG-1");
        i.started_at = Some(now() - Duration::days(2));
        let items = build_timeline(&[i], None, now());
        assert_eq!(items[0].start_date, Some(now() - Duration::days(2)));
    }

    #[test]
    fn created_before_cycle_start_clamps_to_cycle() {
        let c = cycle(now() - Duration::days(3), now() + Duration::days(4));
        let i = issue("a", "ENG-1"); // created 5 days ago
        let items = build_timeline(&[i], Some(&c), now());
        assert_eq!(items[0].start_date, Some(c.starts_at));
    }

    #[test]
    fn created_after_cycle_start_is_not_clamped() {
        let c = cycle(now() - Duration::days(10), now() - Duration::days(8));
        let i = issue("a", "ENG-1"); // created after the cycle ended
        let items = build_timeline(&[i], Some(&c), now());
        // No late-side clamp: the created date stands even past the cycle end.
        assert_eq!(items[0].start_date, Some(now() - Duration::days(5)));
    }

    #[test]
    fn started_at_skips_cycle_clamp() {
        let c = cycle(now() - Duration::days(3), now() + Duration::days(4));
        let mut i = issue("a", "ENG-1");
        i.started_at = Some(now() - Duration::days(7));
        let items = build_timeline(&[i], Some(&c), now());
        assert_eq!(items[0].start_date, Some(now() - Duration::days(7)));
    }

    #[test]
    fn missing_due_date_ends_today() {
        let items = build_timeline(&[issue("a", "ENG-1")], None, now());
        assert_eq!(items[0].end_date, Some(end_of_day(now())));
    }

    #[test]
    fn unassigned_sorts_after_every_assignee() {
        let mut a = item("ENG-1");
        a.assignee = assignee("Zoe");
        let b = item("ENG-2");
        assert_eq!(compare_items(&a, &b), Ordering::Less);
        assert_eq!(compare_items(&b, &a), Ordering::Greater);
    }

    #[test]
    fn missing_start_date_sorts_first() {
        let mut a = item("ENG-1");
        a.start_date = Some(now());
        let b = item("ENG-2");
        assert_eq!(compare_items(&b, &a), Ordering::Less);
    }

    #[test]
    fn state_priority_breaks_date_ties() {
        let mut a = item("ENG-1");
        a.start_date = Some(now());
        a.state = state(StateType::Completed);
        let mut b = item("ENG-2");
        b.start_date = Some(now());
        b.state = state(StateType::Unstarted);
        assert_eq!(compare_items(&b, &a), Ordering::Less);
    }

    #[test]
    fn identifier_makes_the_order_total() {
        let mut a = item("ENG-1");
        let mut b = item("ENG-2");
        a.start_date = Some(now());
        b.start_date = Some(now());
        b.hierarchy_path = a.hierarchy_path.clone();
        assert_ne!(compare_items(&a, &b), Ordering::Equal);
    }

    #[test]
    fn sort_is_deterministic() {
        let issues: Vec<Issue> = (0..20)
            .map(|i| {
                let mut iss = issue(&format!("id-{i}"), &format!("ENG-{}", 20 - i));
                if i % 3 == 0 {
                    iss.assignee = assignee("Alice");
                }
                if i % 4 == 0 {
                    iss.state = state(StateType::Started);
                }
                iss
            })
            .collect();
        let first = build_timeline(&issues, None, now());
        let second = build_timeline(&issues, None, now());
        assert_eq!(first, second);
        // Total order: no two adjacent items compare equal.
        for pair in first.windows(2) {
            assert_ne!(compare_items(&pair[0], &pair[1]), Ordering::Equal);
        }
    }

    #[test]
    fn subtree_stays_contiguous_under_one_assignee() {
        // C <- B <- A, all Alice's, interleaved with an unrelated issue.
        let mut c = issue("c", "ENG-1");
        c.assignee = assignee("Alice");
        let mut b = issue("b", "ENG-2");
        b.assignee = assignee("Alice");
        b.parent = Some(ParentRef {
            id: "c".into(),
            title: "Issue ENG-1".into(),
            identifier: "ENG-1".into(),
        });
        let mut a = issue("a", "ENG-3");
        a.assignee = assignee("Alice");
        a.parent = Some(ParentRef {
            id: "b".into(),
            title: "Issue ENG-2".into(),
            identifier: "ENG-2".into(),
        });
        let mut other = issue("d", "ENG-0");
        other.assignee = assignee("Alice");

        let items = build_timeline(&[a, other, b, c], None, now());
        let order: Vec<&str> = items.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(order, ["ENG-0", "ENG-1", "ENG-2", "ENG-3"]);
        assert_eq!(items[1].hierarchy_level, 0);
        assert_eq!(items[2].hierarchy_level, 1);
        assert_eq!(items[3].hierarchy_level, 2);
    }

    #[test]
    fn end_to_end_parent_child_scenario() {
        // A: Alice, started, due in 3 days, estimate 3.
        let mut a = issue("a", "ENG-1");
        a.assignee = assignee("Alice");
        a.state = state(StateType::Started);
        a.due_date = Some(now() + Duration::days(3));
        a.estimate = Some(3.0);
        // B: Alice, child of A, unstarted, no due date, created today.
        let mut b = issue("b", "ENG-2");
        b.assignee = assignee("Alice");
        b.parent = Some(ParentRef {
            id: "a".into(),
            title: "Issue ENG-1".into(),
            identifier: "ENG-1".into(),
        });
        b.estimate = Some(2.0);
        b.created_at = now();

        let items = build_timeline(&[b, a], None, now());
        assert_eq!(items[0].identifier, "ENG-1");
        assert_eq!(items[1].identifier, "ENG-2");
        assert_eq!(items[0].progress, 50);
        assert_eq!(items[1].progress, 0);
        assert_eq!(items[1].hierarchy_level, 1);
        assert_eq!(items[1].hierarchy_path, "ENG-1 > ENG-2");
        assert!(items[0].has_children);
    }
}

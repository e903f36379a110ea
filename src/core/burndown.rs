//! Planned vs. actual remaining-work series over the visible range.

use chrono::{DateTime, Utc};

use crate::core::consts::{DEFAULT_ESTIMATE, FALLBACK_RANGE_DAYS};
use crate::core::date::{
    add_days, date_grid, end_of_day, is_same_day, max_date, min_date, start_of_day,
};
use crate::core::layout::TimeRange;
use crate::model::issue::{Cycle, Issue};

#[derive(Debug, Clone, PartialEq)]
pub struct BurndownPoint {
    pub date: DateTime<Utc>,
    pub planned_remaining: f64,
    pub actual_remaining: f64,
    pub total_planned: f64,
}

/// The charted range: the cycle's day bounds when one is selected, else the
/// span of the issues' due/created dates, else today plus thirty days.
pub fn burndown_time_range(
    issues: &[Issue],
    selected_cycle: Option<&Cycle>,
    now: DateTime<Utc>,
) -> TimeRange {
    if let Some(cycle) = selected_cycle {
        return TimeRange {
            start: start_of_day(cycle.starts_at),
            end: end_of_day(cycle.ends_at),
        };
    }

    if issues.is_empty() {
        return TimeRange {
            start: start_of_day(now),
            end: end_of_day(add_days(now, FALLBACK_RANGE_DAYS)),
        };
    }

    let dates: Vec<Option<DateTime<Utc>>> = issues
        .iter()
        .flat_map(|issue| {
            [
                Some(issue.due_date.unwrap_or(issue.created_at)),
                Some(issue.created_at),
            ]
        })
        .collect();

    TimeRange {
        start: start_of_day(min_date(&dates, now)),
        end: end_of_day(max_date(&dates, now)),
    }
}

/// One point per grid day. `total_planned` is constant across the series.
pub fn compute_burndown(
    issues: &[Issue],
    selected_cycle: Option<&Cycle>,
    now: DateTime<Utc>,
) -> Vec<BurndownPoint> {
    let range = burndown_time_range(issues, selected_cycle, now);
    let grid = date_grid(range.start, range.end);
    let total_planned: f64 = issues.iter().map(effective_estimate).sum();

    grid.into_iter()
        .map(|day| {
            let planned_done: f64 = issues
                .iter()
                .filter(|issue| planned_done_by(issue, selected_cycle, day))
                .map(effective_estimate)
                .sum();
            let actual_done: f64 = issues
                .iter()
                .filter(|issue| completed_by(issue, selected_cycle, day))
                .map(effective_estimate)
                .sum();

            BurndownPoint {
                date: day,
                planned_remaining: (total_planned - planned_done).max(0.0),
                actual_remaining: (total_planned - actual_done).max(0.0),
                total_planned,
            }
        })
        .collect()
}

/// Index of the series entry matching the current calendar day, if the
/// range includes it. Drives the "today" marker.
pub fn today_index(points: &[BurndownPoint], now: DateTime<Utc>) -> Option<usize> {
    points.iter().position(|p| is_same_day(p.date, now))
}

fn effective_estimate(issue: &Issue) -> f64 {
    issue.estimate.unwrap_or(DEFAULT_ESTIMATE)
}

/// Same calendar day counts as done.
fn on_or_before(target: DateTime<Utc>, day: DateTime<Utc>) -> bool {
    target < day || is_same_day(target, day)
}

/// Should this issue be planned-complete by `day`?
///
/// With a cycle selected, everything lands by the cycle end: a due date
/// past the end (or missing) becomes the cycle end. Without one, issues
/// lacking a due date get an estimated finish of max(3, estimate x 2) days
/// after creation.
fn planned_done_by(issue: &Issue, selected_cycle: Option<&Cycle>, day: DateTime<Utc>) -> bool {
    let target = match selected_cycle {
        Some(cycle) => match issue.due_date {
            Some(due) if due <= cycle.ends_at => due,
            _ => cycle.ends_at,
        },
        None => match issue.due_date {
            Some(due) => due,
            None => {
                let estimated_days = (effective_estimate(issue) * 2.0).max(3.0);
                add_days(issue.created_at, estimated_days)
            }
        },
    };
    on_or_before(target, day)
}

/// Actually complete by `day`: progress is 100 and the completion instant
/// (`updated_at`, clamped into the cycle window when one is selected) has
/// passed.
fn completed_by(issue: &Issue, selected_cycle: Option<&Cycle>, day: DateTime<Utc>) -> bool {
    if issue.state.state_type.progress() != 100 {
        return false;
    }
    let mut completion = issue.updated_at;
    if let Some(cycle) = selected_cycle {
        if completion < cycle.starts_at {
            completion = cycle.starts_at;
        } else if completion > cycle.ends_at {
            completion = cycle.ends_at;
        }
    }
    on_or_before(completion, day)
}

//! Maps sorted timeline items onto normalized bar positions against a
//! day-grid. Percentages, not pixels, so any frontend width works.

use chrono::{DateTime, Utc};

use crate::core::consts::MIN_BAR_WIDTH_PCT;
use crate::core::date::{days_diff, end_of_day, max_date, min_date, start_of_day};
use crate::core::timeline::TimelineItem;
use crate::model::issue::Cycle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPosition {
    pub left_pct: f64,
    pub width_pct: f64,
}

/// The visible range: the selected cycle's day bounds, else the min/max of
/// the items' dates, else just today.
pub fn resolve_time_range(
    items: &[TimelineItem],
    selected_cycle: Option<&Cycle>,
    now: DateTime<Utc>,
) -> TimeRange {
    if let Some(cycle) = selected_cycle {
        return TimeRange {
            start: start_of_day(cycle.starts_at),
            end: end_of_day(cycle.ends_at),
        };
    }

    let dates: Vec<Option<DateTime<Utc>>> = items
        .iter()
        .flat_map(|item| [item.start_date, item.end_date])
        .collect();

    TimeRange {
        start: start_of_day(min_date(&dates, now)),
        end: end_of_day(max_date(&dates, now)),
    }
}

pub fn item_position(item: &TimelineItem, range: &TimeRange) -> ItemPosition {
    let Some(start) = item.start_date else {
        return ItemPosition {
            left_pct: 0.0,
            width_pct: 0.0,
        };
    };

    // A single-day range still divides by one full day.
    let total_days = days_diff(range.start, range.end).max(1);
    let start_offset = days_diff(range.start, start);
    let duration = item
        .end_date
        .map(|end| days_diff(start, end))
        .unwrap_or(1);

    ItemPosition {
        left_pct: start_offset as f64 / total_days as f64 * 100.0,
        width_pct: (duration as f64 / total_days as f64 * 100.0).max(MIN_BAR_WIDTH_PCT),
    }
}

pub fn compute_layout(items: &[TimelineItem], range: &TimeRange) -> Vec<ItemPosition> {
    items.iter().map(|item| item_position(item, range)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::issue::{StateType, WorkflowState};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn item(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> TimelineItem {
        TimelineItem {
            id: "a".into(),
            title: "A".into(),
            identifier: "ENG-1".into(),
            assignee: None,
            start_date: start,
            end_date: end,
            state: WorkflowState {
                id: "st".into(),
                name: "Todo".into(),
                state_type: StateType::Unstarted,
            },
            progress: 0,
            estimate: None,
            parent: None,
            has_children: false,
            hierarchy_level: 0,
            hierarchy_path: "ENG-1".into(),
        }
    }

    #[test]
    fn full_range_item_spans_the_whole_width() {
        let range = TimeRange {
            start: start_of_day(now()),
            end: end_of_day(now() + Duration::days(9)),
        };
        let pos = item_position(&item(Some(range.start), Some(range.end)), &range);
        assert_eq!(pos.left_pct, 0.0);
        assert_eq!(pos.width_pct, 100.0);
    }

    #[test]
    fn offset_item_is_positioned_proportionally() {
        let range = TimeRange {
            start: start_of_day(now()),
            end: end_of_day(now() + Duration::days(9)),
        };
        let start = range.start + Duration::days(5);
        let pos = item_position(&item(Some(start), Some(start + Duration::days(2))), &range);
        assert_eq!(pos.left_pct, 50.0);
        assert_eq!(pos.width_pct, 20.0);
    }

    #[test]
    fn width_is_floored_for_sub_day_items() {
        let range = TimeRange {
            start: start_of_day(now()),
            end: end_of_day(now() + Duration::days(199)),
        };
        let start = range.start + Duration::days(3);
        let pos = item_position(&item(Some(start), Some(start)), &range);
        assert_eq!(pos.width_pct, MIN_BAR_WIDTH_PCT);
    }

    #[test]
    fn missing_start_date_collapses_the_bar() {
        let range = TimeRange {
            start: start_of_day(now()),
            end: end_of_day(now()),
        };
        let pos = item_position(&item(None, None), &range);
        assert_eq!(pos, ItemPosition { left_pct: 0.0, width_pct: 0.0 });
    }

    #[test]
    fn single_day_range_does_not_divide_by_zero() {
        let range = TimeRange {
            start: start_of_day(now()),
            end: start_of_day(now()),
        };
        let pos = item_position(&item(Some(range.start), Some(range.start)), &range);
        assert!(pos.width_pct.is_finite());
        assert!(pos.left_pct.is_finite());
    }

    #[test]
    fn cycle_bounds_win_over_item_dates() {
        let cycle = Cycle {
            id: "c".into(),
            name: "Cycle 1".into(),
            starts_at: now() - Duration::days(3),
            ends_at: now() + Duration::days(3),
            number: 1,
        };
        let items = [item(
            Some(now() - Duration::days(30)),
            Some(now() + Duration::days(30)),
        )];
        let range = resolve_time_range(&items, Some(&cycle), now());
        assert_eq!(range.start, start_of_day(cycle.starts_at));
        assert_eq!(range.end, end_of_day(cycle.ends_at));
    }

    #[test]
    fn empty_items_fall_back_to_today() {
        let range = resolve_time_range(&[], None, now());
        assert_eq!(range.start, start_of_day(now()));
        assert_eq!(range.end, end_of_day(now()));
    }
}

/// Points assumed for an issue with no estimate. Applied in planning and
/// burndown math only, never written back onto the issue.
pub const DEFAULT_ESTIMATE: f64 = 1.0;

/// Joins ancestor identifiers into the sortable hierarchy path,
/// e.g. "ENG-1 > ENG-7 > ENG-9".
pub const HIERARCHY_SEPARATOR: &str = " > ";

/// Row prefix marking a child issue in the Gantt label column.
pub const CHILD_PREFIX: &str = "|_";

/// Sort key for items without an assignee. The comparator also checks for
/// the missing assignee structurally; this key is the fallback string so
/// unassigned items land after every real display name.
pub const UNASSIGNED_SORT_KEY: &str = "zz_unassigned";

/// Valid estimate values, the Fibonacci-ish scale the tracker offers.
pub const ESTIMATE_OPTIONS: [f64; 8] = [0.0, 1.0, 2.0, 3.0, 4.0, 8.0, 13.0, 21.0];

/// Bars never shrink below this width so sub-day items stay visible.
pub const MIN_BAR_WIDTH_PCT: f64 = 1.0;

/// Burndown range when there are no issues to derive one from.
pub const FALLBACK_RANGE_DAYS: f64 = 30.0;

use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::api::{self, IssueTracker};
use crate::config::AppConfig;
use crate::core::timeline::fold_cmp;
use crate::event::KeyAction;
use crate::model::issue::{Assignee, Cycle, Issue};

#[derive(Debug)]
pub enum Action {
    Key(KeyAction),
    Tick,
    /// A complete snapshot; the previous one is replaced wholesale.
    SnapshotLoaded {
        issues: Vec<Issue>,
        cycles: Vec<Cycle>,
    },
    FetchError(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Gantt,
    Burndown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Chart,
    CyclePicker,
    AssigneePicker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    Unassigned,
    Id(String),
}

pub struct App {
    pub issues: Vec<Issue>,
    pub cycles: Vec<Cycle>,
    pub selected_cycle_id: Option<String>,
    pub assignee_filter: Option<AssigneeFilter>,
    pub view_mode: ViewMode,
    pub chart: ChartView,
    pub scroll: usize,
    pub picker_index: usize,
    pub loading: bool,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub action_tx: mpsc::UnboundedSender<Action>,
    tracker: Box<dyn IssueTracker>,
}

impl App {
    pub fn new(config: &AppConfig, action_tx: mpsc::UnboundedSender<Action>) -> Result<Self> {
        let tracker = api::create_tracker(config)?;
        Ok(Self {
            issues: Vec::new(),
            cycles: Vec::new(),
            selected_cycle_id: None,
            assignee_filter: None,
            view_mode: ViewMode::Chart,
            chart: ChartView::Gantt,
            scroll: 0,
            picker_index: 0,
            loading: true,
            flash_message: None,
            should_quit: false,
            action_tx,
            tracker,
        })
    }

    pub async fn update(&mut self, action: Action) {
        // Clear flash message after 3 seconds
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => self.handle_key(key).await,
            Action::Tick => {}
            Action::SnapshotLoaded { issues, cycles } => {
                self.issues = issues;
                self.cycles = cycles;
                self.loading = false;
                // A vanished cycle clears the filter rather than leaving a
                // dangling selection.
                if let Some(id) = &self.selected_cycle_id {
                    if !self.cycles.iter().any(|c| &c.id == id) {
                        self.selected_cycle_id = None;
                    }
                }
            }
            Action::FetchError(msg) => {
                self.loading = false;
                self.flash_message = Some((format!("Fetch error: {msg}"), Instant::now()));
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    async fn handle_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Up => match self.view_mode {
                ViewMode::Chart => {
                    self.scroll = self.scroll.saturating_sub(1);
                }
                ViewMode::CyclePicker | ViewMode::AssigneePicker => {
                    self.picker_index = self.picker_index.saturating_sub(1);
                }
            },
            KeyAction::Down => match self.view_mode {
                ViewMode::Chart => {
                    let max = self.filtered_issues().len().saturating_sub(1);
                    if self.scroll < max {
                        self.scroll += 1;
                    }
                }
                ViewMode::CyclePicker => {
                    // Entry 0 is "no cycle".
                    if self.picker_index < self.cycles.len() {
                        self.picker_index += 1;
                    }
                }
                ViewMode::AssigneePicker => {
                    // Entries 0/1 are "everyone" and "unassigned".
                    if self.picker_index < self.assignee_options().len() + 1 {
                        self.picker_index += 1;
                    }
                }
            },
            KeyAction::Select => match self.view_mode {
                ViewMode::CyclePicker => {
                    self.selected_cycle_id = if self.picker_index == 0 {
                        None
                    } else {
                        self.cycles
                            .get(self.picker_index - 1)
                            .map(|c| c.id.clone())
                    };
                    self.scroll = 0;
                    self.view_mode = ViewMode::Chart;
                }
                ViewMode::AssigneePicker => {
                    self.assignee_filter = match self.picker_index {
                        0 => None,
                        1 => Some(AssigneeFilter::Unassigned),
                        n => self
                            .assignee_options()
                            .get(n - 2)
                            .map(|a| AssigneeFilter::Id(a.id.clone())),
                    };
                    self.scroll = 0;
                    self.view_mode = ViewMode::Chart;
                }
                ViewMode::Chart => {}
            },
            KeyAction::Escape => match self.view_mode {
                ViewMode::Chart => {
                    // Esc on a chart clears the active filters.
                    self.selected_cycle_id = None;
                    self.assignee_filter = None;
                    self.scroll = 0;
                }
                _ => {
                    self.view_mode = ViewMode::Chart;
                }
            },
            KeyAction::ToggleChart => {
                if self.view_mode == ViewMode::Chart {
                    self.chart = match self.chart {
                        ChartView::Gantt => ChartView::Burndown,
                        ChartView::Burndown => ChartView::Gantt,
                    };
                }
            }
            KeyAction::GanttView => {
                self.view_mode = ViewMode::Chart;
                self.chart = ChartView::Gantt;
            }
            KeyAction::BurndownView => {
                self.view_mode = ViewMode::Chart;
                self.chart = ChartView::Burndown;
            }
            KeyAction::PickCycle => {
                self.view_mode = ViewMode::CyclePicker;
                self.picker_index = match &self.selected_cycle_id {
                    Some(id) => self
                        .cycles
                        .iter()
                        .position(|c| &c.id == id)
                        .map(|i| i + 1)
                        .unwrap_or(0),
                    None => 0,
                };
            }
            KeyAction::PickAssignee => {
                self.view_mode = ViewMode::AssigneePicker;
                self.picker_index = 0;
            }
            KeyAction::Refresh => {
                self.refresh().await;
            }
        }
    }

    /// Fetch a fresh snapshot and hand it back through the action channel.
    pub async fn refresh(&mut self) {
        self.loading = true;
        let tx = self.action_tx.clone();

        let issues = self.tracker.fetch_issues().await;
        let cycles = self.tracker.fetch_cycles().await;

        match (issues, cycles) {
            (Ok(issues), Ok(cycles)) => {
                let _ = tx.send(Action::SnapshotLoaded { issues, cycles });
            }
            (Err(e), _) | (_, Err(e)) => {
                let _ = tx.send(Action::FetchError(format!("{}: {e}", self.tracker.name())));
            }
        }
    }

    /// The issue list the charts see, narrowed by the active cycle and
    /// assignee filters.
    pub fn filtered_issues(&self) -> Vec<Issue> {
        self.issues
            .iter()
            .filter(|issue| match &self.selected_cycle_id {
                Some(id) => issue.cycle.as_ref().is_some_and(|c| &c.id == id),
                None => true,
            })
            .filter(|issue| match &self.assignee_filter {
                Some(AssigneeFilter::Unassigned) => issue.assignee.is_none(),
                Some(AssigneeFilter::Id(id)) => {
                    issue.assignee.as_ref().is_some_and(|a| &a.id == id)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn selected_cycle(&self) -> Option<&Cycle> {
        let id = self.selected_cycle_id.as_ref()?;
        self.cycles.iter().find(|c| &c.id == id)
    }

    /// Distinct assignees across the full snapshot, sorted by display name.
    pub fn assignee_options(&self) -> Vec<Assignee> {
        let mut seen = std::collections::HashSet::new();
        let mut options: Vec<Assignee> = self
            .issues
            .iter()
            .filter_map(|i| i.assignee.clone())
            .filter(|a| seen.insert(a.id.clone()))
            .collect();
        options.sort_by(|a, b| fold_cmp(&a.display_name, &b.display_name));
        options
    }
}

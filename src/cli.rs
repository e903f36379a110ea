use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::api::{self, IssueTracker};
use crate::config;
use crate::core::timeline::fold_cmp;
use crate::model::bulk::{parse_due_date, validate_rows, BulkFile, BulkRow, NewIssue};
use crate::model::issue::{Cycle, Issue, Team, User};

/// Pause between creation requests so a long file doesn't trip the
/// tracker's rate limit.
const CREATE_DELAY: Duration = Duration::from_millis(500);

/// Handle `cycleview bulk <file.toml>`: validate the whole file, resolve
/// every reference, then create the issues one by one.
pub async fn handle_bulk(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        bail!("Usage: cycleview bulk <file.toml>\n\nSee `cycleview help` for the file format.");
    };

    let file = load_bulk_file(Path::new(path))?;
    validate_rows(&file.issues)?;

    let config = config::load_config()?;
    let tracker = api::create_tracker(&config)?;

    let Some(team_key) = file.team.clone().or(config.team) else {
        bail!("No team given. Set `team = \"...\"` in the bulk file or in ~/.cycleview/config.toml");
    };

    // Reference data for resolving team/assignee/cycle/parent fields.
    let teams = tracker.fetch_teams().await?;
    let users = tracker.fetch_users().await?;
    let cycles = tracker.fetch_cycles().await?;
    let issues = tracker.fetch_issues().await?;

    let team = find_team(&teams, &team_key)
        .with_context(|| format!("Team {team_key:?} not found in the workspace"))?;

    // Resolve everything before creating anything, so a typo in row 7
    // doesn't leave rows 1-6 half-applied.
    let mut resolved = Vec::with_capacity(file.issues.len());
    for (idx, row) in file.issues.iter().enumerate() {
        let new_issue = resolve_row(row, &team.id, &users, &cycles, &issues)
            .with_context(|| format!("issue {}", idx + 1))?;
        resolved.push(new_issue);
    }

    create_all(tracker.as_ref(), &resolved).await
}

async fn create_all(tracker: &dyn IssueTracker, resolved: &[NewIssue]) -> Result<()> {
    for (idx, new_issue) in resolved.iter().enumerate() {
        let identifier = tracker
            .create_issue(new_issue)
            .await
            .with_context(|| format!("Failed to create issue {}", idx + 1))?;
        println!("Created {}: {}", identifier, new_issue.title);
        if idx + 1 < resolved.len() {
            tokio::time::sleep(CREATE_DELAY).await;
        }
    }
    println!("Created {} issues", resolved.len());
    Ok(())
}

fn load_bulk_file(path: &Path) -> Result<BulkFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn find_team<'a>(teams: &'a [Team], key: &str) -> Option<&'a Team> {
    teams
        .iter()
        .find(|t| fold_cmp(&t.key, key).is_eq() || fold_cmp(&t.name, key).is_eq())
}

fn find_user<'a>(users: &'a [User], name: &str) -> Option<&'a User> {
    users
        .iter()
        .find(|u| fold_cmp(&u.name, name).is_eq() || fold_cmp(&u.display_name, name).is_eq())
}

/// Turn a validated row into a creation payload, resolving names and
/// numbers into tracker ids.
fn resolve_row(
    row: &BulkRow,
    team_id: &str,
    users: &[User],
    cycles: &[Cycle],
    issues: &[Issue],
) -> Result<NewIssue> {
    let assignee_id = match &row.assignee {
        Some(name) => Some(
            find_user(users, name)
                .map(|u| u.id.clone())
                .with_context(|| format!("Unknown assignee {name:?}"))?,
        ),
        None => None,
    };

    let cycle_id = match row.cycle {
        Some(number) => Some(
            cycles
                .iter()
                .find(|c| c.number == number)
                .map(|c| c.id.clone())
                .with_context(|| format!("No cycle with number {number}"))?,
        ),
        None => None,
    };

    let parent_id = match &row.parent {
        Some(identifier) => Some(
            issues
                .iter()
                .find(|i| fold_cmp(&i.identifier, identifier).is_eq())
                .map(|i| i.id.clone())
                .with_context(|| format!("No issue with identifier {identifier:?}"))?,
        ),
        None => None,
    };

    Ok(NewIssue {
        title: row.title.clone(),
        description: row.description.clone(),
        team_id: team_id.to_string(),
        cycle_id,
        estimate: row.estimate,
        due_date: row.due_date.as_deref().and_then(parse_due_date),
        parent_id,
        assignee_id,
    })
}

pub fn print_help() {
    println!("cycleview — terminal Gantt and burndown dashboard for your issue tracker\n");
    println!("USAGE:");
    println!("  cycleview              Launch the dashboard");
    println!("  cycleview bulk <file>  Create issues in bulk from a TOML file");
    println!();
    println!("BULK FILE FORMAT:");
    println!("  team = \"ENG\"             # optional if set in config");
    println!();
    println!("  [[issue]]");
    println!("  title = \"Fix the login bug\"");
    println!("  description = \"...\"      # optional");
    println!("  estimate = 3             # optional: 0, 1, 2, 3, 4, 8, 13, 21");
    println!("  due_date = \"2026-08-20\"  # optional");
    println!("  assignee = \"alice\"       # optional, user or display name");
    println!("  cycle = 12               # optional, cycle number");
    println!("  parent = \"ENG-42\"        # optional, parent identifier");
    println!();
    println!("KEYS (dashboard):");
    println!("  Tab/g/b  switch Gantt / burndown   c  pick cycle   a  filter assignee");
    println!("  r        refresh                   q  quit");
}

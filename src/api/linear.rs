use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::IssueTracker;
use crate::model::bulk::NewIssue;
use crate::model::issue::{
    Assignee, Cycle, CycleRef, Issue, ParentRef, StateType, Team, User, WorkflowState,
};

const API_URL: &str = "https://api.linear.app/graphql";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

pub struct LinearTracker {
    api_key: String,
    client: reqwest::Client,
}

impl LinearTracker {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// POST a GraphQL document, retrying rate-limited requests with
    /// exponential backoff.
    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let mut attempt = 0;
        let mut delay = INITIAL_BACKOFF;
        loop {
            let resp = self
                .client
                .post(API_URL)
                .header("Authorization", &self.api_key)
                .header("Content-Type", "application/json")
                .timeout(REQUEST_TIMEOUT)
                .json(body)
                .send()
                .await
                .context("Linear API request failed")?;

            if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RETRIES {
                attempt += 1;
                tokio::time::sleep(delay).await;
                delay *= 2;
                continue;
            }
            return Ok(resp);
        }
    }

    async fn query<T: DeserializeOwned>(&self, body: serde_json::Value) -> Result<T> {
        let resp = self.post(&body).await?;
        let gql: GqlResponse<T> = resp
            .json()
            .await
            .context("Failed to parse Linear response")?;
        if let Some(data) = gql.data {
            return Ok(data);
        }
        let detail = gql
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        if detail.is_empty() {
            bail!("No data in Linear response");
        }
        bail!("Linear API error: {detail}");
    }
}

const ISSUES_QUERY: &str = r#"{
  issues(first: 100, includeArchived: false) {
    nodes {
      id identifier title description createdAt updatedAt dueDate startedAt estimate
      state { id name type }
      assignee { id name displayName }
      cycle { id name number startsAt endsAt }
      parent { id title identifier }
    }
  }
}"#;

const CYCLES_QUERY: &str = r#"{
  cycles(first: 50) {
    nodes { id name number startsAt endsAt }
  }
}"#;

const USERS_QUERY: &str = r#"{
  users(first: 100) {
    nodes { id name displayName email }
  }
}"#;

const TEAMS_QUERY: &str = r#"{
  teams(first: 50) {
    nodes { id key name }
  }
}"#;

const CREATE_MUTATION: &str = r#"mutation IssueCreate($input: IssueCreateInput!) {
  issueCreate(input: $input) {
    success
    issue { id identifier }
  }
}"#;

#[derive(Deserialize)]
struct GqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GqlError>>,
}

#[derive(Deserialize)]
struct GqlError {
    message: String,
}

#[derive(Deserialize)]
pub(crate) struct IssuesData {
    issues: Nodes<WireIssue>,
}

#[derive(Deserialize)]
pub(crate) struct CyclesData {
    cycles: Nodes<WireCycle>,
}

#[derive(Deserialize)]
pub(crate) struct UsersData {
    users: Nodes<WireUser>,
}

#[derive(Deserialize)]
pub(crate) struct TeamsData {
    teams: Nodes<WireTeam>,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireIssue {
    id: String,
    identifier: String,
    title: Option<String>,
    description: Option<String>,
    created_at: String,
    updated_at: String,
    due_date: Option<String>,
    started_at: Option<String>,
    estimate: Option<f64>,
    state: Option<WireState>,
    assignee: Option<WireUserRef>,
    cycle: Option<WireCycle>,
    parent: Option<WireParent>,
}

#[derive(Deserialize)]
struct WireState {
    id: String,
    name: String,
    #[serde(rename = "type")]
    state_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUserRef {
    id: String,
    name: String,
    display_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCycle {
    id: String,
    name: Option<String>,
    number: i64,
    starts_at: String,
    ends_at: String,
}

#[derive(Deserialize)]
struct WireParent {
    id: String,
    title: Option<String>,
    identifier: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    id: String,
    name: String,
    display_name: String,
    email: String,
}

#[derive(Deserialize)]
struct WireTeam {
    id: String,
    key: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    issue_create: CreatePayload,
}

#[derive(Deserialize)]
struct CreatePayload {
    success: bool,
    issue: Option<CreatedIssue>,
}

#[derive(Deserialize)]
struct CreatedIssue {
    identifier: String,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp {value:?}"))
}

/// Due dates come back as timeless YYYY-MM-DD strings; full timestamps are
/// accepted too.
fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .with_context(|| format!("Invalid date {value:?}"))
}

fn cycle_name(name: Option<String>, number: i64) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Cycle {number}"))
}

fn map_cycle_ref(wire: WireCycle) -> Result<CycleRef> {
    Ok(CycleRef {
        starts_at: parse_instant(&wire.starts_at)?,
        ends_at: parse_instant(&wire.ends_at)?,
        name: cycle_name(wire.name, wire.number),
        id: wire.id,
    })
}

fn map_issue(wire: WireIssue) -> Result<Option<Issue>> {
    // Issues without a workflow state are unusable for the charts.
    let Some(state) = wire.state else {
        return Ok(None);
    };

    Ok(Some(Issue {
        id: wire.id,
        title: wire.title.unwrap_or_else(|| "Untitled".into()),
        identifier: wire.identifier,
        description: wire.description,
        state: WorkflowState {
            id: state.id,
            name: state.name,
            state_type: StateType::from_api(&state.state_type),
        },
        assignee: wire.assignee.map(|a| Assignee {
            id: a.id,
            name: a.name,
            display_name: a.display_name,
        }),
        cycle: wire.cycle.map(map_cycle_ref).transpose()?,
        parent: wire.parent.map(|p| ParentRef {
            id: p.id,
            title: p.title.unwrap_or_else(|| "Untitled".into()),
            identifier: p.identifier,
        }),
        created_at: parse_instant(&wire.created_at)?,
        updated_at: parse_instant(&wire.updated_at)?,
        due_date: wire.due_date.as_deref().map(parse_date).transpose()?,
        started_at: wire.started_at.as_deref().map(parse_instant).transpose()?,
        estimate: wire.estimate,
    }))
}

#[async_trait]
impl IssueTracker for LinearTracker {
    fn name(&self) -> &str {
        "Linear"
    }

    async fn fetch_issues(&self) -> Result<Vec<Issue>> {
        let data: IssuesData = self
            .query(serde_json::json!({ "query": ISSUES_QUERY }))
            .await?;
        let mut issues = Vec::with_capacity(data.issues.nodes.len());
        for wire in data.issues.nodes {
            if let Some(issue) = map_issue(wire)? {
                issues.push(issue);
            }
        }
        Ok(issues)
    }

    async fn fetch_cycles(&self) -> Result<Vec<Cycle>> {
        let data: CyclesData = self
            .query(serde_json::json!({ "query": CYCLES_QUERY }))
            .await?;
        data.cycles
            .nodes
            .into_iter()
            .map(|wire| {
                Ok(Cycle {
                    starts_at: parse_instant(&wire.starts_at)?,
                    ends_at: parse_instant(&wire.ends_at)?,
                    name: cycle_name(wire.name, wire.number),
                    number: wire.number,
                    id: wire.id,
                })
            })
            .collect()
    }

    async fn fetch_users(&self) -> Result<Vec<User>> {
        let data: UsersData = self
            .query(serde_json::json!({ "query": USERS_QUERY }))
            .await?;
        Ok(data
            .users
            .nodes
            .into_iter()
            .map(|u| User {
                id: u.id,
                name: u.name,
                display_name: u.display_name,
                email: u.email,
            })
            .collect())
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        let data: TeamsData = self
            .query(serde_json::json!({ "query": TEAMS_QUERY }))
            .await?;
        Ok(data
            .teams
            .nodes
            .into_iter()
            .map(|t| Team {
                id: t.id,
                key: t.key,
                name: t.name,
            })
            .collect())
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<String> {
        let mut input = serde_json::Map::new();
        input.insert("title".into(), issue.title.clone().into());
        input.insert("teamId".into(), issue.team_id.clone().into());
        if let Some(description) = &issue.description {
            input.insert("description".into(), description.clone().into());
        }
        if let Some(cycle_id) = &issue.cycle_id {
            input.insert("cycleId".into(), cycle_id.clone().into());
        }
        if let Some(estimate) = issue.estimate {
            input.insert("estimate".into(), estimate.into());
        }
        if let Some(due_date) = issue.due_date {
            input.insert(
                "dueDate".into(),
                due_date.format("%Y-%m-%d").to_string().into(),
            );
        }
        if let Some(parent_id) = &issue.parent_id {
            input.insert("parentId".into(), parent_id.clone().into());
        }
        if let Some(assignee_id) = &issue.assignee_id {
            input.insert("assigneeId".into(), assignee_id.clone().into());
        }

        let data: CreateData = self
            .query(serde_json::json!({
                "query": CREATE_MUTATION,
                "variables": { "input": input },
            }))
            .await?;

        if !data.issue_create.success {
            bail!("Issue creation was rejected by Linear");
        }
        data.issue_create
            .issue
            .map(|i| i.identifier)
            .context("No issue in creation response")
    }
}

#[cfg(test)]
pub(crate) fn parse_issues_response(json: &str) -> Result<Vec<Issue>> {
    let gql: GqlResponse<IssuesData> = serde_json::from_str(json)?;
    let data = gql.data.context("No data in Linear response")?;
    let mut issues = Vec::new();
    for wire in data.issues.nodes {
        if let Some(issue) = map_issue(wire)? {
            issues.push(issue);
        }
    }
    Ok(issues)
}

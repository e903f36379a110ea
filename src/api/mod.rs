pub mod linear;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::AppConfig;
use crate::model::bulk::NewIssue;
use crate::model::issue::{Cycle, Issue, Team, User};

/// The issue tracker as the charts see it: a source of fully-materialized
/// snapshots plus issue creation. No retry logic leaks past this seam.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_issues(&self) -> Result<Vec<Issue>>;
    async fn fetch_cycles(&self) -> Result<Vec<Cycle>>;
    async fn fetch_users(&self) -> Result<Vec<User>>;
    async fn fetch_teams(&self) -> Result<Vec<Team>>;
    /// Returns the created issue's identifier.
    async fn create_issue(&self, issue: &NewIssue) -> Result<String>;
}


pub fn create_tracker(config: &AppConfig) -> Result<Box<dyn IssueTracker>> {
    match &config.linear {
        Some(cfg) => Ok(Box::new(linear::LinearTracker::new(cfg.api_key.clone()))),
        None => bail!(
            "No tracker configured. Add a [linear] api_key to ~/.cycleview/config.toml"
        ),
    }
}

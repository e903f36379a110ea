use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::core::consts::ESTIMATE_OPTIONS;

const MAX_TITLE_CHARS: usize = 255;
const MAX_DESCRIPTION_CHARS: usize = 5000;

/// Parsed `cycleview bulk` input file.
#[derive(Debug, Deserialize)]
pub struct BulkFile {
    /// Team key or name; may instead come from the config default.
    pub team: Option<String>,
    #[serde(default, rename = "issue")]
    pub issues: Vec<BulkRow>,
}

/// One `[[issue]]` table from the bulk file, as written by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRow {
    pub title: String,
    pub description: Option<String>,
    pub estimate: Option<f64>,
    /// YYYY-MM-DD.
    pub due_date: Option<String>,
    /// Matched against user name or display name.
    pub assignee: Option<String>,
    /// Cycle number.
    pub cycle: Option<i64>,
    /// Parent issue identifier, e.g. "ENG-42".
    pub parent: Option<String>,
}

/// Fully resolved creation payload handed to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    pub team_id: String,
    pub cycle_id: Option<String>,
    pub estimate: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub parent_id: Option<String>,
    pub assignee_id: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum BulkError {
    #[error("the file contains no [[issue]] entries")]
    Empty,
    #[error("issue {row}: title must not be empty")]
    EmptyTitle { row: usize },
    #[error("issue {row}: title exceeds {MAX_TITLE_CHARS} characters")]
    TitleTooLong { row: usize },
    #[error("issue {row}: description exceeds {MAX_DESCRIPTION_CHARS} characters")]
    DescriptionTooLong { row: usize },
    #[error("issue {row}: estimate {estimate} is not one of 0, 1, 2, 3, 4, 8, 13, 21")]
    InvalidEstimate { row: usize, estimate: f64 },
    #[error("issue {row}: due date {value:?} is not a valid YYYY-MM-DD date")]
    InvalidDueDate { row: usize, value: String },
}

/// Validate every row up front; nothing is created unless the whole file
/// passes. Row numbers in errors are 1-based to match the file.
pub fn validate_rows(rows: &[BulkRow]) -> Result<(), BulkError> {
    if rows.is_empty() {
        return Err(BulkError::Empty);
    }
    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;
        if row.title.trim().is_empty() {
            return Err(BulkError::EmptyTitle { row: row_no });
        }
        if row.title.chars().count() > MAX_TITLE_CHARS {
            return Err(BulkError::TitleTooLong { row: row_no });
        }
        if let Some(desc) = &row.description {
            if desc.chars().count() > MAX_DESCRIPTION_CHARS {
                return Err(BulkError::DescriptionTooLong { row: row_no });
            }
        }
        if let Some(estimate) = row.estimate {
            if !ESTIMATE_OPTIONS.contains(&estimate) {
                return Err(BulkError::InvalidEstimate {
                    row: row_no,
                    estimate,
                });
            }
        }
        if let Some(value) = &row.due_date {
            parse_due_date(value).ok_or_else(|| BulkError::InvalidDueDate {
                row: row_no,
                value: value.clone(),
            })?;
        }
    }
    Ok(())
}

pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> BulkRow {
        BulkRow {
            title: title.into(),
            description: None,
            estimate: None,
            due_date: None,
            assignee: None,
            cycle: None,
            parent: None,
        }
    }

    #[test]
    fn valid_rows_pass() {
        let mut r = row("Fix the login bug");
        r.estimate = Some(3.0);
        r.due_date = Some("2026-08-20".into());
        assert_eq!(validate_rows(&[r]), Ok(()));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert_eq!(validate_rows(&[]), Err(BulkError::Empty));
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            validate_rows(&[row("Fine"), row("   ")]),
            Err(BulkError::EmptyTitle { row: 2 })
        );
    }

    #[test]
    fn overlong_title_is_rejected() {
        let r = row(&"x".repeat(256));
        assert_eq!(validate_rows(&[r]), Err(BulkError::TitleTooLong { row: 1 }));
        let ok = row(&"x".repeat(255));
        assert_eq!(validate_rows(&[ok]), Ok(()));
    }

    #[test]
    fn overlong_description_is_rejected() {
        let mut r = row("Fine");
        r.description = Some("d".repeat(5001));
        assert_eq!(
            validate_rows(&[r]),
            Err(BulkError::DescriptionTooLong { row: 1 })
        );
    }

    #[test]
    fn estimate_outside_the_scale_is_rejected() {
        let mut r = row("Fine");
        r.estimate = Some(5.0);
        assert_eq!(
            validate_rows(&[r]),
            Err(BulkError::InvalidEstimate {
                row: 1,
                estimate: 5.0
            })
        );
    }

    #[test]
    fn malformed_due_date_is_rejected() {
        let mut r = row("Fine");
        r.due_date = Some("20/08/2026".into());
        assert!(matches!(
            validate_rows(&[r]),
            Err(BulkError::InvalidDueDate { row: 1, .. })
        ));
    }

    #[test]
    fn bulk_file_parses_from_toml() {
        let text = r#"
team = "ENG"

[[issue]]
title = "First"
estimate = 3
due_date = "2026-08-20"

[[issue]]
title = "Second"
assignee = "alice"
cycle = 12
parent = "ENG-42"
"#;
        let file: BulkFile = toml::from_str(text).unwrap();
        assert_eq!(file.team.as_deref(), Some("ENG"));
        assert_eq!(file.issues.len(), 2);
        assert_eq!(file.issues[0].estimate, Some(3.0));
        assert_eq!(file.issues[1].cycle, Some(12));
        assert_eq!(validate_rows(&file.issues), Ok(()));
    }
}

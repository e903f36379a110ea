//! Parent/child resolution over the issue list currently in view.
//!
//! The tracker only hands us `parent` back-references, so adjacency is
//! rebuilt per snapshot. An issue whose parent was filtered out of the view
//! is demoted to a root rather than dropped.

use std::collections::HashMap;

use crate::core::consts::HIERARCHY_SEPARATOR;
use crate::model::issue::Issue;

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyInfo {
    /// Ancestor hops resolvable within the current issue set; 0 = root.
    pub level: usize,
    /// Ancestor-to-self identifiers joined by [`HIERARCHY_SEPARATOR`].
    /// Sorting by this string keeps a subtree contiguous because a parent's
    /// path is a prefix of its children's.
    pub path: String,
}

pub struct Hierarchy {
    info: HashMap<String, HierarchyInfo>,
    children: HashMap<String, Vec<String>>,
}

impl Hierarchy {
    pub fn resolve(issues: &[Issue]) -> Self {
        let by_id: HashMap<&str, &Issue> =
            issues.iter().map(|i| (i.id.as_str(), i)).collect();

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for issue in issues {
            if let Some(parent) = &issue.parent {
                if by_id.contains_key(parent.id.as_str()) {
                    children
                        .entry(parent.id.clone())
                        .or_default()
                        .push(issue.id.clone());
                }
            }
        }

        let mut info = HashMap::new();
        for issue in issues {
            info.insert(issue.id.clone(), resolve_one(issue, &by_id, issues.len()));
        }

        Self { info, children }
    }

    pub fn info(&self, issue_id: &str) -> Option<&HierarchyInfo> {
        self.info.get(issue_id)
    }

    pub fn has_children(&self, issue_id: &str) -> bool {
        self.children.contains_key(issue_id)
    }
}

/// Walk the parent chain. The tracker promises tree-shaped parent links but
/// never enforces it, so the walk is capped at the issue count; tripping
/// the cap means a loop, and the issue is treated as a root.
fn resolve_one(
    issue: &Issue,
    by_id: &HashMap<&str, &Issue>,
    cap: usize,
) -> HierarchyInfo {
    let mut level = 0usize;
    let mut segments = vec![issue.identifier.clone()];
    let mut current = issue.parent.as_ref().map(|p| p.id.as_str());

    while let Some(parent_id) = current {
        let Some(parent) = by_id.get(parent_id) else {
            break;
        };
        if level >= cap {
            return HierarchyInfo {
                level: 0,
                path: issue.identifier.clone(),
            };
        }
        level += 1;
        segments.push(parent.identifier.clone());
        current = parent.parent.as_ref().map(|p| p.id.as_str());
    }

    segments.reverse();
    HierarchyInfo {
        level,
        path: segments.join(HIERARCHY_SEPARATOR),
    }
}

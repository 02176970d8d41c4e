//! Project record schema with access-control metadata.
//!
//! # Responsibility
//! - Define the project descriptor and its security/grant model.
//! - Define the project action history record.
//!
//! # Invariants
//! - Grant targets are trimmed, lowercased and never stored blank.
//! - Keyword sets follow [`normalize_keywords`] rules.

use crate::model::base::{normalize_keywords, History, Level, Tracking};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    Active,
    Closed,
    Blocked,
}

/// Access rights granted on a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Right {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub execute: bool,
    #[serde(default)]
    pub special: bool,
}

/// Rights granted to a set of user or group targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Grant {
    #[serde(flatten)]
    pub right: Right,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<BTreeSet<String>>,
}

impl Grant {
    /// Creates a grant with normalized targets (trimmed, lowercased, blanks
    /// dropped).
    pub fn new<I, S>(right: Right, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            right,
            targets: normalize_targets(targets),
        }
    }
}

fn normalize_targets<I, S>(targets: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalized: BTreeSet<String> = targets
        .into_iter()
        .filter_map(|target| {
            let trimmed = target.as_ref().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_lowercase())
            }
        })
        .collect();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Per-project security: user grants, group grants and the fallback right
/// applied to everybody else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<BTreeSet<Grant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeSet<Grant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<Right>,
}

/// Project descriptor record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Exchange folder for import/export hand-over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProjectState>,
    /// Last update instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    /// Completion instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<i64>,
}

impl Project {
    pub fn set_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = normalize_keywords(keywords);
    }
}

/// Free-form project action recorded in the project history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistory {
    #[serde(flatten)]
    pub history: History,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ActionHistory {
    /// Creates an action entry at the default `info` level.
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self::with_level(Level::Info, label, description, note)
    }

    pub fn with_level(
        level: Level,
        label: impl Into<String>,
        description: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            history: History::new(level),
            label: Some(label.into()),
            description: Some(description.into()),
            note: Some(note.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionHistory, Grant, Right};
    use crate::model::base::Level;

    #[test]
    fn grant_normalizes_targets() {
        let grant = Grant::new(
            Right {
                read: true,
                ..Right::default()
            },
            ["  Alice ", "BOB", ""],
        );
        let targets = grant.targets.expect("targets");
        assert_eq!(
            targets.into_iter().collect::<Vec<_>>(),
            vec!["alice".to_string(), "bob".to_string()]
        );
    }

    #[test]
    fn grant_with_only_blank_targets_stores_none() {
        let grant = Grant::new(Right::default(), ["  ", ""]);
        assert_eq!(grant.targets, None);
    }

    #[test]
    fn action_history_defaults_to_info_level() {
        let action = ActionHistory::new("launch", "initial launch", "first run");
        assert_eq!(action.history.level, Level::Info);
        assert_eq!(action.label.as_deref(), Some("launch"));
    }
}

//! Shared building blocks embedded by most record schemas.
//!
//! # Responsibility
//! - Define the tracking, identifier, history and instance shapes reused
//!   across project, job, workflow and provider records.
//!
//! # Invariants
//! - Timestamps are Unix epoch milliseconds.
//! - Blank user names normalize to none.
//! - Keyword sets are trimmed, lowercased and never stored empty.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Creation timestamp plus acting user carried by most persisted records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    /// Creation instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    /// Acting user at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Tracking {
    /// Creates tracking data stamped with the clock's current instant.
    pub fn new(clock: &dyn Clock, user: impl Into<String>) -> Self {
        Self::stamped(clock.now_ms(), user)
    }

    /// Creates tracking data for a known instant.
    pub fn stamped(date_ms: i64, user: impl Into<String>) -> Self {
        Self {
            date: Some(date_ms),
            user: normalize_user(user.into()),
        }
    }
}

fn normalize_user(user: String) -> Option<String> {
    let trimmed = user.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Tracking data plus a stable external identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Identifier {
    pub fn new(clock: &dyn Clock, user: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tracking: Tracking::new(clock, user),
            id: Some(id.into()),
        }
    }
}

/// Severity attached to history records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Tracking data plus a severity level, embedded by history records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(default)]
    pub level: Level,
}

impl History {
    pub fn new(level: Level) -> Self {
        Self {
            tracking: Tracking::default(),
            level,
        }
    }
}

/// Application instance a record was produced by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Positive instance number; non-positive values clamp to 0 (unknown).
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Instance {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: id.max(0),
            name: Some(name.into()),
        }
    }
}

/// Normalizes a keyword collection: trims, lowercases, drops blanks.
///
/// Returns `None` when nothing remains, so empty sets are never persisted.
pub fn normalize_keywords<I, S>(keywords: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalized: BTreeSet<String> = keywords
        .into_iter()
        .filter_map(|keyword| {
            let trimmed = keyword.as_ref().trim();
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

#[cfg(test)]
mod tests {
    use super::{normalize_keywords, History, Instance, Level, Tracking};
    use crate::clock::FixedClock;

    #[test]
    fn tracking_stamps_clock_instant_and_trims_user() {
        let tracking = Tracking::new(&FixedClock(42), "  herbert  ");
        assert_eq!(tracking.date, Some(42));
        assert_eq!(tracking.user.as_deref(), Some("herbert"));
    }

    #[test]
    fn tracking_normalizes_blank_user_to_none() {
        let tracking = Tracking::stamped(42, "   ");
        assert_eq!(tracking.user, None);
    }

    #[test]
    fn history_level_defaults_to_info() {
        assert_eq!(History::default().level, Level::Info);
    }

    #[test]
    fn instance_clamps_non_positive_id() {
        assert_eq!(Instance::new(-7, "worker").id, 0);
        assert_eq!(Instance::new(3, "worker").id, 3);
    }

    #[test]
    fn keywords_normalize_trim_lowercase_and_drop_blanks() {
        let normalized =
            normalize_keywords(["  Latin ", "latin", "", "  ", "Fraktur"]).expect("keywords");
        assert_eq!(
            normalized.into_iter().collect::<Vec<_>>(),
            vec!["fraktur".to_string(), "latin".to_string()]
        );
    }

    #[test]
    fn keywords_normalize_empty_input_to_none() {
        assert_eq!(normalize_keywords(["", "  "]), None);
        assert_eq!(normalize_keywords(Vec::<String>::new()), None);
    }
}

//! Sandbox and snapshot record schemas.
//!
//! A sandbox is an isolated working area of a project; snapshots capture
//! the provider configuration of one processing step inside it.

use crate::clock::Clock;
use crate::model::base::{normalize_keywords, Instance, Tracking};
use crate::model::provider::ServiceProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle state of a sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxState {
    Active,
    Secured,
    Paused,
    Closed,
    Canceled,
}

/// Sandbox record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sandbox {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SandboxState>,
    /// Last update instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    /// Completion instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<i64>,
}

impl Sandbox {
    pub fn set_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = normalize_keywords(keywords);
    }
}

/// Processing step a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotType {
    Launcher,
    Preprocessing,
    Layout,
    Recognition,
}

/// Exclusive-use marker on a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Lock creation instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

impl SnapshotLock {
    pub fn new(clock: &dyn Clock, source: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            source: trim_to_none(source.into()),
            comment: trim_to_none(comment.into()),
            created: Some(clock.now_ms()),
        }
    }
}

/// Snapshot record: provider configuration captured for one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SnapshotType>,
    /// Last update instant; defaults to the creation instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "service-provider", default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<ServiceProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<Instance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<SnapshotLock>,
}

impl Snapshot {
    /// Creates a snapshot stamped at the clock's current instant; blank
    /// labels and descriptions normalize to none.
    pub fn new(
        clock: &dyn Clock,
        kind: SnapshotType,
        label: impl Into<String>,
        description: impl Into<String>,
        service_provider: ServiceProvider,
        instance: Instance,
        user: impl Into<String>,
    ) -> Self {
        let tracking = Tracking::new(clock, user);
        let updated = tracking.date;
        Self {
            tracking,
            kind: Some(kind),
            updated,
            label: trim_to_none(label.into()),
            description: trim_to_none(description.into()),
            service_provider: Some(service_provider),
            instance: Some(instance),
            lock: None,
        }
    }
}

fn trim_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

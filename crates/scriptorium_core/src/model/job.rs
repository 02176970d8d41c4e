//! Job process record schemas.
//!
//! # Invariants
//! - Progress values are clamped to the `[0, 1]` range.
//! - New processes stamp creation and update instants from the injected
//!   clock.

use crate::clock::Clock;
use crate::model::base::{History, Instance, Level, Tracking};
use crate::model::provider::ServiceProvider;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Initialized,
    Scheduled,
    Running,
    Completed,
    Canceled,
    Interrupted,
}

/// Job process record tracking one running unit of work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProcessState>,
    /// Last update instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(default)]
    pub progress: f32,
    #[serde(rename = "standard-output", default, skip_serializing_if = "Option::is_none")]
    pub standard_output: Option<String>,
    #[serde(rename = "standard-error", default, skip_serializing_if = "Option::is_none")]
    pub standard_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Process {
    /// Creates a process whose creation and update instants are the clock's
    /// current instant.
    pub fn new(clock: &dyn Clock, user: impl Into<String>) -> Self {
        let tracking = Tracking::new(clock, user);
        let updated = tracking.date;
        Self {
            tracking,
            updated,
            ..Self::default()
        }
    }

    /// Sets the progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = clamp_progress(progress);
    }
}

/// Action recorded when a process changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessAction {
    Started,
    Completed,
    Canceled,
    Interrupted,
}

/// Provider call enriched with the provider's display name, version and
/// description at execution time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderHistory {
    #[serde(flatten)]
    pub provider: ServiceProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider version at execution time; non-positive clamps to 0.
    #[serde(default)]
    pub version: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProviderHistory {
    pub fn new(
        provider: ServiceProvider,
        name: impl Into<String>,
        version: f32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            name: Some(name.into()),
            version: version.max(0.0),
            description: Some(description.into()),
        }
    }
}

/// History record for one process step execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessHistory {
    #[serde(flatten)]
    pub history: History,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<Instance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ProcessAction>,
    /// Job number; 0 when unknown.
    #[serde(default)]
    pub job: u32,
    /// Total number of steps in the job.
    #[serde(default)]
    pub steps: u32,
    /// Current step, 1-based; 0 when unknown.
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub progress: f32,
    #[serde(rename = "standard-output", default, skip_serializing_if = "Option::is_none")]
    pub standard_output: Option<String>,
    #[serde(rename = "standard-error", default, skip_serializing_if = "Option::is_none")]
    pub standard_error: Option<String>,
    #[serde(rename = "service-provider", default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<ProviderHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ProcessHistory {
    pub fn new(level: Level, instance: Instance, action: ProcessAction) -> Self {
        Self {
            history: History::new(level),
            instance: Some(instance),
            action: Some(action),
            ..Self::default()
        }
    }

    /// Sets the progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = clamp_progress(progress);
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress >= 1.0 {
        1.0
    } else if progress <= 0.0 || progress.is_nan() {
        0.0
    } else {
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::{Process, ProcessAction, ProcessHistory};
    use crate::clock::FixedClock;
    use crate::model::base::{Instance, Level};

    #[test]
    fn new_process_stamps_creation_and_update_instants() {
        let process = Process::new(&FixedClock(5_000), "operator");
        assert_eq!(process.tracking.date, Some(5_000));
        assert_eq!(process.updated, Some(5_000));
        assert_eq!(process.state, None);
    }

    #[test]
    fn progress_clamps_to_unit_interval() {
        let mut process = Process::new(&FixedClock(0), "operator");
        process.set_progress(1.5);
        assert_eq!(process.progress, 1.0);
        process.set_progress(-0.25);
        assert_eq!(process.progress, 0.0);
        process.set_progress(0.5);
        assert_eq!(process.progress, 0.5);
    }

    #[test]
    fn history_progress_clamps_too() {
        let mut entry =
            ProcessHistory::new(Level::Info, Instance::new(1, "node-a"), ProcessAction::Started);
        entry.set_progress(7.0);
        assert_eq!(entry.progress, 1.0);
    }
}

//! Service-provider record schemas and typed argument lists.
//!
//! # Responsibility
//! - Define the provider call descriptor used by workflows and snapshots.
//! - Define the provider state markers (disabled, lazily initialized,
//!   task executor).
//!
//! # Invariants
//! - Blank provider thread names normalize to none.
//! - Task executor pool size is at least 1.

use crate::clock::Clock;
use crate::model::base::Identifier;
use serde::{Deserialize, Serialize};

/// One named argument handed to a service provider.
///
/// `SingleValueArgument` carries one value, `MultipleValueArgument` a list;
/// the concrete value types are fixed per argument kind below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleValueArgument<V> {
    /// Argument name as the provider expects it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,
}

impl<V> SingleValueArgument<V> {
    pub fn new(argument: impl Into<String>, value: V) -> Self {
        Self {
            argument: Some(argument.into()),
            value: Some(value),
        }
    }
}

/// One named argument carrying a list of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleValueArgument<V> {
    /// Argument name as the provider expects it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<V>>,
}

impl<V> MultipleValueArgument<V> {
    pub fn new(argument: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            argument: Some(argument.into()),
            values: Some(values),
        }
    }
}

pub type BooleanArgument = SingleValueArgument<bool>;
pub type DecimalArgument = SingleValueArgument<f32>;
pub type IntegerArgument = SingleValueArgument<i32>;
pub type StringArgument = SingleValueArgument<String>;
pub type ImageArgument = MultipleValueArgument<String>;
pub type RecognitionModelArgument = MultipleValueArgument<String>;
pub type SelectArgument = MultipleValueArgument<String>;

/// Service-provider call descriptor: provider id plus typed argument lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booleans: Option<Vec<BooleanArgument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<Vec<DecimalArgument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integers: Option<Vec<IntegerArgument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strings: Option<Vec<StringArgument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageArgument>>,
    #[serde(rename = "recognition-model", default, skip_serializing_if = "Option::is_none")]
    pub recognition_models: Option<Vec<RecognitionModelArgument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selects: Option<Vec<SelectArgument>>,
}

impl ServiceProvider {
    pub fn with_id(id: impl Into<String>) -> Self {
        let trimmed = id.into().trim().to_string();
        Self {
            id: if trimmed.is_empty() { None } else { Some(trimmed) },
            ..Self::default()
        }
    }
}

/// Marker record: the provider is administratively disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledProvider {
    #[serde(flatten)]
    pub identifier: Identifier,
}

impl DisabledProvider {
    pub fn new(clock: &dyn Clock, user: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            identifier: Identifier::new(clock, user, id),
        }
    }
}

/// Marker record: the provider initializes lazily on first use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyInitializedProvider {
    #[serde(flatten)]
    pub identifier: Identifier,
}

impl LazyInitializedProvider {
    pub fn new(clock: &dyn Clock, user: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            identifier: Identifier::new(clock, user, id),
        }
    }
}

fn default_core_pool_size() -> u32 {
    1
}

/// Task executor configuration for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecutorProvider {
    #[serde(flatten)]
    pub identifier: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
    #[serde(default = "default_core_pool_size")]
    pub core_pool_size: u32,
}

impl Default for TaskExecutorProvider {
    fn default() -> Self {
        Self {
            identifier: Identifier::default(),
            thread_name: None,
            core_pool_size: default_core_pool_size(),
        }
    }
}

impl TaskExecutorProvider {
    pub fn new(
        clock: &dyn Clock,
        user: impl Into<String>,
        id: impl Into<String>,
        thread_name: impl Into<String>,
        core_pool_size: u32,
    ) -> Self {
        let thread_name = thread_name.into().trim().to_string();
        Self {
            identifier: Identifier::new(clock, user, id),
            thread_name: if thread_name.is_empty() {
                None
            } else {
                Some(thread_name)
            },
            core_pool_size: core_pool_size.max(1),
        }
    }
}

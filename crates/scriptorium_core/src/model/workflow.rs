//! Workflow configuration record schemas.

use crate::model::base::Identifier;
use crate::model::provider::ServiceProvider;
use serde::{Deserialize, Serialize};

/// Node of the workflow execution graph; children run after their parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PathNode>>,
}

impl PathNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            children: None,
        }
    }
}

/// Provider call bound to one node of the execution graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowProcessor {
    #[serde(flatten)]
    pub provider: ServiceProvider,
    /// Identifier of the path node this processor executes on.
    #[serde(rename = "path-id", default, skip_serializing_if = "Option::is_none")]
    pub path_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Workflow definition: the execution graph plus the processors bound to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processors: Option<Vec<WorkflowProcessor>>,
}

impl Workflow {
    pub fn new(paths: Vec<PathNode>, processors: Vec<WorkflowProcessor>) -> Self {
        Self {
            paths: Some(paths),
            processors: Some(processors),
        }
    }
}

/// Descriptive metadata of a stored workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(flatten)]
    pub identifier: Identifier,
    /// Last update instant in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(rename = "update-user", default, skip_serializing_if = "Option::is_none")]
    pub update_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Serialized editor view model this workflow was designed with.
    #[serde(rename = "view-model", default, skip_serializing_if = "Option::is_none")]
    pub view_model: Option<String>,
}

/// Serialized editor view of a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl View {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PathNode, Workflow, WorkflowProcessor};

    #[test]
    fn workflow_round_trips_nested_paths() {
        let mut root = PathNode::new("binarize");
        root.children = Some(vec![PathNode::new("segment"), PathNode::new("recognize")]);
        let workflow = Workflow::new(vec![root], vec![WorkflowProcessor::default()]);

        let json = serde_json::to_string(&workflow).expect("encode");
        let decoded: Workflow = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, workflow);

        let children = decoded.paths.expect("paths")[0]
            .children
            .clone()
            .expect("children");
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].id.as_deref(), Some("recognize"));
    }
}

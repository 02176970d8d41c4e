//! Closed mapping between record tags and their payload schemas.
//!
//! # Responsibility
//! - Name every storable schema with a stable, versioned tag string.
//! - Resolve a tag to the decoder producing its schema.
//!
//! # Invariants
//! - The tag↔schema mapping is injective: one tag per schema, one schema
//!   per tag.
//! - A registry is populated at construction and read-only afterward.

use crate::model::{folio, job, project, provider, sandbox, workflow, Entity};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Versioned record tag; the string form is the on-disk key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    JobProcessV1,
    JobProcessHistoryV1,
    WorkflowV1,
    WorkflowMetadataV1,
    WorkflowViewV1,
    ProjectV1,
    ProjectFolioV1,
    ProjectSandboxV1,
    ProjectSandboxSnapshotV1,
    ProjectActionHistoryV1,
    ServiceProviderDisabledV1,
    ServiceProviderLazyInitializedV1,
    ServiceProviderTaskExecutorV1,
}

impl Tag {
    /// Every tag of the closed set, in table order.
    pub const ALL: [Tag; 13] = [
        Tag::JobProcessV1,
        Tag::JobProcessHistoryV1,
        Tag::WorkflowV1,
        Tag::WorkflowMetadataV1,
        Tag::WorkflowViewV1,
        Tag::ProjectV1,
        Tag::ProjectFolioV1,
        Tag::ProjectSandboxV1,
        Tag::ProjectSandboxSnapshotV1,
        Tag::ProjectActionHistoryV1,
        Tag::ServiceProviderDisabledV1,
        Tag::ServiceProviderLazyInitializedV1,
        Tag::ServiceProviderTaskExecutorV1,
    ];

    /// Stable on-disk string for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobProcessV1 => "job_process_v1",
            Self::JobProcessHistoryV1 => "job_process_history_v1",
            Self::WorkflowV1 => "workflow_v1",
            Self::WorkflowMetadataV1 => "workflow_metadata_v1",
            Self::WorkflowViewV1 => "workflow_view_v1",
            Self::ProjectV1 => "project_v1",
            Self::ProjectFolioV1 => "project_folio_v1",
            Self::ProjectSandboxV1 => "project_sandbox_v1",
            Self::ProjectSandboxSnapshotV1 => "project_sandbox_snapshot_v1",
            Self::ProjectActionHistoryV1 => "project_action_history_v1",
            Self::ServiceProviderDisabledV1 => "service_provider_disabled_v1",
            Self::ServiceProviderLazyInitializedV1 => "service_provider_lazy_initialized_v1",
            Self::ServiceProviderTaskExecutorV1 => "service_provider_task_executor_v1",
        }
    }

    /// Parses an on-disk tag string; unknown strings return `None`.
    pub fn parse(value: &str) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|tag| tag.as_str() == value)
    }

    /// Resolves the tag of an entity value.
    pub fn of(entity: &Entity) -> Tag {
        match entity {
            Entity::JobProcess(_) => Self::JobProcessV1,
            Entity::JobProcessHistory(_) => Self::JobProcessHistoryV1,
            Entity::Workflow(_) => Self::WorkflowV1,
            Entity::WorkflowMetadata(_) => Self::WorkflowMetadataV1,
            Entity::WorkflowView(_) => Self::WorkflowViewV1,
            Entity::Project(_) => Self::ProjectV1,
            Entity::Folio(_) => Self::ProjectFolioV1,
            Entity::Sandbox(_) => Self::ProjectSandboxV1,
            Entity::SandboxSnapshot(_) => Self::ProjectSandboxSnapshotV1,
            Entity::ActionHistory(_) => Self::ProjectActionHistoryV1,
            Entity::DisabledProvider(_) => Self::ServiceProviderDisabledV1,
            Entity::LazyInitializedProvider(_) => Self::ServiceProviderLazyInitializedV1,
            Entity::TaskExecutorProvider(_) => Self::ServiceProviderTaskExecutorV1,
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registry entry: a tag plus the decoder producing its schema.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    tag: Tag,
    decode: fn(&str) -> serde_json::Result<Entity>,
}

impl TypeDescriptor {
    pub const fn new(tag: Tag, decode: fn(&str) -> serde_json::Result<Entity>) -> Self {
        Self { tag, decode }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Decodes a JSON payload into this descriptor's schema.
    pub fn decode(&self, payload: &str) -> serde_json::Result<Entity> {
        (self.decode)(payload)
    }
}

fn decode_job_process(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<job::Process>(payload).map(Entity::JobProcess)
}

fn decode_job_process_history(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<job::ProcessHistory>(payload).map(Entity::JobProcessHistory)
}

fn decode_workflow(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<workflow::Workflow>(payload).map(Entity::Workflow)
}

fn decode_workflow_metadata(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<workflow::Metadata>(payload).map(Entity::WorkflowMetadata)
}

fn decode_workflow_view(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<workflow::View>(payload).map(Entity::WorkflowView)
}

fn decode_project(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<project::Project>(payload).map(Entity::Project)
}

fn decode_folio(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<folio::Folio>(payload).map(Entity::Folio)
}

fn decode_sandbox(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<sandbox::Sandbox>(payload).map(Entity::Sandbox)
}

fn decode_sandbox_snapshot(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<sandbox::Snapshot>(payload).map(Entity::SandboxSnapshot)
}

fn decode_action_history(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<project::ActionHistory>(payload).map(Entity::ActionHistory)
}

fn decode_disabled_provider(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<provider::DisabledProvider>(payload).map(Entity::DisabledProvider)
}

fn decode_lazy_initialized_provider(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<provider::LazyInitializedProvider>(payload)
        .map(Entity::LazyInitializedProvider)
}

fn decode_task_executor_provider(payload: &str) -> serde_json::Result<Entity> {
    serde_json::from_str::<provider::TaskExecutorProvider>(payload)
        .map(Entity::TaskExecutorProvider)
}

/// The full closed table, one descriptor per tag.
const STANDARD_DESCRIPTORS: [TypeDescriptor; 13] = [
    TypeDescriptor::new(Tag::JobProcessV1, decode_job_process),
    TypeDescriptor::new(Tag::JobProcessHistoryV1, decode_job_process_history),
    TypeDescriptor::new(Tag::WorkflowV1, decode_workflow),
    TypeDescriptor::new(Tag::WorkflowMetadataV1, decode_workflow_metadata),
    TypeDescriptor::new(Tag::WorkflowViewV1, decode_workflow_view),
    TypeDescriptor::new(Tag::ProjectV1, decode_project),
    TypeDescriptor::new(Tag::ProjectFolioV1, decode_folio),
    TypeDescriptor::new(Tag::ProjectSandboxV1, decode_sandbox),
    TypeDescriptor::new(Tag::ProjectSandboxSnapshotV1, decode_sandbox_snapshot),
    TypeDescriptor::new(Tag::ProjectActionHistoryV1, decode_action_history),
    TypeDescriptor::new(Tag::ServiceProviderDisabledV1, decode_disabled_provider),
    TypeDescriptor::new(
        Tag::ServiceProviderLazyInitializedV1,
        decode_lazy_initialized_provider,
    ),
    TypeDescriptor::new(
        Tag::ServiceProviderTaskExecutorV1,
        decode_task_executor_provider,
    ),
];

/// Immutable tag→schema registry, populated once at construction.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: BTreeMap<Tag, TypeDescriptor>,
}

impl TypeRegistry {
    /// Builds the registry over the full closed table.
    pub fn standard() -> Self {
        Self::from_descriptors(STANDARD_DESCRIPTORS)
    }

    /// Builds a registry over a chosen descriptor subset.
    ///
    /// A later descriptor for an already-registered tag replaces the
    /// earlier one, keeping the mapping injective.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let entries = descriptors
            .into_iter()
            .map(|descriptor| (descriptor.tag(), descriptor))
            .collect();
        Self { entries }
    }

    pub fn descriptor(&self, tag: Tag) -> Option<&TypeDescriptor> {
        self.entries.get(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Registered tags in stable order.
    pub fn tags(&self) -> Vec<Tag> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Narrowing contract for callers that want exactly one schema back.
///
/// `from_entity` fails explicitly with `None` instead of casting, so
/// narrowing mismatches surface as warnings rather than silent drops.
pub trait TypedEntity: Sized {
    /// Tag of this schema in the closed table.
    const TAG: Tag;

    fn from_entity(entity: Entity) -> Option<Self>;
}

impl TypedEntity for job::Process {
    const TAG: Tag = Tag::JobProcessV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::JobProcess(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for job::ProcessHistory {
    const TAG: Tag = Tag::JobProcessHistoryV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::JobProcessHistory(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for workflow::Workflow {
    const TAG: Tag = Tag::WorkflowV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Workflow(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for workflow::Metadata {
    const TAG: Tag = Tag::WorkflowMetadataV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::WorkflowMetadata(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for workflow::View {
    const TAG: Tag = Tag::WorkflowViewV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::WorkflowView(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for project::Project {
    const TAG: Tag = Tag::ProjectV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Project(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for folio::Folio {
    const TAG: Tag = Tag::ProjectFolioV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Folio(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for sandbox::Sandbox {
    const TAG: Tag = Tag::ProjectSandboxV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Sandbox(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for sandbox::Snapshot {
    const TAG: Tag = Tag::ProjectSandboxSnapshotV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::SandboxSnapshot(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for project::ActionHistory {
    const TAG: Tag = Tag::ProjectActionHistoryV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::ActionHistory(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for provider::DisabledProvider {
    const TAG: Tag = Tag::ServiceProviderDisabledV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::DisabledProvider(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for provider::LazyInitializedProvider {
    const TAG: Tag = Tag::ServiceProviderLazyInitializedV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::LazyInitializedProvider(value) => Some(value),
            _ => None,
        }
    }
}

impl TypedEntity for provider::TaskExecutorProvider {
    const TAG: Tag = Tag::ServiceProviderTaskExecutorV1;

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::TaskExecutorProvider(value) => Some(value),
            _ => None,
        }
    }
}

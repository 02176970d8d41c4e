//! Line codec: one record per text line, `tag` and JSON payload split by
//! the first tab.
//!
//! # Invariants
//! - Blank lines and lines starting with `#` are comments and skipped.
//! - Only the first tab splits; payloads may contain further tabs.
//! - Decode anomalies are per-line warnings, never errors.

use crate::model::Entity;
use crate::store::registry::{Tag, TypeRegistry};
use crate::store::{StoreError, StoreResult};
use std::collections::BTreeSet;

/// Non-fatal read anomaly reported through the warning sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based repository line, or `None` when the warning is not tied to
    /// a line (narrowing mismatches).
    pub line: Option<usize>,
    pub message: String,
}

impl ParseWarning {
    pub(crate) fn at(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    pub(crate) fn untied(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

/// Outcome of decoding one repository line.
#[derive(Debug)]
pub enum Decoded {
    /// Blank line or comment; carries no record and no warning.
    Skipped,
    /// A well-formed record of a supported type.
    Record(Tag, Entity),
    /// A per-line anomaly; the scan continues.
    Warning(ParseWarning),
}

/// Encodes and decodes single record lines against a registry and the
/// store instance's supported tag subset.
pub struct RecordCodec<'a> {
    registry: &'a TypeRegistry,
    supported: &'a BTreeSet<Tag>,
}

impl<'a> RecordCodec<'a> {
    pub fn new(registry: &'a TypeRegistry, supported: &'a BTreeSet<Tag>) -> Self {
        Self {
            registry,
            supported,
        }
    }

    /// Encodes one entity into its record line (without terminator).
    ///
    /// # Errors
    /// - [`StoreError::UnsupportedType`] when the tag is unregistered.
    /// - [`StoreError::TypeMismatch`] when the tag is outside the supported
    ///   subset.
    /// - [`StoreError::Encode`] when the JSON engine rejects the payload.
    pub fn encode(&self, entity: &Entity) -> StoreResult<String> {
        let tag = Tag::of(entity);
        if !self.registry.contains(tag) {
            return Err(StoreError::UnsupportedType(tag));
        }
        if !self.supported.contains(&tag) {
            return Err(StoreError::TypeMismatch(tag));
        }

        let payload = payload_json(entity).map_err(|source| StoreError::Encode { tag, source })?;
        Ok(format!("{}\t{payload}", tag.as_str()))
    }

    /// Decodes one repository line; `number` is its 1-based position.
    pub fn decode(&self, number: usize, line: &str) -> Decoded {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Decoded::Skipped;
        }

        let Some((tag_part, payload)) = line.split_once('\t') else {
            return Decoded::Warning(ParseWarning::at(
                number,
                "malformed record line: missing tag separator",
            ));
        };

        let Some(tag) = Tag::parse(tag_part) else {
            return Decoded::Warning(ParseWarning::at(
                number,
                format!("unknown entity tag `{tag_part}`"),
            ));
        };

        if !self.supported.contains(&tag) {
            return Decoded::Warning(ParseWarning::at(
                number,
                format!("entity tag `{tag}` is not supported by this store instance"),
            ));
        }

        let Some(descriptor) = self.registry.descriptor(tag) else {
            return Decoded::Warning(ParseWarning::at(
                number,
                format!("entity tag `{tag}` is not registered"),
            ));
        };

        match descriptor.decode(payload) {
            Ok(entity) => Decoded::Record(tag, entity),
            Err(source) => Decoded::Warning(ParseWarning::at(
                number,
                format!("could not decode `{tag}` payload: {source}"),
            )),
        }
    }
}

fn payload_json(entity: &Entity) -> serde_json::Result<String> {
    match entity {
        Entity::JobProcess(value) => serde_json::to_string(value),
        Entity::JobProcessHistory(value) => serde_json::to_string(value),
        Entity::Workflow(value) => serde_json::to_string(value),
        Entity::WorkflowMetadata(value) => serde_json::to_string(value),
        Entity::WorkflowView(value) => serde_json::to_string(value),
        Entity::Project(value) => serde_json::to_string(value),
        Entity::Folio(value) => serde_json::to_string(value),
        Entity::Sandbox(value) => serde_json::to_string(value),
        Entity::SandboxSnapshot(value) => serde_json::to_string(value),
        Entity::ActionHistory(value) => serde_json::to_string(value),
        Entity::DisabledProvider(value) => serde_json::to_string(value),
        Entity::LazyInitializedProvider(value) => serde_json::to_string(value),
        Entity::TaskExecutorProvider(value) => serde_json::to_string(value),
    }
}

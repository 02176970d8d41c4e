//! Entity store over one flat text repository file.
//!
//! # Responsibility
//! - Persist whole record batches in one write, truncating or appending.
//! - Read records back through the filter/limit/sort pipeline.
//! - Export the repository as a single-entry archive.
//!
//! # Invariants
//! - A persist call writes nothing when any entity of the batch fails to
//!   encode.
//! - Appending an empty batch leaves the repository untouched.
//! - A missing repository reads as an empty sequence, never an error.

use crate::model::Entity;
use crate::store::archive;
use crate::store::codec::{Decoded, ParseWarning, RecordCodec};
use crate::store::query::EntityQuery;
use crate::store::registry::{Tag, TypeRegistry, TypedEntity};
use crate::store::{StoreError, StoreResult};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Sink receiving non-fatal read anomalies.
pub type WarningSink<'a> = &'a mut dyn FnMut(&ParseWarning);

/// Store instance bound to a type registry, a supported tag subset and an
/// optional default repository path.
///
/// Exactly one persist or read operation is assumed in flight against a
/// given repository path at a time; the store provides no coordination
/// between concurrent writers and readers.
#[derive(Debug)]
pub struct EntityStore {
    registry: TypeRegistry,
    supported: BTreeSet<Tag>,
    repository: Option<PathBuf>,
}

impl EntityStore {
    /// Creates a store without a bound default repository; every call must
    /// pass a path explicitly.
    ///
    /// # Errors
    /// Returns [`StoreError::NoSupportedTypes`] when `supported` is empty.
    pub fn new(
        registry: TypeRegistry,
        supported: impl IntoIterator<Item = Tag>,
    ) -> StoreResult<Self> {
        let supported: BTreeSet<Tag> = supported.into_iter().collect();
        if supported.is_empty() {
            return Err(StoreError::NoSupportedTypes);
        }

        Ok(Self {
            registry,
            supported,
            repository: None,
        })
    }

    /// Creates a store bound to a default repository path.
    pub fn with_repository(
        repository: impl Into<PathBuf>,
        registry: TypeRegistry,
        supported: impl IntoIterator<Item = Tag>,
    ) -> StoreResult<Self> {
        let mut store = Self::new(registry, supported)?;
        store.repository = Some(repository.into());
        Ok(store)
    }

    /// The bound default repository path, if any.
    pub fn default_repository(&self) -> Option<&Path> {
        self.repository.as_deref()
    }

    /// Tags this instance accepts.
    pub fn supported_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.supported.iter().copied()
    }

    fn resolve<'a>(&'a self, repository: Option<&'a Path>) -> StoreResult<&'a Path> {
        repository
            .or(self.repository.as_deref())
            .ok_or(StoreError::NoRepository)
    }

    /// Replaces the default repository's content with the batch.
    pub fn persist(&self, entities: &[Entity]) -> StoreResult<usize> {
        self.persist_to(None, false, entities)
    }

    /// Appends the batch to the default repository.
    pub fn persist_append(&self, entities: &[Entity]) -> StoreResult<usize> {
        self.persist_to(None, true, entities)
    }

    /// Persists the batch in one write, truncating or appending.
    ///
    /// Every entity is encoded into an in-memory buffer first; any failure
    /// aborts the call before a byte reaches disk. An empty batch appended
    /// leaves the file untouched; an empty batch truncated produces an
    /// empty repository. Returns the number of encoded entities.
    pub fn persist_to(
        &self,
        repository: Option<&Path>,
        append: bool,
        entities: &[Entity],
    ) -> StoreResult<usize> {
        let path = self.resolve(repository)?;
        let codec = RecordCodec::new(&self.registry, &self.supported);

        let mut buffer = String::new();
        let mut count = 0;
        for entity in entities {
            let line = codec.encode(entity)?;
            buffer.push_str(&line);
            buffer.push_str(LINE_ENDING);
            count += 1;
        }

        if count == 0 && append {
            return Ok(0);
        }

        let written = if append {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(buffer.as_bytes()))
        } else {
            fs::write(path, buffer.as_bytes())
        };
        written.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!(
            "event=persist module=store status=ok records={count} append={append} repository={}",
            path.display()
        );

        Ok(count)
    }

    /// Reads entities through the fixed pipeline: parse, filter, max-count
    /// cutoff, stable sort.
    ///
    /// A missing repository yields an empty list. Per-line anomalies go to
    /// `warnings` when supplied and are dropped otherwise; they never stop
    /// the scan.
    pub fn entities(
        &self,
        query: &EntityQuery<'_>,
        mut warnings: Option<WarningSink<'_>>,
    ) -> StoreResult<Vec<Entity>> {
        let path = self.resolve(query.repository)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let codec = RecordCodec::new(&self.registry, &self.supported);
        let mut entities = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            match codec.decode(index + 1, raw) {
                Decoded::Skipped => {}
                Decoded::Record(tag, entity) => {
                    let accepted = query
                        .filter
                        .map_or(true, |filter| filter(entities.len(), tag, &entity));
                    if accepted {
                        entities.push(entity);
                    }
                }
                Decoded::Warning(warning) => report(&mut warnings, path, &warning),
            }

            if query.max_count > 0 && entities.len() >= query.max_count {
                break;
            }
        }

        if let Some(comparator) = query.comparator {
            entities.sort_by(|left, right| comparator(left, right));
        }

        Ok(entities)
    }

    /// Reads the first accepted entity, if any.
    pub fn entity(
        &self,
        query: &EntityQuery<'_>,
        warnings: Option<WarningSink<'_>>,
    ) -> StoreResult<Option<Entity>> {
        let first = EntityQuery {
            max_count: 1,
            comparator: None,
            ..*query
        };
        Ok(self.entities(&first, warnings)?.into_iter().next())
    }

    /// Reads entities narrowed to one schema.
    ///
    /// Records of a different schema are reported as warnings and excluded,
    /// mirroring the per-line anomaly handling of [`Self::entities`].
    pub fn typed_entities<T: TypedEntity>(
        &self,
        query: &EntityQuery<'_>,
        mut warnings: Option<WarningSink<'_>>,
    ) -> StoreResult<Vec<T>> {
        let path = self.resolve(query.repository)?.to_path_buf();
        let entities = {
            // Forward warnings through a local sink so the reborrow's object
            // lifetime is tied to this block, leaving `warnings` free to reuse
            // below. Behaviour matches passing `warnings` directly.
            let mut forward = |warning: &ParseWarning| {
                if let Some(sink) = warnings.as_mut() {
                    sink(warning);
                }
            };
            self.entities(query, Some(&mut forward))?
        };

        let mut typed = Vec::with_capacity(entities.len());
        for entity in entities {
            let tag = Tag::of(&entity);
            match T::from_entity(entity) {
                Some(value) => typed.push(value),
                None => {
                    let warning = ParseWarning::untied(format!(
                        "entity tag `{tag}` does not narrow to the requested `{}`",
                        T::TAG
                    ));
                    report(&mut warnings, &path, &warning);
                }
            }
        }

        Ok(typed)
    }

    /// Writes the repository as a single-entry gzip tar archive.
    ///
    /// The entry is named after the repository's file name; a missing
    /// repository exports one zero-byte entry. The writer is flushed before
    /// returning.
    pub fn export_archive<W: Write>(
        &self,
        repository: Option<&Path>,
        writer: W,
    ) -> StoreResult<()> {
        let path = self.resolve(repository)?;
        archive::write_single_entry(path, writer).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!(
            "event=export_archive module=store status=ok repository={}",
            path.display()
        );

        Ok(())
    }
}

fn report(warnings: &mut Option<WarningSink<'_>>, path: &Path, warning: &ParseWarning) {
    log::debug!(
        "event=parse_warning module=store repository={} line={:?} message={}",
        path.display(),
        warning.line,
        warning.message
    );
    if let Some(sink) = warnings.as_mut() {
        sink(warning);
    }
}

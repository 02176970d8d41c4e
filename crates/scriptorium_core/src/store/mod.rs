//! Typed append-only record store over one flat text repository.
//!
//! # Responsibility
//! - Map record schemas to a closed set of versioned tags.
//! - Encode/decode entities to/from single text lines.
//! - Persist whole batches atomically per call and read them back with
//!   filter, limit and sort.
//!
//! # Invariants
//! - Write-path failures surface before any byte reaches disk.
//! - Read-path per-line anomalies are warnings, never errors; only I/O
//!   failures abort a scan.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod archive;
pub mod codec;
pub mod query;
pub mod registry;
pub mod repository;

pub use codec::{Decoded, ParseWarning, RecordCodec};
pub use query::{tracking_date_comparator, EntityQuery};
pub use registry::{Tag, TypeDescriptor, TypeRegistry, TypedEntity};
pub use repository::{EntityStore, WarningSink};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for persist, read and export operations.
#[derive(Debug)]
pub enum StoreError {
    /// No repository path was given and the store has no bound default.
    NoRepository,
    /// The store was constructed with an empty supported-type subset.
    NoSupportedTypes,
    /// The entity's tag is not registered in this store's type registry.
    UnsupportedType(Tag),
    /// The tag is registered globally but outside this store's supported
    /// subset.
    TypeMismatch(Tag),
    /// The JSON engine could not serialize the entity payload.
    Encode {
        tag: Tag,
        source: serde_json::Error,
    },
    /// An underlying file or archive operation failed.
    Io { path: PathBuf, source: io::Error },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRepository => write!(f, "no repository is defined"),
            Self::NoSupportedTypes => write!(f, "no supported entity types are configured"),
            Self::UnsupportedType(tag) => {
                write!(f, "entity tag `{tag}` is not registered")
            }
            Self::TypeMismatch(tag) => write!(
                f,
                "entity tag `{tag}` is not supported by this store instance"
            ),
            Self::Encode { tag, source } => {
                write!(f, "could not encode `{tag}` payload: {source}")
            }
            Self::Io { path, source } => {
                write!(f, "repository i/o failure at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::NoRepository
            | Self::NoSupportedTypes
            | Self::UnsupportedType(_)
            | Self::TypeMismatch(_) => None,
        }
    }
}

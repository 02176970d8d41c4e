//! Single-entry gzip tar export of a repository file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, Header};

/// Entry name used when the repository path has no file name component.
const FALLBACK_ENTRY_NAME: &str = "repository";

/// Writes one archive entry named after the repository's file name.
///
/// A missing repository yields a zero-byte entry. The writer is flushed
/// before returning.
pub(crate) fn write_single_entry<W: Write>(repository: &Path, writer: W) -> io::Result<()> {
    let entry_name = repository
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ENTRY_NAME.to_string());

    let bytes = if repository.exists() {
        fs::read(repository)?
    } else {
        Vec::new()
    };

    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = Builder::new(encoder);

    let mut header = Header::new_gnu();
    header.set_size(bytes.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    builder.append_data(&mut header, entry_name, bytes.as_slice())?;

    let encoder = builder.into_inner()?;
    let mut writer = encoder.finish()?;
    writer.flush()
}

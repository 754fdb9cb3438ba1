//! Naming and cleaning up temporary files

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};
use tracing::debug;

/// Prefix for every file this program leaves in a temporary directory.
pub const PREFIX: &str = "markshow";

/// A short hex digest of the given content, used to name temporary files.
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Create an empty, uniquely named file in the given directory, for some
/// other process to write into. The name carries the kind of file and the
/// content hash, followed by random characters so that concurrent renders
/// of the same content never share a file. It is removed when the returned
/// path is dropped.
pub fn scratch(directory: &Path, kind: &str, hash: &str, extension: &str) -> std::io::Result<TempPath> {
    Ok(named(directory, kind, hash, extension)?.into_temp_path())
}

/// As scratch(), with the file holding the given content.
pub fn scratch_with(
    directory: &Path,
    kind: &str,
    hash: &str,
    extension: &str,
    content: &[u8],
) -> std::io::Result<TempPath> {
    let mut file = named(directory, kind, hash, extension)?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

fn named(directory: &Path, kind: &str, hash: &str, extension: &str) -> std::io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(&format!("{}-{}-{}-", PREFIX, kind, hash))
        .suffix(&format!(".{}", extension))
        .tempfile_in(directory)
}

/// Remove a file, ignoring failure; a file that cannot be cleaned up must
/// not change the outcome of the block it was created for.
pub fn cleanup(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => debug!("Unable to remove {}: {}", path.display(), error),
    }
}

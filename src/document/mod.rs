//! Reading the document to be rendered

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self
            .details
            .is_empty()
        {
            write!(f, "{}", self.problem)
        } else {
            write!(f, "{}: {}", self.problem, self.details)
        }
    }
}

/// Whether the filename is the conventional "-" meaning standard input.
pub fn is_stdin(filename: &Path) -> bool {
    filename.as_os_str() == "-"
}

/// Read a document into an owned String, from standard input if the
/// filename is "-".
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    if is_stdin(filename) {
        let mut content = String::new();
        return match std::io::stdin().read_to_string(&mut content) {
            Ok(_) => Ok(content),
            Err(error) => Err(LoadingError {
                problem: "Failed reading standard input".to_string(),
                details: error.to_string(),
                filename,
            }),
        };
    }

    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                std::io::ErrorKind::InvalidData => Err(LoadingError {
                    problem: "Not a text file".to_string(),
                    details: "the content is not valid UTF-8".to_string(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// The directory image references in the document are relative to.
pub fn base_directory(filename: &Path) -> PathBuf {
    if is_stdin(filename) {
        return PathBuf::from(".");
    }
    match filename.parent() {
        Some(parent) if !parent
            .as_os_str()
            .is_empty() =>
        {
            parent.to_path_buf()
        }
        _ => PathBuf::from("."),
    }
}

/// A title for the document: its first level one heading, or failing that
/// the file's name.
pub fn title(filename: &Path, content: &str) -> String {
    let heading = content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|heading| !heading.is_empty());

    match heading {
        Some(heading) => heading.to_string(),
        None => filename
            .file_stem()
            .map(|stem| {
                stem.to_string_lossy()
                    .to_string()
            })
            .unwrap_or_else(|| "Untitled".to_string()),
    }
}

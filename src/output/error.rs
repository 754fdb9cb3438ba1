use std::{fmt, path::PathBuf};

use crate::external::ProcessError;
use crate::profile::Target;

/// Failure to export a document. Unlike block failures these end the
/// export, since there is no useful partial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The program that composes the output document isn't installed.
    CompositorMissing {
        program: String,
        hint: &'static str,
    },
    /// The profile is for some other kind of output.
    WrongTarget {
        profile: String,
        target: Target,
    },
    StandardInput,
    Template(String),
    Process(ProcessError),
    Io {
        path: PathBuf,
        details: String,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::CompositorMissing { program, hint } => {
                write!(f, "{} is required for this export but is not installed; {}", program, hint)
            }
            ExportError::WrongTarget { profile, target } => write!(
                f,
                "profile '{}' is for {} output",
                profile,
                target.describe()
            ),
            ExportError::StandardInput => write!(f, "unable to export a document read from standard input"),
            ExportError::Template(details) => write!(f, "unable to compose document: {}", details),
            ExportError::Process(error) => write!(f, "{}", error),
            ExportError::Io { path, details } => write!(f, "{}: {}", path.display(), details),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<ProcessError> for ExportError {
    fn from(error: ProcessError) -> Self {
        ExportError::Process(error)
    }
}

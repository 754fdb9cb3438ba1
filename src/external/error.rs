use std::{fmt, path::PathBuf};

/// Problems running an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The program isn't installed (or isn't on PATH).
    Missing(String),
    /// The program didn't finish within the allowed time, and was killed.
    Timeout(String, u64),
    /// The program ran but exited unsuccessfully.
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    /// The program wrote more output than we are prepared to hold.
    Overflow(String, usize),
    Io(String, String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Missing(program) => write!(f, "{} is not installed", program),
            ProcessError::Timeout(program, seconds) => {
                write!(f, "{} did not finish within {} seconds", program, seconds)
            }
            ProcessError::Failed {
                program,
                status,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "{} exited with status {}", program, code)?,
                    None => write!(f, "{} was terminated by a signal", program)?,
                }
                let first = stderr
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty());
                if let Some(line) = first {
                    write!(f, ": {}", line)?;
                }
                Ok(())
            }
            ProcessError::Overflow(program, limit) => {
                write!(f, "{} produced more than {} bytes of output", program, limit)
            }
            ProcessError::Io(program, details) => write!(f, "{}: {}", program, details),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Why a single non-text block could not be rendered. These are always
/// recovered from by emitting a placeholder for that block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// An optional tool needed for this block isn't installed.
    Unavailable(String),
    Process(ProcessError),
    /// The graphic couldn't be decoded or transformed.
    Image(String),
    NotFound(PathBuf),
    /// The encoder's output wasn't usable.
    Malformed(String),
    Io(String),
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::Unavailable(program) => write!(f, "{} is not installed", program),
            BlockError::Process(error) => write!(f, "{}", error),
            BlockError::Image(details) => write!(f, "{}", details),
            BlockError::NotFound(_) => write!(f, "file not found"),
            BlockError::Malformed(details) => write!(f, "{}", details),
            BlockError::Io(details) => write!(f, "{}", details),
        }
    }
}

impl std::error::Error for BlockError {}

impl From<ProcessError> for BlockError {
    fn from(error: ProcessError) -> Self {
        match error {
            ProcessError::Missing(program) => BlockError::Unavailable(program),
            other => BlockError::Process(other),
        }
    }
}

impl From<std::io::Error> for BlockError {
    fn from(error: std::io::Error) -> Self {
        BlockError::Io(error.to_string())
    }
}

impl From<image::ImageError> for BlockError {
    fn from(error: image::ImageError) -> Self {
        BlockError::Image(error.to_string())
    }
}

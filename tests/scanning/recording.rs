//! A surface that renders nothing, but remembers what it was asked for.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use markshow::external::{BlockError, DiagramFormat, Graphic, Placement};
use markshow::profile::{defaults, Profile};
use markshow::scanning::{Segment, Surface};

#[derive(Debug, Clone)]
pub struct Request {
    pub path: PathBuf,
    pub content: String,
    pub placement: Placement,
}

pub struct Recording {
    pub requests: RefCell<Vec<Request>>,
    pub format: DiagramFormat,
}

impl Recording {
    pub fn new() -> Recording {
        Recording {
            requests: RefCell::new(Vec::new()),
            format: DiagramFormat::Vector,
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .borrow()
            .clone()
    }
}

impl Surface for Recording {
    fn markup(&self, text: &str) -> String {
        text.to_string()
    }

    fn graphic(&self, path: &Path, placement: &Placement) -> Result<Graphic, BlockError> {
        let content = fs::read_to_string(path)?;
        let mut requests = self
            .requests
            .borrow_mut();
        requests.push(Request {
            path: path.to_path_buf(),
            content,
            placement: placement.clone(),
        });
        Ok(Graphic::text(format!("<graphic {}>", requests.len())))
    }

    fn placeholder(&self, message: &str) -> Graphic {
        Graphic::text(message.to_string())
    }

    fn diagram_format(&self) -> DiagramFormat {
        self.format
    }
}

pub fn profile() -> Profile {
    defaults::terminal()
}

/// Segments as strings, for easy comparison.
pub fn flatten(segments: &[Segment]) -> Vec<String> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Graphic(graphic) => String::from_utf8_lossy(&graphic.bytes).into_owned(),
        })
        .collect()
}

/// Names of the files left in a directory.
pub fn remaining(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(directory)
        .expect("Failed to read scratch directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

//! Exporting documents to PDF and DOCX
//!
//! The document is scanned into self-contained HTML, then handed to an
//! external compositor: a headless Chromium prints it to PDF, or pandoc
//! converts it to DOCX.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::info;

use super::compose::compose;
use super::error::ExportError;
use super::html::{Body, HtmlSurface};
use crate::external::{self, content_hash, scratch_with, DiagramFormat, Dependencies, Probe};
use crate::profile::{Profile, Target};
use crate::scanning::Scanner;

const COMPOSITOR_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pdf,
    Docx,
}

impl Format {
    pub fn parse(name: &str) -> Option<Format> {
        match name
            .to_ascii_lowercase()
            .as_str()
        {
            "pdf" => Some(Format::Pdf),
            "docx" => Some(Format::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Docx => "docx",
        }
    }

    /// Profiles for this format must be for this target.
    pub fn target(&self) -> Target {
        match self {
            Format::Pdf => Target::PaginatedDocument,
            Format::Docx => Target::WordProcessorDocument,
        }
    }

    /// The built-in profile used when none is named.
    pub fn default_profile(&self) -> &'static str {
        self.extension()
    }

    fn compositor<'d>(&self, dependencies: &'d Dependencies) -> &'d Probe {
        match self {
            Format::Pdf => &dependencies.browser,
            Format::Docx => &dependencies.converter,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Format::Pdf => "install Chromium or Google Chrome",
            Format::Docx => "install pandoc, see https://pandoc.org/installing.html",
        }
    }

    // Chromium renders SVG faithfully; word processors are on shakier ground
    // with it.
    fn diagram_format(&self) -> DiagramFormat {
        match self {
            Format::Pdf => DiagramFormat::Vector,
            Format::Docx => DiagramFormat::Raster,
        }
    }
}

/// Where the output goes if not otherwise specified: beside the input,
/// with the format's extension.
pub fn default_output(filename: &Path, format: Format) -> PathBuf {
    filename.with_extension(format.extension())
}

/// One export of one document.
pub struct Export<'a> {
    pub profile: &'a Profile,
    pub dependencies: &'a Dependencies,
    pub format: Format,
    /// Directory relative image references are resolved against.
    pub base: &'a Path,
    pub directory: PathBuf,
}

impl<'a> Export<'a> {
    pub fn new(profile: &'a Profile, dependencies: &'a Dependencies, format: Format, base: &'a Path) -> Export<'a> {
        Export {
            profile,
            dependencies,
            format,
            base,
            directory: std::env::temp_dir(),
        }
    }

    /// Render the document to HTML and have the compositor turn it into
    /// the output file.
    pub fn run(&self, title: &str, document: &str, output: &Path) -> Result<(), ExportError> {
        if self
            .profile
            .target
            != self
                .format
                .target()
        {
            return Err(ExportError::WrongTarget {
                profile: self
                    .profile
                    .name
                    .clone(),
                target: self
                    .profile
                    .target,
            });
        }

        // check for the compositor first; no point rendering diagrams for a
        // document that can't be produced.
        let probe = self
            .format
            .compositor(self.dependencies);
        let program = match probe.program() {
            Some(program) => program.to_string(),
            None => {
                return Err(ExportError::CompositorMissing {
                    program: probe
                        .name()
                        .to_string(),
                    hint: self
                        .format
                        .hint(),
                })
            }
        };

        let html = self.html(title, document)?;

        info!("Writing {}", output.display());
        match self.format {
            Format::Pdf => self.print(&program, &html, output),
            Format::Docx => self.convert(&program, &html, output),
        }
    }

    /// The complete HTML document, as would be handed to the compositor.
    pub fn html(&self, title: &str, document: &str) -> Result<String, ExportError> {
        let surface = HtmlSurface::new(
            self.profile
                .image
                .clone(),
            self.format
                .diagram_format(),
        );
        let mut body = Body::default();

        Scanner::new(&surface, self.profile, self.dependencies)
            .with_base(self.base)
            .with_directory(
                self.directory
                    .clone(),
            )
            .scan(document, &mut body)
            .map_err(|error| ExportError::Io {
                path: self
                    .directory
                    .clone(),
                details: error.to_string(),
            })?;

        compose(self.profile, title, &body.html)
    }

    fn print(&self, program: &str, html: &str, output: &Path) -> Result<(), ExportError> {
        let page = scratch_with(&self.directory, "export", &content_hash(html), "html", html.as_bytes())
            .map_err(|error| ExportError::Io {
                path: self
                    .directory
                    .clone(),
                details: error.to_string(),
            })?;

        let mut command = Command::new(program);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", page.display()));

        external::run(&mut command, None, COMPOSITOR_TIMEOUT)?;
        self.produced(output)
    }

    fn convert(&self, program: &str, html: &str, output: &Path) -> Result<(), ExportError> {
        let mut command = Command::new(program);
        command
            .arg("--from=html")
            .arg("--to=docx")
            .arg("--output")
            .arg(output);

        if let Some(reference) = self
            .profile
            .document
            .as_ref()
            .and_then(|document| {
                document
                    .reference_doc
                    .as_ref()
            })
        {
            command.arg(format!("--reference-doc={}", reference));
        }

        external::run(&mut command, Some(html.as_bytes()), COMPOSITOR_TIMEOUT)?;
        self.produced(output)
    }

    fn produced(&self, output: &Path) -> Result<(), ExportError> {
        if output.is_file() {
            Ok(())
        } else {
            Err(ExportError::Io {
                path: output.to_path_buf(),
                details: "the compositor did not produce the output file".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::profile::defaults;

    #[test]
    fn formats() {
        assert_eq!(Format::parse("PDF"), Some(Format::Pdf));
        assert_eq!(Format::parse("docx"), Some(Format::Docx));
        assert_eq!(Format::parse("odt"), None);
        assert_eq!(
            default_output(Path::new("notes/report.md"), Format::Pdf),
            PathBuf::from("notes/report.pdf")
        );
    }

    #[test]
    fn profile_must_match_format() {
        let profile = defaults::terminal();
        let dependencies = Dependencies::assume(true);
        let export = Export::new(&profile, &dependencies, Format::Pdf, Path::new("."));

        let result = export.run("x", "hello\n", Path::new("out.pdf"));
        assert_eq!(
            result,
            Err(ExportError::WrongTarget {
                profile: "terminal".to_string(),
                target: Target::Terminal
            })
        );
    }

    #[test]
    fn missing_compositor_is_reported() {
        let profile = defaults::docx();
        let dependencies = Dependencies::assume(false);
        let export = Export::new(&profile, &dependencies, Format::Docx, Path::new("."));

        match export.run("x", "hello\n", Path::new("out.docx")) {
            Err(ExportError::CompositorMissing { program, .. }) => assert_eq!(program, "pandoc"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn html_with_diagram_placeholder() {
        let directory = tempfile::tempdir().unwrap();
        let profile = defaults::pdf();
        let dependencies = Dependencies::assume(false);
        let mut export = Export::new(&profile, &dependencies, Format::Pdf, directory.path());
        export.directory = directory
            .path()
            .to_path_buf();

        let html = export
            .html("Notes", "# Notes\n\n```mermaid\ngraph TD\nA-->B\n```\n\nafter\n")
            .unwrap();

        assert!(html.contains("<h1>Notes</h1>"));
        assert!(html.contains("data:image/svg+xml;base64,"));
        assert!(html.contains("<p>after</p>"));

        let remaining = std::fs::read_dir(directory.path())
            .unwrap()
            .count();
        assert_eq!(remaining, 0);
    }
}

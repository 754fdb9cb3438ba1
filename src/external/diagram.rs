//! Rendering diagram source to an image with the mermaid CLI
//!
//! The diagram compiler is optional. When it is missing, or fails, a small
//! SVG placeholder is produced instead so that a document with a broken or
//! unrenderable diagram still renders everything else.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

use super::error::BlockError;
use super::probe::Dependencies;
use super::process;
use super::temporary::{cleanup, content_hash, scratch, scratch_with};
use crate::profile::{DiagramTheme, Profile};
use crate::rendering::escape_html;

/// How long the diagram compiler gets before it is killed.
pub const DIAGRAM_TIMEOUT: Duration = Duration::from_secs(30);

pub const INSTALL_HINT: &str = "npm install -g @mermaid-js/mermaid-cli";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    Raster,
    Vector,
}

impl DiagramFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DiagramFormat::Raster => "png",
            DiagramFormat::Vector => "svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramOptions {
    pub width: u32,
    pub height: u32,
    pub theme: DiagramTheme,
    pub background: String,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub dpi: Option<u32>,
    pub format: DiagramFormat,
    pub timeout: Duration,
}

impl DiagramOptions {
    pub fn from_profile(profile: &Profile, format: DiagramFormat) -> DiagramOptions {
        let diagram = &profile.diagram;

        // an explicit diagram font wins over the profile's diagram font,
        // which is only used if it isn't one of the sentinels.
        let font_family = diagram
            .font_family
            .clone()
            .or_else(|| match profile
                .fonts
                .diagram
                .as_str()
            {
                "default" | "" => None,
                family => Some(family.to_string()),
            });

        DiagramOptions {
            width: diagram.width,
            height: diagram.height,
            theme: diagram.theme,
            background: diagram
                .background
                .clone(),
            font_family,
            font_size: diagram.font_size,
            dpi: diagram.dpi,
            format,
            timeout: DIAGRAM_TIMEOUT,
        }
    }

    /// Scale factor passed to the compiler: the requested resolution
    /// relative to the 96 dpi the compiler assumes.
    pub fn scale(&self) -> f64 {
        match self.dpi {
            Some(dpi) if dpi > 0 => dpi as f64 / 96.0,
            _ => 1.0,
        }
    }

    // the theme configuration document handed to the compiler.
    fn configuration(&self) -> serde_json::Value {
        let mut variables = serde_json::Map::new();
        if let Some(family) = &self.font_family {
            variables.insert("fontFamily".to_string(), json!(family));
        }
        if let Some(size) = self.font_size {
            variables.insert("fontSize".to_string(), json!(format!("{}px", size)));
        }

        json!({
            "theme": self.theme.as_str(),
            "themeVariables": variables,
        })
    }
}

/// The file a diagram was rendered to. It belongs to the caller, who must
/// pass it to cleanup() once finished with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOutput {
    pub path: PathBuf,
    /// Set when the file is a stand-in rather than the real diagram: the
    /// same message on one line, for surfaces that cannot show the image.
    pub placeholder: Option<String>,
}

impl DiagramOutput {
    pub fn cleanup(&self) {
        cleanup(&self.path);
    }
}

pub struct DiagramRenderer<'d> {
    dependencies: &'d Dependencies,
    directory: PathBuf,
}

impl<'d> DiagramRenderer<'d> {
    pub fn new(dependencies: &'d Dependencies) -> DiagramRenderer<'d> {
        DiagramRenderer::with_directory(dependencies, std::env::temp_dir())
    }

    /// Put temporary files in the given directory rather than the system
    /// one.
    pub fn with_directory(dependencies: &'d Dependencies, directory: PathBuf) -> DiagramRenderer<'d> {
        DiagramRenderer {
            dependencies,
            directory,
        }
    }

    /// Render diagram source. Neither a missing compiler nor a failing one
    /// is an error: both produce a placeholder. Files are named after a
    /// hash of the source; identical diagrams are rendered again each time,
    /// overwriting the previous output.
    pub fn render(&self, source: &str, options: &DiagramOptions) -> Result<DiagramOutput, BlockError> {
        let hash = content_hash(source);
        let probe = &self
            .dependencies
            .diagram;

        let program = match probe.program() {
            Some(program) => program.to_string(),
            None => {
                probe.warn_once(&format!(
                    "mermaid-cli (mmdc) not found; diagrams will be shown as placeholders. Install it with: {}",
                    INSTALL_HINT
                ));
                return self.placeholder(
                    &hash,
                    &[
                        "Diagram rendering unavailable",
                        "mermaid-cli (mmdc) is not installed",
                        INSTALL_HINT,
                    ],
                    format!("[Diagram: mermaid-cli (mmdc) not installed - {}]", INSTALL_HINT),
                );
            }
        };

        // the compiler writes into this; it is kept past this call and
        // removed by the caller through DiagramOutput::cleanup().
        let output = scratch(
            &self.directory,
            "diagram",
            &hash,
            options
                .format
                .extension(),
        )?
        .keep()
        .map_err(std::io::Error::from)?;

        match self.compile(&program, source, &hash, &output, options) {
            Ok(()) => {
                info!("Rendered diagram to {}", output.display());
                Ok(DiagramOutput {
                    path: output,
                    placeholder: None,
                })
            }
            Err(error) => {
                debug!("Diagram compiler failed: {}", error);
                cleanup(&output);
                let reason = error.to_string();
                self.placeholder(
                    &hash,
                    &["Diagram failed to render", &reason],
                    format!("[Diagram: failed to render - {}]", reason),
                )
            }
        }
    }

    fn compile(
        &self,
        program: &str,
        source: &str,
        hash: &str,
        output: &Path,
        options: &DiagramOptions,
    ) -> Result<(), BlockError> {
        // intermediate files; removed when these go out of scope, on every
        // path out of this function.
        let input = scratch_with(&self.directory, "diagram", hash, "mmd", source.as_bytes())?;
        let configuration = scratch_with(
            &self.directory,
            "diagram",
            hash,
            "json",
            options
                .configuration()
                .to_string()
                .as_bytes(),
        )?;

        let mut command = Command::new(program);
        command
            .arg("--input")
            .arg(&*input)
            .arg("--output")
            .arg(output)
            .arg("--width")
            .arg(options.width.to_string())
            .arg("--height")
            .arg(options.height.to_string())
            .arg("--theme")
            .arg(options.theme.as_str())
            .arg("--backgroundColor")
            .arg(&options.background)
            .arg("--scale")
            .arg(format!("{}", options.scale()))
            .arg("--configFile")
            .arg(&*configuration)
            .arg("--quiet");

        process::run(&mut command, None, options.timeout)?;

        match fs::metadata(output) {
            Ok(metadata) if metadata.len() > 0 => Ok(()),
            _ => Err(BlockError::Malformed(
                "diagram compiler produced no output".to_string(),
            )),
        }
    }

    fn placeholder(&self, hash: &str, lines: &[&str], summary: String) -> Result<DiagramOutput, BlockError> {
        let path = scratch_with(
            &self.directory,
            "placeholder",
            hash,
            "svg",
            placeholder_svg(lines).as_bytes(),
        )?
        .keep()
        .map_err(std::io::Error::from)?;

        Ok(DiagramOutput {
            path,
            placeholder: Some(summary),
        })
    }
}

/// A minimal SVG image showing the given lines of text in a box.
pub fn placeholder_svg(lines: &[&str]) -> String {
    let longest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let width = 40 + longest * 9;
    let height = 30 + lines.len() * 24;

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect x="1" y="1" width="{iw}" height="{ih}" rx="6" fill="#f6f8fa" stroke="#888a85" stroke-width="2" stroke-dasharray="6 4"/>
"##,
        w = width,
        h = height,
        iw = width - 2,
        ih = height - 2,
    );

    for (i, line) in lines
        .iter()
        .enumerate()
    {
        let weight = if i == 0 { "bold" } else { "normal" };
        svg.push_str(&format!(
            r##"<text x="20" y="{}" font-family="monospace" font-size="15" font-weight="{}" fill="#555753">{}</text>
"##,
            32 + i * 24,
            weight,
            escape_html(line)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::profile::defaults;

    fn options() -> DiagramOptions {
        DiagramOptions::from_profile(&defaults::terminal(), DiagramFormat::Raster)
    }

    #[test]
    fn scale_follows_dpi() {
        let mut options = options();
        assert_eq!(options.scale(), 1.0);

        options.dpi = Some(192);
        assert_eq!(options.scale(), 2.0);
    }

    #[test]
    fn configuration_document_carries_fonts() {
        let mut options = options();
        options.font_family = Some("Inconsolata".to_string());
        options.font_size = Some(14);

        let configuration = options.configuration();
        assert_eq!(configuration["theme"], "dark");
        assert_eq!(configuration["themeVariables"]["fontFamily"], "Inconsolata");
        assert_eq!(configuration["themeVariables"]["fontSize"], "14px");
    }

    #[test]
    fn placeholder_without_compiler() {
        let directory = tempfile::tempdir().unwrap();
        let dependencies = Dependencies::assume(false);
        let renderer = DiagramRenderer::with_directory(&dependencies, directory.path().to_path_buf());

        let output = renderer
            .render("graph TD\nA-->B", &options())
            .unwrap();
        assert_eq!(
            output.placeholder,
            Some(format!("[Diagram: mermaid-cli (mmdc) not installed - {}]", INSTALL_HINT))
        );
        assert!(output.path.exists());

        let content = fs::read_to_string(&output.path).unwrap();
        assert!(content.starts_with("<svg"));
        assert!(content.contains(INSTALL_HINT));

        output.cleanup();
        assert!(!output.path.exists());
    }

    #[test]
    fn placeholder_box_is_drawn() {
        let svg = placeholder_svg(&["first", "second line"]);
        assert!(svg.contains("fill=\"#f6f8fa\" stroke=\"#888a85\""));
        assert_eq!(svg.matches("fill=\"#555753\"").count(), 2);
        assert!(svg.contains(">second line</text>"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn placeholder_text_is_escaped() {
        let svg = placeholder_svg(&["a < b & c"]);
        assert!(svg.contains("a &lt; b &amp; c"));
    }
}

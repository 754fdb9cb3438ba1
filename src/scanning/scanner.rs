//! The block scanner
//!
//! A single pass over the lines of a document. Ordinary lines accumulate
//! until something that isn't ordinary text turns up (a diagram fence, a
//! standalone image, an inline SVG block); at that point the accumulated
//! text is rendered and emitted, then the block is rendered and emitted,
//! and accumulation begins again. Output order is therefore document order.
//!
//! Lines inside generic code fences are never examined for images or SVG.
//!
//! Nothing that goes wrong with an individual block stops the scan; the
//! block is replaced by a visible placeholder and scanning continues. Only
//! failure to write to the sink ends it early.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use super::lines::{self, ImageReference};
use super::lookahead::{find_vector_block, VectorBlock};
use super::surface::{Segment, Sink, Surface};
use crate::external::{
    image_placeholder, write_vector, BlockError, Dependencies, DiagramOptions, DiagramRenderer, Graphic,
    Placement, DIAGRAM_TIMEOUT,
};
use crate::profile::{Profile, Scale, ScaleMode};

/// The language tag that marks a fenced block as a diagram.
pub const DIAGRAM_MARKER: &str = "mermaid";

/// How far ahead to look for the `</svg>` closing an inline SVG block.
pub const LOOKAHEAD: usize = 100;

/// How far past `</svg>` to look for the end of a wrapping container.
pub const CONTAINER_WINDOW: usize = 5;

/// Tunable parameters of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub diagram_marker: String,
    pub lookahead: usize,
    pub container_window: usize,
    pub diagram_timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            diagram_marker: DIAGRAM_MARKER.to_string(),
            lookahead: LOOKAHEAD,
            container_window: CONTAINER_WINDOW,
            diagram_timeout: DIAGRAM_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Text,
    InCodeFence,
    InDiagramFence,
}

pub struct Scanner<'a, S: Surface + ?Sized> {
    surface: &'a S,
    profile: &'a Profile,
    dependencies: &'a Dependencies,
    options: ScanOptions,
    base: PathBuf,
    directory: PathBuf,
}

impl<'a, S: Surface + ?Sized> Scanner<'a, S> {
    pub fn new(surface: &'a S, profile: &'a Profile, dependencies: &'a Dependencies) -> Scanner<'a, S> {
        Scanner {
            surface,
            profile,
            dependencies,
            options: ScanOptions::default(),
            base: PathBuf::from("."),
            directory: std::env::temp_dir(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Directory against which relative image paths are resolved; normally
    /// the one containing the document.
    pub fn with_base(mut self, base: &Path) -> Self {
        self.base = base.to_path_buf();
        self
    }

    /// Directory for temporary files.
    pub fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = directory;
        self
    }

    /// Scan the document, emitting segments to the sink as they are ready.
    pub fn scan(&self, document: &str, sink: &mut impl Sink) -> std::io::Result<()> {
        let lines: Vec<&str> = document
            .lines()
            .collect();

        let mut pass = Pass {
            scanner: self,
            sink,
            state: State::Text,
            text: Vec::new(),
            diagram: Vec::new(),
            opening: "",
        };

        let marker = self
            .options
            .diagram_marker
            .as_str();
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];

            if let Some(fence) = lines::fence(line) {
                match pass.state {
                    State::InDiagramFence => {
                        pass.diagram_block()?;
                        pass.state = State::Text;
                    }
                    State::InCodeFence => {
                        pass.text
                            .push(line);
                        pass.state = State::Text;
                    }
                    State::Text if fence.language == Some(marker) => {
                        pass.diagram
                            .clear();
                        pass.opening = line;
                        pass.state = State::InDiagramFence;
                    }
                    State::Text => {
                        pass.text
                            .push(line);
                        pass.state = State::InCodeFence;
                    }
                }
                debug!(line = index + 1, state = ?pass.state, "Fence");
                index += 1;
                continue;
            }

            match pass.state {
                State::InDiagramFence => pass
                    .diagram
                    .push(line),
                State::InCodeFence => pass
                    .text
                    .push(line),
                State::Text => {
                    if let Some(block) = find_vector_block(
                        &lines,
                        index,
                        self.options
                            .lookahead,
                        self.options
                            .container_window,
                    ) {
                        debug!(line = index + 1, last = block.last + 1, "Inline SVG");
                        pass.vector_block(&block)?;
                        index = block.last + 1;
                        continue;
                    }

                    match lines::image_reference(line) {
                        Some(image) => {
                            debug!(line = index + 1, reference = image.target, "Image");
                            pass.image(&image)?;
                        }
                        None => pass
                            .text
                            .push(line),
                    }
                }
            }
            index += 1;
        }

        // an unclosed diagram fence is shown as the code it contains.
        if pass.state == State::InDiagramFence {
            debug!("Diagram fence not closed before end of document");
            let opening = pass.opening;
            pass.text
                .push(opening);
            let body = std::mem::take(&mut pass.diagram);
            pass.text
                .extend(body);
        }

        pass.flush()
    }

    fn resolve(&self, target: &str) -> PathBuf {
        let target = target
            .strip_prefix("file://")
            .unwrap_or(target)
            .replace("%20", " ");
        let path = Path::new(&target);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base
                .join(path)
        }
    }

    fn placement(&self) -> Placement {
        Placement::fitted(
            self.profile
                .image
                .alignment,
            self.profile
                .image
                .width_percent,
        )
    }
}

// The state of one scan.
struct Pass<'s, 'i, S: Surface + ?Sized, K: Sink> {
    scanner: &'s Scanner<'s, S>,
    sink: &'s mut K,
    state: State,
    text: Vec<&'i str>,
    diagram: Vec<&'i str>,
    opening: &'i str,
}

impl<'s, 'i, S: Surface + ?Sized, K: Sink> Pass<'s, 'i, S, K> {
    /// Render and emit accumulated text, if there is any that isn't blank.
    fn flush(&mut self) -> std::io::Result<()> {
        let start = self
            .text
            .iter()
            .position(|line| {
                !line
                    .trim()
                    .is_empty()
            });

        let Some(start) = start else {
            self.text
                .clear();
            return Ok(());
        };

        let mut run = String::new();
        for line in &self.text[start..] {
            run.push_str(line);
            run.push('\n');
        }
        self.text
            .clear();

        let rendered = self
            .scanner
            .surface
            .markup(&run);
        self.sink
            .emit(Segment::Text(rendered))
    }

    fn emit(&mut self, graphic: Graphic) -> std::io::Result<()> {
        self.sink
            .emit(Segment::Graphic(graphic))
    }

    fn diagram_block(&mut self) -> std::io::Result<()> {
        self.flush()?;

        let scanner = self.scanner;
        let body = std::mem::take(&mut self.diagram);
        let mut source = String::new();
        for line in &body {
            source.push_str(line);
            source.push('\n');
        }

        match render_diagram(scanner, &source) {
            Ok(graphic) => self.emit(graphic),
            Err(error) => {
                warn!("Diagram could not be rendered: {}", error);
                let literal = format!(
                    "```{}\n{}```\n\n> Diagram could not be rendered: {}\n",
                    scanner
                        .options
                        .diagram_marker,
                    source,
                    error
                );
                let rendered = scanner
                    .surface
                    .markup(&literal);
                self.sink
                    .emit(Segment::Text(rendered))
            }
        }
    }

    fn image(&mut self, image: &ImageReference) -> std::io::Result<()> {
        self.flush()?;

        let scanner = self.scanner;
        let surface = scanner.surface;

        let graphic = if image.is_remote() {
            surface.placeholder(&image_placeholder(image.target, "remote images are not displayed"))
        } else {
            let path = scanner.resolve(image.target);
            match surface.graphic(&path, &scanner.placement()) {
                Ok(graphic) => graphic,
                Err(error) => {
                    debug!("Image {} not rendered: {}", path.display(), error);
                    surface.placeholder(&image_placeholder(image.name(), &error.to_string()))
                }
            }
        };

        self.emit(graphic)
    }

    fn vector_block(&mut self, block: &VectorBlock) -> std::io::Result<()> {
        self.flush()?;

        let scanner = self.scanner;
        let surface = scanner.surface;

        let mut placement = scanner.placement();
        placement.transparent = true;
        if let Some(alignment) = block.alignment {
            placement.alignment = alignment;
        }

        let result = write_vector(&scanner.directory, &block.content)
            .and_then(|path| surface.graphic(&path, &placement));

        let graphic = match result {
            Ok(graphic) => graphic,
            Err(error) => {
                debug!("Inline SVG not rendered: {}", error);
                surface.placeholder(&format!("[SVG - {}]", error))
            }
        };

        self.emit(graphic)
    }
}

// Render diagram source to a file, then have the surface materialize it. The
// output file is removed once the surface is done with it, whatever the
// outcome.
fn render_diagram<S: Surface + ?Sized>(scanner: &Scanner<'_, S>, source: &str) -> Result<Graphic, BlockError> {
    if source
        .trim()
        .is_empty()
    {
        return Err(BlockError::Malformed("the diagram is empty".to_string()));
    }

    let profile = scanner.profile;

    let mut options = DiagramOptions::from_profile(
        profile,
        scanner
            .surface
            .diagram_format(),
    );
    options.timeout = scanner
        .options
        .diagram_timeout;

    let renderer = DiagramRenderer::with_directory(
        scanner.dependencies,
        scanner
            .directory
            .clone(),
    );
    let output = renderer.render(source, &options)?;

    let placement = Placement {
        alignment: profile
            .image
            .alignment,
        width_percent: profile
            .image
            .width_percent,
        transparent: profile
            .diagram
            .background
            == "transparent",
        scale: if output
            .placeholder
            .is_some()
        {
            Scale::Mode(ScaleMode::None)
        } else {
            profile
                .diagram
                .scale
        },
    };

    let graphic = scanner
        .surface
        .graphic(&output.path, &placement);
    output.cleanup();

    // a terminal without an SVG rasterizer cannot show the placeholder
    // image either; say the same thing in a line of text.
    match (graphic, &output.placeholder) {
        (Err(error), Some(summary)) => {
            debug!("Diagram placeholder not shown as an image: {}", error);
            Ok(scanner
                .surface
                .placeholder(summary))
        }
        (graphic, _) => graphic,
    }
}

//! Encoding images for display in a terminal
//!
//! The actual escape sequences are produced by whatever speaks the
//! terminal's protocol: for the inline protocol that is us (the image is
//! base64 encoded into an OSC 1337 sequence), for the kitty protocol it is
//! the kitten helper, and for sixel it is img2sixel. Vector images are
//! rasterized to PNG first since none of the encoders take SVG.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempPath;
use tracing::debug;

use super::error::BlockError;
use super::probe::{Dependencies, Probe};
use super::process;
use super::temporary::{content_hash, scratch};
use crate::profile::{Alignment, Scale, ScaleMode, TerminalSettings};
use crate::sizing::{self, Protocol};

const ENCODER_TIMEOUT: Duration = Duration::from_secs(30);

/// Height given to the kitten helper's notional window; large enough that
/// only the width constrains the image.
const HELPER_ROWS: usize = 1000;

/// How a graphic is to be laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub alignment: Alignment,
    /// Fraction of the available width, in (0, 1].
    pub width_percent: f64,
    /// Whether alpha must be kept so the graphic sits over the background.
    pub transparent: bool,
    pub scale: Scale,
}

impl Placement {
    /// Fitted to the given fraction of the width, opaque.
    pub fn fitted(alignment: Alignment, width_percent: f64) -> Placement {
        Placement {
            alignment,
            width_percent,
            transparent: false,
            scale: Scale::Mode(ScaleMode::Fit),
        }
    }
}

/// An encoded graphic ready to be written to the output, along with how
/// many rows it is expected to take up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graphic {
    pub bytes: Vec<u8>,
    pub rows: usize,
}

impl Graphic {
    /// A graphic that is just a line of text.
    pub fn text(content: String) -> Graphic {
        Graphic {
            bytes: content.into_bytes(),
            rows: 1,
        }
    }
}

/// The line shown in place of an image that could not be displayed.
pub fn image_placeholder(name: &str, reason: &str) -> String {
    format!("[Image: {} - {}]", name, reason)
}

pub struct GraphicsRenderer<'d> {
    dependencies: &'d Dependencies,
    protocol: Protocol,
    /// Width of the terminal, in columns.
    columns: usize,
    settings: TerminalSettings,
    directory: PathBuf,
}

impl<'d> GraphicsRenderer<'d> {
    pub fn new(
        dependencies: &'d Dependencies,
        protocol: Protocol,
        columns: usize,
        settings: TerminalSettings,
    ) -> GraphicsRenderer<'d> {
        GraphicsRenderer {
            dependencies,
            protocol,
            columns: columns.max(1),
            settings,
            directory: std::env::temp_dir(),
        }
    }

    pub fn with_directory(mut self, directory: PathBuf) -> GraphicsRenderer<'d> {
        self.directory = directory;
        self
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Encode the image at path for the terminal. Any scratch files made
    /// along the way are gone by the time this returns.
    pub fn encode(&self, path: &Path, placement: &Placement) -> Result<Graphic, BlockError> {
        if !path.is_file() {
            return Err(BlockError::NotFound(path.to_path_buf()));
        }

        let hash = content_hash(&path.to_string_lossy());

        let raster = if is_vector(path) {
            Some(self.rasterize(path, &hash, placement)?)
        } else {
            None
        };
        let source = match &raster {
            Some(raster) => &**raster,
            None => path,
        };

        let natural = image::image_dimensions(source)
            .ok()
            .map(|(width, _)| width);
        let columns = self.columns_for(natural, placement);

        let opaque = if placement.transparent
            && self
                .settings
                .transparency
                .enabled
        {
            self.threshold(source, &hash)
        } else {
            None
        };
        let source = match &opaque {
            Some(opaque) => &**opaque,
            None => source,
        };

        debug!(
            protocol = self
                .protocol
                .describe(),
            columns,
            "Encoding {}",
            path.display()
        );

        let encoded = match self.protocol {
            Protocol::Inline => encode_inline(source, columns)?,
            Protocol::Helper => self.encode_helper(source, columns)?,
            Protocol::Sixel => self.encode_sixel(source, columns)?,
        };

        if encoded.is_empty() {
            return Err(BlockError::Malformed(
                "the encoder produced no output".to_string(),
            ));
        }

        let padding = sizing::alignment_padding(self.columns, columns, placement.alignment);
        let rows = sizing::estimate_row_height(&encoded);

        let mut bytes = Vec::with_capacity(padding + encoded.len());
        bytes.extend(std::iter::repeat(b' ').take(padding));
        bytes.extend_from_slice(&encoded);

        Ok(Graphic { bytes, rows })
    }

    /// How many columns the image should span. Fitting uses the configured
    /// fraction of the terminal; otherwise the natural width (scaled, if
    /// asked) is used, limited to the terminal.
    pub fn columns_for(&self, natural: Option<u32>, placement: &Placement) -> usize {
        let fitted = sizing::columns_for_width(self.columns, placement.width_percent);
        let per = self
            .settings
            .pixels_per_column;

        match (placement.scale, natural) {
            (Scale::Mode(ScaleMode::Fit), _) | (_, None) => fitted,
            (Scale::Mode(ScaleMode::None), Some(width)) => {
                sizing::columns_for_pixels(width, per).min(self.columns)
            }
            (Scale::Factor(factor), Some(width)) => {
                let pixels = (width as f64 * factor).round() as u32;
                sizing::columns_for_pixels(pixels, per).min(self.columns)
            }
        }
    }

    fn rasterize(&self, path: &Path, hash: &str, placement: &Placement) -> Result<TempPath, BlockError> {
        let program = available(&self.dependencies.rasterizer, "SVG images")?;

        let output = scratch(&self.directory, "raster", hash, "png")?;

        let mut command = Command::new(program);
        if let Scale::Mode(ScaleMode::Fit) = placement.scale {
            let columns = sizing::columns_for_width(self.columns, placement.width_percent);
            command
                .arg("--width")
                .arg(
                    sizing::pixels_for_columns(
                        columns,
                        self.settings
                            .pixels_per_column,
                    )
                    .to_string(),
                )
                .arg("--keep-aspect-ratio");
        }
        command
            .arg("--format")
            .arg("png")
            .arg("--output")
            .arg(&*output)
            .arg(path);

        process::run(&mut command, None, ENCODER_TIMEOUT)?;
        Ok(output)
    }

    // Pixels whose alpha is below the threshold become fully transparent,
    // the rest fully opaque; encoders that only know 1-bit transparency
    // otherwise leave a fringe of half-blended pixels around the edges.
    // Failure here isn't worth losing the image over, so the original is
    // used instead.
    fn threshold(&self, source: &Path, hash: &str) -> Option<TempPath> {
        let cutoff = (self
            .settings
            .transparency
            .threshold
            * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8;

        let mut image = match image::open(source) {
            Ok(image) => image.to_rgba8(),
            Err(error) => {
                debug!("Not thresholding {}: {}", source.display(), error);
                return None;
            }
        };

        for pixel in image.pixels_mut() {
            pixel[3] = if pixel[3] < cutoff { 0 } else { 255 };
        }

        let output = match scratch(&self.directory, "alpha", hash, "png") {
            Ok(output) => output,
            Err(error) => {
                debug!("Unable to create thresholded image: {}", error);
                return None;
            }
        };
        match image.save_with_format(&output, image::ImageFormat::Png) {
            Ok(()) => Some(output),
            Err(error) => {
                debug!("Unable to write thresholded image: {}", error);
                None
            }
        }
    }

    fn encode_helper(&self, source: &Path, columns: usize) -> Result<Vec<u8>, BlockError> {
        let program = available(&self.dependencies.kitty, "the kitty graphics protocol")?;

        let pixels = sizing::pixels_for_columns(
            columns,
            self.settings
                .pixels_per_column,
        );
        let window = format!(
            "{},{},{},{}",
            columns,
            HELPER_ROWS,
            pixels,
            HELPER_ROWS as u32 * sizing::PIXELS_PER_ROW
        );

        let mut command = Command::new(program);
        command
            .arg("icat")
            .arg("--stdin=no")
            .arg("--transfer-mode=stream")
            .arg("--align=left")
            .arg(format!("--use-window-size={}", window))
            .arg(source);

        let output = process::run(&mut command, None, ENCODER_TIMEOUT)?;
        Ok(output.stdout)
    }

    fn encode_sixel(&self, source: &Path, columns: usize) -> Result<Vec<u8>, BlockError> {
        let program = available(&self.dependencies.sixel, "sixel graphics")?;

        let pixels = sizing::pixels_for_columns(
            columns,
            self.settings
                .pixels_per_column,
        );

        let mut command = Command::new(program);
        command
            .arg("-w")
            .arg(pixels.to_string())
            .arg(source);

        let output = process::run(&mut command, None, ENCODER_TIMEOUT)?;
        Ok(output.stdout)
    }
}

fn available<'p>(probe: &'p Probe, purpose: &str) -> Result<&'p str, BlockError> {
    match probe.program() {
        Some(program) => Ok(program),
        None => {
            probe.warn_once(&format!(
                "{} not found; it is needed to display {}",
                probe.name(),
                purpose
            ));
            Err(BlockError::Unavailable(
                probe
                    .name()
                    .to_string(),
            ))
        }
    }
}

fn encode_inline(source: &Path, columns: usize) -> Result<Vec<u8>, BlockError> {
    let data = fs::read(source)?;
    let name = source
        .file_name()
        .map(|name| STANDARD.encode(name.as_encoded_bytes()))
        .unwrap_or_default();

    let mut encoded = format!(
        "\x1b]1337;File=name={};inline=1;size={};width={};preserveAspectRatio=1:",
        name,
        data.len(),
        columns
    )
    .into_bytes();
    encoded.extend_from_slice(
        STANDARD
            .encode(&data)
            .as_bytes(),
    );
    encoded.push(0x07);

    Ok(encoded)
}

/// Whether the file is an SVG image, going by its extension.
pub fn is_vector(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

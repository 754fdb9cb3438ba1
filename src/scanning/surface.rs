//! What the scanner produces, and where it goes

use std::path::Path;

use crate::external::{BlockError, DiagramFormat, Graphic, Placement};

/// One piece of rendered output, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of ordinary markup after rendering.
    Text(String),
    /// A diagram, image, or inline SVG, materialized for the output target.
    Graphic(Graphic),
}

/// Receives segments as the scanner produces them. Each segment is handed
/// over as soon as it is ready; nothing is held back.
pub trait Sink {
    fn emit(&mut self, segment: Segment) -> std::io::Result<()>;
}

impl Sink for Vec<Segment> {
    fn emit(&mut self, segment: Segment) -> std::io::Result<()> {
        self.push(segment);
        Ok(())
    }
}

/// How an output target renders the things the scanner finds: runs of
/// markup, and image files. A terminal surface encodes images into escape
/// sequences; a document surface embeds them as data URIs.
pub trait Surface {
    /// Render a run of ordinary markup.
    fn markup(&self, text: &str) -> String;

    /// Materialize the image file at path. The file is only needed for the
    /// duration of the call.
    fn graphic(&self, path: &Path, placement: &Placement) -> Result<Graphic, BlockError>;

    /// A visible stand-in for a block that could not be rendered.
    fn placeholder(&self, message: &str) -> Graphic;

    /// What kind of file diagrams should be rendered to for this target.
    fn diagram_format(&self) -> DiagramFormat;
}

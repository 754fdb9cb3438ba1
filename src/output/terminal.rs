//! Rendering to a terminal

use crossterm::cursor::MoveUp;
use crossterm::queue;
use std::io::Write;
use std::path::Path;

use crate::external::{BlockError, Dependencies, DiagramFormat, Graphic, GraphicsRenderer, Placement};
use crate::formatting::{Render, Syntax};
use crate::markup;
use crate::profile::{Profile, TableSettings};
use crate::rendering::Terminal;
use crate::scanning::{Segment, Sink, Surface};
use crate::sizing::Protocol;

pub struct TerminalSurface<'d> {
    renderer: Terminal,
    table: TableSettings,
    columns: usize,
    graphics: GraphicsRenderer<'d>,
}

impl<'d> TerminalSurface<'d> {
    pub fn new(profile: &Profile, dependencies: &'d Dependencies, protocol: Protocol, columns: usize) -> TerminalSurface<'d> {
        TerminalSurface {
            renderer: Terminal::new(profile.theme),
            table: profile
                .table
                .clone(),
            columns,
            graphics: GraphicsRenderer::new(dependencies, protocol, columns, profile.terminal_settings()),
        }
    }
}

impl Surface for TerminalSurface<'_> {
    fn markup(&self, text: &str) -> String {
        markup::to_terminal(&self.renderer, text, &self.table, self.columns)
    }

    fn graphic(&self, path: &Path, placement: &Placement) -> Result<Graphic, BlockError> {
        self.graphics
            .encode(path, placement)
    }

    fn placeholder(&self, message: &str) -> Graphic {
        Graphic::text(
            self.renderer
                .style(Syntax::Warning, message),
        )
    }

    fn diagram_format(&self) -> DiagramFormat {
        DiagramFormat::Raster
    }
}

/// Writes segments straight through to an output stream, flushing after
/// each so that text preceding a slow diagram appears before it. Before a
/// graphic is drawn the rows it is expected to occupy are scrolled into
/// view, so that an image near the bottom of the screen is not cut off.
pub struct Stream<W: Write> {
    out: W,
}

impl<W: Write> Stream<W> {
    pub fn new(out: W) -> Stream<W> {
        Stream { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for Stream<W> {
    fn emit(&mut self, segment: Segment) -> std::io::Result<()> {
        match segment {
            Segment::Text(text) => {
                self.out
                    .write_all(text.as_bytes())?;
            }
            Segment::Graphic(graphic) => {
                self.out
                    .write_all(b"\n")?;
                if graphic.rows > 1 {
                    let rows = u16::try_from(graphic.rows).unwrap_or(u16::MAX);
                    self.out
                        .write_all(
                            "\n"
                                .repeat(graphic.rows)
                                .as_bytes(),
                        )?;
                    queue!(self.out, MoveUp(rows))?;
                }
                self.out
                    .write_all(&graphic.bytes)?;
                if !graphic
                    .bytes
                    .ends_with(b"\n")
                {
                    self.out
                        .write_all(b"\n")?;
                }
                self.out
                    .write_all(b"\n")?;
            }
        }
        self.out
            .flush()
    }
}

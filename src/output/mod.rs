//! Output targets: the terminal, and exported documents

mod compose;
mod error;
mod export;
mod html;
mod terminal;

pub use compose::{compose, stylesheet};
pub use error::ExportError;
pub use export::{default_output, Export, Format};
pub use html::{Body, HtmlSurface};
pub use terminal::{Stream, TerminalSurface};

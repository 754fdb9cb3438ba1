//! Converting runs of ordinary markdown into styled text
//!
//! The scanner only hands this module text it has already decided contains
//! no diagrams or standalone images; what is left is rendered with
//! pulldown-cmark, substituting our own highlighting for code blocks and our
//! own layout for tables.

mod html;
mod table;
mod terminal;

pub use html::to_html;
pub use table::{shrink, wrap, Justify, Table};

use pulldown_cmark::Options;

use crate::formatting::Render;
use crate::profile::TableSettings;
use crate::rendering;

/// The markdown extensions in use: GitHub flavoured tables, strikethrough,
/// and task lists.
pub fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown for a terminal of the given width.
pub fn to_terminal(renderer: &impl Render, text: &str, settings: &TableSettings, columns: usize) -> String {
    rendering::render(renderer, terminal::fragments(text, settings, columns))
}

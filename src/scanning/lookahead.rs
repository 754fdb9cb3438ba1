//! Finding the extent of an SVG block written inline in a document
//!
//! An SVG element can span many lines, so when one appears to start we look
//! ahead for where it ends. The search is bounded: if the closing tag isn't
//! within the window, the opening line is treated as ordinary text and
//! scanning carries on as if nothing had happened.

use tracing::debug;

use super::lines::{container_start, vector_start, Container};
use crate::profile::Alignment;

/// A complete SVG block found by lookahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorBlock {
    /// The SVG element, from `<svg` to `</svg>` inclusive.
    pub content: String,
    /// Alignment requested by a wrapping container, if any.
    pub alignment: Option<Alignment>,
    /// Index of the last line belonging to the block (including the
    /// container's closing tag).
    pub last: usize,
}

/// Starting at lines[index], look for a complete SVG block. The closing
/// `</svg>` must be within `window` lines of the opening; a container's
/// closing tag within `container_window` lines after that.
pub fn find_vector_block(lines: &[&str], index: usize, window: usize, container_window: usize) -> Option<VectorBlock> {
    let line = *lines.get(index)?;

    let (first, offset, container) = match vector_start(line) {
        Some(start) => (index, start.offset, start.container),
        None => {
            // a container on a line of its own, with the SVG on the next
            let container = container_start(line)?;
            let next = *lines.get(index + 1)?;
            let start = vector_start(next)?;
            if start
                .container
                .is_some()
            {
                return None;
            }
            (index + 1, start.offset, Some(container))
        }
    };

    let (close, end) = match closing(lines, first, offset, window) {
        Some(found) => found,
        None => {
            debug!(line = index, "No closing </svg> within {} lines", window);
            return None;
        }
    };

    let mut content = String::new();
    for i in first..=close {
        let start = if i == first { offset } else { 0 };
        let stop = if i == close { end } else { lines[i].len() };
        content.push_str(&lines[i][start..stop]);
        if i != close {
            content.push('\n');
        }
    }

    let (last, alignment) = match container {
        None => (close, None),
        Some(Container { tag, alignment }) => {
            let found = container_end(lines, close, end, tag, container_window)?;
            (found, alignment)
        }
    };

    Some(VectorBlock {
        content,
        alignment,
        last,
    })
}

// Scan forward from the opening tag, keeping count of nested <svg> elements,
// to the line on which the outermost one is closed. Returns the line index
// and the byte offset just past its `</svg>` (or the `/>` ending a
// self-closing one). An opening tag may run over several lines before it
// ends, so whether we are still inside one is carried from line to line.
fn closing(lines: &[&str], first: usize, offset: usize, window: usize) -> Option<(usize, usize)> {
    let limit = first
        .saturating_add(window)
        .min(lines.len());
    let mut depth = 0usize;
    let mut opening = false;

    for i in first..limit {
        let start = if i == first { offset } else { 0 };
        let line = &lines[i][start..];

        for found in regex!(r"<svg/>|<svg>|<svg(?:\s|$)|</svg\s*>|/?>").find_iter(line) {
            let end = start + found.end();
            match found.as_str() {
                "<svg/>" => {
                    if depth == 0 {
                        return Some((i, end));
                    }
                }
                "<svg>" => depth += 1,
                "/>" => {
                    if opening {
                        opening = false;
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return Some((i, end));
                        }
                    }
                }
                ">" => opening = false,
                tag if tag.starts_with("</") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some((i, end));
                    }
                }
                _ => {
                    depth += 1;
                    opening = true;
                }
            }
        }
    }
    None
}

fn container_end(lines: &[&str], close: usize, end: usize, tag: &str, window: usize) -> Option<usize> {
    let closing = format!("</{}", tag);
    let limit = close
        .saturating_add(window)
        .saturating_add(1)
        .min(lines.len());

    for i in close..limit {
        let line = if i == close { &lines[i][end..] } else { lines[i] };
        if line
            .to_ascii_lowercase()
            .contains(&closing)
        {
            return Some(i);
        }
    }
    debug!("No closing </{}> within {} lines of </svg>", tag, window);
    None
}

#[cfg(test)]
mod check {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines()
            .collect()
    }

    #[test]
    fn single_line_block() {
        let document = lines(r#"<svg width="4"><rect/></svg>"#);
        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.content, r#"<svg width="4"><rect/></svg>"#);
        assert_eq!(block.last, 0);
        assert_eq!(block.alignment, None);
    }

    #[test]
    fn multi_line_block_with_nesting() {
        let document = lines("<svg>\n  <svg x=\"1\">\n  </svg>\n  <circle r=\"2\"/>\n</svg>\nafter");
        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.last, 4);
        assert!(block
            .content
            .ends_with("<circle r=\"2\"/>\n</svg>"));
    }

    #[test]
    fn container_on_its_own_line() {
        let document = lines("<div align=\"right\">\n<svg>\n</svg>\n\n</div>\nmore");
        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.content, "<svg>\n</svg>");
        assert_eq!(block.alignment, Some(Alignment::Right));
        assert_eq!(block.last, 4);
    }

    #[test]
    fn container_must_close() {
        let document = lines("<div><svg></svg>\nx\ny");
        assert_eq!(find_vector_block(&document, 0, 100, 1), None);
    }

    #[test]
    fn unclosed_block_within_window() {
        let mut document = vec!["<svg>"];
        document.extend(std::iter::repeat("<rect/>").take(200));
        document.push("</svg>");

        assert_eq!(find_vector_block(&document, 0, 100, 5), None);
        assert!(find_vector_block(&document, 0, 300, 5).is_some());
    }

    #[test]
    fn self_closing_svg() {
        let document = lines(r#"<svg width="1" />"#);
        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.last, 0);

        let document = lines("<svg/>\nafter");
        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.content, "<svg/>");
        assert_eq!(block.last, 0);
    }

    #[test]
    fn self_closing_svg_over_several_lines() {
        let mut document = vec!["<svg width=\"1\"", "  height=\"1\" />", "after"];
        document.extend(std::iter::repeat("<p>text</p>").take(200));

        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.content, "<svg width=\"1\"\n  height=\"1\" />");
        assert_eq!(block.last, 1);
    }

    #[test]
    fn nested_self_closing_svg() {
        let document = lines("<svg>\n  <svg x=\"1\"\n    y=\"2\"/>\n  <rect/>\n</svg>\nafter");
        let block = find_vector_block(&document, 0, 100, 5).unwrap();
        assert_eq!(block.last, 4);
    }

    #[test]
    fn not_a_vector_line() {
        let document = lines("just text\n<svg></svg>");
        assert_eq!(find_vector_block(&document, 0, 100, 5), None);
    }
}

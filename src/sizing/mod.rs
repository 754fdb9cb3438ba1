//! Terminal-relative sizing of graphics
//!
//! Pure functions converting a terminal width and a configured fraction of
//! it into the units each graphics protocol expects, plus an estimate of how
//! many rows an encoded graphic will occupy once drawn.

mod capability;

pub use capability::{detect_capability, select_protocol, Protocol};

use crate::profile::Alignment;

/// Assumed height of one terminal row in pixels, used when converting a
/// graphic's pixel height into rows.
pub const PIXELS_PER_ROW: u32 = 20;

/// Row estimate used when an encoded graphic carries no usable metadata.
pub const DEFAULT_ROWS: usize = 5;

/// The number of columns a graphic should span: the given fraction of the
/// terminal width, rounded down, but never less than one column.
pub fn columns_for_width(terminal_columns: usize, width_percent: f64) -> usize {
    let columns = (terminal_columns as f64 * width_percent).floor();
    if columns.is_nan() || columns < 1.0 {
        1
    } else {
        (columns as usize).min(terminal_columns.max(1))
    }
}

pub fn pixels_for_columns(columns: usize, pixels_per_column: u32) -> u32 {
    (columns as u32).saturating_mul(pixels_per_column)
}

/// Convert a pixel width back into columns, rounding up.
pub fn columns_for_pixels(pixels: u32, pixels_per_column: u32) -> usize {
    if pixels_per_column == 0 {
        return 1;
    }
    (pixels.div_ceil(pixels_per_column) as usize).max(1)
}

pub fn rows_for_pixels(pixels: u32) -> usize {
    (pixels.div_ceil(PIXELS_PER_ROW) as usize).max(1)
}

/// Spaces needed in front of a graphic of the given width so that it sits
/// at the requested alignment.
pub fn alignment_padding(terminal_columns: usize, width: usize, alignment: Alignment) -> usize {
    let slack = terminal_columns.saturating_sub(width);
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => slack / 2,
        Alignment::Right => slack,
    }
}

/// Estimate how many terminal rows an encoded graphic will occupy, by looking
/// for size information in the protocol's own escape sequence. Advisory
/// only: falls back to DEFAULT_ROWS when nothing can be parsed.
pub fn estimate_row_height(encoded: &[u8]) -> usize {
    if let Some(height) = sixel_height(encoded) {
        return rows_for_pixels(height);
    }
    if let Some(rows) = kitty_rows(encoded) {
        return rows;
    }
    if let Some(rows) = inline_rows(encoded) {
        return rows;
    }
    DEFAULT_ROWS
}

// A sixel image starts with DCS (ESC P, or the 8-bit 0x90), parameters, then
// 'q', optionally followed by raster attributes "Pan;Pad;Ph;Pv where Pv is
// the height in pixels.
fn sixel_height(encoded: &[u8]) -> Option<u32> {
    let start = find(encoded, b"\x1bP")
        .map(|i| i + 2)
        .or_else(|| {
            encoded
                .iter()
                .position(|&b| b == 0x90)
                .map(|i| i + 1)
        })?;

    let rest = &encoded[start..];
    let q = rest
        .iter()
        .take(32)
        .position(|&b| b == b'q')?;
    let rest = &rest[q + 1..];

    let attributes = rest.strip_prefix(b"\"")?;
    let end = attributes
        .iter()
        .position(|b| !(b.is_ascii_digit() || *b == b';'))
        .unwrap_or(attributes.len());

    let fields: Vec<&[u8]> = attributes[..end]
        .split(|&b| b == b';')
        .collect();
    if fields.len() < 4 {
        return None;
    }
    parse_number(fields[3])
}

// kitty graphics commands are APC sequences, ESC _ G key=value,... ; the r
// key is the number of rows the image is placed over.
fn kitty_rows(encoded: &[u8]) -> Option<usize> {
    let start = find(encoded, b"\x1b_G")? + 3;
    let rest = &encoded[start..];
    let end = rest
        .iter()
        .position(|&b| b == b';' || b == 0x1b)
        .unwrap_or(rest.len());

    rest[..end]
        .split(|&b| b == b',')
        .find_map(|pair| pair.strip_prefix(b"r="))
        .and_then(parse_number)
        .map(|rows| rows.max(1) as usize)
}

// The inline image protocol, ESC ] 1337 ; File = args : data, may state a
// height either in rows or in pixels.
fn inline_rows(encoded: &[u8]) -> Option<usize> {
    let start = find(encoded, b"\x1b]1337;File=")? + 12;
    let rest = &encoded[start..];
    let end = rest
        .iter()
        .position(|&b| b == b':')
        .unwrap_or(rest.len());

    let height = rest[..end]
        .split(|&b| b == b';')
        .find_map(|pair| pair.strip_prefix(b"height="))?;

    if let Some(pixels) = height.strip_suffix(b"px") {
        return parse_number(pixels).map(rows_for_pixels);
    }
    parse_number(height).map(|rows| rows.max(1) as usize)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_number(digits: &[u8]) -> Option<u32> {
    std::str::from_utf8(digits)
        .ok()?
        .parse()
        .ok()
}

/// The width of the terminal attached to standard output, or the fallback
/// if there isn't one.
pub fn terminal_columns(fallback: u16) -> usize {
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => columns as usize,
        _ => fallback.max(1) as usize,
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn width_computation() {
        assert_eq!(columns_for_width(100, 0.75), 75);
        assert_eq!(columns_for_width(81, 0.75), 60);
        assert_eq!(columns_for_width(80, 1.0), 80);
    }

    #[test]
    fn width_never_below_one_column() {
        assert_eq!(columns_for_width(1, 0.1), 1);
        assert_eq!(columns_for_width(3, 0.01), 1);
        assert_eq!(columns_for_width(0, 0.5), 1);
    }

    #[test]
    fn pixel_conversion() {
        assert_eq!(pixels_for_columns(75, 10), 750);
        assert_eq!(columns_for_pixels(750, 10), 75);
        assert_eq!(columns_for_pixels(751, 10), 76);
        assert_eq!(columns_for_pixels(5, 0), 1);
    }

    #[test]
    fn padding_for_alignment() {
        assert_eq!(alignment_padding(100, 60, Alignment::Left), 0);
        assert_eq!(alignment_padding(100, 60, Alignment::Center), 20);
        assert_eq!(alignment_padding(100, 60, Alignment::Right), 40);
        assert_eq!(alignment_padding(50, 60, Alignment::Center), 0);
    }

    #[test]
    fn sixel_raster_attributes() {
        let encoded = b"\x1bP0;1;0q\"1;1;300;200#0;2;0;0;0~~\x1b\\";
        assert_eq!(estimate_row_height(encoded), 10);

        let encoded = b"\x1bPq\"1;1;300;201#0~\x1b\\";
        assert_eq!(estimate_row_height(encoded), 11);
    }

    #[test]
    fn row_estimate_is_monotonic() {
        let mut previous = 0;
        for height in [1, 19, 20, 21, 100, 400, 2000] {
            let encoded = format!("\x1bPq\"1;1;100;{}#0~\x1b\\", height);
            let rows = estimate_row_height(encoded.as_bytes());
            assert!(rows >= previous);
            previous = rows;
        }
    }

    #[test]
    fn kitty_and_inline_metadata() {
        assert_eq!(estimate_row_height(b"\x1b_Ga=T,f=100,c=40,r=12;AAAA\x1b\\"), 12);
        assert_eq!(estimate_row_height(b"\x1b]1337;File=inline=1;height=7:AAAA\x07"), 7);
        assert_eq!(estimate_row_height(b"\x1b]1337;File=inline=1;height=100px:AAAA\x07"), 5);
    }

    #[test]
    fn fallback_when_unparseable() {
        assert_eq!(estimate_row_height(b""), DEFAULT_ROWS);
        assert_eq!(estimate_row_height(b"[Image: cat.png - not found]"), DEFAULT_ROWS);
        assert_eq!(estimate_row_height(b"\x1bPq#0~\x1b\\"), DEFAULT_ROWS);
    }
}

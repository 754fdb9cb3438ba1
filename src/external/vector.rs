//! Preparing embedded SVG for the image encoders
//!
//! SVG written directly into a markdown document is frequently not quite
//! XML: text labels with a bare `&` or `<` in them, or a missing namespace
//! declaration that browsers forgive and rasterizers do not.

use std::path::Path;
use tempfile::TempPath;

use super::error::BlockError;
use super::temporary::{content_hash, scratch_with};

const NAMESPACE: &str = r#"xmlns="http://www.w3.org/2000/svg""#;

/// Escape stray `&`, `<` and `>` appearing in text content. Markup itself
/// (tags, attribute values, comments, CDATA sections) is left alone, as are
/// existing entity and character references.
pub fn sanitize(content: &str) -> String {
    let mut result = String::with_capacity(content.len() + 32);
    let mut rest = content;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                if let Some(length) = verbatim(rest) {
                    result.push_str(&rest[..length]);
                    rest = &rest[length..];
                    continue;
                }
                result.push_str("&lt;");
            }
            '>' => result.push_str("&gt;"),
            '&' => {
                if regex!(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#x[0-9A-Fa-f]+);").is_match(rest) {
                    result.push('&');
                } else {
                    result.push_str("&amp;");
                }
            }
            _ => result.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    add_namespace(&result)
}

// If the text starts with a comment, CDATA section, processing instruction,
// or a complete tag, the length of it.
fn verbatim(text: &str) -> Option<usize> {
    for (open, close) in [("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")] {
        if text.starts_with(open) {
            return text[open.len()..]
                .find(close)
                .map(|i| open.len() + i + close.len());
        }
    }

    let next = text[1..]
        .chars()
        .next()?;
    if !(next.is_ascii_alphabetic() || next == '/' || next == '!') {
        return None;
    }

    // scan to the closing '>', skipping over quoted attribute values which
    // may contain one.
    let mut quote: Option<char> = None;
    for (i, c) in text
        .char_indices()
        .skip(1)
    {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '<') => return None,
            (None, '>') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}

fn add_namespace(content: &str) -> String {
    let Some(start) = content.find("<svg") else {
        return content.to_string();
    };
    let end = match content[start..].find('>') {
        Some(i) => start + i,
        None => return content.to_string(),
    };

    if content[start..end].contains("xmlns=") {
        return content.to_string();
    }

    let mut result = String::with_capacity(content.len() + NAMESPACE.len() + 1);
    result.push_str(&content[..start + 4]);
    result.push(' ');
    result.push_str(NAMESPACE);
    result.push_str(&content[start + 4..]);
    result
}

/// Write sanitized SVG to a temporary file named for its content. The file
/// is removed when the returned path is dropped.
pub fn write_vector(directory: &Path, content: &str) -> Result<TempPath, BlockError> {
    let sanitized = sanitize(content);
    let path = scratch_with(directory, "vector", &content_hash(&sanitized), "svg", sanitized.as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod check {
    use super::*;
    use std::fs;

    #[test]
    fn text_nodes_are_repaired() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><text x="1">Salt & Pepper < 5 > 3</text></svg>"#;
        assert_eq!(
            sanitize(svg),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><text x="1">Salt &amp; Pepper &lt; 5 &gt; 3</text></svg>"#
        );
    }

    #[test]
    fn markup_is_untouched() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><a href="?a=1&b=2" title="x > y"><text>&amp; &#169; &#x2014;</text></a><!-- a & b --></svg>"#;
        assert_eq!(sanitize(svg), svg);
    }

    #[test]
    fn namespace_added_when_missing() {
        let svg = r#"<svg width="10" height="10"><rect/></svg>"#;
        assert_eq!(
            sanitize(svg),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect/></svg>"#
        );
    }

    #[test]
    fn written_file_is_sanitized() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_vector(directory.path(), "<svg><text>a & b</text></svg>").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("a &amp; b"));
        assert!(content.contains(NAMESPACE));
        assert!(path
            .to_string_lossy()
            .ends_with(".svg"));

        let written = path.to_path_buf();
        drop(path);
        assert!(!written.exists());
    }
}

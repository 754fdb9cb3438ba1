//! Classifying individual lines of a document

use crate::profile::Alignment;

/// A fence delimiter line, with the language tag if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence<'i> {
    pub language: Option<&'i str>,
}

/// A line that consists of nothing but an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference<'i> {
    pub alt: &'i str,
    pub target: &'i str,
}

impl ImageReference<'_> {
    /// Whether the image lives somewhere on the network rather than on disk.
    pub fn is_remote(&self) -> bool {
        regex!(r"^(?i:[a-z][a-z0-9+.-]*:)?//").is_match(self.target) && !self.target.starts_with("file:")
            || self
                .target
                .starts_with("data:")
    }

    /// The name to show for this image in a placeholder.
    pub fn name(&self) -> &str {
        let name = self
            .target
            .rsplit('/')
            .next()
            .unwrap_or(self.target);
        if name.is_empty() {
            self.target
        } else {
            name
        }
    }
}

pub fn fence(line: &str) -> Option<Fence<'_>> {
    let captures = regex!(r"^\s*```+\s*([^\s`]*)").captures(line)?;
    let language = captures
        .get(1)
        .map(|m| m.as_str())
        .filter(|tag| !tag.is_empty());
    Some(Fence { language })
}

pub fn image_reference(line: &str) -> Option<ImageReference<'_>> {
    let captures =
        regex!(r#"^\s*!\[([^\]]*)\]\(\s*(?:<([^>]+)>|([^\s)]+))(?:\s+"[^"]*")?\s*\)\s*$"#).captures(line)?;
    let target = captures
        .get(2)
        .or_else(|| captures.get(3))?
        .as_str();
    let alt = captures
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or("");
    Some(ImageReference { alt, target })
}

/// Where an SVG element opens on this line, possibly inside a container
/// element opened earlier on the same line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorStart<'i> {
    /// Byte offset of `<svg` in the line.
    pub offset: usize,
    pub container: Option<Container<'i>>,
}

/// A wrapping element such as `<div align="center">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'i> {
    pub tag: &'i str,
    pub alignment: Option<Alignment>,
}

pub fn vector_start(line: &str) -> Option<VectorStart<'_>> {
    let captures = regex!(r"^\s*(<(div|figure|p|center)\b[^>]*>\s*)?<svg(?:\s|>|/|$)").captures(line)?;

    let offset = match captures.get(1) {
        Some(prefix) => prefix.end(),
        None => line.len() - line.trim_start().len(),
    };
    let container = captures
        .get(1)
        .zip(captures.get(2))
        .map(|(opening, tag)| Container {
            tag: tag.as_str(),
            alignment: container_alignment(tag.as_str(), opening.as_str()),
        });

    Some(VectorStart { offset, container })
}

/// A line with nothing on it but a container's opening tag.
pub fn container_start(line: &str) -> Option<Container<'_>> {
    let captures = regex!(r"^\s*(<(div|figure|p|center)\b[^>]*>)\s*$").captures(line)?;
    let opening = captures.get(1)?;
    let tag = captures.get(2)?;
    Some(Container {
        tag: tag.as_str(),
        alignment: container_alignment(tag.as_str(), opening.as_str()),
    })
}

// <center> centres by definition; otherwise look for an align attribute or
// a text-align style.
fn container_alignment(tag: &str, opening: &str) -> Option<Alignment> {
    if tag.eq_ignore_ascii_case("center") {
        return Some(Alignment::Center);
    }
    let captures = regex!(r#"(?i)(?:align\s*=\s*["']?|text-align\s*:\s*)(left|center|centre|right)"#).captures(opening)?;
    match captures
        .get(1)?
        .as_str()
        .to_ascii_lowercase()
        .as_str()
    {
        "left" => Some(Alignment::Left),
        "right" => Some(Alignment::Right),
        _ => Some(Alignment::Center),
    }
}

//! Rendering to HTML, as the first step of exporting a document

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;

use crate::external::{is_vector, BlockError, DiagramFormat, Graphic, Placement};
use crate::markup;
use crate::profile::{ImageSettings, Scale, ScaleMode};
use crate::rendering::escape_html;
use crate::scanning::{Segment, Sink, Surface};

/// Text becomes HTML; graphics become `<img>` elements with the image data
/// embedded in a data URI, so the document is self-contained.
pub struct HtmlSurface {
    image: ImageSettings,
    format: DiagramFormat,
}

impl HtmlSurface {
    pub fn new(image: ImageSettings, format: DiagramFormat) -> HtmlSurface {
        HtmlSurface { image, format }
    }
}

impl Surface for HtmlSurface {
    fn markup(&self, text: &str) -> String {
        markup::to_html(text)
    }

    fn graphic(&self, path: &Path, placement: &Placement) -> Result<Graphic, BlockError> {
        if !path.is_file() {
            return Err(BlockError::NotFound(path.to_path_buf()));
        }
        let mime = mime_type(path).ok_or_else(|| BlockError::Image("unsupported image type".to_string()))?;
        let data = fs::read(path)?;

        let mut style = Vec::new();
        match placement.scale {
            Scale::Mode(ScaleMode::Fit) => {
                style.push(format!("width: {}%", percent(placement.width_percent)));
            }
            Scale::Mode(ScaleMode::None) => {}
            Scale::Factor(factor) => match natural_width(path) {
                Some(width) => style.push(format!("width: {}px", (width as f64 * factor).round())),
                None => style.push(format!("width: {}%", percent(placement.width_percent))),
            },
        }
        match &self.image.max_width {
            Some(max) => style.push(format!("max-width: {}", escape_html(max))),
            None => style.push("max-width: 100%".to_string()),
        }

        let html = format!(
            "<div class=\"figure\" style=\"text-align: {}\"><img src=\"data:{};base64,{}\" alt=\"\" style=\"{}\"></div>\n",
            placement
                .alignment
                .as_str(),
            mime,
            STANDARD.encode(&data),
            style.join("; ")
        );

        Ok(Graphic::text(html))
    }

    fn placeholder(&self, message: &str) -> Graphic {
        Graphic::text(format!("<p class=\"placeholder\">{}</p>\n", escape_html(message)))
    }

    fn diagram_format(&self) -> DiagramFormat {
        self.format
    }
}

fn percent(fraction: f64) -> String {
    let value = (fraction * 1000.0).round() / 10.0;
    format!("{}", value)
}

fn natural_width(path: &Path) -> Option<u32> {
    if is_vector(path) {
        return None;
    }
    image::image_dimensions(path)
        .ok()
        .map(|(width, _)| width)
}

fn mime_type(path: &Path) -> Option<&'static str> {
    let extension = path
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Collects the segments of a document into one HTML body.
#[derive(Debug, Default)]
pub struct Body {
    pub html: String,
}

impl Sink for Body {
    fn emit(&mut self, segment: Segment) -> std::io::Result<()> {
        match segment {
            Segment::Text(text) => self
                .html
                .push_str(&text),
            Segment::Graphic(graphic) => self
                .html
                .push_str(&String::from_utf8_lossy(&graphic.bytes)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::profile::{defaults, Alignment};

    fn surface() -> HtmlSurface {
        HtmlSurface::new(defaults::pdf().image, DiagramFormat::Vector)
    }

    #[test]
    fn images_are_embedded() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory
            .path()
            .join("box.svg");
        fs::write(&path, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

        let graphic = surface()
            .graphic(&path, &Placement::fitted(Alignment::Right, 0.5))
            .unwrap();
        let html = String::from_utf8(graphic.bytes).unwrap();

        assert!(html.contains("text-align: right"));
        assert!(html.contains("src=\"data:image/svg+xml;base64,"));
        assert!(html.contains("width: 50%"));
    }

    #[test]
    fn missing_and_unsupported_images() {
        let directory = tempfile::tempdir().unwrap();
        let placement = Placement::fitted(Alignment::Left, 1.0);

        let result = surface().graphic(
            &directory
                .path()
                .join("absent.png"),
            &placement,
        );
        assert!(matches!(result, Err(BlockError::NotFound(_))));

        let path = directory
            .path()
            .join("notes.txt");
        fs::write(&path, "hello").unwrap();
        let result = surface().graphic(&path, &placement);
        assert!(matches!(result, Err(BlockError::Image(_))));
    }

    #[test]
    fn placeholders_are_escaped() {
        let graphic = surface().placeholder("[Image: a<b>.png - file not found]");
        assert_eq!(
            String::from_utf8(graphic.bytes).unwrap(),
            "<p class=\"placeholder\">[Image: a&lt;b&gt;.png - file not found]</p>\n"
        );
    }

    #[test]
    fn percentages() {
        assert_eq!(percent(0.75), "75");
        assert_eq!(percent(1.0), "100");
        assert_eq!(percent(0.333), "33.3");
    }
}

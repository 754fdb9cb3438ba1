//! Assembling a complete HTML document, styled from the profile

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::debug;

use super::error::ExportError;
use crate::profile::{FontSizes, Palette, Profile, Running};

static TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{stylesheet | unescaped}
</style>
</head>
<body>
{body | unescaped}
</body>
</html>
"#;

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    stylesheet: String,
    body: &'a str,
}

/// Wrap the rendered body in a document with a stylesheet derived from the
/// profile.
pub fn compose(profile: &Profile, title: &str, body: &str) -> Result<String, ExportError> {
    let mut tt = TinyTemplate::new();
    tt.add_template("document", TEMPLATE)
        .map_err(|error| ExportError::Template(error.to_string()))?;

    let context = Context {
        title,
        stylesheet: stylesheet(profile, title),
        body,
    };

    debug!(profile = %profile.name, "Composing document");
    tt.render("document", &context)
        .map_err(|error| ExportError::Template(error.to_string()))
}

/// CSS for the document: fonts, sizes, colours, and for paginated output
/// the page geometry and running header and footer.
pub fn stylesheet(profile: &Profile, title: &str) -> String {
    let sizes = profile
        .font_sizes
        .clone()
        .unwrap_or(FontSizes {
            body: 11.0,
            heading: 18.0,
            code: 10.0,
        });
    let colors = profile
        .colors
        .clone()
        .unwrap_or(Palette {
            text: "#000000".to_string(),
            background: "#ffffff".to_string(),
            heading: "#000000".to_string(),
            link: "#0000ee".to_string(),
            code_background: "#f6f8fa".to_string(),
        });

    let body = family(&profile.fonts.body);
    let heading = family(&profile.fonts.heading);
    let code = family(&profile.fonts.code);

    let mut css = String::new();

    if let Some(document) = &profile.document {
        css.push_str("@page {\n");
        css.push_str(&format!(
            "  size: {} {};\n",
            document
                .page_size
                .as_css(),
            document
                .orientation
                .as_css()
        ));
        css.push_str(&format!("  margin: {};\n", document.margin));
        if let Some(content) = running(&document.header, title) {
            css.push_str(&format!("  @top-center {{ content: {}; }}\n", content));
        }
        if let Some(content) = running(&document.footer, title) {
            css.push_str(&format!("  @bottom-center {{ content: {}; }}\n", content));
        }
        css.push_str("}\n");
    }

    css.push_str(&format!(
        "body {{ font-family: {}; font-size: {}pt; color: {}; background: {}; line-height: 1.45; }}\n",
        body, sizes.body, colors.text, colors.background
    ));
    css.push_str(&format!(
        "h1, h2, h3, h4, h5, h6 {{ font-family: {}; color: {}; }}\n",
        heading, colors.heading
    ));
    css.push_str(&format!("h1 {{ font-size: {}pt; }}\n", sizes.heading));
    css.push_str(&format!("h2 {{ font-size: {}pt; }}\n", round(sizes.heading * 0.8)));
    css.push_str(&format!("h3 {{ font-size: {}pt; }}\n", round(sizes.heading * 0.65)));
    css.push_str(&format!("a {{ color: {}; }}\n", colors.link));
    css.push_str(&format!(
        "pre, code {{ font-family: {}; font-size: {}pt; }}\n",
        code, sizes.code
    ));
    css.push_str(&format!(
        "pre {{ background: {}; padding: 0.6em 0.8em; white-space: pre-wrap; break-inside: avoid; }}\n",
        colors.code_background
    ));
    css.push_str("table { border-collapse: collapse; }\n");
    css.push_str("th, td { border: 1px solid #888a85; padding: 0.2em 0.5em; }\n");
    css.push_str(&format!(
        "table {{ width: {}%; }}\n",
        round(
            (profile
                .table
                .width_percent
                * 100.0) as f32
        )
    ));
    css.push_str("blockquote { border-left: 3px solid #888a85; margin-left: 0; padding-left: 1em; color: #555753; }\n");
    css.push_str(".figure { margin: 1em 0; break-inside: avoid; }\n");
    css.push_str(".placeholder { color: #a40000; font-style: italic; }\n");

    // highlighted code
    for (class, color) in [
        ("keyword", "#75507b"),
        ("type", "#8f5902"),
        ("function", "#3465a4"),
        ("string", "#4e9a06"),
        ("numeric", "#ce5c00"),
        ("comment", "#888a85"),
        ("operator", "#cc0000"),
        ("variable", "#06989a"),
        ("attribute", "#3b5d7d"),
        ("constant", "#ce5c00"),
    ] {
        css.push_str(&format!(".tok-{} {{ color: {}; }}\n", class, color));
    }
    css.push_str(".tok-keyword, .tok-constant { font-weight: bold; }\n");
    css.push_str(".tok-comment { font-style: italic; }\n");

    css
}

// Font families may be the sentinels "default" and "monospace".
fn family(font: &str) -> String {
    match font {
        "" | "default" => "-apple-system, \"Segoe UI\", Helvetica, Arial, sans-serif".to_string(),
        "monospace" => "\"SF Mono\", Menlo, Consolas, \"Liberation Mono\", monospace".to_string(),
        other => other.to_string(),
    }
}

fn round(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

// The CSS content value for a running header or footer. {title} is replaced
// with the document's title and {page} with the page number.
fn running(running: &Running, title: &str) -> Option<String> {
    if !running.enabled {
        return None;
    }

    let text = running
        .text
        .replace("{title}", title);

    let pieces: Vec<String> = text
        .split("{page}")
        .map(css_string)
        .collect();
    Some(pieces.join(" counter(page) "))
}

fn css_string(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\A ");
    format!("\"{}\"", escaped)
}

//! Markdown to HTML for exported documents

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};

use crate::highlighting;
use crate::rendering::{escape_html, Html};

/// Convert markdown to an HTML fragment. Fenced code is highlighted with
/// classed spans and line breaks in the source are kept.
pub fn to_html(text: &str) -> String {
    let mut events: Vec<Event> = Vec::new();
    let mut code: Option<(Option<String>, String)> = None;

    for event in Parser::new_ext(text, super::options()) {
        if let Some((_, body)) = &mut code {
            match event {
                Event::Text(text) => body.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, body)) = code.take() {
                        events.push(Event::Html(CowStr::from(code_block(language, &body))));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                code = Some((language, String::new()));
            }
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

fn code_block(language: Option<String>, body: &str) -> String {
    let language = match language {
        Some(language) if !language.is_empty() => Some(language),
        _ => highlighting::detect_language(body, None).map(str::to_string),
    };

    let highlighted = highlighting::highlight(&Html, body, language.as_deref());

    match language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(&language),
            highlighted
        ),
        None => format!("<pre><code>{}</code></pre>\n", highlighted),
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn paragraphs() {
        assert_eq!(to_html("hello *world*\n"), "<p>hello <em>world</em></p>\n");
    }

    #[test]
    fn soft_breaks_become_line_breaks() {
        assert_eq!(to_html("one\ntwo\n"), "<p>one<br />\ntwo</p>\n");
    }

    #[test]
    fn code_is_highlighted_and_escaped() {
        let result = to_html("```rust\nlet x = a < b;\n```\n");
        assert!(result.starts_with("<pre><code class=\"language-rust\">"));
        assert!(result.contains("<span class=\"tok-keyword\">let</span>"));
        assert!(result.contains("&lt;"));
        assert!(!result.contains("a < b"));
    }

    #[test]
    fn tables() {
        let result = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(result.contains("<table>"));
        assert!(result.contains("<th>a</th>"));
        assert!(result.contains("<td>2</td>"));
    }
}

//! HTML spans for including highlighted code in exported documents

use std::borrow::Cow;

use crate::formatting::{Render, Syntax};

/// Wrap syntactic elements in `<span>` tags carrying a class per Syntax tag;
/// the stylesheet of the exported document decides what each class looks
/// like.
pub struct Html;

impl Render for Html {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        let content = escape_html(content);
        match syntax {
            Syntax::Neutral => content.into_owned(),
            _ => markup(syntax.name(), &content),
        }
    }
}

/// Escape the characters that are significant in HTML text and attribute
/// values.
pub fn escape_html(content: &str) -> Cow<'_, str> {
    if !content.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(content);
    }

    let mut result = String::with_capacity(content.len() + 16);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

fn markup(class: &str, content: &Cow<str>) -> String {
    let mut result = String::with_capacity(17 + class.len() + 2 + content.len() + 7);
    result.push_str("<span class=\"tok-");
    result.push_str(class);
    result.push_str("\">");
    result.push_str(content);
    result.push_str("</span>");
    result
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn escape_html_no_allocation_when_nothing_to_escape() {
        let result = escape_html("hello world");

        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "hello world");
    }

    #[test]
    fn escape_html_allocates_when_needed() {
        let result = escape_html("a < b && \"c\"");

        assert!(matches!(result, Cow::Owned(_)));
        assert_eq!(result, "a &lt; b &amp;&amp; &quot;c&quot;");
    }

    #[test]
    fn spans_carry_class_names() {
        assert_eq!(
            Html.style(Syntax::Keyword, "fn"),
            "<span class=\"tok-keyword\">fn</span>"
        );
        assert_eq!(Html.style(Syntax::Neutral, "x < y"), "x &lt; y");
    }
}

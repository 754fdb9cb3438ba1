//! Renderers for colourizing highlighted code and markup

mod html;
mod terminal;

pub use html::{escape_html, Html};
pub use terminal::Terminal;

use std::borrow::Cow;

use crate::formatting::{Render, Syntax};

/// Styling happens in two passes. First the highlighter or markup engine
/// converts source into a Vec of "fragments" (Syntax tag, text pairs). Then
/// the specified renderer is applied to each pair, resulting in an
/// embellished/highlighted/marked-up String.
pub fn render<'i>(renderer: &impl Render, fragments: Vec<(Syntax, Cow<'i, str>)>) -> String {
    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.style(syntax, &content);
        output.push_str(&rendered);
    }

    output
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::formatting::Identity;

    #[test]
    fn identity_concatenates_fragments() {
        let fragments = vec![
            (Syntax::Keyword, Cow::Borrowed("let")),
            (Syntax::Neutral, Cow::Borrowed(" x = ")),
            (Syntax::Numeric, Cow::Owned("42".to_string())),
        ];
        assert_eq!(render(&Identity, fragments), "let x = 42");
    }
}

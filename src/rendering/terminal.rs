//! ANSI escapes for colourizing terminal output

use owo_colors::{OwoColorize, Rgb};

use crate::formatting::{Render, Syntax};
use crate::profile::Theme;

/// Embellish fragments with ANSI escapes to create syntax highlighting in
/// terminal output. The palette follows the profile's theme so that text
/// remains legible on both dark and light backgrounds.
pub struct Terminal {
    pub theme: Theme,
}

impl Terminal {
    pub fn new(theme: Theme) -> Terminal {
        Terminal { theme }
    }

    fn pick(&self, dark: Rgb, light: Rgb) -> Rgb {
        match self.theme {
            Theme::Dark => dark,
            Theme::Light => light,
        }
    }
}

impl Render for Terminal {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Neutral => content.to_string(),
            Syntax::Keyword => content // keyword.control - #ad7fa8 / #75507b (purple) bold
                .color(self.pick(Rgb(0xad, 0x7f, 0xa8), Rgb(0x75, 0x50, 0x7b)))
                .bold()
                .to_string(),
            Syntax::Type => content // entity.name.type - #c4a000 / #8f5902 (brown)
                .color(self.pick(Rgb(0xc4, 0xa0, 0x00), Rgb(0x8f, 0x59, 0x02)))
                .to_string(),
            Syntax::Function => content // entity.name.function - #729fcf / #3465a4 (blue)
                .color(self.pick(Rgb(0x72, 0x9f, 0xcf), Rgb(0x34, 0x65, 0xa4)))
                .to_string(),
            Syntax::String => content // string - #8ae234 / #4e9a06 (green)
                .color(self.pick(Rgb(0x8a, 0xe2, 0x34), Rgb(0x4e, 0x9a, 0x06)))
                .to_string(),
            Syntax::Numeric => content // constant.numeric - #fcaf3e / #ce5c00 (orange)
                .color(self.pick(Rgb(0xfc, 0xaf, 0x3e), Rgb(0xce, 0x5c, 0x00)))
                .to_string(),
            Syntax::Comment => content // comment - #888a85 (grey) italic
                .color(Rgb(0x88, 0x8a, 0x85))
                .italic()
                .to_string(),
            Syntax::Operator => content // keyword.operator - #ef2929 / #cc0000 (red)
                .color(self.pick(Rgb(0xef, 0x29, 0x29), Rgb(0xcc, 0x00, 0x00)))
                .to_string(),
            Syntax::Punctuation => content // punctuation - #999999 (grey)
                .color(Rgb(0x99, 0x99, 0x99))
                .to_string(),
            Syntax::Variable => content // variable.parameter - #34e2e2 / #06989a (cyan)
                .color(self.pick(Rgb(0x34, 0xe2, 0xe2), Rgb(0x06, 0x98, 0x9a)))
                .to_string(),
            Syntax::Attribute => content // entity.other.attribute-name
                .color(self.pick(Rgb(0x60, 0x98, 0x9a), Rgb(0x3b, 0x5d, 0x7d)))
                .to_string(),
            Syntax::Constant => content // constant.language
                .color(self.pick(Rgb(0xfc, 0xaf, 0x3e), Rgb(0xce, 0x5c, 0x00)))
                .bold()
                .to_string(),
            Syntax::Heading => content // markup.heading
                .color(self.pick(Rgb(0x72, 0x9f, 0xcf), Rgb(0x20, 0x4a, 0x87)))
                .bold()
                .to_string(),
            Syntax::Emphasis => content
                .italic()
                .to_string(),
            Syntax::Strong => content
                .bold()
                .to_string(),
            Syntax::Strikethrough => content
                .strikethrough()
                .to_string(),
            Syntax::InlineCode => content // markup.inline.raw
                .color(self.pick(Rgb(0xfc, 0xe9, 0x4f), Rgb(0xa4, 0x00, 0x00)))
                .to_string(),
            Syntax::Link => content // markup.underline.link
                .color(self.pick(Rgb(0x72, 0x9f, 0xcf), Rgb(0x34, 0x65, 0xa4)))
                .underline()
                .to_string(),
            Syntax::Quote => content // markup.quote
                .color(Rgb(0x88, 0x8a, 0x85))
                .italic()
                .to_string(),
            Syntax::ListMarker => content
                .color(self.pick(Rgb(0xfc, 0xaf, 0x3e), Rgb(0xce, 0x5c, 0x00)))
                .bold()
                .to_string(),
            Syntax::Rule => content
                .color(Rgb(0x55, 0x57, 0x53))
                .to_string(),
            Syntax::TableBorder => content
                .color(Rgb(0x88, 0x8a, 0x85))
                .to_string(),
            Syntax::TableHeader => content
                .bold()
                .to_string(),
            Syntax::Warning => content
                .color(Rgb(0xfc, 0xe9, 0x4f))
                .bold()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn basic_handling() {
        let result = Render::style(&Terminal::new(Theme::Dark), Syntax::Neutral, "hello world");
        assert_eq!(result, "hello world");
    }

    #[test]
    fn styled_content_carries_escapes() {
        let result = Render::style(&Terminal::new(Theme::Light), Syntax::Keyword, "fn");
        assert!(result.contains("fn"));
        assert!(result.starts_with("\x1b["));
        assert_ne!(result, "fn");
    }

    #[test]
    fn themes_differ_for_coloured_syntax() {
        let dark = Render::style(&Terminal::new(Theme::Dark), Syntax::String, "\"x\"");
        let light = Render::style(&Terminal::new(Theme::Light), Syntax::String, "\"x\"");
        assert_ne!(dark, light);
    }
}

//! Syntax highlighting for fenced code blocks
//!
//! Each language has an ordered table of (pattern, Syntax) rules. Rules are
//! applied in order and the first rule to claim a span of the input wins;
//! later matches overlapping an already claimed span are discarded. Anything
//! left unclaimed is emitted as Syntax::Neutral. Languages without a table
//! get the generic rules.

mod detect;
mod table;

pub use detect::detect_language;
pub use table::{rules_for, Rule};

use std::borrow::Cow;
use tracing::debug;

use crate::formatting::{Render, Syntax};
use crate::rendering;

/// Split code into tagged fragments according to the rules for the given
/// language (or the generic rules if the language is unknown or absent).
pub fn fragments<'i>(code: &'i str, language: Option<&str>) -> Vec<(Syntax, Cow<'i, str>)> {
    let rules = rules_for(language);

    let mut spans: Vec<(usize, usize, Syntax)> = Vec::new();

    for rule in &rules {
        for captures in rule
            .pattern
            .captures_iter(code)
        {
            // a rule may narrow its match to the first capture group, for
            // example to tag a function name but not the '(' after it.
            let found = match captures.get(1) {
                Some(group) => group,
                None => match captures.get(0) {
                    Some(whole) => whole,
                    None => continue,
                },
            };

            let (start, end) = (found.start(), found.end());
            if start == end {
                continue;
            }
            if overlaps(&spans, start, end) {
                continue;
            }

            let position = spans.partition_point(|span| span.0 < start);
            spans.insert(position, (start, end, rule.syntax));
        }
    }

    let mut result = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for (start, end, syntax) in spans {
        if start > cursor {
            result.push((Syntax::Neutral, Cow::Borrowed(&code[cursor..start])));
        }
        result.push((syntax, Cow::Borrowed(&code[start..end])));
        cursor = end;
    }
    if cursor < code.len() {
        result.push((Syntax::Neutral, Cow::Borrowed(&code[cursor..])));
    }

    result
}

/// Highlight code and apply the given renderer to the resulting fragments.
pub fn highlight(renderer: &impl Render, code: &str, language: Option<&str>) -> String {
    debug!(language, bytes = code.len(), "highlighting");
    rendering::render(renderer, fragments(code, language))
}

// spans are kept sorted by start offset and never overlap one another, so
// only the neighbours of the insertion point need checking.
fn overlaps(spans: &[(usize, usize, Syntax)], start: usize, end: usize) -> bool {
    let position = spans.partition_point(|span| span.0 < start);

    if position > 0 && spans[position - 1].1 > start {
        return true;
    }
    if position < spans.len() && spans[position].0 < end {
        return true;
    }
    false
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::formatting::Identity;

    fn tags<'a>(fragments: &'a [(Syntax, Cow<'a, str>)]) -> Vec<(Syntax, &'a str)> {
        fragments
            .iter()
            .filter(|(syntax, _)| *syntax != Syntax::Neutral)
            .map(|(syntax, text)| (*syntax, text.as_ref()))
            .collect()
    }

    #[test]
    fn identity_reproduces_input() {
        let code = "fn main() {\n    println!(\"hello\"); // greet\n}\n";
        assert_eq!(highlight(&Identity, code, Some("rust")), code);
    }

    #[test]
    fn first_match_wins() {
        // the keyword inside the comment and the string must not be
        // highlighted as keywords, because comments and strings come first.
        let code = "// let x\nlet y = \"fn\";";
        let fragments = fragments(code, Some("rust"));
        let tags = tags(&fragments);

        assert_eq!(tags[0], (Syntax::Comment, "// let x"));
        assert!(tags.contains(&(Syntax::Keyword, "let")));
        assert!(tags.contains(&(Syntax::String, "\"fn\"")));
        assert!(!tags.contains(&(Syntax::Keyword, "fn")));
    }

    #[test]
    fn capture_group_narrows_span() {
        let fragments = fragments("def greet(name):\n    pass\n", Some("python"));
        let tags = tags(&fragments);

        assert!(tags.contains(&(Syntax::Function, "greet")));
        assert!(tags.contains(&(Syntax::Keyword, "def")));
    }

    #[test]
    fn unknown_language_uses_generic_rules() {
        let fragments = fragments("x = 42 # answer", Some("klingon"));
        let tags = tags(&fragments);

        assert!(tags.contains(&(Syntax::Numeric, "42")));
        assert!(tags.contains(&(Syntax::Comment, "# answer")));
    }

    #[test]
    fn spans_do_not_overlap() {
        let code = "let s = \"a # b\"; // real 7";
        let fragments = fragments(code, Some("rust"));

        let rebuilt: String = fragments
            .iter()
            .map(|(_, text)| text.as_ref())
            .collect();
        assert_eq!(rebuilt, code);

        let tags = tags(&fragments);
        assert!(tags.contains(&(Syntax::String, "\"a # b\"")));
        assert!(tags.contains(&(Syntax::Comment, "// real 7")));
        assert!(!tags.contains(&(Syntax::Numeric, "7")));
    }

    #[test]
    fn overlap_detection() {
        let spans = vec![(0, 4, Syntax::Keyword), (10, 12, Syntax::Numeric)];
        assert!(overlaps(&spans, 2, 6));
        assert!(overlaps(&spans, 8, 11));
        assert!(!overlaps(&spans, 4, 10));
        assert!(!overlaps(&spans, 12, 20));
    }
}

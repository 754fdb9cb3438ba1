//! Syntax tags for styling fragments of code and markup

/// Types of content that can be rendered with different styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Neutral, // default
    Keyword,
    Type,
    Function,
    String,
    Numeric,
    Comment,
    Operator,
    Punctuation,
    Variable,
    Attribute,
    Constant,
    Heading,
    Emphasis,
    Strong,
    Strikethrough,
    InlineCode,
    Link,
    Quote,
    ListMarker,
    Rule,
    TableBorder,
    TableHeader,
    Warning,
}

impl Syntax {
    /// Short stable name, used for CSS class names in document output.
    pub fn name(&self) -> &'static str {
        match self {
            Syntax::Neutral => "neutral",
            Syntax::Keyword => "keyword",
            Syntax::Type => "type",
            Syntax::Function => "function",
            Syntax::String => "string",
            Syntax::Numeric => "numeric",
            Syntax::Comment => "comment",
            Syntax::Operator => "operator",
            Syntax::Punctuation => "punctuation",
            Syntax::Variable => "variable",
            Syntax::Attribute => "attribute",
            Syntax::Constant => "constant",
            Syntax::Heading => "heading",
            Syntax::Emphasis => "emphasis",
            Syntax::Strong => "strong",
            Syntax::Strikethrough => "strikethrough",
            Syntax::InlineCode => "inline-code",
            Syntax::Link => "link",
            Syntax::Quote => "quote",
            Syntax::ListMarker => "list-marker",
            Syntax::Rule => "rule",
            Syntax::TableBorder => "table-border",
            Syntax::TableHeader => "table-header",
            Syntax::Warning => "warning",
        }
    }
}

/// Trait for different rendering backends (the no-op no-markup one, ANSI
/// escapes for terminal colouring, HTML spans for documents)
pub trait Render {
    /// Apply styling to content with the specified syntax type
    fn style(&self, syntax: Syntax, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn style(&self, _syntax: Syntax, content: &str) -> String {
        content.to_string()
    }
}

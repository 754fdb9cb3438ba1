//! Per-language highlighting rules, most specific first

use regex::Regex;

use crate::formatting::Syntax;

/// A single highlighting rule. If the pattern has a capture group, only the
/// first group is tagged; otherwise the whole match is.
pub struct Rule {
    pub pattern: &'static Regex,
    pub syntax: Syntax,
}

fn rule(pattern: &'static Regex, syntax: Syntax) -> Rule {
    Rule { pattern, syntax }
}

/// Look up the rules for a language tag, accepting the usual aliases.
/// Unknown or absent languages get the generic rules.
pub fn rules_for(language: Option<&str>) -> Vec<Rule> {
    let language = language
        .map(|tag| tag.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match language.as_str() {
        "rust" | "rs" => rust(),
        "python" | "py" | "python3" => python(),
        "javascript" | "js" | "jsx" | "typescript" | "ts" | "tsx" | "mjs" => javascript(),
        "shell" | "sh" | "bash" | "zsh" | "console" | "shell-session" => shell(),
        "json" | "jsonc" => json(),
        "yaml" | "yml" => yaml(),
        "toml" | "ini" => toml(),
        _ => generic(),
    }
}

fn rust() -> Vec<Rule> {
    vec![
        rule(regex!(r"//[^\n]*|/\*[\s\S]*?\*/"), Syntax::Comment),
        rule(regex!(r#"b?"(?:\\.|[^"\\])*""#), Syntax::String),
        rule(regex!(r"'(?:\\.|[^'\\])'"), Syntax::String),
        rule(regex!(r"#!?\[[^\]\n]*\]"), Syntax::Attribute),
        rule(regex!(r"'[a-z_]\w*"), Syntax::Variable),
        rule(
            regex!(r"\b(?:as|async|await|break|const|continue|crate|dyn|else|enum|extern|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|self|Self|static|struct|super|trait|type|unsafe|use|where|while)\b"),
            Syntax::Keyword,
        ),
        rule(regex!(r"\b(?:true|false|None|Some|Ok|Err)\b"), Syntax::Constant),
        rule(regex!(r"\b([a-z_][a-z0-9_]*!)"), Syntax::Function),
        rule(regex!(r"\b([a-z_][a-z0-9_]*)\s*\("), Syntax::Function),
        rule(regex!(r"\b[A-Z][A-Za-z0-9_]*\b"), Syntax::Type),
        rule(
            regex!(r"\b\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?(?:[iuf](?:8|16|32|64|128|size))?\b"),
            Syntax::Numeric,
        ),
        rule(regex!(r"[+\-*/%=<>!&|^]+|::|->|=>"), Syntax::Operator),
        rule(regex!(r"[{}()\[\];,.:]"), Syntax::Punctuation),
    ]
}

fn python() -> Vec<Rule> {
    vec![
        rule(regex!(r#""""[\s\S]*?"""|'''[\s\S]*?'''"#), Syntax::String),
        rule(regex!(r"#[^\n]*"), Syntax::Comment),
        rule(regex!(r#"[rbfu]?"(?:\\.|[^"\\\n])*"|[rbfu]?'(?:\\.|[^'\\\n])*'"#), Syntax::String),
        rule(regex!(r"@[A-Za-z_][\w.]*"), Syntax::Attribute),
        rule(
            regex!(r"\b(?:and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\b"),
            Syntax::Keyword,
        ),
        rule(regex!(r"\b(?:True|False|None)\b"), Syntax::Constant),
        rule(regex!(r"\b(?:self|cls)\b"), Syntax::Variable),
        rule(regex!(r"\b([A-Za-z_]\w*)\s*\("), Syntax::Function),
        rule(regex!(r"\b[A-Z][A-Za-z0-9_]*\b"), Syntax::Type),
        rule(regex!(r"\b\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?j?\b"), Syntax::Numeric),
        rule(regex!(r"[+\-*/%=<>!&|^~]+"), Syntax::Operator),
        rule(regex!(r"[{}()\[\];,.:]"), Syntax::Punctuation),
    ]
}

fn javascript() -> Vec<Rule> {
    vec![
        rule(regex!(r"//[^\n]*|/\*[\s\S]*?\*/"), Syntax::Comment),
        rule(
            regex!(r#""(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'|`(?:\\.|[^`\\])*`"#),
            Syntax::String,
        ),
        rule(
            regex!(r"\b(?:async|await|break|case|catch|class|const|continue|default|delete|do|else|export|extends|finally|for|from|function|if|import|in|instanceof|interface|let|new|of|return|switch|this|throw|try|type|typeof|var|void|while|yield)\b"),
            Syntax::Keyword,
        ),
        rule(regex!(r"\b(?:true|false|null|undefined|NaN)\b"), Syntax::Constant),
        rule(regex!(r"\b([A-Za-z_$][\w$]*)\s*\("), Syntax::Function),
        rule(regex!(r"\b[A-Z][A-Za-z0-9_]*\b"), Syntax::Type),
        rule(regex!(r"\b\d+(?:\.\d+)?(?:[eE][+-]?\d+)?n?\b"), Syntax::Numeric),
        rule(regex!(r"=>|[+\-*/%=<>!&|^~?]+"), Syntax::Operator),
        rule(regex!(r"[{}()\[\];,.:]"), Syntax::Punctuation),
    ]
}

fn shell() -> Vec<Rule> {
    vec![
        rule(regex!(r"(?m)(?:^|\s)(#[^\n]*)"), Syntax::Comment),
        rule(regex!(r#""(?:\\.|[^"\\])*"|'[^']*'"#), Syntax::String),
        rule(regex!(r"\$\{[^}\n]*\}|\$[A-Za-z_]\w*|\$[0-9@#?*$!-]"), Syntax::Variable),
        rule(
            regex!(r"\b(?:case|do|done|elif|else|esac|export|fi|for|function|if|in|local|readonly|return|select|then|until|while)\b"),
            Syntax::Keyword,
        ),
        rule(regex!(r"(?m)^\s*(?:\$\s+)?([A-Za-z_][\w.-]*)"), Syntax::Function),
        rule(regex!(r"(?:^|\s)(--?[A-Za-z][\w-]*)"), Syntax::Attribute),
        rule(regex!(r"\b\d+\b"), Syntax::Numeric),
        rule(regex!(r"\|\||&&|[|;&<>]"), Syntax::Operator),
    ]
}

fn json() -> Vec<Rule> {
    vec![
        rule(regex!(r#"("(?:\\.|[^"\\])*")\s*:"#), Syntax::Attribute),
        rule(regex!(r#""(?:\\.|[^"\\])*""#), Syntax::String),
        rule(regex!(r"\b(?:true|false|null)\b"), Syntax::Constant),
        rule(regex!(r"-?\b\d+(?:\.\d+)?(?:[eE][+-]?\d+)?\b"), Syntax::Numeric),
        rule(regex!(r"[{}\[\],:]"), Syntax::Punctuation),
    ]
}

fn yaml() -> Vec<Rule> {
    vec![
        rule(regex!(r"(?m)(?:^|\s)(#[^\n]*)"), Syntax::Comment),
        rule(regex!(r#""(?:\\.|[^"\\])*"|'[^'\n]*'"#), Syntax::String),
        rule(regex!(r"(?m)^\s*(?:-\s+)?([\w.\-/]+)\s*:"), Syntax::Attribute),
        rule(regex!(r"\b(?:true|false|yes|no|null|on|off)\b|~"), Syntax::Constant),
        rule(regex!(r"\b\d+(?:\.\d+)?\b"), Syntax::Numeric),
        rule(regex!(r"(?m)^\s*(-)\s"), Syntax::Punctuation),
        rule(regex!(r"(?m)[&*][\w-]+|[|>][+-]?$"), Syntax::Operator),
    ]
}

fn toml() -> Vec<Rule> {
    vec![
        rule(regex!(r"#[^\n]*"), Syntax::Comment),
        rule(regex!(r#""""[\s\S]*?"""|"(?:\\.|[^"\\\n])*"|'[^'\n]*'"#), Syntax::String),
        rule(regex!(r"(?m)^\s*(\[\[?[^\]\n]+\]\]?)"), Syntax::Type),
        rule(regex!(r"(?m)^\s*([\w.\-]+)\s*="), Syntax::Attribute),
        rule(regex!(r"\b(?:true|false)\b"), Syntax::Constant),
        rule(regex!(r"\b\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?\b"), Syntax::Numeric),
        rule(regex!(r"[=\[\]{},]"), Syntax::Punctuation),
    ]
}

fn generic() -> Vec<Rule> {
    vec![
        rule(regex!(r"//[^\n]*|/\*[\s\S]*?\*/"), Syntax::Comment),
        rule(regex!(r"(?m)(?:^|\s)(#[^\n]*)"), Syntax::Comment),
        rule(regex!(r#""(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#), Syntax::String),
        rule(
            regex!(r"\b(?:if|else|elif|for|while|do|return|function|func|def|class|struct|enum|import|include|package|public|private|static|const|let|var|void|int|float|double|char|bool|true|false|null|nil|new|switch|case|break|continue|try|catch|throw)\b"),
            Syntax::Keyword,
        ),
        rule(regex!(r"\b([A-Za-z_]\w*)\s*\("), Syntax::Function),
        rule(regex!(r"\b0x[0-9A-Fa-f]+\b|\b\d+(?:\.\d+)?\b"), Syntax::Numeric),
        rule(regex!(r"[+\-*/%=<>!&|^~]+"), Syntax::Operator),
    ]
}

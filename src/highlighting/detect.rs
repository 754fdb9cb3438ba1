//! Guess the language of an unlabelled code block

use std::path::Path;

/// Work out a language tag for a piece of code. A filename, if known, is the
/// most reliable signal; failing that, look at the content itself. Returns
/// None when nothing is conclusive, in which case the generic rules apply.
pub fn detect_language(code: &str, filename: Option<&Path>) -> Option<&'static str> {
    if let Some(language) = filename.and_then(by_extension) {
        return Some(language);
    }

    let first = code
        .lines()
        .find(|line| !line.trim().is_empty())?
        .trim();

    if let Some(interpreter) = first.strip_prefix("#!") {
        if interpreter.contains("python") {
            return Some("python");
        }
        if interpreter.contains("node") {
            return Some("javascript");
        }
        if interpreter.contains("sh") {
            return Some("shell");
        }
    }

    let trimmed = code.trim();
    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.contains('"'))
    {
        return Some("json");
    }

    if regex!(r"(?m)^\s*(?:pub\s+)?(?:fn|impl|struct|enum|use|mod)\s+\w").is_match(code)
        || code.contains("let mut ")
    {
        return Some("rust");
    }
    if regex!(r"(?m)^\s*(?:def|class)\s+\w+.*:\s*$").is_match(code)
        || regex!(r"(?m)^\s*(?:from\s+\S+\s+)?import\s+\w+\s*$").is_match(code)
    {
        return Some("python");
    }
    if regex!(r"\b(?:function\s+\w+\s*\(|const\s+\w+\s*=|=>\s*\{|console\.log\()").is_match(code) {
        return Some("javascript");
    }
    if regex!(r"(?m)^\s*\$\s+\w").is_match(code) {
        return Some("shell");
    }
    if regex!(r"(?m)^\s*\[[\w.\-]+\]\s*$").is_match(code) {
        return Some("toml");
    }
    if regex!(r"(?m)^[\w.\-]+:(?:\s|$)").is_match(code) {
        return Some("yaml");
    }

    None
}

fn by_extension(filename: &Path) -> Option<&'static str> {
    let extension = filename
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    match extension.as_str() {
        "rs" => Some("rust"),
        "py" | "pyw" => Some("python"),
        "js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" => Some("javascript"),
        "sh" | "bash" | "zsh" => Some("shell"),
        "json" => Some("json"),
        "yaml" | "yml" => Some("yaml"),
        "toml" | "ini" => Some("toml"),
        _ => None,
    }
}

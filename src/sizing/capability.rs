//! Which terminal graphics protocol the current terminal speaks

use crate::profile::Backend;

/// The three mutually exclusive families of terminal graphics encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Base64 image data inline in an OSC 1337 escape (iTerm2, WezTerm).
    Inline,
    /// The kitty graphics protocol, spoken by a helper subprocess.
    Helper,
    /// Sixel, produced by an external encoder.
    Sixel,
}

impl Protocol {
    pub fn describe(&self) -> &'static str {
        match self {
            Protocol::Inline => "inline images (iTerm2)",
            Protocol::Helper => "kitty graphics protocol",
            Protocol::Sixel => "sixel",
        }
    }
}

/// Work out the protocol from the environment the terminal exports. The
/// lookup is passed in so this stays a pure function of its input.
pub fn detect_capability<F>(environment: F) -> Protocol
where
    F: Fn(&str) -> Option<String>,
{
    let is = |name: &str, value: &str| {
        environment(name)
            .map(|v| v.eq_ignore_ascii_case(value))
            .unwrap_or(false)
    };
    let contains = |name: &str, value: &str| {
        environment(name)
            .map(|v| {
                v.to_ascii_lowercase()
                    .contains(value)
            })
            .unwrap_or(false)
    };

    if is("TERM_PROGRAM", "iTerm.app")
        || is("LC_TERMINAL", "iTerm2")
        || is("TERM_PROGRAM", "WezTerm")
    {
        return Protocol::Inline;
    }

    if environment("KITTY_WINDOW_ID").is_some()
        || contains("TERM", "kitty")
        || is("TERM_PROGRAM", "ghostty")
    {
        return Protocol::Helper;
    }

    Protocol::Sixel
}

/// Apply the profile's backend preference; Auto defers to detection.
pub fn select_protocol<F>(backend: Backend, environment: F) -> Protocol
where
    F: Fn(&str) -> Option<String>,
{
    match backend {
        Backend::Auto => detect_capability(environment),
        Backend::Inline => Protocol::Inline,
        Backend::Kitty => Protocol::Helper,
        Backend::Sixel => Protocol::Sixel,
    }
}

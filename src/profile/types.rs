//! Types describing a rendering profile

use serde::{Deserialize, Serialize};

/// Which surface a profile renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Terminal,
    PaginatedDocument,
    WordProcessorDocument,
}

impl Target {
    pub fn describe(&self) -> &'static str {
        match self {
            Target::Terminal => "terminal",
            Target::PaginatedDocument => "paginated document",
            Target::WordProcessorDocument => "word processor document",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Font families. Each is either a family name or one of the sentinels
/// "default" or "monospace".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fonts {
    pub body: String,
    pub heading: String,
    pub code: String,
    pub diagram: String,
}

/// Font sizes in points, for document targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub body: f32,
    pub heading: f32,
    pub code: f32,
}

/// Colours as CSS colour strings, for document targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub text: String,
    pub background: String,
    pub heading: String,
    pub link: String,
    pub code_background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Fraction of the available width, in (0, 1].
    pub width_percent: f64,
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramTheme {
    Default,
    Dark,
    Forest,
    Neutral,
}

impl DiagramTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramTheme::Default => "default",
            DiagramTheme::Dark => "dark",
            DiagramTheme::Forest => "forest",
            DiagramTheme::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    None,
    Fit,
}

/// How a generated diagram is sized on output: at its natural size, fitted
/// to the configured width, or scaled by a factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Mode(ScaleMode),
    Factor(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSettings {
    pub width: u32,
    pub height: u32,
    pub theme: DiagramTheme,
    /// "transparent" or a colour.
    pub background: String,
    pub scale: Scale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
}

/// Which terminal graphics protocol to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Auto,
    Inline,
    Kitty,
    Sixel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transparency {
    pub enabled: bool,
    /// Alpha threshold in [0, 1].
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSettings {
    pub backend: Backend,
    pub transparency: Transparency,
    pub pixels_per_column: u32,
    pub fallback_columns: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSettings {
    pub word_wrap: bool,
    pub wrap_on_word_boundary: bool,
    pub width_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl PageSize {
    pub fn as_css(&self) -> &'static str {
        match self {
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_css(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Running header or footer. The text may contain {title} and {page}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Running {
    pub enabled: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin: String,
    pub header: Running,
    pub footer: Running,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_doc: Option<String>,
}

/// A named, complete set of rendering parameters for one output target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub target: Target,
    pub theme: Theme,
    pub fonts: Fonts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_sizes: Option<FontSizes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Palette>,
    pub image: ImageSettings,
    pub diagram: DiagramSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<TerminalSettings>,
    pub table: TableSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentSettings>,
}

impl Profile {
    /// Terminal settings, falling back to the built-in ones for profiles of
    /// other targets that get rendered to a terminal anyway.
    pub fn terminal_settings(&self) -> TerminalSettings {
        match &self.terminal {
            Some(settings) => settings.clone(),
            None => super::defaults::terminal_settings(),
        }
    }
}

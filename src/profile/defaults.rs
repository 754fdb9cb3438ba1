//! Built-in profiles

use std::collections::BTreeMap;

use super::store::ConfigurationStore;
use super::types::*;

pub const DEFAULT_PROFILE: &str = "terminal";

pub(crate) fn terminal_settings() -> TerminalSettings {
    TerminalSettings {
        backend: Backend::Auto,
        transparency: Transparency {
            enabled: true,
            threshold: 0.5,
        },
        pixels_per_column: 10,
        fallback_columns: 80,
    }
}

fn fonts(body: &str, heading: &str) -> Fonts {
    Fonts {
        body: body.to_string(),
        heading: heading.to_string(),
        code: "monospace".to_string(),
        diagram: "default".to_string(),
    }
}

fn table() -> TableSettings {
    TableSettings {
        word_wrap: true,
        wrap_on_word_boundary: true,
        width_percent: 1.0,
    }
}

fn document(page_size: PageSize) -> DocumentSettings {
    DocumentSettings {
        page_size,
        orientation: Orientation::Portrait,
        margin: "20mm".to_string(),
        header: Running {
            enabled: false,
            text: "{title}".to_string(),
        },
        footer: Running {
            enabled: true,
            text: "{page}".to_string(),
        },
        reference_doc: None,
    }
}

pub fn terminal() -> Profile {
    Profile {
        name: "terminal".to_string(),
        target: Target::Terminal,
        theme: Theme::Dark,
        fonts: fonts("default", "default"),
        font_sizes: None,
        colors: None,
        image: ImageSettings {
            width_percent: 0.75,
            alignment: Alignment::Center,
            max_width: None,
            dpi: None,
        },
        diagram: DiagramSettings {
            width: 1200,
            height: 800,
            theme: DiagramTheme::Dark,
            background: "transparent".to_string(),
            scale: Scale::Mode(ScaleMode::Fit),
            font_family: None,
            font_size: None,
            dpi: None,
        },
        terminal: Some(terminal_settings()),
        table: table(),
        document: None,
    }
}

pub fn pdf() -> Profile {
    Profile {
        name: "pdf".to_string(),
        target: Target::PaginatedDocument,
        theme: Theme::Light,
        fonts: fonts("Georgia, serif", "Helvetica, Arial, sans-serif"),
        font_sizes: Some(FontSizes {
            body: 11.0,
            heading: 20.0,
            code: 9.5,
        }),
        colors: Some(Palette {
            text: "#222222".to_string(),
            background: "#ffffff".to_string(),
            heading: "#204a87".to_string(),
            link: "#3465a4".to_string(),
            code_background: "#f6f8fa".to_string(),
        }),
        image: ImageSettings {
            width_percent: 0.8,
            alignment: Alignment::Center,
            max_width: Some("160mm".to_string()),
            dpi: Some(192),
        },
        diagram: DiagramSettings {
            width: 1200,
            height: 800,
            theme: DiagramTheme::Default,
            background: "transparent".to_string(),
            scale: Scale::Mode(ScaleMode::Fit),
            font_family: None,
            font_size: None,
            dpi: Some(192),
        },
        terminal: None,
        table: table(),
        document: Some(document(PageSize::A4)),
    }
}

pub fn print() -> Profile {
    Profile {
        name: "print".to_string(),
        target: Target::PaginatedDocument,
        theme: Theme::Light,
        fonts: fonts("Georgia, serif", "Georgia, serif"),
        font_sizes: Some(FontSizes {
            body: 11.0,
            heading: 18.0,
            code: 9.0,
        }),
        colors: Some(Palette {
            text: "#000000".to_string(),
            background: "#ffffff".to_string(),
            heading: "#000000".to_string(),
            link: "#000000".to_string(),
            code_background: "#ffffff".to_string(),
        }),
        image: ImageSettings {
            width_percent: 0.7,
            alignment: Alignment::Center,
            max_width: Some("150mm".to_string()),
            dpi: Some(300),
        },
        diagram: DiagramSettings {
            width: 1200,
            height: 800,
            theme: DiagramTheme::Neutral,
            background: "white".to_string(),
            scale: Scale::Mode(ScaleMode::Fit),
            font_family: None,
            font_size: None,
            dpi: Some(300),
        },
        terminal: None,
        table: table(),
        document: Some(document(PageSize::Letter)),
    }
}

pub fn docx() -> Profile {
    Profile {
        name: "docx".to_string(),
        target: Target::WordProcessorDocument,
        theme: Theme::Light,
        fonts: fonts("Calibri", "Calibri Light"),
        font_sizes: Some(FontSizes {
            body: 11.0,
            heading: 16.0,
            code: 10.0,
        }),
        colors: None,
        image: ImageSettings {
            width_percent: 0.9,
            alignment: Alignment::Center,
            max_width: None,
            dpi: Some(150),
        },
        diagram: DiagramSettings {
            width: 1200,
            height: 800,
            theme: DiagramTheme::Default,
            background: "white".to_string(),
            scale: Scale::Mode(ScaleMode::Fit),
            font_family: None,
            font_size: None,
            dpi: Some(150),
        },
        terminal: None,
        table: table(),
        document: Some(document(PageSize::A4)),
    }
}

/// The store as shipped, before any user overrides are applied.
pub fn builtin() -> ConfigurationStore {
    let mut profiles = BTreeMap::new();
    for profile in [terminal(), pdf(), print(), docx()] {
        profiles.insert(profile.name.clone(), profile);
    }

    ConfigurationStore {
        default_profile: DEFAULT_PROFILE.to_string(),
        profiles,
    }
}

use owo_colors::OwoColorize;
use std::path::Path;

use markshow::{document::LoadingError, output::ExportError, profile::ConfigError};

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    let mut message = format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    );
    if !error
        .details
        .is_empty()
    {
        message.push_str(&format!(" ({})", error.details));
    }
    message
}

/// Format a problem with the configuration. For a profile that doesn't
/// exist the valid names are listed.
pub fn concise_config_error(error: &ConfigError) -> String {
    match error {
        ConfigError::NotFound { name, available } => format!(
            "{}: {} {}\n\nAvailable profiles: {}",
            "error".bright_red(),
            "Profile not found:".bold(),
            name,
            available.join(", ")
        ),
        ConfigError::Corrupt { path, details } => format!(
            "{}: {}: {}\n\n{}",
            "error".bright_red(),
            path.display(),
            "Configuration file is corrupt".bold(),
            details
        ) + "\n\nRun `markshow profiles --init` to replace it with the defaults.",
        other => format!("{}: {}", "error".bright_red(), other.bold()),
    }
}

/// Format a failed export
pub fn concise_export_error(error: &ExportError, filename: &Path) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        filename.display(),
        error
            .to_string()
            .bold()
    )
}

/// Format a failure writing output
pub fn concise_output_error(error: &std::io::Error) -> String {
    format!(
        "{}: {} ({})",
        "error".bright_red(),
        "Failed writing output".bold(),
        error
    )
}

use clap::{value_parser, Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};

use markshow::document;
use markshow::external::{self, Dependencies};
use markshow::output::{default_output, Export, ExportError, Format, Stream, TerminalSurface};
use markshow::profile::{self, defaults, ConfigurationStore};
use markshow::scanning::Scanner;
use markshow::sizing::{self, Protocol};

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("markshow")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Render markdown with diagrams and images to the terminal, PDF, and DOCX.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what is going on, in considerable detail, to standard error."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Use the given profiles file instead of the one in your configuration directory."),
        )
        .subcommand(
            Command::new("render")
                .about("Render a markdown document to the terminal")
                .arg(
                    Arg::new("profile")
                        .short('p')
                        .long("profile")
                        .help("The profile to render with. Defaults to the configured default profile."),
                )
                .arg(
                    Arg::new("width")
                        .short('w')
                        .long("width")
                        .value_parser(value_parser!(usize))
                        .help("Render for a terminal this many columns wide, rather than the width of the current one."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The markdown file to render, or - to read from standard input."),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export a markdown document to PDF or DOCX")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .required(true)
                        .value_parser(["pdf", "docx"])
                        .help("The kind of document to produce."),
                )
                .arg(
                    Arg::new("profile")
                        .short('p')
                        .long("profile")
                        .help("The profile to export with. Defaults to the profile named after the format."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the document. Defaults to the input filename with the format's extension."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The markdown file to export."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report which external tools are installed and which graphics protocol the terminal speaks"),
        )
        .subcommand(
            Command::new("profiles")
                .about("List the available profiles")
                .arg(
                    Arg::new("init")
                        .long("init")
                        .action(ArgAction::SetTrue)
                        .help("Replace the profiles file with the built-in defaults."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("debug") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(profile::config_path);
    debug!(config = %config.display());

    match matches.subcommand() {
        Some(("render", submatches)) => {
            let filename = submatches
                .get_one::<String>("filename")
                .map(Path::new)
                .unwrap_or(Path::new("-"));
            let name = submatches
                .get_one::<String>("profile")
                .map(String::as_str);
            let width = submatches
                .get_one::<usize>("width")
                .copied();

            render(filename, &config, name, width);
        }
        Some(("export", submatches)) => {
            let filename = submatches
                .get_one::<String>("filename")
                .map(Path::new)
                .unwrap_or(Path::new("-"));
            let format = submatches
                .get_one::<String>("format")
                .and_then(|name| Format::parse(name))
                .unwrap_or(Format::Pdf);
            let name = submatches
                .get_one::<String>("profile")
                .map(String::as_str)
                .unwrap_or(format.default_profile());
            let output = submatches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| default_output(filename, format));

            export(filename, &config, name, format, &output);
        }
        Some(("check", _)) => {
            check(external::dependencies());
        }
        Some(("profiles", submatches)) => {
            profiles(&config, submatches.get_flag("init"));
        }
        _ => {
            eprintln!(
                "{}: no command given; try {}",
                "error".bright_red(),
                "markshow --help".bold()
            );
            std::process::exit(1);
        }
    }
}

fn load_store(config: &Path) -> ConfigurationStore {
    match profile::load_from(config) {
        Ok(store) => store,
        Err(error) => {
            eprintln!("{}", problem::concise_config_error(&error));
            std::process::exit(1);
        }
    }
}

fn render(filename: &Path, config: &Path, name: Option<&str>, width: Option<usize>) {
    let content = match document::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    let store = load_store(config);
    let profile = match store.resolve(name) {
        Ok(profile) => profile,
        Err(error) => {
            eprintln!("{}", problem::concise_config_error(&error));
            std::process::exit(1);
        }
    };
    info!(profile = %profile.name, "Rendering {}", filename.display());

    let settings = profile.terminal_settings();
    let columns = match width {
        Some(width) if width > 0 => width,
        _ => sizing::terminal_columns(settings.fallback_columns),
    };
    let protocol = sizing::select_protocol(settings.backend, |name| std::env::var(name).ok());
    debug!(columns, protocol = protocol.describe());

    let dependencies = external::dependencies();
    let surface = TerminalSurface::new(profile, dependencies, protocol, columns);
    let base = document::base_directory(filename);

    let mut stream = Stream::new(
        std::io::stdout().lock(),
    );
    let result = Scanner::new(&surface, profile, dependencies)
        .with_base(&base)
        .scan(&content, &mut stream);

    if let Err(error) = result {
        // the reader went away (output piped into head, say); not our problem
        if error.kind() == std::io::ErrorKind::BrokenPipe {
            return;
        }
        eprintln!("{}", problem::concise_output_error(&error));
        std::process::exit(1);
    }
}

fn export(filename: &Path, config: &Path, name: &str, format: Format, output: &Path) {
    if document::is_stdin(filename) {
        eprintln!(
            "{}",
            problem::concise_export_error(&ExportError::StandardInput, filename)
        );
        std::process::exit(1);
    }

    let content = match document::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    let store = load_store(config);
    let profile = match store.resolve(Some(name)) {
        Ok(profile) => profile,
        Err(error) => {
            eprintln!("{}", problem::concise_config_error(&error));
            std::process::exit(1);
        }
    };
    info!(profile = %profile.name, "Exporting {}", filename.display());

    let base = document::base_directory(filename);
    let title = document::title(filename, &content);

    let export = Export::new(profile, external::dependencies(), format, &base);
    match export.run(&title, &content, output) {
        Ok(()) => {
            println!("{} {}", "Wrote".bright_green(), output.display());
        }
        Err(error) => {
            eprintln!("{}", problem::concise_export_error(&error, filename));
            std::process::exit(1);
        }
    }
}

fn check(dependencies: &Dependencies) {
    for probe in dependencies.probes() {
        match probe.program() {
            Some(program) => println!(
                "{:14} {} ({})",
                probe.name(),
                "found".bright_green(),
                program
            ),
            None => println!("{:14} {}", probe.name(), "not found".bright_red()),
        }
    }

    let protocol = sizing::detect_capability(|name| std::env::var(name).ok());
    println!();
    println!("terminal graphics: {}", protocol.describe());

    let usable = protocol == Protocol::Inline
        || dependencies
            .kitty
            .is_available()
        || dependencies
            .sixel
            .is_available();

    if !usable {
        eprintln!(
            "{}: no terminal graphics backend is available; install kitten or img2sixel",
            "error".bright_red()
        );
        std::process::exit(1);
    }
}

fn profiles(config: &Path, init: bool) {
    if init {
        match profile::save_to(&defaults::builtin(), config) {
            Ok(()) => println!("{} {}", "Wrote default profiles to".bright_green(), config.display()),
            Err(error) => {
                eprintln!("{}", problem::concise_config_error(&error));
                std::process::exit(1);
            }
        }
        return;
    }

    let store = load_store(config);
    for name in store.names() {
        let marker = if name == store.default_profile { "*" } else { " " };
        if let Some(profile) = store
            .profiles
            .get(&name)
        {
            println!("{} {:10} {}", marker, name, profile.target.describe());
        }
    }
}

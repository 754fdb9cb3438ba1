//! Detecting which optional external tools are installed
//!
//! Each tool gets a Probe. The first call to is_available() runs the check
//! and caches the answer for the rest of the process; OnceLock makes that
//! first check single-flight if several threads race to it. A Probe also
//! remembers whether the "not installed" warning for its tool has already
//! been shown, so that a document with fifty diagrams warns once, not fifty
//! times.

use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing::{debug, warn};

type Check = Box<dyn Fn() -> Option<String> + Send + Sync>;

pub struct Probe {
    name: &'static str,
    check: Check,
    found: OnceLock<Option<String>>,
    warned: AtomicBool,
}

impl Probe {
    /// A probe with an arbitrary check, which returns the program to invoke
    /// if the tool is present.
    pub fn new(name: &'static str, check: impl Fn() -> Option<String> + Send + Sync + 'static) -> Probe {
        Probe {
            name,
            check: Box::new(check),
            found: OnceLock::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// A probe that looks on the PATH for the first of the candidate
    /// programs, answering with where it was found.
    pub fn search(name: &'static str, candidates: &'static [&'static str]) -> Probe {
        Probe::new(name, move || {
            candidates
                .iter()
                .find_map(|program| which::which(program).ok())
                .map(|path| {
                    path.to_string_lossy()
                        .into_owned()
                })
        })
    }

    /// A probe with a predetermined answer.
    pub fn fixed(name: &'static str, program: Option<&str>) -> Probe {
        let program = program.map(str::to_string);
        Probe::new(name, move || program.clone())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The program to run, if the tool is installed.
    pub fn program(&self) -> Option<&str> {
        self.found
            .get_or_init(|| {
                let found = (self.check)();
                debug!(tool = self.name, ?found, "Probed for external tool");
                found
            })
            .as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.program()
            .is_some()
    }

    /// Show a warning about this tool, unless one already has been. Returns
    /// whether the warning was shown.
    pub fn warn_once(&self, message: &str) -> bool {
        if self
            .warned
            .swap(true, Ordering::SeqCst)
        {
            return false;
        }
        warn!(tool = self.name, "{}", message);
        eprintln!("{}: {}", "warning".bright_yellow(), message);
        true
    }

    /// Forget the cached answer and the warned flag.
    pub fn reset(&mut self) {
        self.found.take();
        *self
            .warned
            .get_mut() = false;
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("found", &self.found.get())
            .finish()
    }
}

/// The external tools this program knows how to use.
#[derive(Debug)]
pub struct Dependencies {
    /// Diagram compiler, mermaid-cli.
    pub diagram: Probe,
    /// SVG to PNG rasterizer.
    pub rasterizer: Probe,
    /// Helper speaking the kitty graphics protocol.
    pub kitty: Probe,
    /// Sixel encoder.
    pub sixel: Probe,
    /// Headless browser, for PDF output.
    pub browser: Probe,
    /// Document converter, for DOCX output.
    pub converter: Probe,
}

impl Dependencies {
    /// Probes that look for the real programs on this system.
    pub fn system() -> Dependencies {
        Dependencies {
            diagram: Probe::search("mmdc", &["mmdc"]),
            rasterizer: Probe::search("rsvg-convert", &["rsvg-convert"]),
            kitty: Probe::search("kitten", &["kitten"]),
            sixel: Probe::search("img2sixel", &["img2sixel"]),
            browser: Probe::search(
                "chromium",
                &[
                    "chromium",
                    "chromium-browser",
                    "google-chrome",
                    "google-chrome-stable",
                ],
            ),
            converter: Probe::search("pandoc", &["pandoc"]),
        }
    }

    /// Probes with fixed answers; every tool present (by its usual program
    /// name) or every tool absent.
    pub fn assume(present: bool) -> Dependencies {
        let probe = |name: &'static str| Probe::fixed(name, if present { Some(name) } else { None });
        Dependencies {
            diagram: probe("mmdc"),
            rasterizer: probe("rsvg-convert"),
            kitty: probe("kitten"),
            sixel: probe("img2sixel"),
            browser: probe("chromium"),
            converter: probe("pandoc"),
        }
    }

    pub fn probes(&self) -> [&Probe; 6] {
        [
            &self.diagram,
            &self.rasterizer,
            &self.kitty,
            &self.sixel,
            &self.browser,
            &self.converter,
        ]
    }

    pub fn reset(&mut self) {
        self.diagram.reset();
        self.rasterizer.reset();
        self.kitty.reset();
        self.sixel.reset();
        self.browser.reset();
        self.converter.reset();
    }
}

/// The process-wide set of probes for the real system.
pub fn dependencies() -> &'static Dependencies {
    static DEPENDENCIES: OnceLock<Dependencies> = OnceLock::new();
    DEPENDENCIES.get_or_init(Dependencies::system)
}

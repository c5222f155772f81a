//! Centralized shell output.
//!
//! The Shell is the single observer handle for user-facing output. It is
//! passed explicitly into composition, resolution, and emission so those
//! engines stay testable without stdout coupling.
//!
//! Commands never manage formatting directly - Shell handles status
//! alignment, colors, and verbosity.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: debug detail
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Semantic status for output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Created,
    Finished,
    Composing,
    Resolving,
    Fetching,
    Linking,
    Generating,
    Building,
    Checking,
    Running,
    Cleaned,
    Skipped,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Finished => "Finished",
            Status::Composing => "Composing",
            Status::Resolving => "Resolving",
            Status::Fetching => "Fetching",
            Status::Linking => "Linking",
            Status::Generating => "Generating",
            Status::Building => "Building",
            Status::Checking => "Checking",
            Status::Running => "Running",
            Status::Cleaned => "Cleaned",
            Status::Skipped => "Skipped",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Created | Status::Finished | Status::Cleaned => "\x1b[1;32m",
            Status::Composing
            | Status::Resolving
            | Status::Fetching
            | Status::Linking
            | Status::Generating
            | Status::Building
            | Status::Checking
            | Status::Running => "\x1b[1;36m",
            Status::Skipped => "\x1b[1;33m",
        }
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    warnings: AtomicUsize,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            warnings: AtomicUsize::new(0),
        }
    }

    /// A quiet shell for tests and nested invocations.
    pub fn silent() -> Self {
        Shell {
            verbosity: Verbosity::Quiet,
            use_color: false,
            warnings: AtomicUsize::new(0),
        }
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Number of warnings emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }

    /// Print a status line (`    Status message`).
    pub fn status(&self, status: Status, message: impl Display) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        let text = status.as_str();
        if self.use_color {
            eprintln!("{}{:>12}\x1b[0m {}", status.color_code(), text, message);
        } else {
            eprintln!("{:>12} {}", text, message);
        }
    }

    /// Print a warning. Always counted, printed unless quiet.
    pub fn warn(&self, message: impl Display) {
        self.warnings.fetch_add(1, Ordering::SeqCst);
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        if self.use_color {
            eprintln!("\x1b[1;33mwarning\x1b[0m: {}", message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Print an error. Always printed.
    pub fn error(&self, message: impl Display) {
        if self.use_color {
            eprintln!("\x1b[1;31merror\x1b[0m: {}", message);
        } else {
            eprintln!("error: {}", message);
        }
    }

    /// Print a verbose-only detail line.
    pub fn verbose(&self, message: impl Display) {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("{}", message);
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

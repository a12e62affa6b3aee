// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Console output levels and logging macros for the CLI.

use std::sync::atomic::{AtomicU8, Ordering};

/// How much the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Verbosity {
    /// Only results, warnings and errors.
    Quiet = 0,
    /// Section headers, configuration and timing.
    Normal = 1,
    /// Additionally per-joint and per-cell detail.
    Verbose = 2,
}

impl Verbosity {
    /// Pick the level from the `--quiet` and `--verbose` flags. `quiet` wins.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Quiet,
            1 => Self::Normal,
            _ => Self::Verbose,
        }
    }
}

/// Global output level.
static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// Set the global output level.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Current global output level.
#[must_use]
pub fn verbosity() -> Verbosity {
    Verbosity::from_u8(VERBOSITY.load(Ordering::Relaxed))
}

/// Check if output at `level` should be printed.
#[must_use]
pub fn enabled(level: Verbosity) -> bool {
    verbosity() >= level
}

/// Macro for standard info messages, hidden in quiet mode.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::cli::logging::enabled($crate::cli::logging::Verbosity::Normal) {
            println!("{}", format!($($arg)*));
        }
    }
}

/// Macro for warning messages.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "WARNING ⚠️".yellow().bold(), format!($($arg)*));
    }}
}

/// Macro for error messages.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "Error:".red().bold(), format!($($arg)*));
    }}
}

/// Macro for detail only shown with `--verbose`.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::cli::logging::enabled($crate::cli::logging::Verbosity::Verbose) {
            println!("{}", format!($($arg)*));
        }
    }
}

/// Macro for section headers.
#[macro_export]
macro_rules! section {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        if $crate::cli::logging::enabled($crate::cli::logging::Verbosity::Normal) {
            println!();
            println!("{}", format!($($arg)*).cyan().bold());
        }
    }}
}

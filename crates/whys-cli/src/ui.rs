//! Terminal presentation preferences, resolved once at startup.
//!
//! Table color is on only for an interactive stdout in table mode, and is
//! off under `--quiet` or `NO_COLOR`. `COLUMNS` below 40 is ignored.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    /// Color session status words in table output.
    pub table_color: bool,
    /// Width that wide table values are truncated to.
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

/// Record preferences for this process. Later calls are ignored.
pub fn init(flags: &GlobalFlags) {
    let table_color = std::io::stdout().is_terminal()
        && flags.format == OutputFormat::Table
        && !flags.quiet
        && std::env::var_os("NO_COLOR").is_none();

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    let _ = UI_PREFS.set(UiPrefs {
        table_color,
        term_width,
    });
}

/// Preferences from [`init`], or plain output if it never ran.
#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        term_width: None,
    })
}

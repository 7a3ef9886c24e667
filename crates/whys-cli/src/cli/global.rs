//! Flags shared by every `whys` subcommand.

use clap::ValueEnum;

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed response JSON.
    Json,
    /// Key/value table, nested fields flattened to dotted keys.
    Table,
    /// Compact single-line JSON for piping.
    Raw,
}

/// Global flags, accepted before or after the subcommand.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub project: Option<String>,
}

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Start an interrogation and print the first question.
    Start(StartArgs),
    /// Answer the pending question of a session.
    Answer(AnswerArgs),
    /// Ask the next question, or synthesize the root cause after five answers.
    Next(SessionArgs),
    /// Synthesize the root cause of a fully answered session.
    Complete(SessionArgs),
    /// Show a session's progress.
    Show(ShowArgs),
    /// List recent sessions.
    List(ListArgs),
    /// Delete expired sessions.
    Purge,
    /// Run a whole interrogation interactively over stdin.
    Run(RunArgs),
}

#[derive(Clone, Debug, Args)]
pub struct StartArgs {
    /// Problem statement to investigate.
    pub problem: String,
}

#[derive(Clone, Debug, Args)]
pub struct AnswerArgs {
    /// Session ID (rca-...).
    pub id: String,
    /// Answer text.
    pub text: String,
}

#[derive(Clone, Debug, Args)]
pub struct SessionArgs {
    /// Session ID (rca-...).
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Session ID (rca-...).
    pub id: String,

    /// Print the full transcript instead of the summary counts.
    #[arg(long)]
    pub full: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Max sessions to return.
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Problem statement; read from stdin when omitted.
    pub problem: Option<String>,

    /// Keep the session in memory only (no database, no trail).
    #[arg(long)]
    pub ephemeral: bool,
}

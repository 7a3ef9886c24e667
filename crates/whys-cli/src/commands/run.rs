//! `whys run`: the whole interrogation in one process, questions on stderr
//! and answers from stdin.

use std::io::Write;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use whys_config::WhysConfig;
use whys_core::entities::{RootCauseResult, SessionSnapshot};
use whys_core::responses::CompleteResponse;
use whys_engine::{
    Advance, CausalEngine, EngineError, Generator, MemoryStore, MetricsSnapshot, SessionStore,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::commands::shared::{notify_completion, snapshot};
use crate::context::{AppContext, build_engine, session_ttl};
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub session: SessionSnapshot,
    pub root_cause: RootCauseResult,
    /// Process counters after the run.
    pub metrics: MetricsSnapshot,
}

/// Handle `whys run` against the project database.
pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    finish(&ctx.engine, args, ctx.callback_url(), flags).await
}

/// Handle `whys run --ephemeral`: an in-memory store and no trail.
pub async fn handle_ephemeral(
    args: &RunArgs,
    config: &WhysConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let engine = build_engine(config, MemoryStore::new(session_ttl(config)))?;
    finish(&engine, args, config.general.callback(), flags).await
}

async fn finish<G: Generator, S: SessionStore>(
    engine: &CausalEngine<G, S>,
    args: &RunArgs,
    callback_url: Option<&str>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let response = interrogate(engine, args.problem.clone(), stdin, std::io::stderr()).await?;
    let payload = CompleteResponse {
        session: response.session.clone(),
        root_cause: response.root_cause.clone(),
    };
    notify_completion(callback_url, &payload).await;
    output(&response, flags.format)
}

/// Drive one session to completion. Questions and prompts go to `out`;
/// blank answers are re-prompted.
pub async fn interrogate<G, S, R, W>(
    engine: &CausalEngine<G, S>,
    problem: Option<String>,
    input: R,
    mut out: W,
) -> anyhow::Result<RunResponse>
where
    G: Generator,
    S: SessionStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    let problem = if let Some(problem) = problem {
        problem
    } else {
        write!(out, "Problem: ")?;
        out.flush()?;
        lines
            .next_line()
            .await?
            .ok_or_else(|| anyhow::anyhow!("no problem statement given"))?
    };

    let (session, mut question) = engine.start(&problem).await?;
    let id = session.id;
    writeln!(out, "Session {id}")?;

    loop {
        writeln!(out, "\nQ{}: {}", question.index, question.text)?;
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                anyhow::bail!("input ended before the interrogation finished (session {id})");
            };
            match engine.submit_answer(&id, &line).await {
                Ok(_) => break,
                Err(EngineError::InvalidInput(message)) => writeln!(out, "{message}")?,
                Err(error) => return Err(error.into()),
            }
        }

        match engine.advance(&id).await? {
            (_, Advance::Question(next)) => question = next,
            (session, Advance::RootCause(root_cause)) => {
                writeln!(out, "\nRoot cause: {}", root_cause.summary)?;
                return Ok(RunResponse {
                    session: snapshot(&session),
                    root_cause,
                    metrics: engine.metrics().snapshot(),
                });
            }
        }
    }
}

use whys_core::responses::AnswerResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnswerArgs;
use crate::commands::shared::snapshot;
use crate::context::AppContext;
use crate::output::output;

/// Handle `whys answer`.
pub async fn handle(args: &AnswerArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.engine.submit_answer(&args.id, &args.text).await?;
    let answer = session
        .latest_answer()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("session {} has no recorded answer", session.id))?;
    output(
        &AnswerResponse {
            session: snapshot(&session),
            answer,
        },
        flags.format,
    )
}

use whys_core::responses::StartResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StartArgs;
use crate::commands::shared::snapshot;
use crate::context::AppContext;
use crate::output::output;

/// Handle `whys start`.
pub async fn handle(args: &StartArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (session, question) = ctx.engine.start(&args.problem).await?;
    output(
        &StartResponse {
            session: snapshot(&session),
            question,
        },
        flags.format,
    )
}

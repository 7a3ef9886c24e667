use chrono::Utc;
use whys_core::responses::CompleteResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SessionArgs;
use crate::commands::shared::{completed_since, notify_completion, snapshot};
use crate::context::AppContext;
use crate::output::output;

/// Handle `whys complete`. Repeating it on a completed session prints the
/// stored result without calling the callback again.
pub async fn handle(args: &SessionArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let started = Utc::now();
    let (session, root_cause) = ctx.engine.finalize(&args.id).await?;
    let response = CompleteResponse {
        session: snapshot(&session),
        root_cause,
    };
    if completed_since(&session, started) {
        notify_completion(ctx.callback_url(), &response).await;
    }
    output(&response, flags.format)
}

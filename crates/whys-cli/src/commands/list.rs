use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::context::AppContext;
use crate::output::output;

const DEFAULT_LIST_LIMIT: u32 = 20;

/// Handle `whys list`.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let sessions = ctx
        .db()
        .list_sessions(args.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;
    output(&sessions, flags.format)
}

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PurgeResponse {
    removed: u64,
}

/// Handle `whys purge`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let removed = ctx.db().purge_expired().await?;
    output(&PurgeResponse { removed }, flags.format)
}

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ShowArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `whys show`.
pub async fn handle(args: &ShowArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.full {
        let session = ctx.engine.session(&args.id).await?;
        return output(&session, flags.format);
    }
    let snapshot = ctx.engine.snapshot(&args.id).await?;
    output(&snapshot, flags.format)
}

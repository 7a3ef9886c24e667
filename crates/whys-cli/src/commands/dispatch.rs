use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Start(args) => commands::start::handle(&args, ctx, flags).await,
        Commands::Answer(args) => commands::answer::handle(&args, ctx, flags).await,
        Commands::Next(args) => commands::next::handle(&args, ctx, flags).await,
        Commands::Complete(args) => commands::complete::handle(&args, ctx, flags).await,
        Commands::Show(args) => commands::show::handle(&args, ctx, flags).await,
        Commands::List(args) => commands::list::handle(&args, ctx, flags).await,
        Commands::Purge => commands::purge::handle(ctx, flags).await,
        Commands::Run(args) => commands::run::handle(&args, ctx, flags).await,
    }
}

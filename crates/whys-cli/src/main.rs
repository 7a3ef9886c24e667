use clap::Parser;

mod bootstrap;
mod callback;
mod cli;
mod commands;
mod context;
mod error;
mod output;
mod ui;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error::report(&error);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let project_root = context::resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;
    context::warn_unconfigured(&config);

    match &cli.command {
        cli::Commands::Run(args) if args.ephemeral => {
            return commands::run::handle_ephemeral(args, &config, &flags).await;
        }
        _ => {}
    }

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(write_lock::acquire_for_project(&project_root).await?)
    } else {
        None
    };

    let ctx = context::AppContext::init(project_root, config).await?;
    let result = commands::dispatch::dispatch(command, &ctx, &flags).await;
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("WHYS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

const fn command_requires_write_lock(command: &cli::Commands) -> bool {
    match command {
        cli::Commands::Show(_) | cli::Commands::List(_) => false,
        cli::Commands::Start(_)
        | cli::Commands::Answer(_)
        | cli::Commands::Next(_)
        | cli::Commands::Complete(_)
        | cli::Commands::Purge
        | cli::Commands::Run(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::command_requires_write_lock;
    use crate::cli::Cli;

    fn requires_lock(args: &[&str]) -> bool {
        let cli = Cli::try_parse_from(args).expect("cli should parse");
        command_requires_write_lock(&cli.command)
    }

    #[test]
    fn reads_do_not_lock() {
        assert!(!requires_lock(&["whys", "show", "rca-1"]));
        assert!(!requires_lock(&["whys", "list"]));
    }

    #[test]
    fn mutations_lock() {
        assert!(requires_lock(&["whys", "start", "Checkout is slow"]));
        assert!(requires_lock(&["whys", "answer", "rca-1", "the pool"]));
        assert!(requires_lock(&["whys", "next", "rca-1"]));
        assert!(requires_lock(&["whys", "complete", "rca-1"]));
        assert!(requires_lock(&["whys", "purge"]));
    }
}

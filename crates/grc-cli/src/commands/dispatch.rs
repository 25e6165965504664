use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Discover(args) => commands::discover::handle(&args, ctx, flags).await,
        Commands::Endpoints => commands::endpoints::handle(ctx, flags).await,
        Commands::Validate(args) => commands::validate::handle(&args, ctx, flags).await,
    }
}

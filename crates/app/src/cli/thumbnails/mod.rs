use carlot_app::context::AppContext;
use clap::{Args, Subcommand};

mod regenerate;

#[derive(Debug, Args)]
pub(crate) struct ThumbnailsCommand {
    #[command(subcommand)]
    command: ThumbnailsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ThumbnailsSubcommand {
    Regenerate(regenerate::RegenerateArgs),
}

pub(crate) async fn run(context: &AppContext, command: ThumbnailsCommand) -> Result<(), String> {
    match command.command {
        ThumbnailsSubcommand::Regenerate(args) => regenerate::run(context, args).await,
    }
}

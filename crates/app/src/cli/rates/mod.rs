use carlot_app::context::AppContext;
use clap::{Args, Subcommand};

mod refresh;
mod show;

#[derive(Debug, Args)]
pub(crate) struct RatesCommand {
    #[command(subcommand)]
    command: RatesSubcommand,
}

#[derive(Debug, Subcommand)]
enum RatesSubcommand {
    /// Fetch rates from the provider and persist them
    Refresh,
    /// Print the persisted rate snapshot
    Show,
}

pub(crate) async fn run(context: &AppContext, command: RatesCommand) -> Result<(), String> {
    match command.command {
        RatesSubcommand::Refresh => refresh::run(context).await,
        RatesSubcommand::Show => show::run(context).await,
    }
}

use carlot_app::context::AppContext;
use clap::{Args, Subcommand};

mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CarsCommand {
    #[command(subcommand)]
    command: CarsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CarsSubcommand {
    List(list::ListCarsArgs),
    Show(show::ShowCarArgs),
}

pub(crate) async fn run(context: &AppContext, command: CarsCommand) -> Result<(), String> {
    match command.command {
        CarsSubcommand::List(args) => list::run(context, args).await,
        CarsSubcommand::Show(args) => show::run(context, args).await,
    }
}

use carlot_app::context::AppContext;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate,
}

pub(crate) async fn run(context: &AppContext, command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate => {
            context
                .migrate()
                .await
                .map_err(|error| format!("failed to migrate database: {error}"))?;

            println!("database schema is up to date");

            Ok(())
        }
    }
}

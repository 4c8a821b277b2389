use carlot_app::{config::AppConfig, context::AppContext};
use clap::{Parser, Subcommand};

mod cars;
mod db;
mod rates;
mod thumbnails;

#[derive(Debug, Parser)]
#[command(name = "carlot-app", about = "Carlot CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cars(cars::CarsCommand),
    Rates(rates::RatesCommand),
    Thumbnails(thumbnails::ThumbnailsCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .await
            .map_err(|error| format!("failed to initialise application: {error}"))?;

        match self.command {
            Commands::Cars(command) => cars::run(&context, command).await,
            Commands::Rates(command) => rates::run(&context, command).await,
            Commands::Thumbnails(command) => thumbnails::run(&context, command).await,
            Commands::Db(command) => db::run(&context, command).await,
        }
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to render output: {error}"))?;

    println!("{rendered}");

    Ok(())
}

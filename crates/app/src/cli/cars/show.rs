use carlot_app::{
    context::AppContext,
    domain::cars::{CarsServiceError, records::CarId},
};
use clap::Args;

use crate::cli::print_json;

#[derive(Debug, Args)]
pub(crate) struct ShowCarArgs {
    /// Car id
    id: i64,

    /// Display currency; unsupported codes fall back to the default
    #[arg(long)]
    currency: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: ShowCarArgs) -> Result<(), String> {
    let car = match context.cars.get_car(CarId::from_i64(args.id)).await {
        Ok(car) => car,
        Err(CarsServiceError::NotFound) => return Err(format!("car {} not found", args.id)),
        Err(error) => return Err(format!("failed to load car: {error}")),
    };

    let view = context
        .presenter
        .present_car(&car, args.currency.as_deref())
        .await;

    print_json(&view)
}

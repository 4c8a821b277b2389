use carlot_app::context::AppContext;
use clap::Args;

use crate::cli::print_json;

#[derive(Debug, Args)]
pub(crate) struct ListCarsArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Display currency; unsupported codes fall back to the default
    #[arg(long)]
    currency: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: ListCarsArgs) -> Result<(), String> {
    let page = context
        .cars
        .list_cars(args.page)
        .await
        .map_err(|error| format!("failed to list cars: {error}"))?;

    let view = context
        .presenter
        .present_page(&page, args.currency.as_deref())
        .await;

    print_json(&view)
}

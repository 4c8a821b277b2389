use carlot_app::{context::AppContext, domain::exchange_rates::ExchangeRatesServiceExt};

use crate::cli::print_json;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    // Never fails: provider outages degrade to the stored snapshot.
    let rates = context.exchange_rates.refresh_rates().await;

    print_json(&context.exchange_rates.format_rates_for_frontend(&rates))
}

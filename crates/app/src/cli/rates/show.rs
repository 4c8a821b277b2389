use carlot_app::context::AppContext;

use crate::cli::print_json;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let snapshot = context
        .snapshots
        .load_snapshot()
        .await
        .map_err(|error| format!("failed to load rate snapshot: {error}"))?;

    if snapshot.is_empty() {
        println!("no exchange rates stored yet; run `rates refresh`");

        return Ok(());
    }

    print_json(&snapshot)
}

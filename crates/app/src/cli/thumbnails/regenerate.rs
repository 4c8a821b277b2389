use carlot_app::context::AppContext;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct RegenerateArgs {
    /// Rebuild derivatives for every photo, not only those missing one
    #[arg(long)]
    force: bool,
}

pub(crate) async fn run(context: &AppContext, args: RegenerateArgs) -> Result<(), String> {
    let report = context
        .regenerator
        .regenerate(args.force)
        .await
        .map_err(|error| format!("failed to regenerate thumbnails: {error}"))?;

    println!("processed: {}", report.processed);
    println!("regenerated: {}", report.regenerated);
    println!("missing originals: {}", report.missing);
    println!("failed: {}", report.failed);

    Ok(())
}

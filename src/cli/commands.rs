// src/cli/commands.rs
use crate::cli::error::CliResult;
use crate::infrastructure::di::ServiceContainer;
use std::path::Path;
use tracing::instrument;

#[instrument(skip_all)]
pub fn sync(services: &ServiceContainer) -> CliResult<()> {
    let report = services.sync_service.sync()?;

    if report.fetched == 0 {
        println!("No new links.");
    } else {
        println!(
            "Fetched {} links: {} stored, {} skipped (future-dated), {} failed.",
            report.fetched, report.stored, report.skipped_future, report.failed
        );
    }
    Ok(())
}

#[instrument(skip_all)]
pub fn render(services: &ServiceContainer) -> CliResult<()> {
    services.render_service.render_all()?;
    println!("Site rendered.");
    Ok(())
}

#[instrument(skip_all, fields(file = %file.display(), execute = execute))]
pub fn backfill(services: &ServiceContainer, file: &Path, execute: bool) -> CliResult<()> {
    let snapshot = services.snapshot_repository.load(file)?;
    println!("Loaded {} export records from {}", snapshot.len(), file.display());

    if execute {
        let report = services.backfill_service.apply(&snapshot)?;
        println!(
            "Backfill complete: {} candidates, {} updated, {} unmatched.",
            report.candidates, report.updated, report.unmatched
        );
        return Ok(());
    }

    let candidates = services.backfill_service.preview(&snapshot)?;
    println!("{} links would be updated:", candidates.len());
    for candidate in candidates.iter().take(10) {
        println!("  {}: {}", candidate.hash, candidate.url);
        println!(
            "    current via: {}",
            candidate.current_via.as_deref().unwrap_or("(none)")
        );
        println!("    would set via: {}", candidate.would_set_via);
    }
    if candidates.len() > 10 {
        println!("  ... and {} more", candidates.len() - 10);
    }
    println!("Re-run with --execute to apply.");
    Ok(())
}

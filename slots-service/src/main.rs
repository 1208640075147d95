// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{Context, Result};
use clap::Parser;
use slots_service::{
    Args, ChangeMonitor, DriveResolver, Emitter, OutputFormat, Settings, SnapshotBuilder, Sources,
    logging, table,
};
use slots_sys::{AliasTable, UdevEventFeed};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    logging::init(&settings);

    run(&args, &settings).await
}

async fn run(args: &Args, settings: &Settings) -> Result<()> {
    let aliases = AliasTable::load(&settings.alias_file)
        .with_context(|| format!("Failed to load slot aliases from {:?}", settings.alias_file))?;
    info!(
        "Loaded {} slot aliases from {:?}",
        aliases.len(),
        settings.alias_file
    );

    let sources = Sources::build_default(settings);
    let snapshot = SnapshotBuilder::new(
        aliases,
        sources.registry(),
        DriveResolver::new(sources.health()),
        settings.include_non_aliased,
    );

    if !args.live {
        return report_once(&snapshot, args).await;
    }

    // Subscribe first so events raised while the initial snapshot runs queue up.
    let feed = UdevEventFeed::subscribe()
        .await
        .context("Failed to subscribe to device events")?;

    let mut monitor = ChangeMonitor::new(
        feed,
        snapshot,
        Emitter::stdout(),
        settings.refresh_window(),
    );
    monitor
        .report_all()
        .await
        .context("Initial device snapshot failed")?;
    monitor.run().await?;
    Ok(())
}

async fn report_once(snapshot: &SnapshotBuilder, args: &Args) -> Result<()> {
    let slots = snapshot
        .single_shot(args.exclude_empty)
        .await
        .context("Device enumeration failed")?;

    match args.format {
        OutputFormat::Json => Emitter::stdout().emit(&slots)?,
        OutputFormat::Table => print!("{}", table::render(&slots)),
    }
    Ok(())
}

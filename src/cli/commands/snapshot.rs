//! Snapshot command implementation
//!
//! Captures third-party modules from a real interpreter so they can be
//! listed under `registry.snapshots` in the config.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::infra::introspect::{self, SnapshotProducer};
use crate::infra::registry::{ModuleRegistry, Snapshot};

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Modules to import and record
    #[arg(required = true)]
    pub modules: Vec<String>,

    /// Python executable to introspect with
    #[arg(long, env = "PYHOVER_PYTHON", default_value = "python3")]
    pub python: PathBuf,

    /// Write the snapshot here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Record `_private` members too
    #[arg(long)]
    pub private: bool,

    /// Seconds to wait for the interpreter
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,
}

#[derive(Serialize)]
struct SnapshotResponse {
    status: &'static str,
    path: String,
    modules: usize,
    version: String,
}

pub async fn execute(args: SnapshotArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    let producer = SnapshotProducer::new(&args.python)
        .with_timeout(Duration::from_secs(args.timeout))
        .include_private(args.private);

    let snapshot = match capture(&producer, &args.modules).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            ctx.print_error(&format!("{e:#}"));
            return Ok(());
        }
    };

    let Some(path) = args.output else {
        ctx.print(&snapshot);
        return Ok(());
    };

    let version = snapshot
        .runtime
        .as_ref()
        .map(|runtime| runtime.version.clone())
        .unwrap_or_default();
    let rendered = serde_json::to_string_pretty(&snapshot)?;
    match tokio::fs::write(&path, rendered).await {
        Ok(()) => ctx.print(&SnapshotResponse {
            status: "created",
            path: path.display().to_string(),
            modules: snapshot.modules.len(),
            version,
        }),
        Err(e) => ctx.print_error(&format!("Failed to write {}: {e}", path.display())),
    }
    Ok(())
}

/// Produce a snapshot and make sure the registry accepts it
async fn capture(producer: &SnapshotProducer, modules: &[String]) -> Result<Snapshot> {
    let snapshot = producer.produce(modules).await?;
    let registry = introspect::validate(&snapshot)?;

    let failed: Vec<&str> = snapshot
        .modules
        .iter()
        .filter(|(_, spec)| spec.load_error.is_some())
        .map(|(name, _)| name.as_str())
        .collect();
    if !failed.is_empty() {
        tracing::warn!("Recorded as unloadable: {}", failed.join(", "));
    }
    tracing::info!(
        "Snapshot from {} describes Python {}",
        producer.python().display(),
        registry.runtime().version
    );
    Ok(snapshot)
}

//! Snapshot production from a live interpreter
//!
//! Runs `data/introspect.py` under the given Python executable and parses
//! its stdout as a [`Snapshot`]. The script is fed through stdin so nothing
//! is written to disk.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::SnapshotError;
use crate::infra::registry::{CatalogRegistry, Snapshot};

const INTROSPECT_SCRIPT: &str = include_str!("../../data/introspect.py");

/// Import-time code of arbitrary packages runs inside the child
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

pub struct SnapshotProducer {
    python: PathBuf,
    timeout: Duration,
    include_private: bool,
}

impl SnapshotProducer {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            timeout: DEFAULT_TIMEOUT,
            include_private: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Record `_private` members too
    pub fn include_private(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Import `modules` in the interpreter and capture what it exposes
    pub async fn produce(&self, modules: &[String]) -> Result<Snapshot, SnapshotError> {
        let fail = |e: &dyn std::fmt::Display| SnapshotError::interpreter(&self.python, e);

        tracing::info!(
            "Introspecting {} module(s) with {}",
            modules.len(),
            self.python.display()
        );

        let mut child = Command::new(&self.python)
            .args(["-W", "ignore", "-"])
            .args(self.include_private.then_some("--private"))
            .args(modules)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| fail(&e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| fail(&"Failed to get stdin"))?;
        stdin.write_all(INTROSPECT_SCRIPT.as_bytes()).await?;
        // Closing stdin lets the interpreter start the script
        drop(stdin);

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| fail(&format!("no result within {:?}", self.timeout)))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no diagnostic output");
            return Err(fail(&format!("{}: {}", output.status, reason)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let snapshot = Snapshot::from_json(&self.python.display().to_string(), &stdout)?;
        tracing::debug!("Captured {} module entries", snapshot.modules.len());
        Ok(snapshot)
    }
}

/// Check that `snapshot` layers cleanly over the bundled one
pub fn validate(snapshot: &Snapshot) -> Result<CatalogRegistry, SnapshotError> {
    let mut layered = CatalogRegistry::bundled_snapshot()?;
    layered.merge(snapshot.clone());
    CatalogRegistry::from_snapshot(&layered)
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data sourcers: resolve a job's data source to a working directory.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vg_core::{DataSource, Status, StepStatus};
use vg_terminal::Ui;

/// Timeout for a single git invocation.
pub(crate) const GIT_TIMEOUT: Duration = Duration::from_secs(300);

/// A resolved working directory, plus a temporary root to remove when the
/// job is done.
#[derive(Debug)]
pub struct SourcedData {
    pub dir: PathBuf,
    cleanup: Option<PathBuf>,
}

impl SourcedData {
    /// A directory owned by someone else; nothing to clean up.
    pub fn borrowed(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), cleanup: None }
    }

    /// `dir` lives under `root`, which is removed on cleanup.
    pub fn temporary(root: PathBuf, dir: PathBuf) -> Self {
        Self { dir, cleanup: Some(root) }
    }

    pub async fn cleanup(self) {
        if let Some(root) = self.cleanup {
            debug!(path = %root.display(), "cleaning up downloaded data");
            if let Err(e) = tokio::fs::remove_dir_all(&root).await {
                warn!(path = %root.display(), error = %e, "error cleaning up data");
            }
        }
    }
}

/// Fetches job data for one kind of [`DataSource`].
#[async_trait]
pub trait Sourcer: Send + Sync {
    async fn fetch(
        &self,
        source: &DataSource,
        ui: &dyn Ui,
        cancel: &CancellationToken,
    ) -> Result<SourcedData, Status>;
}

/// Uses the runner's own working directory.
#[derive(Debug, Clone)]
pub struct LocalSourcer {
    dir: PathBuf,
}

impl LocalSourcer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Sourcer for LocalSourcer {
    async fn fetch(
        &self,
        _source: &DataSource,
        _ui: &dyn Ui,
        _cancel: &CancellationToken,
    ) -> Result<SourcedData, Status> {
        Ok(SourcedData::borrowed(self.dir.clone()))
    }
}

/// Clones a git repository into a fresh directory under `root`.
#[derive(Debug, Clone)]
pub struct GitSourcer {
    root: PathBuf,
}

impl Default for GitSourcer {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl GitSourcer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Sourcer for GitSourcer {
    async fn fetch(
        &self,
        source: &DataSource,
        ui: &dyn Ui,
        cancel: &CancellationToken,
    ) -> Result<SourcedData, Status> {
        let DataSource::Git { url, reference, path } = source else {
            return Err(Status::invalid_argument("git sourcer given a non-git data source"));
        };
        let sub = path.as_deref().map(checkout_subdir).transpose()?;
        if let Some(reference) = reference.as_deref().filter(|r| r.starts_with('-')) {
            return Err(Status::invalid_argument(format!("invalid git reference {:?}", reference)));
        }

        let root = self.root.join(format!("vg-git-{}", nanoid::nanoid!(12)));
        let checkout = root.join("repo");
        let mut status = ui.status();
        status.update(&format!("Cloning {}", url));

        let fetched = async {
            let dest = checkout.display().to_string();
            git(&["clone", "--quiet", "--", url, &dest], None, cancel).await?;
            if let Some(reference) = reference {
                status.update(&format!("Checking out {}", reference));
                git(&["checkout", "--quiet", reference], Some(&checkout), cancel).await?;
            }
            Ok::<_, Status>(())
        }
        .await;

        if let Err(e) = fetched {
            status.step(StepStatus::Error, &format!("Failed to fetch {}", url));
            status.close();
            let _ = tokio::fs::remove_dir_all(&root).await;
            return Err(e);
        }
        status.step(StepStatus::Complete, &format!("Fetched {}", url));
        status.close();

        let dir = match sub {
            Some(sub) => checkout.join(sub),
            None => checkout,
        };
        Ok(SourcedData::temporary(root, dir))
    }
}

/// Validate a subdirectory of the checkout: relative, with no `..`.
fn checkout_subdir(sub: &str) -> Result<&Path, Status> {
    let path = Path::new(sub);
    let inside = path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !inside {
        return Err(Status::invalid_argument(format!(
            "git data source path {:?} must stay inside the checkout",
            sub
        )));
    }
    Ok(path)
}

/// Run git with a timeout, failing on a non-zero exit.
async fn git(args: &[&str], dir: Option<&Path>, cancel: &CancellationToken) -> Result<(), Status> {
    let mut cmd = Command::new("git");
    cmd.args(args).env_remove("GIT_DIR").env_remove("GIT_WORK_TREE").kill_on_drop(true);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let label = format!("git {}", args.first().copied().unwrap_or_default());
    debug!(cmd = %label, "running");

    let output = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Status::cancelled(format!("{} cancelled", label))),
        out = tokio::time::timeout(GIT_TIMEOUT, cmd.output()) => out
            .map_err(|_| Status::deadline_exceeded(format!("{} timed out", label)))?
            .map_err(|e| Status::unavailable(format!("{} failed to start: {}", label, e)))?,
    };
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Status::unavailable(format!("{} failed: {}", label, stderr.trim())));
    }
    Ok(())
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

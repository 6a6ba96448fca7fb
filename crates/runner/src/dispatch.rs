// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation dispatch: run a job's operation against its working directory.

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use vg_core::{
    AuthResult, DocsEntry, DocsResult, InitResult, Job, JobResult, Operation, RunResult, Status,
    StepStatus, TableRow,
};
use vg_terminal::{OutputOpts, Ui};

/// Everything an operation runs with.
#[derive(Clone)]
pub struct ExecContext {
    pub job: Job,
    pub ui: Arc<dyn Ui>,
    /// Absolute working directory resolved from the job's data source.
    pub workdir: PathBuf,
    /// Cancelled when the server cancels the job or the caller gives up.
    pub cancel: CancellationToken,
}

#[async_trait]
pub trait OperationDispatcher: Send + Sync {
    async fn execute(&self, ctx: ExecContext) -> Result<JobResult, Status>;
}

/// Operations the runner supports, with a one-line description each.
const OPERATIONS: &[(&str, &str)] = &[
    ("noop", "Do nothing; exercises the job pipeline"),
    ("init", "Create the project data directory"),
    ("run", "Run a command in the job's working directory"),
    ("auth", "Check authentication for each component"),
    ("docs", "List supported operations"),
];

/// Name of the project data directory created by `init`.
pub(crate) const DATA_DIR: &str = ".vagrant";

/// Dispatches the built-in operations.
#[derive(Default, Clone)]
pub struct BuiltinDispatcher {
    noop_gate: Option<CancellationToken>,
}

impl BuiltinDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `Noop` block until `gate` is cancelled (or the job is).
    pub fn with_noop_gate(mut self, gate: CancellationToken) -> Self {
        self.noop_gate = Some(gate);
        self
    }

    async fn noop(&self, ctx: &ExecContext) -> Result<JobResult, Status> {
        if let Some(gate) = &self.noop_gate {
            tokio::select! {
                _ = gate.cancelled() => {}
                _ = ctx.cancel.cancelled() => return Err(Status::cancelled("context canceled")),
            }
        }
        debug!("noop job success");
        Ok(JobResult::Noop)
    }

    async fn init(&self, ctx: &ExecContext) -> Result<JobResult, Status> {
        let data_dir = ctx.workdir.join(DATA_DIR);
        tokio::fs::create_dir_all(&data_dir).await.map_err(|e| {
            Status::internal(format!("creating {}: {}", data_dir.display(), e))
        })?;
        ctx.ui.output(
            &format!("Initialized project data in {}", data_dir.display()),
            OutputOpts::style(vg_core::LineStyle::Success),
        );
        Ok(JobResult::Init(InitResult { data_dir }))
    }

    async fn run(&self, ctx: &ExecContext, command: &str, args: &[String]) -> Result<JobResult, Status> {
        let writers = ctx.ui.output_writers()?;
        let mut child = Command::new(command)
            .args(args)
            .current_dir(&ctx.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    Status::not_found(format!("command not found: {}", command))
                }
                _ => Status::internal(format!("starting {}: {}", command, e)),
            })?;
        info!(command, pid = child.id(), "command started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let copy = async move {
            tokio::join!(copy_output(stdout, writers.stdout), copy_output(stderr, writers.stderr))
        };

        let waited = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => None,
            (_, status) = async { tokio::join!(copy, child.wait()) } => Some(status),
        };
        let Some(status) = waited else {
            let _ = child.kill().await;
            return Err(Status::cancelled("command cancelled"));
        };
        let status =
            status.map_err(|e| Status::internal(format!("waiting for {}: {}", command, e)))?;
        let exit_code = status.code().unwrap_or(-1);
        info!(command, exit_code, "command finished");
        Ok(JobResult::Run(RunResult { exit_code }))
    }

    async fn auth(&self, ctx: &ExecContext, components: &[String]) -> Result<JobResult, Status> {
        let group = ctx.ui.step_group();
        let mut results = Vec::with_capacity(components.len());
        for component in components {
            let mut step = group.add(&format!("Checking {}", component));
            step.update(&format!("{} is authenticated", component));
            step.status(StepStatus::Complete);
            step.done();
            results.push((component.clone(), true));
        }
        group.wait().await;
        if results.is_empty() {
            ctx.ui.output("No components to authenticate", OutputOpts::info());
        }
        Ok(JobResult::Auth(AuthResult { results }))
    }

    async fn docs(&self, ctx: &ExecContext) -> Result<JobResult, Status> {
        let headers = vec!["Operation".to_string(), "Description".to_string()];
        let rows: Vec<TableRow> =
            OPERATIONS.iter().map(|(name, desc)| [*name, *desc].into_iter().collect()).collect();
        ctx.ui.table(&headers, &rows);
        let operations = OPERATIONS
            .iter()
            .map(|(name, desc)| DocsEntry { name: name.to_string(), description: desc.to_string() })
            .collect();
        Ok(JobResult::Docs(DocsResult { operations }))
    }
}

#[async_trait]
impl OperationDispatcher for BuiltinDispatcher {
    async fn execute(&self, ctx: ExecContext) -> Result<JobResult, Status> {
        info!(operation = ctx.job.operation.name(), "executing operation");
        let result = match &ctx.job.operation {
            Operation::Noop => self.noop(&ctx).await,
            Operation::Init => self.init(&ctx).await,
            Operation::Run { command, args } => self.run(&ctx, command, args).await,
            Operation::Auth { components } => self.auth(&ctx, components).await,
            Operation::Docs => self.docs(&ctx).await,
        };
        result.map_err(|e| e.context(ctx.job.operation.name()))
    }
}

/// Forward a child pipe into a UI writer until EOF.
///
/// Write errors (the UI went away) are ignored so the child never blocks
/// on a full pipe.
async fn copy_output<R: AsyncRead + Unpin>(reader: Option<R>, mut writer: Box<dyn Write + Send>) {
    let Some(mut reader) = reader else { return };
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let _ = writer.write_all(&buf[..n]);
            }
        }
    }
    let _ = writer.flush();
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;

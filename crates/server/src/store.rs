// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store state and its transitions.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use vg_core::{
    ConfigVar, Job, JobId, JobResult, JobState, RunnerConfig, RunnerId, RunnerInfo, Status,
    TerminalEvent,
};

/// A running job that goes this long without a heartbeat is failed.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(120);

/// Finished jobs kept for late stream subscribers; older ones are pruned.
pub const MAX_FINISHED_JOBS: usize = 50;

struct JobRecord {
    job: Job,
    state: JobState,
    expires_at: Option<Instant>,
    /// Number of cancel requests received while the job was running.
    cancel_requests: u32,
    output: Vec<TerminalEvent>,
    result: Option<JobResult>,
    error: Option<Status>,
    heartbeats: u64,
    heartbeat_deadline: Option<Instant>,
}

impl JobRecord {
    fn finish(&mut self, result: Option<JobResult>, error: Option<Status>) {
        self.state = if error.is_some() { JobState::Error } else { JobState::Success };
        self.result = result;
        self.error = error;
    }
}

#[derive(Default)]
struct State {
    jobs: HashMap<JobId, JobRecord>,
    queue: VecDeque<JobId>,
    runners: HashMap<RunnerId, RunnerInfo>,
    config: Vec<ConfigVar>,
    /// Finished job ids, oldest first.
    finished: VecDeque<JobId>,
}

impl State {
    /// Record `id` as finished and drop the oldest finished jobs past the cap.
    fn retire(&mut self, id: &JobId) {
        self.finished.push_back(id.clone());
        while self.finished.len() > MAX_FINISHED_JOBS {
            if let Some(old) = self.finished.pop_front() {
                self.jobs.remove(&old);
                debug!(job_id = %old, "pruned finished job");
            }
        }
    }
}

/// Point-in-time view of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub job: Job,
    pub state: JobState,
    pub canceling: bool,
    pub result: Option<JobResult>,
    pub error: Option<Status>,
    pub output: Vec<TerminalEvent>,
    pub heartbeats: u64,
}

/// What a job stream subscriber has not seen yet.
pub(crate) struct JobDelta {
    pub state: JobState,
    pub canceling: bool,
    pub events: Vec<TerminalEvent>,
}

pub(crate) enum AckOutcome {
    Running,
    /// Cancelled between assignment and ack.
    Cancelled,
}

struct Inner {
    state: Mutex<State>,
    changed: watch::Sender<u64>,
    heartbeat_timeout: Duration,
}

/// Shared job store. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct JobStore {
    inner: Arc<Inner>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore {
    pub fn new() -> Self {
        Self::with_heartbeat_timeout(HEARTBEAT_TIMEOUT)
    }

    pub fn with_heartbeat_timeout(heartbeat_timeout: Duration) -> Self {
        let (changed, _) = watch::channel(0);
        let inner = Inner { state: Mutex::new(State::default()), changed, heartbeat_timeout };
        Self { inner: Arc::new(inner) }
    }

    /// Receiver that wakes on every state change.
    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changed.subscribe()
    }

    fn notify(&self) {
        self.inner.changed.send_modify(|v| *v = v.wrapping_add(1));
    }

    pub fn job(&self, id: &JobId) -> Option<JobSnapshot> {
        let state = self.inner.state.lock();
        state.jobs.get(id).map(|r| JobSnapshot {
            job: r.job.clone(),
            state: r.state,
            canceling: r.cancel_requests > 0,
            result: r.result.clone(),
            error: r.error.clone(),
            output: r.output.clone(),
            heartbeats: r.heartbeats,
        })
    }

    pub fn queue(&self, mut job: Job, expires_in: Option<Duration>) -> Result<JobId, Status> {
        let id = {
            let mut state = self.inner.state.lock();
            if job.id.is_empty() {
                job.id = JobId::new();
            } else if state.jobs.contains_key(&job.id) {
                return Err(Status::invalid_argument(format!("job {} already exists", job.id)));
            }
            let id = job.id.clone();
            let record = JobRecord {
                job,
                state: JobState::Queued,
                expires_at: expires_in.map(|d| Instant::now() + d),
                cancel_requests: 0,
                output: Vec::new(),
                result: None,
                error: None,
                heartbeats: 0,
                heartbeat_deadline: None,
            };
            state.jobs.insert(id.clone(), record);
            state.queue.push_back(id.clone());
            id
        };
        info!(job_id = %id, "job queued");

        if let Some(after) = expires_in {
            let store = self.clone();
            let id = id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                store.expire(&id);
            });
        }
        self.notify();
        Ok(id)
    }

    /// Fail a job that is still queued past its expiry.
    pub(crate) fn expire(&self, id: &JobId) {
        let mut state = self.inner.state.lock();
        let expired = match state.jobs.get_mut(id) {
            Some(r) if r.state == JobState::Queued => {
                r.finish(None, Some(Status::deadline_exceeded("job expired while queued")));
                true
            }
            _ => false,
        };
        if expired {
            state.queue.retain(|q| q != id);
            state.retire(id);
            drop(state);
            info!(job_id = %id, "queued job expired");
            self.notify();
        }
    }

    pub fn cancel(&self, id: &JobId) -> Result<(), Status> {
        let mut state = self.inner.state.lock();
        let record =
            state.jobs.get_mut(id).ok_or_else(|| Status::not_found(format!("job {}", id)))?;
        match record.state {
            JobState::Queued | JobState::Waiting => {
                record.finish(None, Some(Status::cancelled("job cancelled")));
                state.queue.retain(|q| q != id);
                state.retire(id);
                info!(job_id = %id, "job cancelled before start");
            }
            JobState::Running => {
                record.cancel_requests += 1;
                info!(job_id = %id, requests = record.cancel_requests, "job cancel requested");
            }
            JobState::Success | JobState::Error => {
                debug!(job_id = %id, "cancel on finished job ignored");
                return Ok(());
            }
        }
        drop(state);
        self.notify();
        Ok(())
    }

    pub fn register_runner(&self, info: RunnerInfo) {
        info!(runner_id = %info.id, by_id_only = info.by_id_only, "runner registered");
        self.inner.state.lock().runners.insert(info.id.clone(), info);
        self.notify();
    }

    pub fn deregister_runner(&self, id: &RunnerId) {
        if self.inner.state.lock().runners.remove(id).is_some() {
            info!(runner_id = %id, "runner deregistered");
        }
    }

    pub(crate) fn runner(&self, id: &RunnerId) -> Option<RunnerInfo> {
        self.inner.state.lock().runners.get(id).cloned()
    }

    /// Config vars visible to `runner`, in insertion order.
    pub fn config_for(&self, runner: &RunnerId) -> RunnerConfig {
        let state = self.inner.state.lock();
        RunnerConfig::new(state.config.iter().filter(|v| v.applies_to(runner)).cloned().collect())
    }

    /// Upsert vars keyed by name and runner scope.
    pub fn set_config(&self, vars: Vec<ConfigVar>) {
        let mut state = self.inner.state.lock();
        for var in vars {
            match state.config.iter_mut().find(|v| v.name == var.name && v.runner == var.runner) {
                Some(existing) => existing.value = var.value,
                None => state.config.push(var),
            }
        }
        drop(state);
        self.notify();
    }

    /// Take the first queued job `runner` may run, marking it `Waiting`.
    pub(crate) fn try_assign(&self, runner: &RunnerInfo) -> Option<Job> {
        let now = Instant::now();
        let mut state = self.inner.state.lock();
        let State { jobs, queue, .. } = &mut *state;
        let mut expired = Vec::new();
        let mut picked = None;
        for (pos, id) in queue.iter().enumerate() {
            let Some(record) = jobs.get_mut(id) else { continue };
            if record.expires_at.is_some_and(|at| at <= now) {
                expired.push(id.clone());
                continue;
            }
            if record.job.target_runner.matches(&runner.id, runner.by_id_only) {
                record.state = JobState::Waiting;
                picked = Some((pos, record.job.clone()));
                break;
            }
        }
        let picked = picked.map(|(pos, job)| {
            queue.remove(pos);
            job
        });
        drop(state);
        for id in &expired {
            self.expire(id);
        }
        if let Some(job) = &picked {
            info!(job_id = %job.id, runner_id = %runner.id, "job assigned");
            self.notify();
        }
        picked
    }

    pub(crate) fn ack(&self, id: &JobId) -> AckOutcome {
        let mut state = self.inner.state.lock();
        let outcome = match state.jobs.get_mut(id) {
            Some(r) if r.state == JobState::Waiting => {
                r.state = JobState::Running;
                r.heartbeat_deadline = Some(Instant::now() + self.inner.heartbeat_timeout);
                AckOutcome::Running
            }
            _ => AckOutcome::Cancelled,
        };
        drop(state);
        self.notify();
        outcome
    }

    /// Put an assigned job back at the head of the queue.
    pub(crate) fn requeue(&self, id: &JobId) {
        let mut state = self.inner.state.lock();
        let requeued = match state.jobs.get_mut(id) {
            Some(r) if matches!(r.state, JobState::Waiting | JobState::Running) => {
                r.state = JobState::Queued;
                true
            }
            _ => false,
        };
        if requeued {
            state.queue.push_front(id.clone());
            drop(state);
            warn!(job_id = %id, "job returned to queue");
            self.notify();
        }
    }

    pub(crate) fn append_output(&self, id: &JobId, events: Vec<TerminalEvent>) {
        if let Some(r) = self.inner.state.lock().jobs.get_mut(id) {
            r.output.extend(events);
        }
        self.notify();
    }

    pub(crate) fn heartbeat(&self, id: &JobId) {
        if let Some(r) = self.inner.state.lock().jobs.get_mut(id) {
            r.heartbeats += 1;
            if r.state == JobState::Running {
                r.heartbeat_deadline = Some(Instant::now() + self.inner.heartbeat_timeout);
            }
        }
    }

    /// When the running job must next heartbeat by.
    pub(crate) fn heartbeat_deadline(&self, id: &JobId) -> Option<Instant> {
        let state = self.inner.state.lock();
        state.jobs.get(id).filter(|r| r.state == JobState::Running).and_then(|r| r.heartbeat_deadline)
    }

    /// Fail a running job whose heartbeat deadline has passed. Returns
    /// whether the job was failed.
    pub(crate) fn expire_heartbeat(&self, id: &JobId) -> bool {
        let now = Instant::now();
        let mut state = self.inner.state.lock();
        let expired = match state.jobs.get_mut(id) {
            Some(r)
                if r.state == JobState::Running
                    && r.heartbeat_deadline.is_some_and(|at| at <= now) =>
            {
                r.finish(None, Some(Status::deadline_exceeded("job heartbeat timed out")));
                true
            }
            _ => false,
        };
        if expired {
            state.retire(id);
            drop(state);
            warn!(job_id = %id, "job heartbeat timed out");
            self.notify();
        }
        expired
    }

    /// Record the job's outcome. Later outcomes for a finished job are ignored.
    pub(crate) fn finish(&self, id: &JobId, result: Option<JobResult>, error: Option<Status>) {
        let mut state = self.inner.state.lock();
        if let Some(r) = state.jobs.get_mut(id) {
            if r.state.is_terminal() {
                return;
            }
            match &error {
                Some(e) => warn!(job_id = %id, error = %e, "job failed"),
                None => info!(job_id = %id, "job completed"),
            }
            r.finish(result, error);
            state.retire(id);
        }
        drop(state);
        self.notify();
    }

    pub(crate) fn cancel_requests(&self, id: &JobId) -> u32 {
        self.inner.state.lock().jobs.get(id).map(|r| r.cancel_requests).unwrap_or(0)
    }

    /// State plus output after `cursor`.
    pub(crate) fn delta(&self, id: &JobId, cursor: usize) -> Option<JobDelta> {
        let state = self.inner.state.lock();
        state.jobs.get(id).map(|r| JobDelta {
            state: r.state,
            canceling: r.cancel_requests > 0,
            events: r.output.get(cursor..).map(<[_]>::to_vec).unwrap_or_default(),
        })
    }

    pub(crate) fn outcome(&self, id: &JobId) -> (Option<JobResult>, Option<Status>) {
        let state = self.inner.state.lock();
        state.jobs.get(id).map(|r| (r.result.clone(), r.error.clone())).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

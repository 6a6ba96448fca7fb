// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{DataSource, Job, JobId, Operation, RunnerId, RunnerTarget, Scope};

// ── Builders ────────────────────────────────────────────────────────────────

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: JobId = "",
        }
        set {
            scope: Scope = Scope::basis("test"),
            operation: Operation = Operation::Noop,
            data_source: DataSource = DataSource::Local,
            target_runner: RunnerTarget = RunnerTarget::Any,
        }
    }
}

impl JobBuilder {
    pub fn runner(self, id: &RunnerId) -> Self {
        self.target_runner(RunnerTarget::Id(id.clone()))
    }
}

// ── Factory functions ───────────────────────────────────────────────────────

/// A queued no-op job with the given id.
pub fn noop_job(id: &str) -> Job {
    Job::builder().id(id).build()
}

pub fn run_job(command: &str, args: &[&str]) -> Job {
    Job::builder()
        .operation(Operation::Run {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
        .build()
}

// ── Proptest strategies ─────────────────────────────────────────────────────

/// Proptest strategies for wire-visible types.
pub mod strategies {
    use crate::{ConfigVar, LineStyle, StepStatus, TerminalEvent};
    use proptest::prelude::*;

    pub fn arb_line_style() -> impl Strategy<Value = LineStyle> {
        prop_oneof![
            Just(LineStyle::Plain),
            Just(LineStyle::Header),
            Just(LineStyle::Error),
            Just(LineStyle::Warning),
            Just(LineStyle::Info),
            Just(LineStyle::Success),
        ]
    }

    pub fn arb_step_status() -> impl Strategy<Value = StepStatus> {
        prop_oneof![
            Just(StepStatus::Running),
            Just(StepStatus::Complete),
            Just(StepStatus::Error),
            Just(StepStatus::Warning),
            Just(StepStatus::Aborted),
        ]
    }

    /// Events that render without prior state (no steps, no raw writers).
    pub fn arb_stateless_event() -> impl Strategy<Value = TerminalEvent> {
        prop_oneof![
            ("[a-z ]{0,12}", arb_line_style()).prop_map(|(msg, style)| TerminalEvent::Line {
                msg,
                style,
                disable_newline: false,
            }),
            ("[a-z]{1,6}", "[a-z0-9]{0,6}").prop_map(|(name, value)| {
                TerminalEvent::NamedValues { values: vec![crate::NamedValue { name, value }] }
            }),
            proptest::collection::vec("[a-z]{1,4}", 1..3).prop_map(|headers| {
                TerminalEvent::Table { headers, rows: Vec::new() }
            }),
        ]
    }

    /// A config delivery over a small fixed set of names, so successive
    /// deliveries overlap.
    pub fn arb_config_vars() -> impl Strategy<Value = Vec<ConfigVar>> {
        proptest::collection::btree_map(
            prop_oneof![Just("VG_A"), Just("VG_B"), Just("VG_C")],
            "[a-z0-9]{0,3}",
            0..3,
        )
        .prop_map(|m| m.into_iter().map(|(k, v)| ConfigVar::new(k, v)).collect())
    }
}

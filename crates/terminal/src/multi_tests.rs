// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::recording::{RecordingUi, UiAction};

#[test]
fn two_interactive_uis_are_rejected() {
    let uis: Vec<Arc<dyn Ui>> =
        vec![Arc::new(RecordingUi::interactive()), Arc::new(RecordingUi::interactive())];
    assert!(matches!(MultiUi::new(uis), Err(UiError::MultipleInteractive)));
}

#[test]
fn input_goes_to_the_interactive_member() {
    let (a, b) = (RecordingUi::new(), RecordingUi::interactive());
    let multi = MultiUi::new(vec![Arc::new(a.clone()), Arc::new(b.clone())]).unwrap();
    assert!(multi.interactive());
    multi.input("name?").unwrap();
    assert!(a.actions().is_empty());
    assert_eq!(b.actions(), vec![UiAction::Input("name?".into())]);
}

#[test]
fn non_interactive_members_reject_input() {
    let multi = MultiUi::new(vec![Arc::new(RecordingUi::new())]).unwrap();
    assert!(matches!(multi.input("?"), Err(UiError::NonInteractive)));
}

#[tokio::test]
async fn every_action_is_mirrored() {
    let (a, b) = (RecordingUi::new(), RecordingUi::new());
    let multi = MultiUi::new(vec![Arc::new(a.clone()), Arc::new(b.clone())]).unwrap();

    multi.output("hi", OutputOpts::default());
    let mut status = multi.status();
    status.update("busy");
    let group = multi.step_group();
    let mut step = group.add("s");
    step.done();
    group.wait().await;
    multi.output_writers().unwrap().stdout.write_all(b"raw").unwrap();
    multi.close();

    assert_eq!(a.actions(), b.actions());
    assert_eq!(a.actions().len(), 8);
    assert_eq!(a.actions().last(), Some(&UiAction::Close));
}

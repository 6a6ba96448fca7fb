// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vg_core::TableEntry;

#[derive(Clone, Default)]
struct Buf(Arc<Mutex<Vec<u8>>>);

impl Write for Buf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Buf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

fn console() -> (ConsoleUi, Buf, Buf) {
    let (out, err) = (Buf::default(), Buf::default());
    (ConsoleUi::with_writers(Box::new(out.clone()), Box::new(err.clone())), out, err)
}

#[test]
fn header_and_inline_output() {
    let (ui, out, _) = console();
    ui.output("Starting", OutputOpts::header());
    ui.output("a", OutputOpts::default().no_newline());
    ui.output("b", OutputOpts::default());
    assert_eq!(out.text(), "==> Starting\nab\n");
}

#[test]
fn named_values_align_on_colon() {
    let (ui, out, _) = console();
    ui.named_values(&[NamedValue::new("id", "1"), NamedValue::new("state", "ok")]);
    assert_eq!(out.text(), "     id: 1\n  state: ok\n");
}

#[test]
fn table_pads_columns() {
    let (ui, out, _) = console();
    let rows = vec![TableRow { entries: vec![TableEntry::new("noop"), TableEntry::new("x")] }];
    ui.table(&["name".into(), "description".into()], &rows);
    assert_eq!(out.text(), "name  description\nnoop  x\n");
}

#[test]
fn raw_writers_split_stdout_and_stderr() {
    let (ui, out, err) = console();
    let mut writers = ui.output_writers().unwrap();
    writers.stdout.write_all(b"to out").unwrap();
    writers.stderr.write_all(b"to err").unwrap();
    assert_eq!(out.text(), "to out");
    assert_eq!(err.text(), "to err");
}

#[test]
fn non_interactive_input_is_rejected() {
    let (ui, _, _) = console();
    assert!(!ui.interactive());
    assert!(matches!(ui.input("name?"), Err(UiError::NonInteractive)));
}

#[test]
fn status_skips_repeated_updates() {
    let (ui, out, _) = console();
    let mut status = ui.status();
    status.update("working");
    status.update("working");
    status.step(StepStatus::Complete, "done");
    status.close();
    assert_eq!(out.text(), "» working\n✓ done\n");
}

#[tokio::test]
async fn step_done_twice_prints_once_and_wait_returns() {
    let (ui, out, _) = console();
    let group = ui.step_group();
    let mut step = group.add("fetch");
    step.done();
    step.done();
    step.abort();
    group.wait().await;
    assert_eq!(out.text(), "  » fetch\n  ✓ fetch\n");
}

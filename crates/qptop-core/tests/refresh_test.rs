#![allow(clippy::unwrap_used)]
// Refresh trigger tests against a recording fake of the process table.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use qptop_core::{CoreError, ProcessControl, Refresher, Snapshot};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    running: Vec<i32>,
    deny_signal: bool,
    signalled: RefCell<Vec<i32>>,
    syncs: Cell<u32>,
}

struct FakeProcesses(Rc<Recorder>);

impl ProcessControl for FakeProcesses {
    fn is_running(&self, pid: i32) -> bool {
        self.0.running.contains(&pid)
    }

    fn signal_refresh(&self, pid: i32) -> io::Result<()> {
        if self.0.deny_signal {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.0.signalled.borrow_mut().push(pid);
        Ok(())
    }

    fn sync_storage(&self) {
        self.0.syncs.set(self.0.syncs.get() + 1);
    }
}

fn refresher(recorder: &Rc<Recorder>) -> Refresher {
    Refresher::new(
        Box::new(FakeProcesses(Rc::clone(recorder))),
        3,
        Duration::ZERO,
    )
}

fn snapshot_for(pid: &str) -> Snapshot {
    Snapshot::from_document(&json!({
        "devices": [{ "status": { "process_id": pid } }]
    }))
    .unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn live_process_is_signalled_then_synced_three_times() {
    let recorder = Rc::new(Recorder {
        running: vec![4242],
        ..Recorder::default()
    });

    refresher(&recorder).request_refresh(&snapshot_for("4242")).unwrap();

    assert_eq!(*recorder.signalled.borrow(), vec![4242]);
    assert_eq!(recorder.syncs.get(), 3);
}

#[test]
fn gone_process_is_a_no_op() {
    let recorder = Rc::new(Recorder::default());

    let result = refresher(&recorder).request_refresh(&snapshot_for("4242"));

    assert!(matches!(result, Err(CoreError::RefreshTargetGone { pid: 4242 })));
    assert!(recorder.signalled.borrow().is_empty());
    assert_eq!(recorder.syncs.get(), 0);
}

#[test]
fn signal_failure_is_reported_without_syncing() {
    let recorder = Rc::new(Recorder {
        running: vec![7],
        deny_signal: true,
        ..Recorder::default()
    });

    let result = refresher(&recorder).request_refresh(&snapshot_for("7"));

    match result {
        Err(CoreError::SignalDeliveryFailed { pid, source }) => {
            assert_eq!(pid, 7);
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected SignalDeliveryFailed, got: {other:?}"),
    }
    assert_eq!(recorder.syncs.get(), 0);
}

#[test]
fn snapshot_without_pid_is_never_signalled() {
    let recorder = Rc::new(Recorder {
        running: vec![0],
        ..Recorder::default()
    });

    let result = refresher(&recorder).request_refresh(&snapshot_for("0"));

    assert!(matches!(result, Err(CoreError::MissingProcessId)));
    assert!(recorder.signalled.borrow().is_empty());
}

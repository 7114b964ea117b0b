#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_highlight::{LineHighlightTracker, RecordingTarget, RenderMode};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

pub const MARKER: &str = "<mark>";

pub fn is_op(line: &str) -> bool {
    line.starts_with("OP")
}

pub fn tracker_with_mode(mode: RenderMode) -> LineHighlightTracker<RecordingTarget> {
    LineHighlightTracker::builder()
        .render_target(RecordingTarget::new())
        .classifier(is_op)
        .marker(MARKER)
        .mode(mode)
        .build()
        .expect("target and classifier supplied")
}

pub fn tracker(text: &str) -> LineHighlightTracker<RecordingTarget> {
    let mut t = tracker_with_mode(RenderMode::Inline);
    t.reset_highlighting(text);
    t
}

/// Build a listing from per-line flags: `true` -> operation, `false` -> comment.
pub fn listing(flags: &[bool], trailing_newline: bool) -> String {
    let mut out = String::new();
    for (i, &op) in flags.iter().enumerate() {
        if op {
            out.push_str(&format!("OP{i} q[{i}];"));
        } else {
            out.push_str(&format!("// note {i}"));
        }
        out.push('\n');
    }
    if !trailing_newline {
        out.pop();
    }
    out
}

/// Log sink for `tracing_subscriber::fmt().with_writer(..)`; the returned
/// buffer collects everything written.
#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    pub fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        (Self { inner: buf.clone() }, buf)
    }
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

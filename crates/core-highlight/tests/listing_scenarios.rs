//! Scenario tests over realistic listings: headers, comments, blank lines.

mod common;

use common::{BufferWriter, MARKER, is_op, tracker, tracker_with_mode};
use core_highlight::{HighlightError, LineHighlightTracker, RecordingTarget, RenderMode};
use pretty_assertions::assert_eq;
use tracing::Level;
use tracing::subscriber::with_default;

const QASM: &str = "version 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\n\nOP h q[0];\n// entangle\nOP cx q[0],q[1];\nOP measure q[1];\n";

#[test]
fn header_then_two_operations() {
    let mut t = tracker("HEADER\nOP1\nOP2\n");
    assert_eq!(t.offset(), 0);
    t.increase_highlighting().unwrap();
    assert_eq!(t.highlighted_lines(), 1);
    assert_eq!(t.nops_in_highlighting(), 1);
    assert_eq!(t.processed_buffer(), format!("HEADER\n{MARKER}OP1\n"));
}

#[test]
fn jump_to_second_operation() {
    let mut t = tracker("HEADER\nOP1\nOP2\n");
    t.set_highlighted_lines(2);
    t.set_highlights();
    assert_eq!(
        t.processed_buffer(),
        format!("HEADER\n{MARKER}OP1\n{MARKER}OP2\n")
    );
    assert_eq!(t.nops_in_highlighting(), 1);
}

#[test]
fn stepping_through_listing() {
    let mut t = tracker(QASM);
    assert_eq!(t.offset(), 3);
    assert_eq!(t.operation_count(), 3);
    t.initial_highlighting();

    t.increase_highlighting().unwrap();
    assert_eq!(t.nops_in_highlighting(), 4);
    t.increase_highlighting().unwrap();
    assert_eq!(t.nops_in_highlighting(), 5);
    t.increase_highlighting().unwrap();
    assert_eq!(
        t.increase_highlighting(),
        Err(HighlightError::NoOperationRemaining { cursor: 8 })
    );

    let frames = t.target().frames();
    assert_eq!(frames.len(), 4, "one write per successful call");
    assert_eq!(frames[0], format!("{MARKER}{}", "\n".repeat(9)));
    assert_eq!(
        frames[3],
        format!(
            "version 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\n\n{MARKER}OP h q[0];\n// entangle\n{MARKER}OP cx q[0],q[1];\n{MARKER}OP measure q[1];\n\n"
        )
    );

    for line in 0..4 {
        assert!(!t.is_highlighted(line));
    }
    assert!(t.is_highlighted(4));
    assert!(!t.is_highlighted(5));
    assert!(t.is_highlighted(7));
    assert!(!t.is_highlighted(8));
}

#[test]
fn rewinding_listing_restores_each_frame() {
    let mut t = tracker(QASM);
    t.initial_highlighting();
    for _ in 0..3 {
        t.increase_highlighting().unwrap();
    }
    for _ in 0..3 {
        t.decrease_highlighting().unwrap();
    }
    let frames = t.target().frames();
    // forward: hint, 1, 2, 3 ; backward: 2, 1, hint
    assert_eq!(frames.len(), 7);
    assert_eq!(frames[4], frames[2]);
    assert_eq!(frames[5], frames[1]);
    assert_eq!(frames[6], frames[0]);
    assert!(t.decrease_highlighting().unwrap_err().is_boundary());
}

#[test]
fn everything_then_rewind() {
    let mut t = tracker(QASM);
    t.highlight_everything();
    assert_eq!(t.highlighted_lines(), 3);
    assert_eq!(t.nops_in_highlighting(), 5);
    assert_eq!(t.pending_buffer(), "");
    assert_eq!(
        t.target().last().unwrap().lines().count(),
        QASM.lines().count()
    );

    t.decrease_highlighting().unwrap();
    assert_eq!(t.highlighted_lines(), 2);
    assert_eq!(t.nops_in_highlighting(), 5);

    let mut jumped = tracker(QASM);
    jumped.set_highlighted_lines(2);
    jumped.set_highlights();
    assert_eq!(t.processed_buffer(), jumped.processed_buffer());
}

#[test]
fn everything_with_trailing_comment_keeps_comment_plain() {
    let mut t = tracker("OP1\n// done\n");
    t.highlight_everything();
    assert_eq!(t.target().last(), Some(format!("{MARKER}OP1\n// done\n").as_str()));
    assert!(t.decrease_highlighting().is_ok());
    assert_eq!(t.target().last(), Some(format!("{MARKER}\n\n\n").as_str()));
}

#[test]
fn overlay_listing_uses_placeholders() {
    let mut t = tracker_with_mode(RenderMode::Overlay);
    t.reset_highlighting("HEADER\nOP1\nOP2\n");
    t.set_highlighted_lines(2);
    t.set_highlights();
    assert_eq!(t.target().last(), Some(format!("\n{MARKER}\n{MARKER}\n\n").as_str()));
}

#[test]
fn replacing_text_keeps_step_and_reclassifies_pending() {
    let mut t = tracker("HEADER\nOP1\nOP2\n");
    t.increase_highlighting().unwrap();
    t.set_text("HEADER\nOP1\n// gap\nOP2\nOP3\n");
    assert_eq!(t.operation_count(), 3);
    t.increase_highlighting().unwrap();
    assert_eq!(t.highlighted_lines(), 2);
    assert_eq!(t.nops_in_highlighting(), 2);
    assert_eq!(
        t.processed_buffer(),
        format!("HEADER\n{MARKER}OP1\n// gap\n{MARKER}OP2\n")
    );
}

#[test]
fn borrowed_target_receives_frames() {
    let mut surface = String::new();
    {
        let mut t = LineHighlightTracker::new(&mut surface, is_op);
        t.update_marker("> ");
        t.reset_highlighting("OP1\n");
        t.increase_highlighting().unwrap();
    }
    assert_eq!(surface, "> OP1\n\n");
}

#[test]
fn tracker_from_config_file() -> anyhow::Result<()> {
    let tmp = tempfile::NamedTempFile::new()?;
    std::fs::write(tmp.path(), "[highlight]\nmarker = \"~~\"\nmode = \"overlay\"\n")?;
    let cfg = core_config::load_from(Some(tmp.path().to_path_buf()))?;
    let mut t = LineHighlightTracker::builder()
        .render_target(RecordingTarget::new())
        .classifier(is_op)
        .with_config(cfg.highlight())
        .build()?;
    t.reset_highlighting("H\nOP1\n");
    t.increase_highlighting()?;
    assert_eq!(t.target().last(), Some("\n~~\n\n"));
    Ok(())
}

#[test]
fn clamp_and_boundary_are_logged() {
    let (writer, buffer) = BufferWriter::new();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();

    with_default(subscriber, || {
        let mut t = tracker("OP1\n");
        t.set_highlighted_lines(4);
        t.set_highlights();
        let _ = t.increase_highlighting();
    });

    let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(log_output.contains("WARN highlight.tracker:"), "{log_output}");
    assert!(log_output.contains("highlighted_lines_clamped"));
    assert!(log_output.contains("boundary_rejected"));
    assert!(log_output.contains("highlight.text"));
}

//! Line highlight tracker.
//!
//! Maps a step counter (number of highlighted operation lines) onto a
//! rendered text block. Lines are classified once per text load by an
//! injected classifier; the highlighted prefix then grows or shrinks one
//! operation line at a time (`increase_highlighting` /
//! `decrease_highlighting`) or is recomputed wholesale (`set_highlights`,
//! `highlight_everything`).
//!
//! Cursor model:
//! * `cursor = highlighted_ops + nops_in_highlighting` is the number of
//!   processed lines and never exceeds `line_count()`.
//! * The processed prefix holds exactly `highlighted_ops` `Marked` lines and
//!   `nops_in_highlighting` `Plain` lines.
//! * Every public call that changes the visible output writes the render
//!   target exactly once. `set_text`, `reset_highlighting`,
//!   `set_highlighted_lines` and `update_marker` never write it.
//!
//! Trailing terminator: text ending in `\n` splits into a final empty line.
//! `highlight_everything` never processes the last `TRAILING_TERMINATOR_LINES`
//! lines and drops them from the pending buffer, so a fully highlighted
//! listing renders exactly one line per line of source text.
//!
//! Boundary policy: stepping past the last operation or below zero returns a
//! `HighlightError` boundary variant and leaves state and target untouched.

use core_config::{HighlightConfig, RenderMode, default_marker};
use tracing::{debug, trace, warn};

use crate::error::HighlightError;
use crate::line_state::LineState;
use crate::target::RenderTarget;

/// Lines at the end of the text that `highlight_everything` treats as the
/// terminator produced by a final newline.
pub const TRAILING_TERMINATOR_LINES: usize = 1;

/// Decides whether a line is an operation (eligible for the marker).
pub type Classifier = Box<dyn Fn(&str) -> bool>;

pub struct LineHighlightTracker<T: RenderTarget> {
    target: T,
    is_operation: Classifier,
    marker: String,
    mode: RenderMode,
    lines: Vec<String>,
    classification: Vec<bool>,
    first_operation: Option<usize>,
    states: Vec<LineState>,
    highlighted_ops: usize,
    nops_in_highlighting: usize,
    // Set by `initial_highlighting`: render `marker + pending` instead of the
    // (empty) processed prefix.
    format_hint: bool,
}

impl<T: RenderTarget> LineHighlightTracker<T> {
    /// Tracker with the default marker and inline rendering.
    pub fn new<F>(target: T, is_operation: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        Self::with_parts(
            target,
            Box::new(is_operation),
            default_marker(),
            RenderMode::default(),
        )
    }

    pub fn builder() -> TrackerBuilder<T> {
        TrackerBuilder::new()
    }

    fn with_parts(target: T, is_operation: Classifier, marker: String, mode: RenderMode) -> Self {
        Self {
            target,
            is_operation,
            marker,
            mode,
            lines: Vec::new(),
            classification: Vec::new(),
            first_operation: None,
            states: Vec::new(),
            highlighted_ops: 0,
            nops_in_highlighting: 0,
            format_hint: false,
        }
    }

    // ---- text loading -------------------------------------------------

    /// Load new text: split, classify and recompute the operation offset and
    /// pending lines. The processed prefix is retained (clipped to the new
    /// line count) so a replacement text keeps the current step.
    ///
    /// Retained lines are not reclassified: a line kept as `Marked` may be a
    /// non-operation under the new text while `is_highlighted` already reports
    /// the new classification. Call `set_highlights` to rebuild the prefix.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        self.classification = self
            .lines
            .iter()
            .map(|l| (self.is_operation)(l.as_str()))
            .collect();
        self.first_operation = self.classification.iter().position(|&op| op);

        let len = self.lines.len();
        let cursor = self.cursor();
        if cursor > len {
            self.states.truncate(len);
            self.recount();
            warn!(
                target: "highlight.text",
                previous_cursor = cursor,
                lines = len,
                highlighted_ops = self.highlighted_ops,
                nops_in_highlighting = self.nops_in_highlighting,
                "processed_prefix_clipped"
            );
        } else {
            self.states.truncate(cursor);
        }
        self.states.resize(len, LineState::Pending);

        debug!(
            target: "highlight.text",
            lines = len,
            operations = self.operation_count(),
            offset = self.offset(),
            retained = self.cursor(),
            "set_text"
        );
    }

    /// Zero the cursor and processed prefix, then load `text`. Does not render;
    /// call `refresh` or `initial_highlighting` afterwards.
    pub fn reset_highlighting(&mut self, text: &str) {
        self.highlighted_ops = 0;
        self.nops_in_highlighting = 0;
        self.format_hint = false;
        self.states.clear();
        self.set_text(text);
    }

    // ---- stepping -----------------------------------------------------

    /// Nothing highlighted yet: show the marker on line 0 as a format hint
    /// followed by one placeholder per line.
    pub fn initial_highlighting(&mut self) {
        self.highlighted_ops = 0;
        self.nops_in_highlighting = 0;
        self.states.fill(LineState::Pending);
        self.format_hint = true;
        trace!(target: "highlight.tracker", lines = self.lines.len(), "initial_highlighting");
        self.push();
    }

    /// Extend the highlighted prefix by exactly one operation line, absorbing
    /// the non-operation lines in front of it.
    pub fn increase_highlighting(&mut self) -> Result<(), HighlightError> {
        let cursor = self.cursor();
        let Some(op_line) = self.next_operation_from(cursor) else {
            trace!(target: "highlight.tracker", cursor, "boundary_rejected");
            return Err(HighlightError::NoOperationRemaining { cursor });
        };

        self.states[cursor..op_line].fill(LineState::Plain);
        self.nops_in_highlighting += op_line - cursor;
        self.states[op_line] = LineState::Marked;
        self.highlighted_ops += 1;
        self.format_hint = false;

        trace!(
            target: "highlight.tracker",
            line = op_line,
            highlighted_ops = self.highlighted_ops,
            nops_in_highlighting = self.nops_in_highlighting,
            "increase_highlighting"
        );
        self.push();
        Ok(())
    }

    /// Shrink the highlighted prefix by one operation line, returning the
    /// non-operation lines behind it to pending. Reaching zero re-renders the
    /// format hint via `initial_highlighting`.
    pub fn decrease_highlighting(&mut self) -> Result<(), HighlightError> {
        if self.highlighted_ops == 0 {
            trace!(target: "highlight.tracker", "boundary_rejected");
            return Err(HighlightError::NothingHighlighted);
        }

        // Trailing nops only exist after `highlight_everything`.
        let mut end = self.release_trailing_nops(self.cursor());
        // highlighted_ops > 0 guarantees a marked line at the end of the prefix.
        debug_assert!(end > 0 && self.states[end - 1] == LineState::Marked);
        end -= 1;
        self.states[end] = LineState::Pending;
        self.highlighted_ops -= 1;
        let removed = end;
        // Nops absorbed by the matching increase go back as well, so the prefix
        // again ends on a marked line.
        self.release_trailing_nops(end);

        trace!(
            target: "highlight.tracker",
            line = removed,
            highlighted_ops = self.highlighted_ops,
            nops_in_highlighting = self.nops_in_highlighting,
            "decrease_highlighting"
        );
        if self.highlighted_ops == 0 {
            self.initial_highlighting();
        } else {
            self.push();
        }
        Ok(())
    }

    /// Process every remaining line except the trailing terminator and clear
    /// the pending buffer.
    pub fn highlight_everything(&mut self) {
        let cursor = self.cursor();
        let end = self.lines.len().saturating_sub(TRAILING_TERMINATOR_LINES);
        for i in cursor..end {
            if self.classification[i] {
                self.states[i] = LineState::Marked;
                self.highlighted_ops += 1;
            } else {
                self.states[i] = LineState::Plain;
                self.nops_in_highlighting += 1;
            }
        }
        let tail = end.max(cursor);
        self.states[tail..].fill(LineState::Terminator);
        self.format_hint = false;

        trace!(
            target: "highlight.tracker",
            highlighted_ops = self.highlighted_ops,
            nops_in_highlighting = self.nops_in_highlighting,
            "highlight_everything"
        );
        self.push();
    }

    /// Rebuild the whole highlighting from `highlighted_lines()` and render
    /// it. Produces the same output as that many `increase_highlighting`
    /// calls from a reset.
    pub fn set_highlights(&mut self) {
        self.rebuild_prefix(self.highlighted_ops);
        if self.highlighted_ops == 0 {
            self.initial_highlighting();
            return;
        }
        trace!(
            target: "highlight.tracker",
            highlighted_ops = self.highlighted_ops,
            nops_in_highlighting = self.nops_in_highlighting,
            "set_highlights"
        );
        self.push();
    }

    /// Push the current content to the target again (e.g. after
    /// `reset_highlighting`).
    pub fn refresh(&mut self) {
        self.push();
    }

    /// Replace the marker. Takes effect on the next render.
    pub fn update_marker(&mut self, marker: impl Into<String>) {
        self.marker = marker.into();
        debug!(target: "highlight.tracker", marker_len = self.marker.len(), "marker_updated");
    }

    // ---- accessors ----------------------------------------------------

    /// Index of the line preceding the first operation line; `-1` when there
    /// is no operation line (or the first line already is one).
    pub fn offset(&self) -> isize {
        match self.first_operation {
            Some(line) => line as isize - 1,
            None => -1,
        }
    }

    pub fn first_operation_line(&self) -> Option<usize> {
        self.first_operation
    }

    pub fn highlighted_lines(&self) -> usize {
        self.highlighted_ops
    }

    /// Jump to an absolute step count without rendering; `set_highlights`
    /// pushes the result. A count above `operation_count()` is clamped.
    pub fn set_highlighted_lines(&mut self, count: usize) {
        self.rebuild_prefix(count);
    }

    pub fn nops_in_highlighting(&self) -> usize {
        self.nops_in_highlighting
    }

    /// Classification of line `i` when it lies inside the highlighted span,
    /// otherwise `false` (not highlighted yet).
    pub fn is_highlighted(&self, i: usize) -> bool {
        i < self.cursor() && self.classification.get(i).copied().unwrap_or(false)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn operation_count(&self) -> usize {
        self.classification.iter().filter(|&&op| op).count()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn classification(&self) -> &[bool] {
        &self.classification
    }

    pub fn line_states(&self) -> &[LineState] {
        &self.states
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    // ---- rendering ----------------------------------------------------

    /// Processed lines `[0, cursor)`, each newline-terminated.
    pub fn processed_buffer(&self) -> String {
        let mut out = String::new();
        for (state, line) in self.states.iter().zip(&self.lines).take(self.cursor()) {
            state.render_into(&mut out, line, &self.marker, self.mode);
        }
        out
    }

    /// One newline placeholder per pending line.
    pub fn pending_buffer(&self) -> String {
        let mut out = String::new();
        for (state, line) in self.states.iter().zip(&self.lines).skip(self.cursor()) {
            state.render_into(&mut out, line, &self.marker, self.mode);
        }
        out
    }

    /// Content the next render would push.
    pub fn rendered(&self) -> String {
        let head = if self.format_hint {
            self.marker.clone()
        } else {
            self.processed_buffer()
        };
        head + &self.pending_buffer()
    }

    fn push(&mut self) {
        let content = self.rendered();
        trace!(target: "highlight.tracker", bytes = content.len(), "render");
        self.target.set_content(&content);
    }

    fn cursor(&self) -> usize {
        self.highlighted_ops + self.nops_in_highlighting
    }

    /// First operation line at or after `from` that has not been dropped as
    /// the terminator.
    fn next_operation_from(&self, from: usize) -> Option<usize> {
        (from..self.lines.len())
            .take_while(|&i| self.states[i] != LineState::Terminator)
            .find(|&i| self.classification[i])
    }

    /// Recompute the processed prefix so it holds exactly `wanted` marked
    /// lines (clamped to the operation count) and the nops between them.
    fn rebuild_prefix(&mut self, wanted: usize) {
        let available = self.operation_count();
        if wanted > available {
            warn!(
                target: "highlight.tracker",
                requested = wanted,
                available,
                "highlighted_lines_clamped"
            );
        }
        let wanted = wanted.min(available);
        let mut ops = 0;
        let mut nops = 0;
        for (state, &is_op) in self.states.iter_mut().zip(&self.classification) {
            if ops < wanted {
                if is_op {
                    *state = LineState::Marked;
                    ops += 1;
                } else {
                    *state = LineState::Plain;
                    nops += 1;
                }
            } else {
                *state = LineState::Pending;
            }
        }
        self.highlighted_ops = ops;
        self.nops_in_highlighting = nops;
        self.format_hint = false;
    }

    /// Move the `Plain` lines directly before `end` back to pending. Returns
    /// the new end of the processed prefix.
    fn release_trailing_nops(&mut self, mut end: usize) -> usize {
        while end > 0 && self.states[end - 1] == LineState::Plain {
            end -= 1;
            self.states[end] = LineState::Pending;
            self.nops_in_highlighting -= 1;
        }
        end
    }

    fn recount(&mut self) {
        self.highlighted_ops = self
            .states
            .iter()
            .filter(|&&s| s == LineState::Marked)
            .count();
        self.nops_in_highlighting = self
            .states
            .iter()
            .filter(|&&s| s == LineState::Plain)
            .count();
    }
}

/// Collects the collaborators and rendering options of a tracker. `build`
/// fails when the render target or the classifier is missing.
pub struct TrackerBuilder<T> {
    target: Option<T>,
    classifier: Option<Classifier>,
    marker: String,
    mode: RenderMode,
}

impl<T: RenderTarget> Default for TrackerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RenderTarget> TrackerBuilder<T> {
    pub fn new() -> Self {
        Self {
            target: None,
            classifier: None,
            marker: default_marker(),
            mode: RenderMode::default(),
        }
    }

    pub fn render_target(mut self, target: T) -> Self {
        self.target = Some(target);
        self
    }

    pub fn classifier<F>(mut self, is_operation: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        self.classifier = Some(Box::new(is_operation));
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Take marker and mode from the `[highlight]` config table.
    pub fn with_config(self, cfg: &HighlightConfig) -> Self {
        self.marker(cfg.marker.clone()).mode(cfg.mode)
    }

    pub fn build(self) -> Result<LineHighlightTracker<T>, HighlightError> {
        let target = self.target.ok_or(HighlightError::MissingRenderTarget)?;
        let classifier = self.classifier.ok_or(HighlightError::MissingClassifier)?;
        Ok(LineHighlightTracker::with_parts(
            target,
            classifier,
            self.marker,
            self.mode,
        ))
    }
}

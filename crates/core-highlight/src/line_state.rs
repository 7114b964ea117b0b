//! Per-line render state.
//!
//! The tracker keeps one `LineState` per line of the loaded text instead of
//! two concatenated strings. Buffers are produced on demand from this
//! sequence, so removing a line never has to search the rendered output and a
//! marker change between renders cannot desynchronize the bookkeeping.
//!
//! Invariants (maintained by `LineHighlightTracker`):
//! * `Plain` / `Marked` only appear in the processed prefix `[0, cursor)`.
//! * `Pending` / `Terminator` only appear at or after the cursor.
//! * `Terminator` is only ever assigned to lines excluded by
//!   `highlight_everything` and renders nothing.

use core_config::RenderMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineState {
    /// Processed non-operation line (no marker).
    Plain,
    /// Processed operation line carrying the marker.
    Marked,
    /// Not yet processed; rendered as a newline placeholder.
    Pending,
    /// Trailing terminator line dropped from the pending buffer by
    /// `highlight_everything`.
    Terminator,
}

impl LineState {
    pub fn is_processed(self) -> bool {
        matches!(self, Self::Plain | Self::Marked)
    }

    /// Append the rendering of one line to `out`.
    pub fn render_into(self, out: &mut String, text: &str, marker: &str, mode: RenderMode) {
        match self {
            Self::Marked => {
                out.push_str(marker);
                if mode == RenderMode::Inline {
                    out.push_str(text);
                }
                out.push('\n');
            }
            Self::Plain => {
                if mode == RenderMode::Inline {
                    out.push_str(text);
                }
                out.push('\n');
            }
            Self::Pending => out.push('\n'),
            Self::Terminator => {}
        }
    }
}

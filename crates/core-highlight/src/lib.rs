//! Step-driven line highlighting for operation listings.
//!
//! A listing (e.g. a circuit or instruction dump) mixes operation lines with
//! decoration: headers, comments, blank lines. An external stepper advances or
//! rewinds one operation at a time; `LineHighlightTracker` keeps the rendered
//! highlight in sync with that step count and pushes the result to a
//! `RenderTarget`.
//!
//! Components:
//! - `tracker`: `LineHighlightTracker` + `TrackerBuilder` (stepping, jumping,
//!   full highlight, reset).
//! - `line_state`: per-line render state the buffers are produced from.
//! - `target`: the render target seam and in-memory targets.
//! - `error`: construction and boundary errors.
//!
//! Marker and render mode come from the `[highlight]` table of
//! `linemark.toml` (see `core-config`) or are set on the builder directly.
//!
//! ```
//! use core_highlight::{LineHighlightTracker, RecordingTarget};
//!
//! let mut tracker = LineHighlightTracker::builder()
//!     .render_target(RecordingTarget::new())
//!     .classifier(|line: &str| line.starts_with("OP"))
//!     .marker("> ")
//!     .build()
//!     .unwrap();
//! tracker.reset_highlighting("HEADER\nOP1\nOP2\n");
//! tracker.increase_highlighting().unwrap();
//! assert_eq!(tracker.processed_buffer(), "HEADER\n> OP1\n");
//! assert_eq!(tracker.target().last(), Some("HEADER\n> OP1\n\n\n"));
//! ```

pub mod error;
pub mod line_state;
pub mod target;
pub mod tracker;

pub use core_config::{HighlightConfig, RenderMode};
pub use error::HighlightError;
pub use line_state::LineState;
pub use target::{RecordingTarget, RenderTarget};
pub use tracker::{Classifier, LineHighlightTracker, TRAILING_TERMINATOR_LINES, TrackerBuilder};

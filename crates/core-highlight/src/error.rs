//! Error kinds surfaced by the highlight tracker.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// Builder finished without a render target.
    #[error("line highlight tracker needs a render target to apply the highlighting to")]
    MissingRenderTarget,
    /// Builder finished without an operation classifier.
    #[error("line highlight tracker needs a classifier deciding whether a line is an operation")]
    MissingClassifier,
    /// `increase_highlighting` found no operation line at or after the cursor.
    #[error("no operation line left to highlight (cursor at line {cursor})")]
    NoOperationRemaining { cursor: usize },
    /// `decrease_highlighting` called with zero highlighted operations.
    #[error("no highlighted operation to remove")]
    NothingHighlighted,
}

impl HighlightError {
    /// True for the stepping errors a driver may hit by over-stepping; false
    /// for construction failures.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Self::NoOperationRemaining { .. } | Self::NothingHighlighted
        )
    }
}

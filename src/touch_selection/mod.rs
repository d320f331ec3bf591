//! Touch selection: the handles delimiting a text selection or caret, and the
//! events emitted as they appear, move, get dragged and disappear.

mod tracker;

pub use tracker::{BoundKind, SelectionBound, SelectionTracker, DEFAULT_HANDLE_SIZE};

use serde::{Deserialize, Serialize};

use crate::geometry::RectF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionEventType {
    SelectionHandlesShown,
    SelectionHandlesMoved,
    SelectionHandlesCleared,
    InsertionHandleShown,
    InsertionHandleMoved,
    InsertionHandleTapped,
    InsertionHandleCleared,
    SelectionHandleDragStarted,
    SelectionHandleDragStopped,
    InsertionHandleDragStarted,
    InsertionHandleDragStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveStatus {
    #[default]
    Inactive,
    InsertionActive,
    SelectionActive,
}

/// Read side of a touch selection controller, plus the one command the
/// editing menu issues back to it.
pub trait TouchSelectionSource {
    /// Bounding rectangle of the selection, or of the caret for an insertion.
    /// Empty when inactive.
    fn rect_between_bounds(&self) -> RectF;

    /// Empty when the start handle is not displayed.
    fn start_handle_rect(&self) -> RectF;

    /// Empty when the end handle is not displayed.
    fn end_handle_rect(&self) -> RectF;

    fn active_status(&self) -> ActiveStatus;

    /// Deactivates the current selection or insertion and keeps handles
    /// hidden until the user interacts again.
    fn hide_and_disallow_showing_automatically(&self);
}

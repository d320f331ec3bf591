use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use super::{ActiveStatus, SelectionEventType, TouchSelectionSource};
use crate::geometry::{PointF, RectF};

/// Edge length of the square drawn for each handle.
pub const DEFAULT_HANDLE_SIZE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundKind {
    Left,
    Right,
    Center,
    #[default]
    Empty,
}

/// One end of a selection as reported by the renderer: a vertical edge in
/// viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionBound {
    pub kind: BoundKind,
    pub edge_top: PointF,
    pub edge_bottom: PointF,
    #[serde(default)]
    pub visible: bool,
}

impl SelectionBound {
    pub const fn new(kind: BoundKind, edge_top: PointF, edge_bottom: PointF, visible: bool) -> Self {
        Self {
            kind,
            edge_top,
            edge_bottom,
            visible,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.kind == BoundKind::Empty
    }

    fn edge_rect(&self) -> RectF {
        RectF::bounding(self.edge_top, self.edge_bottom)
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    start: SelectionBound,
    end: SelectionBound,
    status: ActiveStatus,
    suppressed: bool,
    dragging: bool,
}

impl TrackerState {
    /// A drag in progress is ended first, so observers never see a clear
    /// while they still believe a handle is held.
    fn deactivate(&mut self, events: &mut Vec<SelectionEventType>) {
        if self.dragging {
            match self.status {
                ActiveStatus::InsertionActive => {
                    events.push(SelectionEventType::InsertionHandleDragStopped)
                }
                ActiveStatus::SelectionActive => {
                    events.push(SelectionEventType::SelectionHandleDragStopped)
                }
                ActiveStatus::Inactive => {}
            }
        }
        match self.status {
            ActiveStatus::InsertionActive => events.push(SelectionEventType::InsertionHandleCleared),
            ActiveStatus::SelectionActive => events.push(SelectionEventType::SelectionHandlesCleared),
            ActiveStatus::Inactive => {}
        }
        self.status = ActiveStatus::Inactive;
        self.dragging = false;
    }

    fn refresh(&mut self) -> Vec<SelectionEventType> {
        let mut events = Vec::new();
        if self.start.is_empty() || self.end.is_empty() {
            self.suppressed = false;
            self.deactivate(&mut events);
            return events;
        }
        if self.suppressed {
            return events;
        }

        let target = if self.start == self.end && self.start.kind == BoundKind::Center {
            ActiveStatus::InsertionActive
        } else {
            ActiveStatus::SelectionActive
        };

        if self.status == target {
            events.push(match target {
                ActiveStatus::InsertionActive => SelectionEventType::InsertionHandleMoved,
                _ => SelectionEventType::SelectionHandlesMoved,
            });
            return events;
        }

        self.deactivate(&mut events);
        self.status = target;
        events.push(match target {
            ActiveStatus::InsertionActive => SelectionEventType::InsertionHandleShown,
            _ => SelectionEventType::SelectionHandlesShown,
        });
        events
    }
}

/// A minimal touch selection controller: turns renderer selection bounds into
/// handle geometry and [`SelectionEventType`] notifications.
///
/// Events are returned to the caller rather than dispatched, so the host
/// decides where they go. Interior mutability lets the tracker be shared
/// with the menu controller, which only reads it.
#[derive(Debug)]
pub struct SelectionTracker {
    handle_size: f32,
    state: RefCell<TrackerState>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::with_handle_size(DEFAULT_HANDLE_SIZE)
    }

    pub fn with_handle_size(handle_size: f32) -> Self {
        Self {
            handle_size: handle_size.max(0.0),
            state: RefCell::new(TrackerState::default()),
        }
    }

    pub fn on_selection_bounds_changed(
        &self,
        start: SelectionBound,
        end: SelectionBound,
    ) -> Vec<SelectionEventType> {
        let mut state = self.state.borrow_mut();
        if state.start == start && state.end == end {
            return Vec::new();
        }
        state.start = start;
        state.end = end;
        let events = state.refresh();
        tracing::trace!(status = ?state.status, ?events, "selection bounds changed");
        events
    }

    pub fn begin_handle_drag(&self) -> Option<SelectionEventType> {
        let mut state = self.state.borrow_mut();
        if state.dragging {
            return None;
        }
        let event = match state.status {
            ActiveStatus::SelectionActive => SelectionEventType::SelectionHandleDragStarted,
            ActiveStatus::InsertionActive => SelectionEventType::InsertionHandleDragStarted,
            ActiveStatus::Inactive => return None,
        };
        state.dragging = true;
        Some(event)
    }

    pub fn end_handle_drag(&self) -> Option<SelectionEventType> {
        let mut state = self.state.borrow_mut();
        if !state.dragging {
            return None;
        }
        state.dragging = false;
        match state.status {
            ActiveStatus::SelectionActive => Some(SelectionEventType::SelectionHandleDragStopped),
            ActiveStatus::InsertionActive => Some(SelectionEventType::InsertionHandleDragStopped),
            ActiveStatus::Inactive => None,
        }
    }

    pub fn tap_insertion_handle(&self) -> Option<SelectionEventType> {
        (self.state.borrow().status == ActiveStatus::InsertionActive)
            .then_some(SelectionEventType::InsertionHandleTapped)
    }

    /// Lifts a previous [`TouchSelectionSource::hide_and_disallow_showing_automatically`],
    /// re-activating for the current bounds if there are any.
    pub fn allow_showing_automatically(&self) -> Vec<SelectionEventType> {
        let mut state = self.state.borrow_mut();
        if !state.suppressed {
            return Vec::new();
        }
        state.suppressed = false;
        state.refresh()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }

    fn handle_rect(&self, bound: &SelectionBound) -> RectF {
        if !bound.visible || bound.is_empty() {
            return RectF::default();
        }
        RectF::new(
            bound.edge_bottom.x - self.handle_size / 2.0,
            bound.edge_bottom.y,
            self.handle_size,
            self.handle_size,
        )
    }
}

impl TouchSelectionSource for SelectionTracker {
    fn rect_between_bounds(&self) -> RectF {
        let state = self.state.borrow();
        if state.status == ActiveStatus::Inactive {
            return RectF::default();
        }
        match (state.start.visible, state.end.visible) {
            (true, false) => state.start.edge_rect(),
            (false, true) => state.end.edge_rect(),
            _ => RectF::enclosing(&[
                state.start.edge_top,
                state.start.edge_bottom,
                state.end.edge_top,
                state.end.edge_bottom,
            ]),
        }
    }

    fn start_handle_rect(&self) -> RectF {
        let state = self.state.borrow();
        if state.status == ActiveStatus::Inactive {
            return RectF::default();
        }
        self.handle_rect(&state.start)
    }

    fn end_handle_rect(&self) -> RectF {
        let state = self.state.borrow();
        if state.status == ActiveStatus::Inactive {
            return RectF::default();
        }
        self.handle_rect(&state.end)
    }

    fn active_status(&self) -> ActiveStatus {
        self.state.borrow().status
    }

    fn hide_and_disallow_showing_automatically(&self) {
        let mut state = self.state.borrow_mut();
        state.suppressed = true;
        state.status = ActiveStatus::Inactive;
        state.dragging = false;
        tracing::debug!("touch handles hidden until next interaction");
    }
}

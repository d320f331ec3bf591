use std::rc::Rc;

use super::{TouchEditingMenuController, TouchEditingMenuControllerClient};
use crate::chrome::ChromeControllerObserver;
use crate::context_menu::ContextMenuParams;
use crate::geometry::{Rect, RectF, Vector2dF};
use crate::touch_selection::{ActiveStatus, SelectionEventType};

/// Host-side menu implementation driven by [`ExternalMenuController`].
pub trait ExternalMenuDelegate {
    /// `bounds` is the rectangle between the selection bounds, shifted down
    /// by the top content offset.
    fn status_changed(&mut self, status: ActiveStatus, bounds: RectF, handle_drag_in_progress: bool);
    fn insertion_handle_tapped(&mut self);
    fn handle_context_menu(&mut self, params: &ContextMenuParams) -> bool;
}

/// Menu controller for hosts that draw and place their own menu. It only
/// reports selection status; viewport and window bounds are ignored.
pub struct ExternalMenuController {
    client: Rc<dyn TouchEditingMenuControllerClient>,
    delegate: Option<Box<dyn ExternalMenuDelegate>>,
}

impl ExternalMenuController {
    pub fn new(
        client: Rc<dyn TouchEditingMenuControllerClient>,
        delegate: Option<Box<dyn ExternalMenuDelegate>>,
    ) -> Self {
        Self { client, delegate }
    }

    pub fn set_delegate(&mut self, delegate: Option<Box<dyn ExternalMenuDelegate>>) {
        self.delegate = delegate;
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Called by the host's menu when the user dismisses it.
    pub fn hide_and_disallow_showing_automatically(&self) {
        self.client
            .touch_selection_controller()
            .hide_and_disallow_showing_automatically();
    }

    fn notify_status_changed(&mut self, handle_drag_in_progress: bool) {
        let Some(delegate) = self.delegate.as_mut() else {
            return;
        };
        let tsc = self.client.touch_selection_controller();
        let content_offset = self.client.chrome_controller().top_content_offset();
        let bounds = tsc.rect_between_bounds() + Vector2dF::new(0.0, content_offset);
        let status = tsc.active_status();
        tracing::trace!(?status, ?bounds, handle_drag_in_progress, "external menu status");
        delegate.status_changed(status, bounds, handle_drag_in_progress);
    }
}

impl TouchEditingMenuController for ExternalMenuController {
    fn on_selection_event(&mut self, event: SelectionEventType) {
        if self.delegate.is_none() {
            return;
        }

        if event == SelectionEventType::InsertionHandleTapped {
            if let Some(delegate) = self.delegate.as_mut() {
                delegate.insertion_handle_tapped();
            }
            return;
        }

        let dragging = matches!(
            event,
            SelectionEventType::SelectionHandleDragStarted
                | SelectionEventType::InsertionHandleDragStarted
        );
        self.notify_status_changed(dragging);
    }

    fn handle_context_menu(&mut self, params: &ContextMenuParams) -> bool {
        match self.delegate.as_mut() {
            Some(delegate) => delegate.handle_context_menu(params),
            None => false,
        }
    }

    fn touch_selection_controller_swapped(&mut self) {
        self.notify_status_changed(false);
    }

    fn set_viewport_bounds(&mut self, _bounds: RectF) {}

    fn set_top_level_window_bounds(&mut self, _bounds: Rect) {}
}

impl ChromeControllerObserver for ExternalMenuController {
    fn content_or_top_controls_offset_changed(&mut self) {
        self.notify_status_changed(false);
    }
}

use std::rc::Rc;

use super::placement::{compute_menu_placement, PlacementInput};
use super::{
    EditingMenu, EditingMenuClient, EditingMenuFactory, TouchEditingMenuController,
    TouchEditingMenuControllerClient,
};
use crate::capabilities::{EditAction, EditCapabilities};
use crate::chrome::ChromeControllerObserver;
use crate::context_menu::ContextMenuParams;
use crate::geometry::{Rect, RectF, Size};
use crate::task_queue::TaskRunner;
use crate::touch_selection::{ActiveStatus, SelectionEventType};

/// Menu lifecycle as seen from outside. Derived from the controller's flags
/// on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    /// A caret long-press was accepted; waiting for the insertion handle.
    InsertionPending,
    Visible,
    /// A menu exists but is hidden: a handle is being dragged, or no handle
    /// is on screen.
    Suspended,
}

/// Shows, hides and positions a floating editing menu for the current touch
/// selection.
pub struct FloatingMenuController {
    client: Rc<dyn TouchEditingMenuControllerClient>,
    menu_factory: Rc<dyn EditingMenuFactory>,
    task_runner: Rc<dyn TaskRunner>,
    menu_capabilities: EditCapabilities,

    viewport_bounds: RectF,
    viewport_bounds_in_window: RectF,
    top_level_window_bounds: Rect,

    insertion_menu_pending: bool,
    handle_drag_in_progress: bool,

    menu: Option<Box<dyn EditingMenu>>,
}

impl FloatingMenuController {
    pub fn new(
        client: Rc<dyn TouchEditingMenuControllerClient>,
        menu_factory: Rc<dyn EditingMenuFactory>,
        task_runner: Rc<dyn TaskRunner>,
    ) -> Self {
        Self {
            client,
            menu_factory,
            task_runner,
            menu_capabilities: EditCapabilities::MENU_SUPPORTED,
            viewport_bounds: RectF::default(),
            viewport_bounds_in_window: RectF::default(),
            top_level_window_bounds: Rect::default(),
            insertion_menu_pending: false,
            handle_drag_in_progress: false,
            menu: None,
        }
    }

    /// Restricts which actions future menus may offer. Always narrowed to
    /// [`EditCapabilities::MENU_SUPPORTED`].
    pub fn with_menu_capabilities(mut self, capabilities: EditCapabilities) -> Self {
        self.menu_capabilities = capabilities.for_menu();
        self
    }

    pub fn menu_state(&self) -> MenuState {
        if self.menu.is_some() {
            if self.should_show_menu() {
                MenuState::Visible
            } else {
                MenuState::Suspended
            }
        } else if self.insertion_menu_pending {
            MenuState::InsertionPending
        } else {
            MenuState::Idle
        }
    }

    pub fn has_menu(&self) -> bool {
        self.menu.is_some()
    }

    pub fn handle_drag_in_progress(&self) -> bool {
        self.handle_drag_in_progress
    }

    pub fn viewport_bounds(&self) -> RectF {
        self.viewport_bounds
    }

    pub fn viewport_bounds_in_window(&self) -> RectF {
        self.viewport_bounds_in_window
    }

    pub fn top_level_window_bounds(&self) -> Rect {
        self.top_level_window_bounds
    }

    fn placement_input(&self, menu_size: Size) -> PlacementInput {
        let tsc = self.client.touch_selection_controller();
        let chrome = self.client.chrome_controller();
        PlacementInput {
            selection_rect: tsc.rect_between_bounds(),
            start_handle_rect: tsc.start_handle_rect(),
            end_handle_rect: tsc.end_handle_rect(),
            top_content_offset: chrome.top_content_offset(),
            top_controls_height: chrome.top_controls_height(),
            top_controls_offset: chrome.top_controls_offset(),
            menu_size,
            viewport_bounds_in_window: self.viewport_bounds_in_window,
            window_size: self.top_level_window_bounds.size(),
        }
    }

    fn should_show_menu(&self) -> bool {
        if self.handle_drag_in_progress {
            return false;
        }
        let tsc = self.client.touch_selection_controller();
        !(tsc.start_handle_rect().is_empty() && tsc.end_handle_rect().is_empty())
    }

    fn clear_selection(&self) {
        self.client.web_contents().collapse_selection();
    }

    /// Creates the menu if needed, then positions it and applies visibility.
    /// Returns `false` if no menu could be created.
    fn show_menu(&mut self) -> bool {
        self.insertion_menu_pending = false;
        if self.menu.is_none() {
            let capabilities = self.client.editing_capabilities() & self.menu_capabilities;
            self.menu = self.menu_factory.create_menu(capabilities);
            match self.menu {
                Some(_) => tracing::debug!(?capabilities, "touch editing menu created"),
                None => tracing::debug!(?capabilities, "no touch editing menu available"),
            }
        }

        if self.menu.is_none() {
            return false;
        }

        self.update_menu_position();
        self.update_menu_visibility();
        true
    }

    fn update_menu_visibility(&mut self) {
        if self.menu.is_none() {
            return;
        }
        let show = self.should_show_menu();
        if let Some(menu) = self.menu.as_mut() {
            if show {
                menu.show();
            } else {
                menu.hide();
            }
        }
    }

    fn update_menu_position(&mut self) {
        let Some(menu_size) = self.menu.as_ref().map(|menu| menu.size_including_margin()) else {
            return;
        };
        let placement = compute_menu_placement(&self.placement_input(menu_size));
        tracing::trace!(
            x = placement.origin.x,
            y = placement.origin.y,
            tier = ?placement.tier,
            "touch editing menu placed"
        );
        if let Some(menu) = self.menu.as_mut() {
            menu.set_origin(placement.origin);
        }
    }

    /// Hides the menu and hands it to the task runner. The drop happens on a
    /// later turn so a menu whose callback led here outlives this call.
    fn clear_menu(&mut self) {
        self.insertion_menu_pending = false;
        if let Some(mut menu) = self.menu.take() {
            menu.hide();
            self.task_runner.delete_soon(menu);
            tracing::debug!("touch editing menu released");
        }
    }

    fn recompute_viewport_bounds_in_window(&mut self) -> bool {
        let bounds_in_window =
            self.viewport_bounds - self.top_level_window_bounds.origin_offset();
        if bounds_in_window == self.viewport_bounds_in_window {
            return false;
        }
        self.viewport_bounds_in_window = bounds_in_window;
        true
    }
}

impl TouchEditingMenuController for FloatingMenuController {
    fn on_selection_event(&mut self, event: SelectionEventType) {
        let before = self.menu_state();
        match event {
            SelectionEventType::SelectionHandlesShown => {
                if !self.show_menu() {
                    self.clear_selection();
                }
            }
            SelectionEventType::SelectionHandlesMoved | SelectionEventType::InsertionHandleMoved => {
                self.update_menu_position();
                self.update_menu_visibility();
            }
            SelectionEventType::SelectionHandlesCleared
            | SelectionEventType::InsertionHandleCleared => {
                self.clear_menu();
            }
            SelectionEventType::SelectionHandleDragStarted
            | SelectionEventType::InsertionHandleDragStarted => {
                self.handle_drag_in_progress = true;
                self.update_menu_visibility();
            }
            SelectionEventType::SelectionHandleDragStopped
            | SelectionEventType::InsertionHandleDragStopped => {
                if !self.handle_drag_in_progress {
                    tracing::warn!(?event, "handle drag stopped without a drag in progress");
                }
                self.handle_drag_in_progress = false;
                self.update_menu_visibility();
            }
            SelectionEventType::InsertionHandleShown => {
                if self.insertion_menu_pending {
                    self.show_menu();
                }
            }
            SelectionEventType::InsertionHandleTapped => {
                if self.menu.is_some() {
                    self.clear_menu();
                } else {
                    self.show_menu();
                }
            }
        }
        let after = self.menu_state();
        if before != after {
            tracing::debug!(?event, from = ?before, to = ?after, "touch editing menu state changed");
        }
    }

    fn handle_context_menu(&mut self, params: &ContextMenuParams) -> bool {
        if !params.is_caret_long_press() {
            return false;
        }

        if self.client.touch_selection_controller().active_status()
            == ActiveStatus::InsertionActive
        {
            self.show_menu();
        } else {
            // Wait for an active insertion so the menu is not first shown in
            // the wrong place.
            if self.menu.is_some() {
                tracing::warn!("caret context menu requested while a menu already exists");
            }
            self.insertion_menu_pending = true;
        }
        true
    }

    fn touch_selection_controller_swapped(&mut self) {
        self.clear_menu();
        self.handle_drag_in_progress = false;
    }

    fn set_viewport_bounds(&mut self, bounds: RectF) {
        if bounds == self.viewport_bounds {
            return;
        }
        self.viewport_bounds = bounds;
        if self.recompute_viewport_bounds_in_window() {
            self.update_menu_position();
        }
    }

    fn set_top_level_window_bounds(&mut self, bounds: Rect) {
        if bounds == self.top_level_window_bounds {
            return;
        }
        let size_changed = bounds.size() != self.top_level_window_bounds.size();
        self.top_level_window_bounds = bounds;
        let moved = self.recompute_viewport_bounds_in_window();
        if moved || size_changed {
            self.update_menu_position();
        }
    }
}

impl EditingMenuClient for FloatingMenuController {
    fn execute_command(&mut self, action: EditAction) {
        if self.menu.is_none() {
            tracing::debug!(?action, "ignoring menu command without a menu");
            return;
        }

        let web_contents = self.client.web_contents();
        match action {
            EditAction::Cut => web_contents.cut(),
            EditAction::Copy => web_contents.copy(),
            EditAction::Paste => web_contents.paste(),
            EditAction::SelectAll => web_contents.select_all(),
        }
        tracing::debug!(?action, "touch editing command executed");

        if action.closes_menu() {
            self.close();
        }
    }

    fn close(&mut self) {
        let Some(mut menu) = self.menu.take() else {
            return;
        };
        menu.hide();

        let tsc = self.client.touch_selection_controller();
        // Edit commands do not reliably clear the selection highlight.
        if tsc.active_status() == ActiveStatus::SelectionActive {
            self.clear_selection();
        }
        tsc.hide_and_disallow_showing_automatically();

        // Hidden handles end any drag, but the selection source has no way
        // to report that from here.
        self.handle_drag_in_progress = false;
        self.insertion_menu_pending = false;
        self.task_runner.delete_soon(menu);
        tracing::debug!("touch editing menu closed");
    }

    fn was_resized(&mut self) {
        self.update_menu_position();
    }
}

impl ChromeControllerObserver for FloatingMenuController {
    fn content_or_top_controls_offset_changed(&mut self) {
        self.update_menu_position();
    }
}

impl std::fmt::Debug for FloatingMenuController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingMenuController")
            .field("state", &self.menu_state())
            .field("viewport_bounds", &self.viewport_bounds)
            .field("viewport_bounds_in_window", &self.viewport_bounds_in_window)
            .field("top_level_window_bounds", &self.top_level_window_bounds)
            .field("menu_capabilities", &self.menu_capabilities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::FrameMetadata;
    use crate::config::TouchEditingConfig;
    use crate::context_menu::MenuSourceType;
    use crate::geometry::PointF;
    use crate::headless::{EditCall, HeadlessHost, MenuCall};
    use crate::touch_selection::{BoundKind, SelectionBound, TouchSelectionSource};

    const MENU_SIZE: Size = Size::new(300, 50);

    fn bound(kind: BoundKind, x: f32, top: f32, bottom: f32, visible: bool) -> SelectionBound {
        SelectionBound::new(kind, PointF::new(x, top), PointF::new(x, bottom), visible)
    }

    /// Viewport sits at (100, 100) inside a 1000x800 window.
    fn host() -> HeadlessHost {
        let mut host = HeadlessHost::new(MENU_SIZE);
        host.set_viewport_bounds(RectF::new(600.0, 600.0, 800.0, 600.0));
        host.set_top_level_window_bounds(Rect::new(500, 500, 1000, 800));
        host
    }

    fn select(host: &mut HeadlessHost, left: f32, right: f32, top: f32, bottom: f32) {
        host.set_selection_bounds(
            bound(BoundKind::Left, left, top, bottom, true),
            bound(BoundKind::Right, right, top, bottom, true),
        );
    }

    fn caret(host: &mut HeadlessHost, x: f32) {
        let caret = bound(BoundKind::Center, x, 50.0, 100.0, true);
        host.set_selection_bounds(caret, caret);
    }

    fn created() -> MenuCall {
        MenuCall::Created {
            capabilities: EditCapabilities::MENU_SUPPORTED,
        }
    }

    fn origin(x: f32, y: f32) -> MenuCall {
        MenuCall::SetOrigin(PointF::new(x, y))
    }

    fn shown_selection_host() -> HeadlessHost {
        let mut host = host();
        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(250.0, 0.0), MenuCall::Show]
        );
        host
    }

    #[test]
    fn selection_shown_creates_positions_and_shows_menu() {
        let mut host = HeadlessHost::new(MENU_SIZE);
        host.set_viewport_bounds(RectF::new(600.0, 600.0, 800.0, 600.0));
        host.set_top_level_window_bounds(Rect::new(550, 550, 900, 700));
        select(&mut host, 50.0, 750.0, 50.0, 100.0);

        assert_eq!(
            host.menu_calls(),
            vec![created(), origin(250.0, 0.0), MenuCall::Show]
        );
        assert_eq!(host.controller().menu_state(), MenuState::Visible);
    }

    #[test]
    fn drag_hides_without_moving_and_stop_shows_again() {
        let mut host = HeadlessHost::new(MENU_SIZE);
        host.set_viewport_bounds(RectF::new(600.0, 600.0, 800.0, 600.0));
        host.set_top_level_window_bounds(Rect::new(550, 550, 900, 700));
        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        host.take_menu_calls();

        host.begin_handle_drag();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        assert_eq!(host.controller().menu_state(), MenuState::Suspended);

        host.end_handle_drag();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Show]);

        host.begin_handle_drag();
        select(&mut host, 50.0, 750.0, 60.0, 110.0);
        assert_eq!(
            host.take_menu_calls(),
            vec![MenuCall::Hide, origin(250.0, 10.0), MenuCall::Hide]
        );
        host.end_handle_drag();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Show]);
        assert!(!host.controller().handle_drag_in_progress());
    }

    #[test]
    fn caret_long_press_waits_for_insertion_handle() {
        let mut host = host();
        let params = ContextMenuParams::long_press(true, "");

        assert!(host.handle_context_menu(&params));
        assert_eq!(host.controller().menu_state(), MenuState::InsertionPending);
        assert!(host.menu_calls().is_empty());

        caret(&mut host, 50.0);
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(-100.0, 0.0), MenuCall::Show]
        );
        assert_eq!(host.controller().menu_state(), MenuState::Visible);
    }

    #[test]
    fn caret_long_press_with_active_insertion_shows_immediately() {
        let mut host = host();
        caret(&mut host, 50.0);
        assert!(host.menu_calls().is_empty());

        assert!(host.handle_context_menu(&ContextMenuParams::long_press(true, "")));
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(-100.0, 0.0), MenuCall::Show]
        );
    }

    #[test]
    fn only_caret_long_press_is_taken_over() {
        let cases = [
            (MenuSourceType::LongPress, true, "", true),
            (MenuSourceType::LongPress, false, "", false),
            (MenuSourceType::LongPress, true, "word", false),
            (MenuSourceType::LongTap, true, "", false),
            (MenuSourceType::Touch, true, "", false),
            (MenuSourceType::Mouse, true, "", false),
        ];

        for (source_type, is_editable, text, expected) in cases {
            let mut host = host();
            let params = ContextMenuParams {
                source_type,
                is_editable,
                selection_text: text.to_string(),
                ..ContextMenuParams::default()
            };
            assert_eq!(
                host.handle_context_menu(&params),
                expected,
                "{source_type:?} editable={is_editable} text={text:?}"
            );
            let state = if expected {
                MenuState::InsertionPending
            } else {
                MenuState::Idle
            };
            assert_eq!(host.controller().menu_state(), state);
        }
    }

    #[test]
    fn long_press_while_selection_menu_exists_keeps_menu() {
        let mut host = shown_selection_host();

        assert!(host.handle_context_menu(&ContextMenuParams::long_press(true, "")));
        assert_eq!(host.controller().menu_state(), MenuState::Visible);
        assert!(host.menu_calls().is_empty());

        host.set_selection_bounds(SelectionBound::empty(), SelectionBound::empty());
        assert_eq!(host.controller().menu_state(), MenuState::Idle);
    }

    #[test]
    fn insertion_shown_without_request_creates_no_menu() {
        let mut host = host();
        caret(&mut host, 50.0);
        assert!(host.menu_calls().is_empty());
        assert_eq!(host.controller().menu_state(), MenuState::Idle);
    }

    #[test]
    fn copy_collapses_selection_and_defers_menu_release() {
        let mut host = shown_selection_host();

        host.execute_command(EditAction::Copy);

        assert_eq!(host.edit_calls(), vec![EditCall::Copy, EditCall::CollapseSelection]);
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        assert_eq!(
            host.client().selection().active_status(),
            ActiveStatus::Inactive
        );
        assert!(!host.controller().has_menu());
        // Still alive until the task queue runs.
        assert!(host.factory().menu_alive());
        assert!(!host.factory().dropped_during_callback());
        assert_eq!(host.tasks().pending(), 1);

        assert_eq!(host.run_until_idle(), 1);
        assert!(!host.factory().menu_alive());
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Destroyed]);
    }

    #[test]
    fn menu_outlives_command_issued_from_its_own_callback() {
        let mut host = shown_selection_host();
        let factory = host.factory_handle();

        factory.in_menu_callback(|| {
            host.controller_mut().execute_command(EditAction::Cut);
            assert!(factory.menu_alive());
            assert!(!host.controller().has_menu());
        });
        assert!(!factory.dropped_during_callback());
        assert!(factory.menu_alive());

        host.run_until_idle();
        assert!(!factory.menu_alive());
        assert!(!factory.dropped_during_callback());
    }

    #[test]
    fn menu_outlives_close_issued_from_its_own_callback() {
        let mut host = shown_selection_host();
        let factory = host.factory_handle();

        factory.in_menu_callback(|| host.controller_mut().close());
        assert!(factory.menu_alive());

        host.run_until_idle();
        assert!(!factory.menu_alive());
        assert!(!factory.dropped_during_callback());
    }

    #[test]
    fn cut_during_selection_collapses_it() {
        let mut host = shown_selection_host();
        host.execute_command(EditAction::Cut);
        assert_eq!(host.edit_calls(), vec![EditCall::Cut, EditCall::CollapseSelection]);
    }

    #[test]
    fn select_all_keeps_menu_open() {
        let mut host = shown_selection_host();

        host.execute_command(EditAction::SelectAll);

        assert_eq!(host.edit_calls(), vec![EditCall::SelectAll]);
        assert!(host.menu_calls().is_empty());
        assert!(host.controller().has_menu());
        assert_eq!(host.tasks().pending(), 0);
    }

    #[test]
    fn paste_at_caret_does_not_collapse() {
        let mut host = host();
        caret(&mut host, 50.0);
        host.tap_insertion_handle();
        host.take_menu_calls();

        host.execute_command(EditAction::Paste);

        assert_eq!(host.edit_calls(), vec![EditCall::Paste]);
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        assert_eq!(
            host.client().selection().active_status(),
            ActiveStatus::Inactive
        );
    }

    #[test]
    fn commands_and_close_without_menu_are_ignored() {
        let mut host = host();
        host.execute_command(EditAction::Copy);
        host.close_menu();

        assert!(host.edit_calls().is_empty());
        assert!(host.menu_calls().is_empty());
        assert_eq!(host.tasks().pending(), 0);
    }

    #[test]
    fn close_hides_handles_until_next_interaction() {
        let mut host = shown_selection_host();

        host.close_menu();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        assert_eq!(host.edit_calls(), vec![EditCall::CollapseSelection]);

        select(&mut host, 50.0, 750.0, 60.0, 110.0);
        assert!(host.menu_calls().is_empty());

        host.run_until_idle();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Destroyed]);
    }

    #[test]
    fn cleared_selection_releases_menu_on_next_turn() {
        let mut host = shown_selection_host();

        host.set_selection_bounds(SelectionBound::empty(), SelectionBound::empty());
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        assert_eq!(host.controller().menu_state(), MenuState::Idle);

        host.run_until_idle();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Destroyed]);
    }

    #[test]
    fn insertion_tap_toggles_menu() {
        let mut host = host();
        caret(&mut host, 50.0);

        host.tap_insertion_handle();
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(-100.0, 0.0), MenuCall::Show]
        );

        host.tap_insertion_handle();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        host.run_until_idle();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Destroyed]);
    }

    #[test]
    fn insertion_move_repositions_menu() {
        let mut host = host();
        caret(&mut host, 50.0);
        host.tap_insertion_handle();
        host.take_menu_calls();

        caret(&mut host, 70.0);
        assert_eq!(
            host.take_menu_calls(),
            vec![origin(-80.0, 0.0), MenuCall::Show]
        );
    }

    #[test]
    fn swapping_selection_controller_resets_menu() {
        let mut host = shown_selection_host();
        host.begin_handle_drag();
        host.take_menu_calls();

        host.swap_selection_controller();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Hide]);
        assert_eq!(host.controller().menu_state(), MenuState::Idle);
        assert!(!host.controller().handle_drag_in_progress());
        host.run_until_idle();
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Destroyed]);

        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(250.0, 0.0), MenuCall::Show]
        );
    }

    #[test]
    fn resize_repositions_with_new_size() {
        let mut host = shown_selection_host();

        host.resize_menu(Size::new(400, 100));
        assert_eq!(host.take_menu_calls(), vec![origin(200.0, 110.0)]);
    }

    #[test]
    fn visibility_follows_handle_visibility() {
        let mut host = shown_selection_host();

        host.set_selection_bounds(
            bound(BoundKind::Left, 50.0, 60.0, 110.0, false),
            bound(BoundKind::Right, 750.0, 60.0, 110.0, false),
        );
        assert_eq!(
            host.take_menu_calls(),
            vec![origin(250.0, 10.0), MenuCall::Hide]
        );
        assert_eq!(host.controller().menu_state(), MenuState::Suspended);

        host.set_selection_bounds(
            bound(BoundKind::Left, 50.0, 60.0, 110.0, false),
            bound(BoundKind::Right, 750.0, 60.0, 110.0, true),
        );
        assert_eq!(
            host.take_menu_calls(),
            vec![origin(600.0, 10.0), MenuCall::Show]
        );
        assert_eq!(host.controller().menu_state(), MenuState::Visible);
    }

    #[test]
    fn clearing_selection_mid_drag_does_not_leave_next_menu_hidden() {
        let mut host = shown_selection_host();
        host.begin_handle_drag();
        host.set_selection_bounds(SelectionBound::empty(), SelectionBound::empty());
        assert!(!host.controller().handle_drag_in_progress());
        host.run_until_idle();
        host.take_menu_calls();

        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        host.end_handle_drag();

        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(250.0, 0.0), MenuCall::Show]
        );
        assert!(!host.controller().handle_drag_in_progress());
        assert_eq!(host.controller().menu_state(), MenuState::Visible);
    }

    #[test]
    fn closing_mid_drag_resets_drag_state() {
        let mut host = shown_selection_host();
        host.begin_handle_drag();
        host.close_menu();
        assert!(!host.controller().handle_drag_in_progress());
        host.run_until_idle();
        host.take_menu_calls();

        host.allow_showing_automatically();
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(250.0, 0.0), MenuCall::Show]
        );
        assert_eq!(host.controller().menu_state(), MenuState::Visible);
    }

    #[test]
    fn unmatched_drag_stop_recomputes_visibility() {
        let mut host = shown_selection_host();

        host.controller_mut()
            .on_selection_event(SelectionEventType::SelectionHandleDragStopped);
        assert_eq!(host.take_menu_calls(), vec![MenuCall::Show]);
        assert!(!host.controller().handle_drag_in_progress());
    }

    #[test]
    fn missing_menu_collapses_selection() {
        let mut host = host();
        host.factory().set_creates_menus(false);

        select(&mut host, 50.0, 750.0, 50.0, 100.0);

        assert!(host.menu_calls().is_empty());
        assert_eq!(host.edit_calls(), vec![EditCall::CollapseSelection]);
        assert_eq!(host.controller().menu_state(), MenuState::Idle);
    }

    #[test]
    fn menu_capabilities_intersect_page_and_config() {
        let config = TouchEditingConfig {
            menu_actions: Some(vec![EditAction::Copy, EditAction::Paste]),
            handle_size: None,
        };
        let mut host = HeadlessHost::with_config(MENU_SIZE, &config);
        host.client().set_editing_capabilities(
            EditCapabilities::UNDO
                | EditCapabilities::CUT
                | EditCapabilities::COPY
                | EditCapabilities::DELETE,
        );

        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        assert_eq!(
            host.menu_calls().first(),
            Some(&MenuCall::Created {
                capabilities: EditCapabilities::COPY
            })
        );
    }

    #[test]
    fn viewport_in_window_tracks_both_sources() {
        let mut host = HeadlessHost::new(MENU_SIZE);
        let steps: [(Option<RectF>, Option<Rect>); 6] = [
            (Some(RectF::new(600.0, 600.0, 800.0, 600.0)), None),
            (None, Some(Rect::new(500, 500, 1000, 800))),
            (Some(RectF::new(520.5, 610.0, 640.0, 480.0)), None),
            (None, Some(Rect::new(-100, 40, 1920, 1080))),
            (None, Some(Rect::new(-100, 40, 1280, 720))),
            (Some(RectF::new(0.0, 0.0, 10.0, 10.0)), Some(Rect::new(0, 0, 10, 10))),
        ];

        for (viewport, window) in steps {
            if let Some(viewport) = viewport {
                host.set_viewport_bounds(viewport);
            }
            if let Some(window) = window {
                host.set_top_level_window_bounds(window);
            }
            let controller = host.controller();
            assert_eq!(
                controller.viewport_bounds_in_window(),
                controller.viewport_bounds() - controller.top_level_window_bounds().origin_offset()
            );
        }
    }

    #[test]
    fn viewport_change_repositions_once() {
        let mut host = host();
        select(&mut host, 50.0, 750.0, 40.0, 90.0);
        assert_eq!(host.take_menu_calls()[1], origin(250.0, 100.0));

        host.set_viewport_bounds(RectF::new(600.0, 600.0, 800.0, 100.0));
        assert_eq!(host.take_menu_calls(), vec![origin(250.0, -10.0)]);

        host.set_viewport_bounds(RectF::new(600.0, 600.0, 800.0, 100.0));
        assert!(host.menu_calls().is_empty());

        host.set_viewport_bounds(RectF::new(500.0, 500.0, 800.0, 100.0));
        assert_eq!(host.take_menu_calls(), vec![origin(250.0, 100.0)]);
    }

    #[test]
    fn window_change_repositions_once() {
        let mut host = host();
        caret(&mut host, 50.0);
        host.tap_insertion_handle();
        host.take_menu_calls();

        host.set_top_level_window_bounds(Rect::new(400, 400, 1000, 800));
        assert_eq!(host.take_menu_calls(), vec![origin(-100.0, 0.0)]);

        host.set_top_level_window_bounds(Rect::new(400, 400, 1000, 800));
        assert!(host.menu_calls().is_empty());

        // Same origin, new size.
        host.set_top_level_window_bounds(Rect::new(400, 400, 1200, 800));
        assert_eq!(host.take_menu_calls(), vec![origin(-100.0, 0.0)]);

        host.set_top_level_window_bounds(Rect::new(600, 500, 1000, 800));
        assert_eq!(host.take_menu_calls(), vec![origin(0.0, 0.0)]);
    }

    #[test]
    fn chrome_offset_change_moves_menu_down() {
        let mut host = host();
        host.set_top_controls_height(50.0);
        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        assert_eq!(
            host.take_menu_calls(),
            vec![created(), origin(250.0, 0.0), MenuCall::Show]
        );

        host.frame_metadata_updated(FrameMetadata::new(50.0, 1.0));
        assert_eq!(host.take_menu_calls(), vec![origin(250.0, 50.0)]);

        host.frame_metadata_updated(FrameMetadata::new(50.0, 1.0));
        assert!(host.menu_calls().is_empty());
    }

    /// Compares the most recent Show/Hide sent to the menu with the visibility
    /// rule, and drains the log.
    fn assert_visibility_matches_state(host: &HeadlessHost, step: &str) {
        let tsc = host.client().selection();
        let expected = host.controller().has_menu()
            && !host.controller().handle_drag_in_progress()
            && !(tsc.start_handle_rect().is_empty() && tsc.end_handle_rect().is_empty());
        let last = host
            .take_menu_calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                MenuCall::Show => Some(true),
                MenuCall::Hide => Some(false),
                _ => None,
            });

        assert_eq!(last, Some(expected), "after {step}");
        assert_eq!(
            host.controller().menu_state() == MenuState::Visible,
            expected,
            "after {step}"
        );
    }

    #[test]
    fn visibility_matches_state_after_every_event() {
        let mut host = host();

        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        assert_visibility_matches_state(&host, "selection shown");

        host.begin_handle_drag();
        assert_visibility_matches_state(&host, "drag start");

        select(&mut host, 50.0, 750.0, 60.0, 110.0);
        assert_visibility_matches_state(&host, "move while dragging");

        host.end_handle_drag();
        assert_visibility_matches_state(&host, "drag stop");

        host.set_selection_bounds(
            bound(BoundKind::Left, 50.0, 60.0, 110.0, false),
            bound(BoundKind::Right, 750.0, 60.0, 110.0, false),
        );
        assert_visibility_matches_state(&host, "both handles hidden");

        host.set_selection_bounds(
            bound(BoundKind::Left, 50.0, 60.0, 110.0, true),
            bound(BoundKind::Right, 750.0, 60.0, 110.0, false),
        );
        assert_visibility_matches_state(&host, "start handle visible");

        host.begin_handle_drag();
        assert_visibility_matches_state(&host, "second drag start");

        host.set_selection_bounds(SelectionBound::empty(), SelectionBound::empty());
        assert_visibility_matches_state(&host, "clear while dragging");
        host.run_until_idle();
        host.take_menu_calls();

        select(&mut host, 50.0, 750.0, 50.0, 100.0);
        assert_visibility_matches_state(&host, "selection after clear");

        caret(&mut host, 50.0);
        host.tap_insertion_handle();
        assert_visibility_matches_state(&host, "insertion tap");

        host.begin_handle_drag();
        assert_visibility_matches_state(&host, "caret drag start");

        host.end_handle_drag();
        assert_visibility_matches_state(&host, "caret drag stop");
    }
}

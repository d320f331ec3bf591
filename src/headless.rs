//! In-process stand-ins for every collaborator of the menu controllers, plus a
//! host that wires them together the way a web view would.
//!
//! Nothing here draws anything. Menus and the page record what was asked of
//! them so callers can inspect the sequence afterwards.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::capabilities::{EditAction, EditCapabilities};
use crate::chrome::{ChromeController, ChromeControllerObserver, ChromeState, FrameMetadata};
use crate::config::TouchEditingConfig;
use crate::context_menu::ContextMenuParams;
use crate::geometry::{PointF, Rect, RectF, Size};
use crate::menu::{
    EditingMenu, EditingMenuClient, EditingMenuFactory, FloatingMenuController,
    TouchEditingMenuController, TouchEditingMenuControllerClient, WebContentsEditing,
};
use crate::task_queue::{LocalTaskQueue, TaskRunner};
use crate::touch_selection::{
    SelectionBound, SelectionEventType, SelectionTracker, TouchSelectionSource,
    DEFAULT_HANDLE_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuCall {
    Created { capabilities: EditCapabilities },
    Show,
    Hide,
    SetOrigin(PointF),
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCall {
    Cut,
    Copy,
    Paste,
    SelectAll,
    CollapseSelection,
}

/// Page editing API that only records calls.
#[derive(Debug, Default)]
pub struct RecordingWebContents {
    calls: RefCell<Vec<EditCall>>,
}

impl RecordingWebContents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EditCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<EditCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: EditCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl WebContentsEditing for RecordingWebContents {
    fn cut(&self) {
        self.record(EditCall::Cut);
    }

    fn copy(&self) {
        self.record(EditCall::Copy);
    }

    fn paste(&self) {
        self.record(EditCall::Paste);
    }

    fn select_all(&self) {
        self.record(EditCall::SelectAll);
    }

    fn collapse_selection(&self) {
        self.record(EditCall::CollapseSelection);
    }
}

/// Controller client backed by a [`SelectionTracker`] and a [`ChromeState`].
pub struct HeadlessClient {
    selection: RefCell<Rc<SelectionTracker>>,
    handle_size: f32,
    chrome: Rc<ChromeState>,
    web_contents: Rc<RecordingWebContents>,
    editing_capabilities: Cell<EditCapabilities>,
}

impl Default for HeadlessClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessClient {
    pub fn new() -> Self {
        Self::with_handle_size(DEFAULT_HANDLE_SIZE)
    }

    pub fn with_handle_size(handle_size: f32) -> Self {
        Self {
            selection: RefCell::new(Rc::new(SelectionTracker::with_handle_size(handle_size))),
            handle_size,
            chrome: Rc::new(ChromeState::new()),
            web_contents: Rc::new(RecordingWebContents::new()),
            editing_capabilities: Cell::new(EditCapabilities::all()),
        }
    }

    pub fn selection(&self) -> Rc<SelectionTracker> {
        self.selection.borrow().clone()
    }

    pub fn chrome(&self) -> Rc<ChromeState> {
        self.chrome.clone()
    }

    pub fn editing(&self) -> Rc<RecordingWebContents> {
        self.web_contents.clone()
    }

    pub fn set_editing_capabilities(&self, capabilities: EditCapabilities) {
        self.editing_capabilities.set(capabilities);
    }

    /// Replaces the touch selection controller with a fresh one and returns
    /// the previous one.
    pub fn swap_selection(&self) -> Rc<SelectionTracker> {
        let fresh = Rc::new(SelectionTracker::with_handle_size(self.handle_size));
        self.selection.replace(fresh)
    }
}

impl TouchEditingMenuControllerClient for HeadlessClient {
    fn touch_selection_controller(&self) -> Rc<dyn TouchSelectionSource> {
        self.selection()
    }

    fn chrome_controller(&self) -> Rc<dyn ChromeController> {
        self.chrome.clone()
    }

    fn editing_capabilities(&self) -> EditCapabilities {
        self.editing_capabilities.get()
    }

    fn web_contents(&self) -> Rc<dyn WebContentsEditing> {
        self.web_contents.clone()
    }
}

type CallLog = Rc<RefCell<Vec<MenuCall>>>;

/// Menu that records what it is asked to do. Its size is shared with the
/// factory so a test can resize it from outside.
pub struct RecordingMenu {
    log: CallLog,
    size: Rc<Cell<Size>>,
    alive: Rc<Cell<bool>>,
    in_callback: Rc<Cell<bool>>,
    dropped_during_callback: Rc<Cell<bool>>,
}

impl EditingMenu for RecordingMenu {
    fn show(&mut self) {
        self.log.borrow_mut().push(MenuCall::Show);
    }

    fn hide(&mut self) {
        self.log.borrow_mut().push(MenuCall::Hide);
    }

    fn size_including_margin(&self) -> Size {
        self.size.get()
    }

    fn set_origin(&mut self, origin: PointF) {
        self.log.borrow_mut().push(MenuCall::SetOrigin(origin));
    }
}

impl Drop for RecordingMenu {
    fn drop(&mut self) {
        if self.in_callback.get() {
            tracing::error!("touch editing menu dropped inside its own callback");
            self.dropped_during_callback.set(true);
        }
        self.alive.set(false);
        self.log.borrow_mut().push(MenuCall::Destroyed);
    }
}

#[derive(Debug)]
pub struct RecordingMenuFactory {
    log: CallLog,
    size: Rc<Cell<Size>>,
    alive: Rc<Cell<bool>>,
    in_callback: Rc<Cell<bool>>,
    dropped_during_callback: Rc<Cell<bool>>,
    creates_menus: Cell<bool>,
}

impl RecordingMenuFactory {
    pub fn new(initial_size: Size) -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            size: Rc::new(Cell::new(initial_size)),
            alive: Rc::new(Cell::new(false)),
            in_callback: Rc::new(Cell::new(false)),
            dropped_during_callback: Rc::new(Cell::new(false)),
            creates_menus: Cell::new(true),
        }
    }

    /// When `false`, `create_menu` returns `None`.
    pub fn set_creates_menus(&self, creates_menus: bool) {
        self.creates_menus.set(creates_menus);
    }

    pub fn set_menu_size(&self, size: Size) {
        self.size.set(size);
    }

    pub fn menu_size(&self) -> Size {
        self.size.get()
    }

    /// Whether the last created menu has not been dropped yet.
    pub fn menu_alive(&self) -> bool {
        self.alive.get()
    }

    /// Runs `f` as if it were a callback of the live menu, such as a menu
    /// item being picked.
    pub fn in_menu_callback<R>(&self, f: impl FnOnce() -> R) -> R {
        let previous = self.in_callback.replace(true);
        let result = f();
        self.in_callback.set(previous);
        result
    }

    /// Whether any menu was dropped while one of its callbacks was running.
    pub fn dropped_during_callback(&self) -> bool {
        self.dropped_during_callback.get()
    }

    pub fn calls(&self) -> Vec<MenuCall> {
        self.log.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<MenuCall> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn last_origin(&self) -> Option<PointF> {
        self.log.borrow().iter().rev().find_map(|call| match call {
            MenuCall::SetOrigin(origin) => Some(*origin),
            _ => None,
        })
    }
}

impl EditingMenuFactory for RecordingMenuFactory {
    fn create_menu(&self, capabilities: EditCapabilities) -> Option<Box<dyn EditingMenu>> {
        if !self.creates_menus.get() {
            return None;
        }
        self.log
            .borrow_mut()
            .push(MenuCall::Created { capabilities });
        self.alive.set(true);
        Some(Box::new(RecordingMenu {
            log: self.log.clone(),
            size: self.size.clone(),
            alive: self.alive.clone(),
            in_callback: self.in_callback.clone(),
            dropped_during_callback: self.dropped_during_callback.clone(),
        }))
    }
}

/// A web view in miniature: owns the collaborators and a
/// [`FloatingMenuController`], and routes every notification to it.
pub struct HeadlessHost {
    client: Rc<HeadlessClient>,
    factory: Rc<RecordingMenuFactory>,
    tasks: Rc<LocalTaskQueue>,
    controller: FloatingMenuController,
}

impl HeadlessHost {
    pub fn new(menu_size: Size) -> Self {
        Self::with_config(menu_size, &TouchEditingConfig::default())
    }

    pub fn with_config(menu_size: Size, config: &TouchEditingConfig) -> Self {
        let client = Rc::new(HeadlessClient::with_handle_size(config.handle_size()));
        let factory = Rc::new(RecordingMenuFactory::new(menu_size));
        let tasks = Rc::new(LocalTaskQueue::new());
        let controller = FloatingMenuController::new(
            client.clone(),
            factory.clone(),
            tasks.clone() as Rc<dyn TaskRunner>,
        )
        .with_menu_capabilities(config.menu_capabilities());
        Self {
            client,
            factory,
            tasks,
            controller,
        }
    }

    pub fn client(&self) -> &HeadlessClient {
        &self.client
    }

    pub fn factory(&self) -> &RecordingMenuFactory {
        &self.factory
    }

    pub fn factory_handle(&self) -> Rc<RecordingMenuFactory> {
        self.factory.clone()
    }

    pub fn tasks(&self) -> &LocalTaskQueue {
        &self.tasks
    }

    pub fn controller(&self) -> &FloatingMenuController {
        &self.controller
    }

    /// Direct access for driving the controller with events the tracker
    /// would not produce on its own.
    pub fn controller_mut(&mut self) -> &mut FloatingMenuController {
        &mut self.controller
    }

    pub fn menu_calls(&self) -> Vec<MenuCall> {
        self.factory.calls()
    }

    pub fn take_menu_calls(&self) -> Vec<MenuCall> {
        self.factory.take_calls()
    }

    pub fn edit_calls(&self) -> Vec<EditCall> {
        self.client.editing().calls()
    }

    pub fn set_viewport_bounds(&mut self, bounds: RectF) {
        self.controller.set_viewport_bounds(bounds);
    }

    pub fn set_top_level_window_bounds(&mut self, bounds: Rect) {
        self.controller.set_top_level_window_bounds(bounds);
    }

    pub fn set_selection_bounds(&mut self, start: SelectionBound, end: SelectionBound) {
        let events = self
            .client
            .selection()
            .on_selection_bounds_changed(start, end);
        self.dispatch(events);
    }

    pub fn begin_handle_drag(&mut self) {
        let event = self.client.selection().begin_handle_drag();
        self.dispatch(event);
    }

    pub fn end_handle_drag(&mut self) {
        let event = self.client.selection().end_handle_drag();
        self.dispatch(event);
    }

    pub fn tap_insertion_handle(&mut self) {
        let event = self.client.selection().tap_insertion_handle();
        self.dispatch(event);
    }

    pub fn allow_showing_automatically(&mut self) {
        let events = self.client.selection().allow_showing_automatically();
        self.dispatch(events);
    }

    /// Returns whether the menu controller consumed the request.
    pub fn handle_context_menu(&mut self, params: &ContextMenuParams) -> bool {
        self.controller.handle_context_menu(params)
    }

    pub fn set_top_controls_height(&mut self, height: f32) {
        if self.client.chrome().set_top_controls_height(height) {
            self.controller.content_or_top_controls_offset_changed();
        }
    }

    pub fn frame_metadata_updated(&mut self, metadata: FrameMetadata) {
        if self.client.chrome().frame_metadata_updated(metadata) {
            self.controller.content_or_top_controls_offset_changed();
        }
    }

    /// Simulates the user picking `action` in the menu.
    pub fn execute_command(&mut self, action: EditAction) {
        let controller = &mut self.controller;
        self.factory
            .in_menu_callback(|| controller.execute_command(action));
    }

    /// Simulates the menu's own dismiss affordance.
    pub fn close_menu(&mut self) {
        let controller = &mut self.controller;
        self.factory.in_menu_callback(|| controller.close());
    }

    /// Simulates the menu relaying out to a new size.
    pub fn resize_menu(&mut self, size: Size) {
        if self.factory.menu_size() == size {
            return;
        }
        self.factory.set_menu_size(size);
        if self.factory.menu_alive() {
            let controller = &mut self.controller;
            self.factory.in_menu_callback(|| controller.was_resized());
        }
    }

    pub fn swap_selection_controller(&mut self) {
        self.client.swap_selection();
        self.controller.touch_selection_controller_swapped();
    }

    pub fn run_until_idle(&self) -> usize {
        self.tasks.run_until_idle()
    }

    fn dispatch<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = SelectionEventType>,
    {
        for event in events {
            self.controller.on_selection_event(event);
        }
    }
}

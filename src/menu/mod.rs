//! Touch editing menu: the floating Cut/Copy/Paste/Select-all menu shown for
//! touch selections, its collaborators, and the controllers that drive it.

mod controller;
mod external;
pub mod placement;

pub use controller::{FloatingMenuController, MenuState};
pub use external::{ExternalMenuController, ExternalMenuDelegate};
pub use placement::{compute_menu_placement, MenuPlacement, PlacementInput, PlacementTier};

use std::rc::Rc;

use crate::capabilities::{EditAction, EditCapabilities};
use crate::chrome::ChromeController;
use crate::context_menu::ContextMenuParams;
use crate::geometry::{PointF, Rect, RectF, Size};
use crate::touch_selection::{SelectionEventType, TouchSelectionSource};

/// Platform-rendered floating menu.
pub trait EditingMenu {
    fn show(&mut self);
    fn hide(&mut self);
    fn size_including_margin(&self) -> Size;
    /// Origin in viewport coordinates.
    fn set_origin(&mut self, origin: PointF);
}

/// Callbacks a menu delivers to its controller.
pub trait EditingMenuClient {
    fn execute_command(&mut self, action: EditAction);
    /// The menu's own dismiss affordance was used.
    fn close(&mut self);
    /// The menu changed size on its own, e.g. after relayout of its content.
    fn was_resized(&mut self);
}

pub trait EditingMenuFactory {
    /// `None` means no menu is available on this platform right now.
    fn create_menu(&self, capabilities: EditCapabilities) -> Option<Box<dyn EditingMenu>>;
}

/// Editing commands on the page that owns the selection.
pub trait WebContentsEditing {
    fn cut(&self);
    fn copy(&self);
    fn paste(&self);
    fn select_all(&self);
    fn collapse_selection(&self);
}

/// What a menu controller needs from the web view hosting it.
///
/// Collaborators are returned by `Rc` because the host may swap them (for
/// example a new touch selection controller for a new page) between calls.
pub trait TouchEditingMenuControllerClient {
    fn touch_selection_controller(&self) -> Rc<dyn TouchSelectionSource>;
    fn chrome_controller(&self) -> Rc<dyn ChromeController>;
    /// Edit operations the page currently reports as available.
    fn editing_capabilities(&self) -> EditCapabilities;
    fn web_contents(&self) -> Rc<dyn WebContentsEditing>;
}

/// Entry points the web view calls on whichever menu controller it uses.
pub trait TouchEditingMenuController {
    fn on_selection_event(&mut self, event: SelectionEventType);
    /// Returns `true` if the request was taken over and the caller must not
    /// show its own context menu.
    fn handle_context_menu(&mut self, params: &ContextMenuParams) -> bool;
    fn touch_selection_controller_swapped(&mut self);
    fn set_viewport_bounds(&mut self, bounds: RectF);
    fn set_top_level_window_bounds(&mut self, bounds: Rect);
}

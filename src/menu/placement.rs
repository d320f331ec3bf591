//! Where the touch editing menu goes.
//!
//! All inputs are in viewport coordinates except `window_size`; the returned
//! origin is in viewport coordinates too. `viewport_bounds_in_window` links
//! the two spaces.

use crate::geometry::{PointF, RectF, Size, Vector2dF};

/// Exclusion areas of zero width (a caret) are widened to this so they still
/// take part in unions and comparisons.
const MIN_EXCLUSION_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    pub selection_rect: RectF,
    pub start_handle_rect: RectF,
    pub end_handle_rect: RectF,
    /// Currently shown height of the top controls.
    pub top_content_offset: f32,
    pub top_controls_height: f32,
    pub top_controls_offset: f32,
    pub menu_size: Size,
    pub viewport_bounds_in_window: RectF,
    pub window_size: Size,
}

/// Which rule produced the vertical position, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementTier {
    /// Above the selection, inside the view.
    AboveInView,
    /// Below the selection, inside the view.
    BelowInView,
    /// Above the selection, reaching outside the view into the window.
    AboveInWindow,
    /// Below the selection, reaching outside the view into the window.
    BelowInWindow,
    /// Nothing fits; pinned above and overlapping the selection.
    Obscuring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPlacement {
    pub origin: PointF,
    pub tier: PlacementTier,
}

pub fn compute_menu_placement(input: &PlacementInput) -> MenuPlacement {
    let (y, tier) = compute_y_offset(input);
    MenuPlacement {
        origin: PointF::new(compute_x_offset(input), y),
        tier,
    }
}

/// Centres the menu on the selection, then clamps it into the window.
pub fn compute_x_offset(input: &PlacementInput) -> f32 {
    let selection = input.selection_rect;
    let in_window = input.viewport_bounds_in_window;
    let menu_width = input.menu_size.width as f32;

    let x = selection.x + (selection.width - menu_width) / 2.0;
    let window_x = x + in_window.x;

    if window_x < 0.0 {
        // Left edge of the window
        return -in_window.x;
    }

    let window_width = input.window_size.width;
    if window_x + menu_width > window_width as f32 {
        // Right edge of the window, or the left edge if it cannot fit at all
        return (window_width - input.menu_size.width).max(0) as f32 - in_window.x;
    }

    x
}

pub fn compute_y_offset(input: &PlacementInput) -> (f32, PlacementTier) {
    let content_offset = Vector2dF::new(0.0, input.top_content_offset);
    let in_window = input.viewport_bounds_in_window;
    let window_height = input.window_size.height as f32;
    let menu_height = input.menu_size.height as f32;

    let mut exclusion = input.selection_rect + content_offset;
    if exclusion.is_empty() {
        exclusion.set_width(MIN_EXCLUSION_WIDTH);
    }
    exclusion.union(input.start_handle_rect + content_offset);
    exclusion.union(input.end_handle_rect + content_offset);

    let top_controls_visible_height = input.top_controls_height + input.top_controls_offset;

    let above = || (exclusion.y - menu_height).max(-in_window.y);
    let below = || exclusion.bottom().min(window_height - menu_height - in_window.y);

    if exclusion.y - top_controls_visible_height >= menu_height {
        return (above(), PlacementTier::AboveInView);
    }
    if in_window.height - exclusion.bottom() >= menu_height {
        return (below(), PlacementTier::BelowInView);
    }
    if exclusion.y + in_window.y >= menu_height {
        return (above(), PlacementTier::AboveInWindow);
    }
    if window_height - (exclusion.bottom() + in_window.y) >= menu_height {
        return (below(), PlacementTier::BelowInWindow);
    }
    (above(), PlacementTier::Obscuring)
}

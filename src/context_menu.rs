use serde::{Deserialize, Serialize};

use crate::capabilities::EditCapabilities;

/// What kind of input produced a context menu request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuSourceType {
    #[default]
    None,
    Mouse,
    Keyboard,
    Touch,
    TouchEditMenu,
    LongPress,
    LongTap,
    TouchHandle,
    Stylus,
}

/// The subset of a page context menu request the touch editing layer reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextMenuParams {
    #[serde(default)]
    pub source_type: MenuSourceType,
    #[serde(default)]
    pub is_editable: bool,
    #[serde(default)]
    pub selection_text: String,
    #[serde(skip)]
    pub edit_flags: EditCapabilities,
}

impl ContextMenuParams {
    pub fn long_press(is_editable: bool, selection_text: impl Into<String>) -> Self {
        Self {
            source_type: MenuSourceType::LongPress,
            is_editable,
            selection_text: selection_text.into(),
            edit_flags: EditCapabilities::empty(),
        }
    }

    /// A long-press on an editable region with nothing selected: the caret
    /// case the touch editing menu takes over from the page context menu.
    pub fn is_caret_long_press(&self) -> bool {
        self.source_type == MenuSourceType::LongPress
            && self.is_editable
            && self.selection_text.is_empty()
    }
}

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Editing operations the page reports as currently available.
    ///
    /// Bit values follow the page's context-menu edit flags so they can be
    /// passed through from the renderer unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EditCapabilities: u16 {
        const UNDO       = 0b0000_0001;
        const REDO       = 0b0000_0010;
        const CUT        = 0b0000_0100;
        const COPY       = 0b0000_1000;
        const PASTE      = 0b0001_0000;
        const DELETE     = 0b0010_0000;
        const SELECT_ALL = 0b0100_0000;
    }
}

impl EditCapabilities {
    /// The subset a touch editing menu can offer.
    pub const MENU_SUPPORTED: Self = Self::CUT
        .union(Self::COPY)
        .union(Self::PASTE)
        .union(Self::SELECT_ALL);

    pub fn for_menu(self) -> Self {
        self & Self::MENU_SUPPORTED
    }

    pub fn from_actions<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = EditAction>,
    {
        actions
            .into_iter()
            .fold(Self::empty(), |caps, action| caps | action.capability())
    }
}

/// A command issued from the touch editing menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Cut,
    Copy,
    Paste,
    SelectAll,
}

impl EditAction {
    pub const fn capability(self) -> EditCapabilities {
        match self {
            Self::Cut => EditCapabilities::CUT,
            Self::Copy => EditCapabilities::COPY,
            Self::Paste => EditCapabilities::PASTE,
            Self::SelectAll => EditCapabilities::SELECT_ALL,
        }
    }

    /// Whether running this action ends the menu session. Select-all keeps
    /// the menu, since the new selection re-enters the normal show flow.
    pub const fn closes_menu(self) -> bool {
        !matches!(self, Self::SelectAll)
    }
}

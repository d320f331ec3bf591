//! Browser chrome (top controls) that can slide over the top of web content.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

pub trait ChromeController {
    /// Configured full height of the top controls.
    fn top_controls_height(&self) -> f32;

    /// How much of the top controls is currently shown, `0..=height`.
    fn top_content_offset(&self) -> f32;

    /// Vertical position of the top controls relative to their fully shown
    /// position: `0` when fully shown, `-height` when fully hidden.
    fn top_controls_offset(&self) -> f32 {
        self.top_content_offset() - self.top_controls_height()
    }
}

/// Receives notification when the content or top controls offset changes.
pub trait ChromeControllerObserver {
    fn content_or_top_controls_offset_changed(&mut self);
}

/// Top controls state as reported with each compositor frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameMetadata {
    pub top_controls_height: f32,
    pub top_controls_shown_ratio: f32,
}

impl FrameMetadata {
    pub const fn new(top_controls_height: f32, top_controls_shown_ratio: f32) -> Self {
        Self {
            top_controls_height,
            top_controls_shown_ratio,
        }
    }

    pub fn content_offset(self) -> f32 {
        self.top_controls_height * self.top_controls_shown_ratio
    }
}

/// Chrome controller fed by frame metadata updates.
///
/// Mutators return whether the reported offsets changed, which is when the
/// host must notify its [`ChromeControllerObserver`]s.
#[derive(Debug, Default)]
pub struct ChromeState {
    top_controls_height: Cell<f32>,
    current_frame: Cell<FrameMetadata>,
}

impl ChromeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_top_controls_height(&self, height: f32) -> bool {
        if self.top_controls_height.get() == height {
            return false;
        }
        let previous_offset = self.top_controls_offset();
        self.top_controls_height.set(height);
        tracing::debug!(height, "top controls height changed");
        previous_offset != self.top_controls_offset()
    }

    pub fn frame_metadata_updated(&self, metadata: FrameMetadata) -> bool {
        let previous = self.current_frame.replace(metadata);
        if previous.content_offset() == metadata.content_offset() {
            return false;
        }
        tracing::debug!(
            content_offset = metadata.content_offset(),
            "top content offset changed"
        );
        true
    }

    pub fn current_frame(&self) -> FrameMetadata {
        self.current_frame.get()
    }
}

impl ChromeController for ChromeState {
    fn top_controls_height(&self) -> f32 {
        self.top_controls_height.get()
    }

    fn top_content_offset(&self) -> f32 {
        self.current_frame.get().content_offset()
    }
}

//! Scripted interaction sessions replayed against a [`HeadlessHost`].
//!
//! A script is a JSON document:
//!
//! ```json
//! {
//!   "menu_size": { "width": 300, "height": 50 },
//!   "steps": [
//!     { "step": "viewport_bounds", "bounds": { "x": 600, "y": 600, "width": 800, "height": 600 } },
//!     { "step": "command", "action": "copy" }
//!   ]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::capabilities::{EditAction, EditCapabilities};
use crate::chrome::FrameMetadata;
use crate::config::TouchEditingConfig;
use crate::context_menu::ContextMenuParams;
use crate::geometry::{Rect, RectF, Size};
use crate::headless::{EditCall, HeadlessHost, MenuCall};
use crate::touch_selection::SelectionBound;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay script: {path}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse replay script")]
    ParseScript(#[from] serde_json::Error),
}

pub type ReplayResult<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub menu_size: Size,
    /// Edit operations the page reports. Unset means everything is allowed.
    #[serde(default)]
    pub editing_capabilities: Option<Vec<EditAction>>,
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    ViewportBounds { bounds: RectF },
    WindowBounds { bounds: Rect },
    SelectionBounds { start: SelectionBound, end: SelectionBound },
    DragStart,
    DragStop,
    TapInsertion,
    ContextMenu { params: ContextMenuParams },
    TopControlsHeight { height: f32 },
    FrameMetadata { metadata: FrameMetadata },
    Command { action: EditAction },
    Close,
    MenuResize { size: Size },
    SwapSelectionController,
    AllowShowingAutomatically,
    RunTasks,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayOutcome {
    pub menu_calls: Vec<MenuCall>,
    pub edit_calls: Vec<EditCall>,
}

pub fn parse_script(contents: &str) -> ReplayResult<ReplayScript> {
    Ok(serde_json::from_str(contents)?)
}

pub fn load_script(path: &Path) -> ReplayResult<ReplayScript> {
    let contents = fs::read_to_string(path).map_err(|source| ReplayError::ReadScript {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&contents)
}

pub fn replay_file(path: &Path, config: &TouchEditingConfig) -> ReplayResult<ReplayOutcome> {
    let script = load_script(path)?;
    tracing::info!(?path, steps = script.steps.len(), "replaying touch editing script");
    Ok(replay(&script, config))
}

/// Runs every step, then drains the task queue so deferred drops show up in
/// the returned log.
pub fn replay(script: &ReplayScript, config: &TouchEditingConfig) -> ReplayOutcome {
    let mut host = HeadlessHost::with_config(script.menu_size, config);
    if let Some(actions) = &script.editing_capabilities {
        host.client()
            .set_editing_capabilities(EditCapabilities::from_actions(actions.iter().copied()));
    }

    for (index, step) in script.steps.iter().enumerate() {
        tracing::debug!(index, ?step, "replay step");
        apply_step(&mut host, step);
    }
    host.run_until_idle();

    ReplayOutcome {
        menu_calls: host.take_menu_calls(),
        edit_calls: host.client().editing().take_calls(),
    }
}

fn apply_step(host: &mut HeadlessHost, step: &ReplayStep) {
    match step {
        ReplayStep::ViewportBounds { bounds } => host.set_viewport_bounds(*bounds),
        ReplayStep::WindowBounds { bounds } => host.set_top_level_window_bounds(*bounds),
        ReplayStep::SelectionBounds { start, end } => host.set_selection_bounds(*start, *end),
        ReplayStep::DragStart => host.begin_handle_drag(),
        ReplayStep::DragStop => host.end_handle_drag(),
        ReplayStep::TapInsertion => host.tap_insertion_handle(),
        ReplayStep::ContextMenu { params } => {
            let handled = host.handle_context_menu(params);
            tracing::debug!(handled, "context menu request");
        }
        ReplayStep::TopControlsHeight { height } => host.set_top_controls_height(*height),
        ReplayStep::FrameMetadata { metadata } => host.frame_metadata_updated(*metadata),
        ReplayStep::Command { action } => host.execute_command(*action),
        ReplayStep::Close => host.close_menu(),
        ReplayStep::MenuResize { size } => host.resize_menu(*size),
        ReplayStep::SwapSelectionController => host.swap_selection_controller(),
        ReplayStep::AllowShowingAutomatically => host.allow_showing_automatically(),
        ReplayStep::RunTasks => {
            host.run_until_idle();
        }
    }
}

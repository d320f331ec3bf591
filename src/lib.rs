pub mod capabilities;
pub mod chrome;
pub mod config;
pub mod context_menu;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod logging;
pub mod menu;
pub mod replay;
pub mod task_queue;
pub mod touch_selection;

use std::path::Path;

pub use error::{OxideError, OxideResult};
use replay::ReplayOutcome;

/// Replays the interaction script at `script` through a headless host.
///
/// With `config_path` the config is read from that file and any problem is an
/// error; otherwise the user config is loaded leniently.
pub fn run(script: &Path, config_path: Option<&Path>) -> OxideResult<ReplayOutcome> {
    logging::init();

    let config = match config_path {
        Some(path) => config::read_touch_editing_config_from(path)?,
        None => config::load_touch_editing_config(),
    };
    let outcome = replay::replay_file(script, &config)?;

    tracing::info!(
        menu_calls = outcome.menu_calls.len(),
        edit_calls = outcome.edit_calls.len(),
        "replay complete"
    );
    Ok(outcome)
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "oxide-touch-editing")]
#[command(version, about = "Replay touch editing sessions against a headless web view", long_about = None)]
struct Cli {
    /// Interaction script to replay (JSON)
    script: PathBuf,
    /// Read settings from this file instead of the user config; errors are fatal
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let outcome = oxide_touch_editing::run(&cli.script, cli.config.as_deref())
        .with_context(|| format!("replaying {}", cli.script.display()))?;

    for call in &outcome.menu_calls {
        println!("menu {call:?}");
    }
    for call in &outcome.edit_calls {
        println!("edit {call:?}");
    }
    Ok(())
}

//! The `quiztally groups` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = super::open_session(config_path.as_deref(), None)?;

    if session.groups().is_empty() {
        println!("No results yet.");
        return Ok(());
    }
    for option in session.group_options() {
        println!("{option}");
    }
    Ok(())
}

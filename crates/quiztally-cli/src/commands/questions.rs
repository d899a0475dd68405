//! The `quiztally questions` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = super::open_session(config_path.as_deref(), None)?;
    let catalog = session.catalog();

    println!("{} ({} questions)", catalog.name, catalog.len());
    for q in catalog {
        println!("  Q{}. {}  [{}]", q.index + 1, q.text, q.topic);
    }
    Ok(())
}

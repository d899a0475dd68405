//! The `quiztally chart` command.

use std::path::PathBuf;

use anyhow::Result;

use quiztally_report::{ChartBoard, ChartKind, ExportError};

pub fn execute(
    config_path: Option<PathBuf>,
    kind: String,
    group: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let kind: ChartKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let (config, session) = super::open_session(config_path.as_deref(), group.as_deref())?;

    let snapshot = session.snapshot();
    if snapshot.is_empty() {
        return Err(ExportError::NoData.into());
    }

    let mut board = ChartBoard::new();
    board.render(&snapshot, session.catalog());

    let path = output.unwrap_or_else(|| config.output_dir.join(kind.default_file_name()));
    board.save(kind, &path)?;
    println!("{}: {}", kind.title(), path.display());
    Ok(())
}

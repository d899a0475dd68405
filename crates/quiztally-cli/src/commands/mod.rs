pub mod analyze;
pub mod chart;
pub mod export;
pub mod groups;
pub mod init;
pub mod questions;
pub mod stats;
pub mod submit;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quiztally_core::config::{load_config_from, QuizConfig};
use quiztally_core::model::GroupFilter;
use quiztally_core::QuizSession;

/// Load the config and open a session with `group` as the active filter.
pub fn open_session(
    config_path: Option<&Path>,
    group: Option<&str>,
) -> Result<(QuizConfig, QuizSession)> {
    let config = load_config_from(config_path)?;
    let mut session = QuizSession::from_config(&config).context("failed to open quiz session")?;
    let filter = GroupFilter::from_option(group).map_err(|e| anyhow::anyhow!(e))?;
    session.set_filter(filter);
    tracing::debug!(
        filter = %session.filter(),
        records = session.store().len(),
        "session opened"
    );
    Ok((config, session))
}

pub fn output_dir(config: &QuizConfig, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| config.output_dir.clone())
}

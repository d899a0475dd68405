//! The `quiztally submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quiztally_core::evaluator::{feedback_for, require_complete, ScoreCard};
use quiztally_core::model::{parse_answer_sheet, Submission};

pub fn execute(
    config_path: Option<PathBuf>,
    respondent: String,
    group: String,
    answers: String,
    allow_partial: bool,
) -> Result<()> {
    let (_, mut session) = super::open_session(config_path.as_deref(), None)?;

    let answers = parse_answer_sheet(&answers).map_err(|e| anyhow::anyhow!(e))?;
    if !allow_partial {
        require_complete(&answers)?;
    }

    let submission = Submission::new(respondent, group, answers);
    let record = session
        .submit(&submission)
        .context("failed to record submission")?;

    let catalog = session.catalog();
    println!("{}", ScoreCard::from((&record, catalog)));
    for (index, feedback) in feedback_for(catalog, &record.answers) {
        let verdict = match catalog.get(index) {
            Some(q) if record.is_correct(q) => "correct",
            _ => "incorrect",
        };
        println!("  Q{} [{verdict}] {feedback}", index + 1);
    }

    Ok(())
}

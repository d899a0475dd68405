//! Submission scoring.
//!
//! Turns an answer sheet into a finalized [`ResultRecord`]. Everything here is
//! a pure computation; persisting the record is the caller's job.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Answer, QuestionCatalog, ResultRecord, Submission};

/// Score shown to a respondent after submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: u32,
    pub total: usize,
}

impl fmt::Display for ScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You scored {}/{}!", self.score, self.total)
    }
}

impl From<(&ResultRecord, &QuestionCatalog)> for ScoreCard {
    fn from((record, catalog): (&ResultRecord, &QuestionCatalog)) -> Self {
        Self {
            score: record.score,
            total: catalog.len(),
        }
    }
}

/// Count the answers that match the catalog.
///
/// Unanswered positions never count as correct.
pub fn score_answers(catalog: &QuestionCatalog, answers: &[Answer]) -> Result<u32, QuizError> {
    if answers.len() != catalog.len() {
        return Err(QuizError::validation(format!(
            "expected {} answers, got {}",
            catalog.len(),
            answers.len()
        )));
    }

    let correct = catalog
        .iter()
        .zip(answers)
        .filter(|(q, a)| **a == Some(q.correct_answer))
        .count();

    Ok(correct as u32)
}

/// Score a submission and produce the record to store.
pub fn evaluate(
    catalog: &QuestionCatalog,
    submission: &Submission,
    submitted_at: DateTime<Utc>,
) -> Result<ResultRecord, QuizError> {
    let respondent_id = submission.respondent_id.trim();
    let group_id = submission.group_id.trim();
    if respondent_id.is_empty() {
        return Err(QuizError::validation("respondent id is required"));
    }
    if group_id.is_empty() {
        return Err(QuizError::validation("group id is required"));
    }

    let score = score_answers(catalog, &submission.answers)?;

    Ok(ResultRecord {
        respondent_id: respondent_id.to_string(),
        group_id: group_id.to_string(),
        answers: submission.answers.clone(),
        score,
        submitted_at,
    })
}

/// Reject a sheet that still has unanswered questions.
pub fn require_complete(answers: &[Answer]) -> Result<(), QuizError> {
    match answers.iter().position(Option::is_none) {
        Some(i) => Err(QuizError::validation(format!(
            "question {} has no answer; please select an answer before proceeding",
            i + 1
        ))),
        None => Ok(()),
    }
}

/// Feedback text for every answered question, as `(index, feedback)`.
pub fn feedback_for<'a>(catalog: &'a QuestionCatalog, answers: &[Answer]) -> Vec<(usize, &'a str)> {
    catalog
        .iter()
        .zip(answers)
        .filter(|(_, a)| a.is_some())
        .map(|(q, _)| (q.index, q.feedback.as_str()))
        .collect()
}

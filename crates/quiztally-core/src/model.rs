//! Core data model types for quiztally.
//!
//! These are the fundamental types that the entire quiztally system uses
//! to represent questions, catalogs, answer sheets and result records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single answer on a sheet. `None` is the "unanswered" sentinel.
pub type Answer = Option<bool>;

/// A true/false question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 0-based ordinal position in the catalog. This is the join key used by
    /// answer sheets and every per-question statistic.
    pub index: usize,
    /// The statement shown to the respondent.
    pub text: String,
    /// The canonical answer.
    pub correct_answer: bool,
    /// Explanation shown once the question has been answered.
    #[serde(default)]
    pub feedback: String,
    /// Knowledge area, used by the weak-topic report.
    #[serde(default)]
    pub topic: String,
}

/// An immutable, ordered set of questions.
///
/// Not `Deserialize`: catalogs are built through [`QuestionCatalog::new`] (or
/// the TOML parser) so that every question's `index` matches its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionCatalog {
    /// Unique identifier for this catalog.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this catalog.
    pub description: String,
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog, assigning each question its ordinal index.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(index, q)| Question { index, ..q })
            .collect();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            questions,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// The HIV/AIDS awareness quiz that ships with quiztally.
    pub fn builtin() -> Self {
        let q = |text: &str, correct_answer: bool, feedback: &str, topic: &str| Question {
            index: 0,
            text: text.into(),
            correct_answer,
            feedback: feedback.into(),
            topic: topic.into(),
        };

        Self::new(
            "aids-awareness",
            "AIDS Awareness",
            "True/false questions on HIV and AIDS basics",
            vec![
                q(
                    "HIV is the virus that causes AIDS.",
                    true,
                    "Correct! HIV (Human Immunodeficiency Virus) is the virus that causes AIDS (Acquired Immunodeficiency Syndrome).",
                    "HIV basic knowledge (cause of AIDS & risk groups)",
                ),
                q(
                    "There is currently a vaccine available to prevent HIV infection.",
                    false,
                    "Correct! There is no currently available vaccine to prevent HIV infection, but there are effective prevention methods.",
                    "HIV vaccine availability",
                ),
                q(
                    "A person can test negative for HIV shortly after being infected.",
                    true,
                    "Correct! During the window period a test may not yet detect the infection, so retesting is recommended.",
                    "HIV detection window period",
                ),
                q(
                    "HIV can be transmitted through blood, semen and breast milk.",
                    true,
                    "Correct! These body fluids can carry enough virus to transmit HIV.",
                    "HIV transmission via body fluids",
                ),
                q(
                    "You can get HIV by shaking hands or sharing a meal with someone who has HIV.",
                    false,
                    "Correct! HIV is not spread through casual everyday contact.",
                    "HIV transmission via casual contact",
                ),
                q(
                    "Mosquitoes and other insects can spread HIV.",
                    false,
                    "Correct! Insects and animals do not transmit HIV.",
                    "HIV transmission via animals/insects",
                ),
            ],
        )
    }
}

impl<'a> IntoIterator for &'a QuestionCatalog {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// One respondent's answer sheet, before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub respondent_id: String,
    pub group_id: String,
    pub answers: Vec<Answer>,
}

impl Submission {
    pub fn new(
        respondent_id: impl Into<String>,
        group_id: impl Into<String>,
        answers: Vec<Answer>,
    ) -> Self {
        Self {
            respondent_id: respondent_id.into(),
            group_id: group_id.into(),
            answers,
        }
    }
}

/// A finalized, scored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Respondent identity. The result store keys records by this field.
    pub respondent_id: String,
    /// Cohort label (e.g. a class).
    pub group_id: String,
    /// Answers aligned positionally with the catalog.
    pub answers: Vec<Answer>,
    /// Number of answers matching the catalog.
    pub score: u32,
    /// When the sheet was scored.
    pub submitted_at: DateTime<Utc>,
}

impl ResultRecord {
    /// The answer given to question `index`. Positions past the end of the
    /// sheet read as unanswered.
    pub fn answer(&self, index: usize) -> Answer {
        self.answers.get(index).copied().flatten()
    }

    /// Whether question `q` was answered correctly.
    pub fn is_correct(&self, q: &Question) -> bool {
        self.answer(q.index) == Some(q.correct_answer)
    }
}

/// Selects the records an aggregation runs over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

impl GroupFilter {
    pub fn matches(&self, record: &ResultRecord) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Group(group) => record.group_id == *group,
        }
    }

    /// Parse an optional CLI value; `None` means all groups. An empty value
    /// is an error.
    pub fn from_option(value: Option<&str>) -> Result<Self, String> {
        value.map_or(Ok(GroupFilter::All), |v| v.parse())
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFilter::All => write!(f, "all"),
            GroupFilter::Group(group) => write!(f, "{group}"),
        }
    }
}

impl FromStr for GroupFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("group filter cannot be empty".to_string()),
            "all" => Ok(GroupFilter::All),
            group => Ok(GroupFilter::Group(group.to_string())),
        }
    }
}

/// Parse a single answer token: `t`/`true`/`y`/`yes`/`1`, `f`/`false`/`n`/`no`/`0`,
/// or `-`/`_`/`?` for unanswered. An empty token is an error.
pub fn parse_answer(token: &str) -> Result<Answer, String> {
    match token.trim().to_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "1" => Ok(Some(true)),
        "f" | "false" | "n" | "no" | "0" => Ok(Some(false)),
        "-" | "_" | "?" => Ok(None),
        "" => Err("empty answer; use \"-\" to leave a question unanswered".to_string()),
        other => Err(format!("unknown answer: {other}")),
    }
}

/// Parse a comma-separated answer sheet, e.g. `"t,f,-,t"`.
pub fn parse_answer_sheet(sheet: &str) -> Result<Vec<Answer>, String> {
    sheet.split(',').map(parse_answer).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_assigns_ordinal_indices() {
        let catalog = QuestionCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        for (i, q) in catalog.iter().enumerate() {
            assert_eq!(q.index, i);
            assert!(!q.topic.is_empty());
        }
        assert!(catalog.get(0).unwrap().correct_answer);
        assert!(!catalog.get(1).unwrap().correct_answer);
    }

    #[test]
    fn group_filter_display_and_parse() {
        assert_eq!("all".parse::<GroupFilter>().unwrap(), GroupFilter::All);
        assert_eq!(
            " 7B ".parse::<GroupFilter>().unwrap(),
            GroupFilter::Group("7B".into())
        );
        assert!("".parse::<GroupFilter>().is_err());
        assert_eq!(GroupFilter::Group("X".into()).to_string(), "X");
        assert_eq!(GroupFilter::from_option(None), Ok(GroupFilter::All));
        assert_eq!(
            GroupFilter::from_option(Some("7A")),
            Ok(GroupFilter::Group("7A".into()))
        );
        assert!(GroupFilter::from_option(Some("  ")).is_err());
    }

    #[test]
    fn answer_sheet_parsing() {
        assert_eq!(
            parse_answer_sheet("t,F, yes ,0,-").unwrap(),
            vec![Some(true), Some(false), Some(true), Some(false), None]
        );
        assert!(parse_answer_sheet("t,maybe").is_err());
        assert!(parse_answer_sheet("t,,f").is_err());
        assert!(parse_answer_sheet("t,f,").is_err());
        assert_eq!(parse_answer_sheet("?,_").unwrap(), vec![None, None]);
    }

    #[test]
    fn short_answer_sheet_reads_as_unanswered() {
        let record = ResultRecord {
            respondent_id: "s1".into(),
            group_id: "A".into(),
            answers: vec![Some(true)],
            score: 1,
            submitted_at: Utc::now(),
        };
        assert_eq!(record.answer(0), Some(true));
        assert_eq!(record.answer(5), None);
    }

    #[test]
    fn result_record_serde_uses_null_for_unanswered() {
        let record = ResultRecord {
            respondent_id: "s1".into(),
            group_id: "A".into(),
            answers: vec![Some(true), None],
            score: 1,
            submitted_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("[true,null]"));
        let back: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

//! Result aggregation and analytics.
//!
//! Every function here is a pure derivation over `(records, catalog, filter)`.
//! [`AggregationSnapshot::compute`] assembles them; it is recomputed from
//! scratch whenever the store or the active filter changes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{GroupFilter, QuestionCatalog, ResultRecord};

/// Questions answered correctly by fewer than this share of respondents
/// (in percent) are reported as weak topics.
pub const WEAK_TOPIC_THRESHOLD: f64 = 60.0;

/// Shown instead of an analysis when no records match the filter.
pub const NO_DATA_MESSAGE: &str =
    "No test data yet. Please have respondents complete the quiz first.";

/// Shown when no question falls below the weak-topic threshold.
pub const ALL_CLEAR_MESSAGE: &str = "Great! All questions have a correct rate above 60%. \
     Respondents have a good understanding of the material.";

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The records an aggregation runs over.
pub fn select<'a>(records: &'a [ResultRecord], filter: &GroupFilter) -> Vec<&'a ResultRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Count, average, highest and lowest score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    /// Mean score rounded to one decimal.
    pub average: f64,
    pub highest: u32,
    pub lowest: u32,
}

impl SummaryStats {
    pub const EMPTY: SummaryStats = SummaryStats {
        count: 0,
        average: 0.0,
        highest: 0,
        lowest: 0,
    };
}

pub fn summarize(selected: &[&ResultRecord]) -> SummaryStats {
    let (Some(highest), Some(lowest)) = (
        selected.iter().map(|r| r.score).max(),
        selected.iter().map(|r| r.score).min(),
    ) else {
        return SummaryStats::EMPTY;
    };

    let total: u64 = selected.iter().map(|r| u64::from(r.score)).sum();
    SummaryStats {
        count: selected.len(),
        average: round1(total as f64 / selected.len() as f64),
        highest,
        lowest,
    }
}

// ---------------------------------------------------------------------------
// Per-question correct rate
// ---------------------------------------------------------------------------

/// How many respondents got one question right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestionRate {
    /// Question index.
    pub question: usize,
    /// Respondents who answered correctly.
    pub correct: usize,
    /// Respondents considered.
    pub respondents: usize,
    /// Unrounded correct rate in percent.
    pub rate: f64,
    /// Correct rate rounded to a whole percent.
    pub percent: u32,
}

impl QuestionRate {
    pub fn incorrect(&self) -> usize {
        self.respondents - self.correct
    }

    pub fn is_weak(&self) -> bool {
        self.rate < WEAK_TOPIC_THRESHOLD
    }
}

/// Correct rate for every question. Empty when nothing is selected.
pub fn correct_rates(selected: &[&ResultRecord], catalog: &QuestionCatalog) -> Vec<QuestionRate> {
    if selected.is_empty() {
        return Vec::new();
    }
    let n = selected.len();

    catalog
        .iter()
        .map(|q| {
            let correct = selected.iter().filter(|r| r.is_correct(q)).count();
            let rate = 100.0 * correct as f64 / n as f64;
            QuestionRate {
                question: q.index,
                correct,
                respondents: n,
                rate,
                percent: rate.round() as u32,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Weak topics
// ---------------------------------------------------------------------------

/// A question most respondents got wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakTopic {
    pub question: usize,
    /// Unrounded correct rate in percent.
    pub rate: f64,
    pub topic: String,
}

impl fmt::Display for WeakTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Question {} ({:.1}% correct) - {}",
            self.question + 1,
            self.rate,
            self.topic
        )
    }
}

/// Outcome of the weak-topic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "topics", rename_all = "snake_case")]
pub enum WeakTopicReport {
    /// No records matched the filter.
    NoData,
    /// Every question is at or above the threshold.
    AllClear,
    /// Questions below the threshold, by ascending index.
    NeedsPractice(Vec<WeakTopic>),
}

impl WeakTopicReport {
    pub fn topics(&self) -> &[WeakTopic] {
        match self {
            WeakTopicReport::NeedsPractice(topics) => topics,
            _ => &[],
        }
    }

    /// One line per weak topic.
    pub fn lines(&self) -> Vec<String> {
        self.topics().iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for WeakTopicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeakTopicReport::NoData => f.write_str(NO_DATA_MESSAGE),
            WeakTopicReport::AllClear => f.write_str(ALL_CLEAR_MESSAGE),
            WeakTopicReport::NeedsPractice(_) => {
                write!(f, "Need more practice on: \n{}", self.lines().join("\n"))
            }
        }
    }
}

/// Flag questions whose unrounded correct rate is below
/// [`WEAK_TOPIC_THRESHOLD`].
///
/// `rates` must come from a non-empty selection; an empty selection is
/// reported as [`WeakTopicReport::NoData`] by [`AggregationSnapshot::compute`].
/// With no weak questions the report is [`WeakTopicReport::AllClear`].
pub fn weak_topics(rates: &[QuestionRate], catalog: &QuestionCatalog) -> WeakTopicReport {
    let weak: Vec<WeakTopic> = rates
        .iter()
        .filter(|r| r.is_weak())
        .map(|r| WeakTopic {
            question: r.question,
            rate: r.rate,
            topic: catalog
                .get(r.question)
                .map(|q| q.topic.clone())
                .unwrap_or_default(),
        })
        .collect();

    if weak.is_empty() {
        WeakTopicReport::AllClear
    } else {
        WeakTopicReport::NeedsPractice(weak)
    }
}

// ---------------------------------------------------------------------------
// Per-group averages
// ---------------------------------------------------------------------------

/// Average score per group, rounded to one decimal, ordered by group id.
pub fn group_averages(selected: &[&ResultRecord]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for r in selected {
        let entry = totals.entry(r.group_id.as_str()).or_default();
        entry.0 += u64::from(r.score);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(group, (total, count))| (group.to_string(), round1(total as f64 / count as f64)))
        .collect()
}

// ---------------------------------------------------------------------------
// Error distribution
// ---------------------------------------------------------------------------

/// Incorrect (including unanswered) answers per question. Empty when nothing
/// is selected.
pub fn error_counts(selected: &[&ResultRecord], catalog: &QuestionCatalog) -> Vec<usize> {
    if selected.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .map(|q| selected.iter().filter(|r| !r.is_correct(q)).count())
        .collect()
}

/// One slice of the error distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorShare {
    pub question: usize,
    pub count: usize,
    /// Share of all incorrect answers, rounded to a whole percent.
    pub percent: u32,
}

/// Questions with at least one error, each with its share of the total.
pub fn error_distribution(error_counts: &[usize]) -> Vec<ErrorShare> {
    let total: usize = error_counts.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    error_counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(question, &count)| ErrorShare {
            question,
            count,
            percent: (100.0 * count as f64 / total as f64).round() as u32,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the analytics views show for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSnapshot {
    pub filter: GroupFilter,
    pub summary: SummaryStats,
    /// Correct rate per question, whole percent.
    pub per_question_correct_rate: Vec<u32>,
    pub weak_topics: WeakTopicReport,
    pub per_group_average: BTreeMap<String, f64>,
    /// Incorrect answers per question, including questions with none.
    pub per_question_error_count: Vec<usize>,
}

impl AggregationSnapshot {
    /// The fixed result for an empty selection.
    pub fn empty(filter: GroupFilter) -> Self {
        Self {
            filter,
            summary: SummaryStats::EMPTY,
            per_question_correct_rate: Vec::new(),
            weak_topics: WeakTopicReport::NoData,
            per_group_average: BTreeMap::new(),
            per_question_error_count: Vec::new(),
        }
    }

    pub fn compute(
        records: &[ResultRecord],
        catalog: &QuestionCatalog,
        filter: &GroupFilter,
    ) -> Self {
        let selected = select(records, filter);
        if selected.is_empty() {
            tracing::debug!(%filter, "no records match filter");
            return Self::empty(filter.clone());
        }

        let rates = correct_rates(&selected, catalog);
        let snapshot = Self {
            filter: filter.clone(),
            summary: summarize(&selected),
            per_question_correct_rate: rates.iter().map(|r| r.percent).collect(),
            weak_topics: weak_topics(&rates, catalog),
            per_group_average: group_averages(&selected),
            per_question_error_count: error_counts(&selected, catalog),
        };
        tracing::debug!(%filter, respondents = selected.len(), "computed aggregation snapshot");
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.summary.count == 0
    }

    /// Non-zero error counts with their share of all errors.
    pub fn error_distribution(&self) -> Vec<ErrorShare> {
        error_distribution(&self.per_question_error_count)
    }
}

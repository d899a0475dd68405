//! Quiz session context.
//!
//! Owns the catalog, the result store and the active group filter. Hosts
//! drive it with explicit calls: submit a sheet, change the filter, read a
//! fresh snapshot.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::evaluator;
use crate::model::{GroupFilter, QuestionCatalog, ResultRecord, Submission};
use crate::parser::load_catalog;
use crate::statistics::{self, AggregationSnapshot};
use crate::store::{FileBlobStore, ResultStore};

pub struct QuizSession {
    catalog: QuestionCatalog,
    store: ResultStore,
    filter: GroupFilter,
}

impl QuizSession {
    pub fn new(catalog: QuestionCatalog, store: ResultStore) -> Self {
        Self {
            catalog,
            store,
            filter: GroupFilter::All,
        }
    }

    /// Open the catalog and file-backed store named by `config`.
    ///
    /// An unreadable result blob yields an empty store rather than an error.
    pub fn from_config(config: &QuizConfig) -> anyhow::Result<Self> {
        let catalog = load_catalog(config.catalog.as_deref())?;
        let blobs = FileBlobStore::new(&config.data_dir);
        let store = ResultStore::open_or_empty(Box::new(blobs), config.storage_key.clone());
        Ok(Self::new(catalog, store))
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn filter(&self) -> &GroupFilter {
        &self.filter
    }

    /// Score a sheet and store it, replacing any earlier submission by the
    /// same respondent.
    pub fn submit(&mut self, submission: &Submission) -> Result<ResultRecord, QuizError> {
        let record = evaluator::evaluate(&self.catalog, submission, Utc::now())?;
        self.store.upsert(record.clone())?;
        tracing::info!(
            respondent = %record.respondent_id,
            group = %record.group_id,
            score = record.score,
            total = self.catalog.len(),
            "submission recorded"
        );
        Ok(record)
    }

    /// Change the active filter and return the recomputed snapshot.
    pub fn set_filter(&mut self, filter: GroupFilter) -> AggregationSnapshot {
        self.filter = filter;
        self.snapshot()
    }

    /// A freshly computed snapshot for the active filter.
    pub fn snapshot(&self) -> AggregationSnapshot {
        AggregationSnapshot::compute(self.store.all(), &self.catalog, &self.filter)
    }

    /// Records matching the active filter, for row-per-respondent export.
    pub fn selected_records(&self) -> Vec<&ResultRecord> {
        statistics::select(self.store.all(), &self.filter)
    }

    /// Filter options: "all" plus every group present in the store.
    pub fn group_options(&self) -> Vec<GroupFilter> {
        std::iter::once(GroupFilter::All)
            .chain(self.groups().into_iter().map(GroupFilter::Group))
            .collect()
    }

    pub fn groups(&self) -> BTreeSet<String> {
        self.store.groups_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::WeakTopicReport;
    use crate::store::MemoryBlobStore;

    fn session() -> QuizSession {
        let store = ResultStore::open(Box::new(MemoryBlobStore::new()), "k").unwrap();
        QuizSession::new(QuestionCatalog::builtin(), store)
    }

    fn perfect() -> Vec<Option<bool>> {
        QuestionCatalog::builtin()
            .iter()
            .map(|q| Some(q.correct_answer))
            .collect()
    }

    #[test]
    fn submit_then_snapshot() {
        let mut s = session();
        let record = s.submit(&Submission::new("s1", "7A", perfect())).unwrap();
        assert_eq!(record.score, 6);

        let snap = s.snapshot();
        assert_eq!(snap.summary.count, 1);
        assert_eq!(snap.summary.average, 6.0);
        assert_eq!(snap.weak_topics, WeakTopicReport::AllClear);
    }

    #[test]
    fn resubmission_replaces_previous_result() {
        let mut s = session();
        s.submit(&Submission::new("s1", "7A", vec![Some(false); 6]))
            .unwrap();
        s.submit(&Submission::new("s1", "7A", perfect())).unwrap();
        assert_eq!(s.store().len(), 1);
        assert_eq!(s.snapshot().summary.highest, 6);
    }

    #[test]
    fn invalid_submission_is_not_stored() {
        let mut s = session();
        let err = s
            .submit(&Submission::new("s1", "7A", vec![Some(true)]))
            .unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));
        assert!(s.store().is_empty());
    }

    #[test]
    fn filter_change_recomputes() {
        let mut s = session();
        s.submit(&Submission::new("s1", "7A", perfect())).unwrap();
        s.submit(&Submission::new("s2", "7B", vec![Some(false); 6]))
            .unwrap();

        let snap = s.set_filter(GroupFilter::Group("7B".into()));
        assert_eq!(snap.summary.count, 1);
        assert_eq!(s.selected_records().len(), 1);
        assert_eq!(s.selected_records()[0].respondent_id, "s2");

        let snap = s.set_filter(GroupFilter::Group("8C".into()));
        assert!(snap.is_empty());
        assert_eq!(snap.weak_topics, WeakTopicReport::NoData);

        assert_eq!(
            s.group_options(),
            vec![
                GroupFilter::All,
                GroupFilter::Group("7A".into()),
                GroupFilter::Group("7B".into())
            ]
        );
    }

    #[test]
    fn from_config_uses_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuizConfig {
            data_dir: dir.path().to_path_buf(),
            ..QuizConfig::default()
        };
        {
            let mut s = QuizSession::from_config(&config).unwrap();
            s.submit(&Submission::new("s1", "7A", perfect())).unwrap();
        }
        let s = QuizSession::from_config(&config).unwrap();
        assert_eq!(s.store().len(), 1);
        assert!(dir.path().join("quizResults.json").exists());
    }
}

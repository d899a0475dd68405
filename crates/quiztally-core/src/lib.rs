//! quiztally-core: Question catalog, scoring, result storage and analytics.
//!
//! This crate defines the data model, the submission evaluator, the result
//! store and its persistence seam, and the aggregation engine that the rest
//! of quiztally builds on.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod session;
pub mod statistics;
pub mod store;

pub use error::QuizError;
pub use model::{Answer, GroupFilter, Question, QuestionCatalog, ResultRecord, Submission};
pub use session::QuizSession;
pub use statistics::AggregationSnapshot;

//! TOML question catalog parser.
//!
//! Loads question catalogs from TOML files and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionCatalog};

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    text: String,
    correct_answer: bool,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    topic: String,
}

/// Parse a single TOML file into a `QuestionCatalog`.
pub fn parse_catalog(path: &Path) -> Result<QuestionCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `QuestionCatalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<QuestionCatalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            index: 0,
            text: q.text.trim().to_string(),
            correct_answer: q.correct_answer,
            feedback: q.feedback.trim().to_string(),
            topic: q.topic.trim().to_string(),
        })
        .collect();

    Ok(QuestionCatalog::new(
        parsed.catalog.id,
        parsed.catalog.name,
        parsed.catalog.description,
        questions,
    ))
}

/// Load the catalog at `path`, or the built-in catalog when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<QuestionCatalog> {
    match path {
        Some(p) => parse_catalog(p),
        None => Ok(QuestionCatalog::builtin()),
    }
}

/// Render a catalog in the same TOML layout [`parse_catalog_str`] reads.
pub fn catalog_to_toml(catalog: &QuestionCatalog) -> Result<String> {
    let file = TomlCatalogFile {
        catalog: TomlCatalogHeader {
            id: catalog.id.clone(),
            name: catalog.name.clone(),
            description: catalog.description.clone(),
        },
        questions: catalog
            .iter()
            .map(|q| TomlQuestion {
                text: q.text.clone(),
                correct_answer: q.correct_answer,
                feedback: q.feedback.clone(),
                topic: q.topic.clone(),
            })
            .collect(),
    };
    toml::to_string(&file).context("failed to serialize catalog")
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question index (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &QuestionCatalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalog.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "catalog has no questions".into(),
        });
    }

    let mut seen = HashSet::new();
    for q in catalog {
        if q.text.is_empty() {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: "question text is empty".into(),
            });
        } else if !seen.insert(q.text.to_lowercase()) {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: format!("duplicate question text: {}", q.text),
            });
        }

        // The weak-topic report names questions by topic.
        if q.topic.is_empty() {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: "topic is empty".into(),
            });
        }

        if q.feedback.is_empty() {
            warnings.push(ValidationWarning {
                question: Some(q.index),
                message: "feedback is empty".into(),
            });
        }
    }

    warnings
}

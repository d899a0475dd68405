//! Spreadsheet export of per-respondent results.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};

use quiztally_core::model::{GroupFilter, QuestionCatalog, ResultRecord};

use crate::error::ExportError;

/// Column headers of the exported sheet.
pub const HEADER: [&str; 5] = ["Class", "Student ID", "Score", "Total Questions", "Submit Time"];

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Quiz Results";

/// How submission times are rendered in exports.
pub const SUBMIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub group_id: String,
    pub respondent_id: String,
    pub score: u32,
    pub total_questions: usize,
    pub submitted_at: String,
}

/// Build one row per selected record, in store order.
pub fn export_rows(selected: &[&ResultRecord], catalog: &QuestionCatalog) -> Vec<ExportRow> {
    selected
        .iter()
        .map(|r| ExportRow {
            group_id: r.group_id.clone(),
            respondent_id: r.respondent_id.clone(),
            score: r.score,
            total_questions: catalog.len(),
            submitted_at: r.submitted_at.format(SUBMIT_TIME_FORMAT).to_string(),
        })
        .collect()
}

/// `Quiz_All_Groups_2025-01-31.xlsx` or `Quiz_<group>_2025-01-31.xlsx`.
pub fn default_file_name(filter: &GroupFilter, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match filter {
        GroupFilter::All => format!("Quiz_All_Groups_{date}.xlsx"),
        GroupFilter::Group(group) => {
            let safe: String = group
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() || c == '-' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            format!("Quiz_{safe}_{date}.xlsx")
        }
    }
}

/// Write `rows` as an xlsx workbook. Refuses to write an empty export.
pub fn write_workbook(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, row.group_id.as_str())?;
        worksheet.write_string(r, 1, row.respondent_id.as_str())?;
        worksheet.write_number(r, 2, f64::from(row.score))?;
        worksheet.write_number(r, 3, row.total_questions as f64)?;
        worksheet.write_string(r, 4, row.submitted_at.as_str())?;
    }
    worksheet.set_column_width(4, 20)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    tracing::info!(rows = rows.len(), "spreadsheet exported to {}", path.display());
    Ok(())
}

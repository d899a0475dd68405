//! Export error types.

use thiserror::Error;

use crate::charts::ChartKind;

/// Failures producing a chart, dashboard or spreadsheet artifact.
///
/// These never touch the result store.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The active filter selects no records.
    #[error("no data to export")]
    NoData,

    /// A chart was requested before it was rendered.
    #[error("chart has not been rendered: {0}")]
    ChartNotRendered(ChartKind),

    /// Writing the artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet writer rejected the workbook.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

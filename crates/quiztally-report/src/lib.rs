//! quiztally-report: Charts, HTML dashboards and spreadsheet export.
//!
//! Presentation adapters over the aggregation snapshot computed by
//! `quiztally-core`. Nothing in this crate writes to the result store.

pub mod charts;
pub mod error;
pub mod html;
pub mod spreadsheet;

pub use charts::{ChartBoard, ChartKind, RenderedChart};
pub use error::ExportError;
pub use html::{generate_html, write_html_report};
pub use spreadsheet::{export_rows, write_workbook, ExportRow};

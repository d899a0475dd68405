//! The `quiztally export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quiztally_report::spreadsheet::default_file_name;
use quiztally_report::{export_rows, write_html_report, write_workbook, ExportError};

pub fn execute(
    config_path: Option<PathBuf>,
    group: Option<String>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let (config, session) = super::open_session(config_path.as_deref(), group.as_deref())?;
    let output_dir = super::output_dir(&config, output);
    let snapshot = session.snapshot();
    let selected = session.selected_records();

    if selected.is_empty() {
        return Err(ExportError::NoData.into());
    }
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let formats: Vec<&str> = if format == "all" {
        vec!["xlsx", "html", "json"]
    } else {
        vec![format.as_str()]
    };

    let today = chrono::Local::now().date_naive();
    let stem = default_file_name(&snapshot.filter, today);
    let stem = stem.trim_end_matches(".xlsx");

    for fmt in &formats {
        match *fmt {
            "xlsx" => {
                let path = output_dir.join(format!("{stem}.xlsx"));
                let rows = export_rows(&selected, session.catalog());
                write_workbook(&rows, &path)?;
                println!("Spreadsheet: {}", path.display());
            }
            "html" => {
                let path = output_dir.join(format!("{stem}.html"));
                write_html_report(&snapshot, session.catalog(), &selected, &path)?;
                println!("Dashboard: {}", path.display());
            }
            "json" => {
                let path = output_dir.join(format!("{stem}.json"));
                let json = serde_json::json!({
                    "snapshot": snapshot,
                    "results": selected,
                });
                std::fs::write(&path, serde_json::to_string_pretty(&json)?)?;
                println!("JSON: {}", path.display());
            }
            other => {
                anyhow::bail!("unknown export format: {other} (expected xlsx, html, json or all)")
            }
        }
    }

    println!("Data exported successfully!");
    Ok(())
}

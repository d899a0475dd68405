//! The `quiztally stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(config_path: Option<PathBuf>, group: Option<String>, format: String) -> Result<()> {
    let (_, session) = super::open_session(config_path.as_deref(), group.as_deref())?;
    let snapshot = session.snapshot();
    let summary = &snapshot.summary;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        _ => {
            let mut table = Table::new();
            table.set_header(vec![
                "Group",
                "Total Respondents",
                "Average Score",
                "Highest Score",
                "Lowest Score",
            ]);
            table.add_row(vec![
                Cell::new(&snapshot.filter),
                Cell::new(summary.count),
                Cell::new(format!("{:.1}", summary.average)),
                Cell::new(summary.highest),
                Cell::new(summary.lowest),
            ]);
            println!("{table}");
        }
    }

    Ok(())
}

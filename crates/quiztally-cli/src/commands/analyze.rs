//! The `quiztally analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Color, Table};

use quiztally_core::statistics::correct_rates;

pub fn execute(config_path: Option<PathBuf>, group: Option<String>, format: String) -> Result<()> {
    let (_, session) = super::open_session(config_path.as_deref(), group.as_deref())?;
    let snapshot = session.snapshot();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("{}", snapshot.weak_topics);
        return Ok(());
    }

    let catalog = session.catalog();
    println!("Filter: {} ({} respondents)\n", snapshot.filter, snapshot.summary.count);

    let mut rates = Table::new();
    rates.set_header(vec!["Question", "Topic", "Correct Rate", "Incorrect"]);
    for (q, rate) in catalog
        .iter()
        .zip(correct_rates(&session.selected_records(), catalog))
    {
        let rate_cell = Cell::new(format!("{}%", rate.percent));
        let rate_cell = if rate.is_weak() {
            rate_cell.fg(Color::Red)
        } else {
            rate_cell.fg(Color::Green)
        };
        rates.add_row(vec![
            Cell::new(format!("Q{}", q.index + 1)),
            Cell::new(&q.topic),
            rate_cell,
            Cell::new(rate.incorrect()),
        ]);
    }
    println!("{rates}\n");

    println!("{}\n", snapshot.weak_topics);

    let mut groups = Table::new();
    groups.set_header(vec!["Group", "Average Score"]);
    for (group, average) in &snapshot.per_group_average {
        groups.add_row(vec![Cell::new(group), Cell::new(format!("{average:.1}"))]);
    }
    println!("{groups}\n");

    let distribution = snapshot.error_distribution();
    if distribution.is_empty() {
        println!("No Incorrect Answers");
    } else {
        println!("Incorrect answers:");
        for share in distribution {
            println!(
                "  Q{}: {} incorrect ({}%)",
                share.question + 1,
                share.count,
                share.percent
            );
        }
    }

    Ok(())
}

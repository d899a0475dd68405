//! The `quiztally validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalog = quiztally_core::parser::parse_catalog(&catalog_path)?;
    println!("Catalog: {} ({} questions)", catalog.name, catalog.len());

    let warnings = quiztally_core::parser::validate_catalog(&catalog);
    for w in &warnings {
        let prefix = w
            .question
            .map(|i| format!("  [Q{}]", i + 1))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

//! The `quiztally init` command.

use std::path::Path;

use anyhow::Result;

use quiztally_core::model::QuestionCatalog;
use quiztally_core::parser::catalog_to_toml;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quiztally.toml"), SAMPLE_CONFIG)?;

    let catalog = catalog_to_toml(&QuestionCatalog::builtin())?;
    write_if_missing(Path::new("catalog.toml"), &catalog)?;

    println!("\nNext steps:");
    println!("  1. Edit catalog.toml with your own questions");
    println!("  2. Run: quiztally validate --catalog catalog.toml");
    println!("  3. Run: quiztally submit --respondent s1 --group 7A --answers t,f,t,t,f,f");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quiztally configuration

# Where results are kept. Overridden by QUIZTALLY_DATA_DIR.
data_dir = "./quiztally-data"
storage_key = "quizResults"

# Question catalog. Overridden by QUIZTALLY_CATALOG.
catalog = "catalog.toml"

output_dir = "./quiztally-exports"
"#;

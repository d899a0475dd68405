//! The `quiztally` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quiztally",
    version,
    about = "True/false quiz scoring and result analytics"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and question catalog
    Init,

    /// List the questions in the active catalog
    Questions,

    /// Validate a question catalog TOML file
    Validate {
        /// Path to catalog file
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Score an answer sheet and record the result
    Submit {
        /// Respondent (student) ID
        #[arg(long)]
        respondent: String,

        /// Group (class) the respondent belongs to
        #[arg(long)]
        group: String,

        /// Comma-separated answers, e.g. "t,f,t" (use "-" for unanswered)
        #[arg(long)]
        answers: String,

        /// Accept sheets with unanswered questions
        #[arg(long)]
        allow_partial: bool,
    },

    /// Show summary statistics
    Stats {
        /// Restrict to one group ("all" for every group)
        #[arg(long)]
        group: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Per-question analysis: correct rates, weak topics, group averages, errors
    Analyze {
        /// Restrict to one group ("all" for every group)
        #[arg(long)]
        group: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the groups that have results
    Groups,

    /// Export results: xlsx, html, json, all
    Export {
        /// Restrict to one group ("all" for every group)
        #[arg(long)]
        group: Option<String>,

        /// Output format: xlsx, html, json, all
        #[arg(long, default_value = "xlsx")]
        format: String,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Save one chart as SVG
    Chart {
        /// correct-rate, group-average, error-distribution
        #[arg(long)]
        kind: String,

        /// Restrict to one group ("all" for every group)
        #[arg(long)]
        group: Option<String>,

        /// Output file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quiztally=info"));
    // stdout is reserved for command output (tables, JSON).
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Questions => commands::questions::execute(config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Submit {
            respondent,
            group,
            answers,
            allow_partial,
        } => commands::submit::execute(config, respondent, group, answers, allow_partial),
        Commands::Stats { group, format } => commands::stats::execute(config, group, format),
        Commands::Analyze { group, format } => commands::analyze::execute(config, group, format),
        Commands::Groups => commands::groups::execute(config),
        Commands::Export {
            group,
            format,
            output,
        } => commands::export::execute(config, group, format, output),
        Commands::Chart {
            kind,
            group,
            output,
        } => commands::chart::execute(config, kind, group, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! Command-line interface for tableau2pbi

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::process;

#[cfg(feature = "cli")]
use tableau2pbi::document::Document;
#[cfg(feature = "cli")]
use tableau2pbi::error::Error;
#[cfg(feature = "cli")]
use tableau2pbi::extract::{extract_dashboards, extract_worksheets, write_debug_dump};
#[cfg(feature = "cli")]
use tableau2pbi::ids::RandomHexIds;
#[cfg(feature = "cli")]
use tableau2pbi::project::write_project;

/// Exit code for an unparsable workbook
#[cfg(feature = "cli")]
const EXIT_PARSE_FAILURE: i32 = 2;
/// Exit code for a workbook with no dashboards
#[cfg(feature = "cli")]
const EXIT_NO_DASHBOARDS: i32 = 3;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "tableau2pbi")]
#[command(author, version, about = "Convert a Tableau workbook into a Power BI report project", long_about = None)]
struct Cli {
    /// Path to the Tableau workbook (.twb)
    #[arg(value_name = "WORKBOOK")]
    workbook: PathBuf,

    /// Power BI report `definition` directory to write into
    #[arg(short, long, value_name = "DIR", default_value = "definition")]
    out: PathBuf,

    /// Also write the extracted worksheet records to this JSON file
    #[arg(long, value_name = "PATH")]
    dump_records: Option<PathBuf>,
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let document = match Document::from_file(&cli.workbook) {
        Ok(document) => document,
        Err(err @ Error::Parse(_)) => {
            eprintln!("Error: {}", err);
            process::exit(EXIT_PARSE_FAILURE);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let worksheets = extract_worksheets(&document);
    let dashboards = extract_dashboards(&document);

    if let Some(path) = &cli.dump_records {
        if let Err(err) = write_debug_dump(&worksheets, path) {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }

    if dashboards.is_empty() {
        eprintln!(
            "Error: no dashboards found in {}",
            cli.workbook.display()
        );
        process::exit(EXIT_NO_DASHBOARDS);
    }

    match write_project(&dashboards, &worksheets, &cli.out, &mut RandomHexIds) {
        Ok(summary) => {
            println!(
                "Wrote {} pages and {} visuals to {} ({} worksheets skipped)",
                summary.pages,
                summary.visuals,
                cli.out.display(),
                summary.skipped.len()
            );
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}

//! Subsystem validation CLI.
//!
//! Provides the `subsys` binary. `validate` loads subsystems, checks them
//! against the genomes of a core directory and refreshes their cached error
//! counts. `survey` reports the cached counts without touching genome data.
//! `list` prints the subsystem ids. Reports go to stdout as JSON; logging
//! goes to stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

use subsys_check::{
    list_subsystems, CheckError, CoreLayout, SubsystemData, SubsystemReport, SurveyReport,
    ValidationConfig,
};
use subsys_store::SeedDirStore;

const EXIT_NOT_FOUND: i32 = 1;
const EXIT_IO: i32 = 3;

/// Subsystem spreadsheet consistency checker.
#[derive(Parser)]
#[command(name = "subsys", about = "Subsystem spreadsheet consistency checker")]
struct Cli {
    /// Core data directory holding Subsystems/ and Organisms/.
    #[arg(long, env = "SUBSYS_CORE_DIR", default_value = "data", global = true)]
    core: PathBuf,

    /// JSON file with validation settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate subsystems and print full reports.
    Validate {
        /// Subsystem ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print cached error counts (all subsystems if none are named).
    Survey { ids: Vec<String> },
    /// List subsystem ids.
    List,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_IO);
        }
    };
    let layout = CoreLayout::new(&cli.core);
    tracing::info!("Using core directory {}.", cli.core.display());

    let exit_code = match cli.command {
        Commands::Validate { ids } => run_validate(&layout, &config, &ids),
        Commands::Survey { ids } => run_survey(&layout, &config, ids),
        Commands::List => run_list(&layout),
    };
    process::exit(exit_code);
}

fn load_config(path: Option<&Path>) -> Result<ValidationConfig, CheckError> {
    match path {
        Some(path) => ValidationConfig::from_json_file(path),
        None => Ok(ValidationConfig::default()),
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 = success, 1 = a subsystem was not found,
/// 3 = I/O or parse error. Found subsystems are reported either way.
fn run_validate(layout: &CoreLayout, config: &ValidationConfig, ids: &[String]) -> i32 {
    let store = SeedDirStore::new(layout.root());
    let mut reports: Vec<SubsystemReport> = Vec::new();
    let mut exit_code = 0;
    for ss_id in ids {
        let loaded = SubsystemData::load(layout, &store, ss_id, config).and_then(|ss| {
            ss.map(|mut ss| ss.validate_rows(&store).map(|()| ss))
                .transpose()
        });
        match loaded {
            Ok(Some(ss)) => reports.push(ss.report()),
            Ok(None) => {
                eprintln!("Error: subsystem '{}' not found", ss_id);
                exit_code = exit_code.max(EXIT_NOT_FOUND);
            }
            Err(e) => {
                eprintln!("Error: failed to validate '{}': {}", ss_id, e);
                exit_code = EXIT_IO;
            }
        }
    }
    print_json(&reports);
    exit_code
}

/// Execute the survey subcommand. Exit codes as for validate.
fn run_survey(layout: &CoreLayout, config: &ValidationConfig, ids: Vec<String>) -> i32 {
    let ids = if ids.is_empty() {
        match list_subsystems(layout) {
            Ok(all) => all,
            Err(e) => {
                eprintln!("Error: {}", e);
                return EXIT_IO;
            }
        }
    } else {
        ids
    };
    let mut reports: Vec<SurveyReport> = Vec::new();
    let mut exit_code = 0;
    for ss_id in &ids {
        match SubsystemData::survey(layout, ss_id, config) {
            Ok(Some(ss)) => reports.push(ss.survey_report()),
            Ok(None) => {
                eprintln!("Error: subsystem '{}' not found", ss_id);
                exit_code = exit_code.max(EXIT_NOT_FOUND);
            }
            Err(e) => {
                eprintln!("Error: failed to survey '{}': {}", ss_id, e);
                exit_code = EXIT_IO;
            }
        }
    }
    print_json(&reports);
    exit_code
}

fn run_list(layout: &CoreLayout) -> i32 {
    match list_subsystems(layout) {
        Ok(ids) => {
            print_json(&ids);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_IO
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}

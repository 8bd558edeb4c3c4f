//! Command-line tool for `fireipa_core`.
//!
//! # Responsibility
//! - Print the linked core version.
//! - Validate a JSON document against a JSON schema file offline.

use clap::{Parser, Subcommand};
use fireipa_core::{document_from_json, document_to_json, validate, Schema};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Schema validation tooling for fireipa document models
#[derive(Parser, Debug)]
#[command(name = "fireipa")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace|debug|info|warn|error); needs `--log-dir`
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the core library version
    Version,

    /// Validate a document against a schema
    Validate {
        /// JSON object mapping field names to type tags
        #[arg(long)]
        schema: PathBuf,

        /// JSON object holding the document fields
        #[arg(long)]
        document: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(fireipa_core::default_log_level());
        if let Err(err) = fireipa_core::init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    let outcome = match cli.command {
        Command::Version => {
            println!("fireipa_core version={}", fireipa_core::core_version());
            Ok(true)
        }
        Command::Validate { schema, document } => run_validate(&schema, &document),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Prints diagnostics and the validated document. Returns whether the
/// document was accepted.
fn run_validate(schema_path: &Path, document_path: &Path) -> Result<bool, String> {
    let schema_text = read_file(schema_path)?;
    let schema = Schema::from_json_str(&schema_text)
        .map_err(|err| format!("{}: {err}", schema_path.display()))?;
    if schema.is_empty() {
        eprintln!(
            "warning: {} declares no fields; every document will be rejected",
            schema_path.display()
        );
    }

    let document_text = read_file(document_path)?;
    let document_json: serde_json::Value = serde_json::from_str(&document_text)
        .map_err(|err| format!("{}: {err}", document_path.display()))?;
    let raw = document_from_json(document_json)
        .ok_or_else(|| format!("{}: document must be a JSON object", document_path.display()))?;

    let report = validate(&schema, &raw);
    for diagnostic in &report.diagnostics {
        let line = serde_json::to_string(diagnostic).map_err(|err| err.to_string())?;
        eprintln!("{line}");
    }

    info!(
        "event=cli_validate module=cli status=ok fields={} diagnostics={} valid={}",
        schema.len(),
        report.diagnostics.len(),
        report.is_valid()
    );

    match report.into_result() {
        Ok(document) => {
            let rendered = serde_json::to_string_pretty(&document_to_json(&document))
                .map_err(|err| err.to_string())?;
            println!("{rendered}");
            Ok(true)
        }
        Err(err) => {
            eprintln!("rejected: {err}");
            Ok(false)
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))
}

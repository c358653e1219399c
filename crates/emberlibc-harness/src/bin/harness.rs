//! CLI entrypoint for the emberlibc conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use emberlibc_harness::fixtures::FixtureSet;
use emberlibc_harness::runner::TestRunner;
use emberlibc_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, validate_log_line};

/// Conformance tooling for emberlibc.
#[derive(Debug, Parser)]
#[command(name = "emberlibc-harness")]
#[command(about = "Conformance testing harness for the emberlibc stream core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a fixture set against the in-memory provider.
    Run {
        /// Fixture JSON file.
        #[arg(long)]
        fixture: PathBuf,
        /// Campaign label stamped into log lines.
        #[arg(long, default_value = "local")]
        campaign: String,
        /// Structured JSONL log output path (stdout if omitted).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{secs}")
}

fn run_fixture(fixture: &PathBuf, campaign: &str, log: Option<&PathBuf>) -> ExitCode {
    let set = match FixtureSet::from_file(fixture) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let results = match TestRunner::new(campaign).run(&set) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut lines = Vec::new();
    let mut failed = 0usize;
    for (i, result) in results.iter().enumerate() {
        if !result.passed {
            failed += 1;
        }
        let mut entry = LogEntry::new(
            timestamp(),
            format!("{campaign}-{i}"),
            if result.passed {
                LogLevel::Info
            } else {
                LogLevel::Error
            },
            "case_done",
        );
        entry.campaign = Some(campaign.to_string());
        entry.case = Some(result.case_name.clone());
        entry.outcome = Some(if result.passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        });
        entry.detail = result.diff.clone();
        lines.push(entry);
    }

    let emitted = match log {
        Some(path) => std::fs::File::create(path)
            .map_err(emberlibc_harness::HarnessError::from)
            .and_then(|file| {
                let mut emitter = LogEmitter::new(file);
                lines.iter().try_for_each(|entry| emitter.emit(entry))
            }),
        None => {
            let stdout = std::io::stdout();
            let mut emitter = LogEmitter::new(stdout.lock());
            lines.iter().try_for_each(|entry| emitter.emit(entry))
        }
    };
    if let Err(err) = emitted {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    eprintln!(
        "{} {}: {} cases, {} failed",
        set.family,
        set.version,
        results.len(),
        failed
    );
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_log(log: &PathBuf) -> ExitCode {
    let content = match std::fs::read_to_string(log) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut bad = 0usize;
    let mut total = 0usize;
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        if let Err(err) = validate_log_line(line) {
            eprintln!("line {}: {err}", lineno + 1);
            bad += 1;
        }
    }

    eprintln!("{total} lines, {bad} invalid");
    if bad == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match &cli.command {
        Command::Run {
            fixture,
            campaign,
            log,
        } => run_fixture(fixture, campaign, log.as_ref()),
        Command::ValidateLog { log } => validate_log(log),
    }
}

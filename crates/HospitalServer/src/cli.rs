//! # Hospital Reporting CLI
//!
//! Runs the reporting rollups offline against the server's record store: the
//! SQLite database or JSON snapshot named by `HMS_DATABASE_URL`.
//!
//! ## Command Line Options
//!
//! ```text
//! -s, --source <SOURCE>          Database URL, or path/URL of a snapshot [default: memory://]
//!     --log-level <LEVEL>        Log level for stderr diagnostics [default: warn]
//!
//! revenue            [--timeframe week|month|quarter|year] [--today YYYY-MM-DD]
//! attendance-summary [--date YYYY-MM-DD] [--department NAME]
//! workload           [--today YYYY-MM-DD]
//! attendance-report  [--date YYYY-MM-DD] [--department NAME] [-o FILE]
//! ```
//!
//! ## Usage Examples
//!
//! ```bash
//! hospital-cli --source snapshot.json revenue --timeframe quarter
//! hospital-cli -s sqlite:///var/lib/hms/hms.db workload
//! hospital-cli -s https://backup.example.com/hms.json workload
//! hospital-cli -s snapshot.json attendance-report --date 2024-03-01 -o march.csv
//! ```
//!
//! JSON reports go to stdout. The CSV report goes to `--output`, or to stdout
//! when no output file is given.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use hospital_core::data_source::{normalize_source_path, open_store};
use hospital_core::export::attendance_report;
use hospital_core::filter::{department_filter, parse_date};
use hospital_core::reporting::{Timeframe, attendance_summary, revenue_report, roster_overview};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hospital-cli")]
#[command(about = "Offline revenue, attendance and workload reports over a record snapshot")]
struct Args {
    /// Path or URL of the record snapshot (file://, http(s)://, memory://)
    #[arg(
        long,
        short = 's',
        env = "HMS_DATABASE_URL",
        default_value = "memory://"
    )]
    source: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "HMS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Revenue rollup for a timeframe
    Revenue {
        /// week, month, quarter or year
        #[arg(long, default_value = "month")]
        timeframe: String,

        /// Reference day (defaults to today, UTC)
        #[arg(long)]
        today: Option<String>,
    },

    /// Monthly attendance statistics
    AttendanceSummary {
        /// Any day of the month to summarize (defaults to today, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Restrict to one department ("all" for every department)
        #[arg(long)]
        department: Option<String>,
    },

    /// Per-department coverage for the day's shifts
    Workload {
        /// Day to evaluate (defaults to today, UTC)
        #[arg(long)]
        today: Option<String>,
    },

    /// Monthly attendance CSV
    AttendanceReport {
        /// Any day of the month to export (defaults to today, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Restrict to one department ("all" for every department)
        #[arg(long)]
        department: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Parse an optional `--date`/`--today` value, defaulting to today in UTC.
fn reference_day(raw: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match raw {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(Utc::now().date_naive()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = format!(
        "hospital_cli={lvl},hospital_core={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .init();

    let source = normalize_source_path(&args.source)?;
    info!("Loading records from {}", source);
    let store = open_store(&source).await?;
    let store = store.as_ref();

    match args.command {
        Command::Revenue { timeframe, today } => {
            let timeframe: Timeframe = timeframe.parse()?;
            let report = revenue_report(store, timeframe, reference_day(today.as_deref())?).await?;
            print_json(&report)?;
        }
        Command::AttendanceSummary { date, department } => {
            let department = department_filter(department.as_deref());
            let summary = attendance_summary(
                store,
                reference_day(date.as_deref())?,
                department.as_deref(),
            )
            .await?;
            print_json(&summary)?;
        }
        Command::Workload { today } => {
            let overview = roster_overview(store, reference_day(today.as_deref())?).await?;
            print_json(&overview.department_workload)?;
        }
        Command::AttendanceReport {
            date,
            department,
            output,
        } => {
            let department = department_filter(department.as_deref());
            let report = attendance_report(
                store,
                reference_day(date.as_deref())?,
                department.as_deref(),
            )
            .await?;
            match output {
                Some(path) => {
                    fs::write(&path, &report.body)?;
                    eprintln!(
                        "Wrote {} ({} bytes) to {:?}",
                        report.filename,
                        report.body.len(),
                        path
                    );
                }
                None => io::stdout().write_all(&report.body)?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_day_parses_dates() {
        let day = reference_day(Some("2024-03-04")).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert!(reference_day(Some("04/03/2024")).is_err());
    }

    #[test]
    fn test_subcommand_parsing() {
        let args = Args::try_parse_from([
            "hospital-cli",
            "--source",
            "snapshot.json",
            "attendance-report",
            "--date",
            "2024-03-01",
            "-o",
            "march.csv",
        ])
        .unwrap();
        assert_eq!(args.source, "snapshot.json");
        match args.command {
            Command::AttendanceReport { date, output, .. } => {
                assert_eq!(date.as_deref(), Some("2024-03-01"));
                assert_eq!(output, Some(PathBuf::from("march.csv")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_revenue_defaults_to_month() {
        let args = Args::try_parse_from(["hospital-cli", "revenue"]).unwrap();
        match args.command {
            Command::Revenue { timeframe, today } => {
                assert_eq!(timeframe.parse::<Timeframe>().unwrap(), Timeframe::Month);
                assert!(today.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

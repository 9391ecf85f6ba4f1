// LogTriage - GPL-3.0-or-later
// This file is part of LogTriage.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogTriage is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogTriage is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogTriage.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Context;
use clap::{ArgAction, Parser};
use logtriage::config::{GlobalConfig, RunConfig};
use logtriage::core::LogFileLoader;
use logtriage::error::AnalyzerError;
use logtriage::{analyze, report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXAMPLES: &str = concat!(
    "Examples:\n",
    "  logtriage /var/log/syslog\n",
    "  logtriage -o recommendations.txt -f syslog /var/log/kern.log",
);

#[derive(Parser, Debug)]
#[command(name = "logtriage")]
#[command(author = "LogTriage Team")]
#[command(version)]
#[command(
    about = "Analyze logs and recommend fixes for the problems they reveal",
    after_help = EXAMPLES
)]
struct Args {
    /// Log file to analyze
    #[arg(value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Write the summary to FILE (default: stdout); the detailed report goes to FILE.detailed
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log format of the input (default: auto-detect)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Read settings from this JSON file instead of the user config directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Initialize tracing on stderr so reports on stdout stay clean.
/// `RUST_LOG` overrides the level picked by `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let global = args
        .config
        .as_deref()
        .map_or_else(|| Ok(GlobalConfig::load()), GlobalConfig::load_from)?;
    let run = RunConfig::new(args.input, args.output, args.format, &global);

    let entries = LogFileLoader::load(&run.input_path, run.max_entries)
        .context("Failed to open input file")?;

    let analysis = analyze(&entries)
        .map_err(AnalyzerError::from)
        .context("Analysis failed")?;
    drop(entries);

    tracing::info!("Writing reports");
    if let Err(e) = report::emit_summary(&run, &analysis) {
        tracing::error!("Failed to write summary report: {e}");
    }
    if let Err(e) = report::emit_detailed(&run, &analysis) {
        tracing::error!("Failed to write detailed report: {e}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    tracing::info!(
        "LogTriage starting up (version {})",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(args) {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

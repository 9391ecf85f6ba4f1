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

//! Plain-text summary and detailed reports.

use crate::analysis::Analysis;
use crate::config::RunConfig;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const RULE: &str = "============================================================";
const SUB_RULE: &str = "-----------------------------------------------";

fn banner(w: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "{title:^60}")?;
    writeln!(w, "{RULE}")?;
    writeln!(w)
}

fn run_header(w: &mut impl Write, run: &RunConfig) -> io::Result<()> {
    writeln!(w, "Input file: {}", run.input_path.display())?;
    writeln!(w, "Log format: {}", run.format_label())?;
    writeln!(w)
}

/// Top patterns and recommendations, limited to `run.summary_limit` each
pub fn write_summary(w: &mut impl Write, run: &RunConfig, analysis: &Analysis) -> io::Result<()> {
    banner(w, "LOGTRIAGE SUMMARY REPORT")?;
    run_header(w, run)?;

    let top: Vec<_> = analysis.hits().take(run.summary_limit).collect();
    if top.is_empty() {
        writeln!(w, "No significant patterns detected.")?;
        writeln!(w)?;
    } else {
        writeln!(w, "Top Patterns Detected:")?;
        writeln!(w, "{SUB_RULE}")?;
        for (idx, pattern) in top.iter().enumerate() {
            writeln!(
                w,
                "[{}] {} (Frequency: {}, Severity: {})",
                idx + 1,
                pattern.description(),
                pattern.frequency,
                pattern.severity()
            )?;
        }
        writeln!(w)?;
    }

    if analysis.recommendations.is_empty() {
        writeln!(w, "No recommendations generated.")?;
        writeln!(w)?;
    } else {
        writeln!(w, "Top Recommendations:")?;
        writeln!(w, "{SUB_RULE}")?;
        for (idx, rec) in analysis
            .recommendations
            .iter()
            .take(run.summary_limit)
            .enumerate()
        {
            writeln!(w, "[{}] {} (Priority: {})", idx + 1, rec.title, rec.priority)?;
            writeln!(w, "    {}", rec.action)?;
            writeln!(w)?;
        }
    }

    writeln!(w, "{RULE}")?;
    writeln!(w, "For detailed information, see the detailed report.")?;
    writeln!(w, "{RULE}")?;
    Ok(())
}

/// Every matched pattern and every recommendation with all fields
pub fn write_detailed(w: &mut impl Write, run: &RunConfig, analysis: &Analysis) -> io::Result<()> {
    banner(w, "LOGTRIAGE DETAILED REPORT")?;
    run_header(w, run)?;

    banner(w, "DETECTED PATTERNS")?;
    let mut any_hit = false;
    for (idx, pattern) in analysis.hits().enumerate() {
        any_hit = true;
        writeln!(w, "Pattern {}:", idx + 1)?;
        writeln!(w, "  Description: {}", pattern.description())?;
        writeln!(w, "  Category: {}", pattern.category())?;
        writeln!(w, "  Severity: {}", pattern.severity())?;
        writeln!(w, "  Frequency: {}", pattern.frequency)?;
        writeln!(w, "  Regular Expression: {}", pattern.expression())?;
        writeln!(w)?;
    }
    if !any_hit {
        writeln!(w, "No significant patterns detected.")?;
        writeln!(w)?;
    }

    banner(w, "RECOMMENDATIONS")?;
    if analysis.recommendations.is_empty() {
        writeln!(w, "No recommendations generated.")?;
        writeln!(w)?;
    }
    for (idx, rec) in analysis.recommendations.iter().enumerate() {
        writeln!(w, "Recommendation {}:", idx + 1)?;
        writeln!(w, "  Title: {}", rec.title)?;
        writeln!(w, "  Description: {}", rec.description)?;
        writeln!(w, "  Action: {}", rec.action)?;
        writeln!(w, "  Category: {}", rec.scope)?;
        writeln!(w, "  Priority: {}", rec.priority)?;
        writeln!(w, "  Confidence: {:.2}", rec.confidence)?;
        writeln!(w)?;
    }

    writeln!(w, "{RULE}")?;
    writeln!(w, "{:^60}", "End of LogTriage Report")?;
    writeln!(w, "{RULE}")?;
    Ok(())
}

/// Write a report to `path`, or to stdout when there is no path or the file
/// cannot be written.
///
/// The report is rendered in memory first; a rendering error leaves no file
/// behind.
fn emit<F>(path: Option<&Path>, render: F) -> io::Result<()>
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut report = Vec::new();
    render(&mut report)?;

    if let Some(path) = path {
        let written = File::create(path).and_then(|mut file| {
            file.write_all(&report)?;
            file.flush()
        });
        match written {
            Ok(()) => {
                tracing::info!("Wrote report to {}", path.display());
                return Ok(());
            }
            Err(e) => {
                tracing::error!(
                    "Cannot write report to {}: {e}, using stdout instead",
                    path.display()
                );
            }
        }
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(&report)?;
    stdout.flush()
}

/// Write the summary to the output file (or stdout)
pub fn emit_summary(run: &RunConfig, analysis: &Analysis) -> io::Result<()> {
    emit(run.output_path.as_deref(), |w| write_summary(w, run, analysis))
}

/// Write the detailed report next to the summary (or to the configured default)
pub fn emit_detailed(run: &RunConfig, analysis: &Analysis) -> io::Result<()> {
    let path = run.detailed_path();
    emit(Some(&path), |w| write_detailed(w, run, analysis))
}

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

//! Best-effort field extraction from free-form log lines.
//!
//! Nothing here fails: unrecognized lines produce an entry whose fields sit at
//! their fallback values.

pub mod line;
pub mod timestamp;

pub use line::{LogEntry, Severity};

use fancy_regex::Regex;
use std::sync::LazyLock;

// Syslog program tag after "Mon DD HH:MM:SS host ": `sshd[1234]:` or `kernel:`
static SYSLOG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+\s+([A-Za-z0-9_./-]+)(?:\[(\d+)\])?:").expect("valid regex literal")
});

static BRACKETED_PID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("valid regex literal"));

static PID_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PID (\d+)").expect("valid regex literal"));

static TID_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:TID |tid=)(\d+)").expect("valid regex literal"));

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?<![\w.-])([A-Za-z_][A-Za-z0-9_.-]*)=("[^"]*"|[^\s,;]+)"#)
        .expect("valid regex literal")
});

/// Longest prefix before the first ':' still accepted as a source name
const MAX_SOURCE_LEN: usize = 31;

/// Parse a raw line into a `LogEntry`
#[must_use]
pub fn parse_line(raw: &str, line_number: usize) -> LogEntry {
    let mut entry = LogEntry::new(raw.to_string(), line_number);

    let stamp = timestamp::extract(raw);
    if let Some(ts) = stamp.timestamp {
        entry.timestamp = ts;
    }
    entry.severity = Severity::detect(raw);

    let tag = stamp
        .syslog_rest
        .and_then(|rest| SYSLOG_TAG.captures(rest).ok().flatten())
        .map(|caps| {
            let name = caps[1].to_string();
            let pid = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            (name, pid)
        });

    entry.source = extract_source(raw, tag.as_ref().map(|(name, _)| name.as_str()))
        .unwrap_or_else(|| "unknown".to_string());
    entry.process_id = tag
        .and_then(|(_, pid)| pid)
        .or_else(|| extract_process_id(raw));
    entry.thread_id = first_number(&TID_KEYWORD, raw);

    if let Some(idx) = raw.find(": ") {
        entry.message = raw[idx + 2..].to_string();
    }
    entry.extra = extract_fields(&entry.message);

    entry
}

fn extract_source(raw: &str, syslog_tag: Option<&str>) -> Option<String> {
    if let Some(inner) = raw.strip_prefix('[') {
        if let Some(end) = inner.find(']') {
            if end > 0 {
                return Some(inner[..end].to_string());
            }
        }
    }

    if let Some(tag) = syslog_tag {
        return Some(tag.to_string());
    }

    raw.find(':')
        .filter(|&len| len > 0 && len <= MAX_SOURCE_LEN)
        .map(|len| raw[..len].to_string())
}

fn extract_process_id(raw: &str) -> Option<u32> {
    first_number(&BRACKETED_PID, raw).or_else(|| first_number(&PID_KEYWORD, raw))
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .ok()
        .flatten()
        .and_then(|caps| caps[1].parse().ok())
}

fn extract_fields(message: &str) -> std::collections::BTreeMap<String, String> {
    KEY_VALUE
        .captures_iter(message)
        .filter_map(Result::ok)
        .map(|caps| {
            let value = caps[2].trim_matches('"').to_string();
            (caps[1].to_string(), value)
        })
        .collect()
}

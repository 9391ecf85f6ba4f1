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

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt;

/// Syslog severity levels (RFC 5424 numbering, 0 is the most severe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    #[default]
    Info,
    Debug,
}

impl Severity {
    /// Markers checked in order; the first marker found anywhere in the line wins.
    /// Matching is case-sensitive substring search.
    const MARKERS: [(&'static [&'static str], Self); 8] = [
        (&["EMERGENCY", "EMERG", "fatal"], Self::Emergency),
        (&["ALERT"], Self::Alert),
        (&["CRITICAL", "CRIT"], Self::Critical),
        (&["ERROR", "ERR"], Self::Error),
        (&["WARNING", "WARN"], Self::Warning),
        (&["NOTICE"], Self::Notice),
        (&["INFO", "information"], Self::Info),
        (&["DEBUG"], Self::Debug),
    ];

    /// Guess the severity of a raw line, defaulting to `Info`
    #[must_use]
    pub fn detect(line: &str) -> Self {
        Self::MARKERS
            .iter()
            .find(|(markers, _)| markers.iter().any(|m| line.contains(m)))
            .map_or(Self::Info, |(_, severity)| *severity)
    }

    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Emergency => 0,
            Self::Alert => 1,
            Self::Critical => 2,
            Self::Error => 3,
            Self::Warning => 4,
            Self::Notice => 5,
            Self::Info => 6,
            Self::Debug => 7,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERG",
            Self::Alert => "ALERT",
            Self::Critical => "CRIT",
            Self::Error => "ERR",
            Self::Warning => "WARN",
            Self::Notice => "NOTICE",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed log line. Entries are built once by the parser and only read afterwards.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub raw: String,
    /// Text after the first `": "` separator, or the whole line
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub source: String,
    pub process_id: Option<u32>,
    pub thread_id: Option<u32>,
    /// `key=value` tokens found in the message
    pub extra: BTreeMap<String, String>,
    pub line_number: usize,
}

impl LogEntry {
    /// Entry with every field at its fallback value and the raw line as message
    #[must_use]
    pub fn new(raw: String, line_number: usize) -> Self {
        Self {
            message: raw.clone(),
            raw,
            timestamp: Local::now(),
            severity: Severity::default(),
            source: "unknown".to_string(),
            process_id: None,
            thread_id: None,
            extra: BTreeMap::new(),
            line_number,
        }
    }

    #[must_use]
    pub const fn has_message(&self) -> bool {
        !self.message.is_empty()
    }
}

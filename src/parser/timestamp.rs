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

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use fancy_regex::Regex;
use std::sync::LazyLock;

// Common syslog: Nov 20 14:23:45 (no year)
static SYSLOG_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-z]{2})\s+(\d{1,2})\s+(\d{1,2}):(\d{2}):(\d{2})\s*")
        .expect("valid regex literal")
});

// ISO 8601: 2025-11-20T14:23:45.123Z or 2025-11-20 14:23:45
static ISO_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ](\d{2}:\d{2}:\d{2}(?:\.\d+)?)(Z|[+-]\d{2}:\d{2})?")
        .expect("valid regex literal")
});

// Unix epoch seconds at the start of the line
static EPOCH_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\s|$)").expect("valid regex literal"));

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Result of timestamp extraction
#[derive(Debug, Default)]
pub struct Extracted<'a> {
    pub timestamp: Option<DateTime<Local>>,
    /// Remainder after a syslog timestamp, where host and program tag follow
    pub syslog_rest: Option<&'a str>,
}

/// Try the known timestamp layouts at the start of `raw`
#[must_use]
pub fn extract(raw: &str) -> Extracted<'_> {
    if let Ok(Some(caps)) = SYSLOG_TIMESTAMP.captures(raw) {
        let rest = &raw[caps[0].len()..];
        let month = MONTHS.iter().position(|m| *m == &caps[1]);
        let timestamp = month.and_then(|idx| {
            let day = caps[2].parse::<u32>().ok()?;
            let hour = caps[3].parse::<u32>().ok()?;
            let min = caps[4].parse::<u32>().ok()?;
            let sec = caps[5].parse::<u32>().ok()?;
            // Syslog omits the year, assume the current one
            NaiveDate::from_ymd_opt(Local::now().year(), idx as u32 + 1, day)?
                .and_hms_opt(hour, min, sec)?
                .and_local_timezone(Local)
                .single()
        });
        return Extracted {
            timestamp,
            syslog_rest: Some(rest),
        };
    }

    if let Ok(Some(caps)) = ISO_TIMESTAMP.captures(raw) {
        let naive = format!("{}T{}", &caps[1], &caps[2]);
        let timestamp = caps.get(3).map_or_else(
            || {
                NaiveDateTime::parse_from_str(&naive, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .and_then(|dt| dt.and_local_timezone(Local).single())
            },
            |offset| {
                DateTime::parse_from_rfc3339(&format!("{naive}{}", offset.as_str()))
                    .ok()
                    .map(|dt| dt.with_timezone(&Local))
            },
        );
        return Extracted {
            timestamp,
            syslog_rest: None,
        };
    }

    let timestamp = EPOCH_TIMESTAMP
        .captures(raw)
        .ok()
        .flatten()
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.with_timezone(&Local));

    Extracted {
        timestamp,
        syslog_rest: None,
    }
}

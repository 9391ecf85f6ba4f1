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

//! Frequency counting of catalog signatures over parsed entries.

use crate::analysis::catalog::{Category, PatternSpec, Signature};
use crate::error::AnalysisError;
use crate::parser::LogEntry;

/// A catalog signature together with its hit count for the current run
#[derive(Debug, Clone)]
pub struct Pattern {
    spec: PatternSpec,
    pub frequency: usize,
}

impl Pattern {
    #[must_use]
    pub const fn new(spec: PatternSpec) -> Self {
        Self { spec, frequency: 0 }
    }

    #[must_use]
    pub const fn signature(&self) -> Signature {
        self.spec.signature
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.spec.category
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.spec.description
    }

    #[must_use]
    pub const fn severity(&self) -> u8 {
        self.spec.severity
    }

    /// Source text of the regular expression
    #[must_use]
    pub fn expression(&self) -> &str {
        self.spec.regex.as_str()
    }

    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.frequency > 0
    }
}

/// The live pattern list of one detection pass.
///
/// Counters only grow. Recording the same entries twice counts them twice, so
/// a new pass needs a new set.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// One zeroed pattern per catalog row, in catalog order
    #[must_use]
    pub fn from_catalog(catalog: &[PatternSpec]) -> Self {
        Self {
            patterns: catalog.iter().cloned().map(Pattern::new).collect(),
        }
    }

    /// Count `entry` against every pattern it matches.
    /// Entries without a message are ignored.
    pub fn record(&mut self, entry: &LogEntry) {
        if !entry.has_message() {
            return;
        }
        for pattern in &mut self.patterns {
            if pattern.spec.matches(&entry.message) {
                pattern.frequency += 1;
                tracing::trace!(
                    "line {} matched {}",
                    entry.line_number,
                    pattern.signature().id()
                );
            }
        }
    }

    /// Sort by frequency, highest first. The sort is stable so equal
    /// frequencies keep catalog order.
    pub fn rank(&mut self) {
        self.patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    }

    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[must_use]
    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }

    pub fn hits(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(|p| p.is_hit())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Match every entry against a fresh copy of `catalog` and rank the result.
///
/// The returned list always has one pattern per catalog row, including
/// patterns that never matched.
pub fn detect(
    entries: &[LogEntry],
    catalog: &[PatternSpec],
) -> Result<Vec<Pattern>, AnalysisError> {
    if entries.is_empty() {
        return Err(AnalysisError::NoEntries);
    }
    if catalog.is_empty() {
        return Err(AnalysisError::EmptyCatalog);
    }

    let mut set = PatternSet::from_catalog(catalog);
    for entry in entries {
        set.record(entry);
    }
    set.rank();

    let hit_count = set.hits().count();
    tracing::info!(
        "Matched {hit_count} of {} signatures across {} entries",
        set.len(),
        entries.len()
    );
    for pattern in set.hits() {
        tracing::debug!(
            "{} ({}): {} hits",
            pattern.signature().id(),
            pattern.category(),
            pattern.frequency
        );
    }

    Ok(set.into_patterns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::load_catalog;
    use crate::parser::parse_line;
    use proptest::prelude::*;

    fn entries(lines: &[&str]) -> Vec<LogEntry> {
        lines
            .iter()
            .enumerate()
            .map(|(idx, line)| parse_line(line, idx + 1))
            .collect()
    }

    fn frequency_of(patterns: &[Pattern], signature: Signature) -> usize {
        patterns
            .iter()
            .find(|p| p.signature() == signature)
            .map_or(0, |p| p.frequency)
    }

    #[test]
    fn test_empty_entries_is_an_error() {
        assert_eq!(
            detect(&[], &load_catalog()).expect_err("no entries"),
            AnalysisError::NoEntries
        );
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let entries = entries(&["disk full"]);
        assert_eq!(
            detect(&entries, &[]).expect_err("no catalog"),
            AnalysisError::EmptyCatalog
        );
    }

    #[test]
    fn test_zeroed_set_has_no_hits() {
        let set = PatternSet::from_catalog(&load_catalog());
        assert_eq!(set.len(), 23);
        assert_eq!(set.hits().count(), 0);
        assert!(set.patterns().iter().all(|p| p.frequency == 0));
    }

    #[test]
    fn test_oom_line_counts_once() {
        let catalog = load_catalog();
        let patterns = detect(
            &entries(&["Jan 1 00:00:00 host kernel: out of memory killing process 123"]),
            &catalog,
        )
        .expect("detection should succeed");

        assert_eq!(patterns.len(), catalog.len());
        assert_eq!(patterns[0].signature(), Signature::OutOfMemory);
        assert_eq!(patterns[0].frequency, 1);
        assert_eq!(patterns[0].category(), Category::Memory);
        assert_eq!(patterns.iter().filter(|p| p.is_hit()).count(), 1);
    }

    #[test]
    fn test_one_entry_can_hit_several_patterns() {
        let patterns = detect(
            &entries(&["app: disk full, i/o error on sda1"]),
            &load_catalog(),
        )
        .expect("detection should succeed");
        assert_eq!(frequency_of(&patterns, Signature::DiskFull), 1);
        assert_eq!(frequency_of(&patterns, Signature::IoError), 1);
    }

    #[test]
    fn test_repeated_signature_in_one_message_counts_once() {
        let patterns = detect(
            &entries(&["x: disk full disk full disk full", "y: disk full"]),
            &load_catalog(),
        )
        .expect("detection should succeed");
        assert_eq!(frequency_of(&patterns, Signature::DiskFull), 2);
    }

    #[test]
    fn test_ranking_by_frequency() {
        let patterns = detect(
            &entries(&[
                "eth0: packet loss 5%",
                "db: deadlock detected",
                "db: deadlock detected",
                "db: deadlock detected",
                "eth0: packet loss 7%",
            ]),
            &load_catalog(),
        )
        .expect("detection should succeed");
        assert_eq!(patterns[0].signature(), Signature::Deadlock);
        assert_eq!(patterns[0].frequency, 3);
        assert_eq!(patterns[1].signature(), Signature::PacketLoss);
        assert_eq!(patterns[1].frequency, 2);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // Both hit once; out-of-memory is declared before disk-full
        let patterns = detect(
            &entries(&["fs: disk full", "kernel: out of memory"]),
            &load_catalog(),
        )
        .expect("detection should succeed");
        assert_eq!(patterns[0].signature(), Signature::OutOfMemory);
        assert_eq!(patterns[1].signature(), Signature::DiskFull);
        // Zero-frequency tail stays in declaration order
        assert_eq!(patterns[2].signature(), Signature::HighCpuUsage);
        assert_eq!(patterns[3].signature(), Signature::HighLoadAverage);
    }

    #[test]
    fn test_empty_messages_are_skipped() {
        let mut set = PatternSet::from_catalog(&load_catalog());
        let mut entry = LogEntry::new("disk full".to_string(), 1);
        entry.message.clear();
        set.record(&entry);
        assert_eq!(set.hits().count(), 0);
    }

    #[test]
    fn test_recording_twice_accumulates() {
        let mut set = PatternSet::from_catalog(&load_catalog());
        let entry = parse_line("kernel: segmentation fault at 0x0", 1);
        set.record(&entry);
        set.record(&entry);
        assert_eq!(frequency_of(set.patterns(), Signature::Segfault), 2);
    }

    #[test]
    fn test_detection_on_fresh_catalogs_is_repeatable() {
        let entries = entries(&[
            "kernel: out of memory",
            "sda: device timeout",
            "app: connection timed out",
            "app: connection timed out",
        ]);
        let first = detect(&entries, &load_catalog()).expect("first pass");
        let second = detect(&entries, &load_catalog()).expect("second pass");
        let freqs = |p: &[Pattern]| {
            p.iter()
                .map(|p| (p.signature(), p.frequency))
                .collect::<Vec<_>>()
        };
        assert_eq!(freqs(&first), freqs(&second));
    }

    const SAMPLE_MESSAGES: [&str; 8] = [
        "out of memory",
        "disk full",
        "packet loss detected",
        "deadlock detected",
        "segmentation fault",
        "too many open files",
        "nothing interesting",
        "cpu usage at 97%",
    ];

    proptest! {
        #[test]
        fn prop_ranked_list_is_sorted_and_stable(
            picks in prop::collection::vec(0..SAMPLE_MESSAGES.len(), 1..40)
        ) {
            let catalog = load_catalog();
            let lines: Vec<&str> = picks.iter().map(|&i| SAMPLE_MESSAGES[i]).collect();
            let patterns = detect(&entries(&lines), &catalog).expect("detection should succeed");

            prop_assert_eq!(patterns.len(), catalog.len());
            for pair in patterns.windows(2) {
                prop_assert!(pair[0].frequency >= pair[1].frequency);
                if pair[0].frequency == pair[1].frequency {
                    let pos = |s: Signature| catalog.iter().position(|c| c.signature == s);
                    prop_assert!(pos(pair[0].signature()) < pos(pair[1].signature()));
                }
            }
        }
    }
}

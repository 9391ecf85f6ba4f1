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

use crate::error::{AnalyzerError, Result};
use crate::parser::{parse_line, LogEntry};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// An open input file, read line by line
pub struct LogFile {
    path: PathBuf,
    reader: BufReader<File>,
    buffer: Vec<u8>,
    lines_read: usize,
}

impl LogFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| AnalyzerError::io(&path, e))?;
        tracing::debug!("Opened {}", path.display());
        Ok(Self {
            path,
            reader: BufReader::new(file),
            buffer: Vec::new(),
            lines_read: 0,
        })
    }

    /// Next line without its line terminator, or `None` at end of file.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|e| AnalyzerError::io(&self.path, e))?;
        if read == 0 {
            return Ok(None);
        }

        if self.buffer.ends_with(b"\n") {
            self.buffer.pop();
            if self.buffer.ends_with(b"\r") {
                self.buffer.pop();
            }
        }
        self.lines_read += 1;
        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }

    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.lines_read
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn close(self) {
        tracing::debug!(
            "Closed {} after {} lines",
            self.path.display(),
            self.lines_read
        );
    }
}

/// Reads and parses a whole input file
pub struct LogFileLoader;

impl LogFileLoader {
    /// Parse up to `max_entries` lines of `path`
    pub fn load(path: &Path, max_entries: usize) -> Result<Vec<LogEntry>> {
        let start_time = std::time::Instant::now();
        let mut file = LogFile::open(path)?;
        let mut entries = Vec::new();

        tracing::info!("Reading log entries from {}", path.display());
        while entries.len() < max_entries {
            let Some(line) = file.read_line()? else {
                break;
            };
            entries.push(parse_line(&line, file.lines_read()));
        }

        if entries.len() == max_entries && file.read_line()?.is_some() {
            tracing::warn!(
                "Stopped after {max_entries} entries, the rest of {} is ignored",
                path.display()
            );
        }

        file.close();
        tracing::info!(
            "Read {} log entries in {:?}",
            entries.len(),
            start_time.elapsed()
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_log(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn test_read_lines_strips_terminators() {
        let tmp = temp_log(b"first\r\nsecond\n\nlast without newline");
        let mut file = LogFile::open(tmp.path()).expect("open");
        assert_eq!(file.read_line().expect("read").as_deref(), Some("first"));
        assert_eq!(file.read_line().expect("read").as_deref(), Some("second"));
        assert_eq!(file.read_line().expect("read").as_deref(), Some(""));
        assert_eq!(
            file.read_line().expect("read").as_deref(),
            Some("last without newline")
        );
        assert_eq!(file.read_line().expect("read"), None);
        assert_eq!(file.lines_read(), 4);
        file.close();
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let tmp = temp_log(b"disk full \xff\xfe\n");
        let mut file = LogFile::open(tmp.path()).expect("open");
        let line = file.read_line().expect("read").expect("one line");
        assert!(line.starts_with("disk full "));
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.log");
        match LogFile::open(&missing) {
            Err(AnalyzerError::Io { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            Err(other) => unreachable!("unexpected error {other}"),
            Ok(_) => unreachable!("missing file opened"),
        }
    }

    #[test]
    fn test_two_files_open_at_once() {
        let a = temp_log(b"a1\na2\n");
        let b = temp_log(b"b1\n");
        let mut first = LogFile::open(a.path()).expect("open a");
        let mut second = LogFile::open(b.path()).expect("open b");
        assert_eq!(first.read_line().expect("read").as_deref(), Some("a1"));
        assert_eq!(second.read_line().expect("read").as_deref(), Some("b1"));
        assert_eq!(first.read_line().expect("read").as_deref(), Some("a2"));
        assert_eq!(second.path(), b.path());
    }

    #[test]
    fn test_loader_parses_with_line_numbers() {
        let tmp = temp_log(b"kernel: out of memory\nsda: disk full\n");
        let entries = LogFileLoader::load(tmp.path(), 100).expect("load");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].line_number, 1);
        assert_eq!(entries[1].message, "disk full");
        assert_eq!(entries[1].line_number, 2);
    }

    #[test]
    fn test_loader_respects_max_entries() {
        let tmp = temp_log(b"one\ntwo\nthree\nfour\n");
        let entries = LogFileLoader::load(tmp.path(), 2).expect("load");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].raw, "two");
    }
}

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
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const fn default_summary_limit() -> usize {
    5
}

const fn default_max_entries() -> usize {
    10_000
}

fn default_detailed_report_path() -> PathBuf {
    PathBuf::from("log_analysis_detailed.txt")
}

/// Global user configuration stored in config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Number of patterns and recommendations shown in the summary
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,

    /// Lines beyond this count are not read
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Where the detailed report goes when no output file is given
    #[serde(default = "default_detailed_report_path")]
    pub detailed_report_path: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            summary_limit: default_summary_limit(),
            max_entries: default_max_entries(),
            detailed_report_path: default_detailed_report_path(),
        }
    }
}

impl GlobalConfig {
    /// Get the path to the global config file
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logtriage").join("config.json"))
    }

    /// Load global config from the default location, returning defaults if
    /// it is missing or unusable
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!("No global config found, using defaults");
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring global config: {e}");
            Self::default()
        })
    }

    /// Load an explicitly named config file; any failure is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AnalyzerError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| AnalyzerError::Config(format!("invalid {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(AnalyzerError::Config(
                "max_entries must be at least 1".to_string(),
            ));
        }
        if self.detailed_report_path.as_os_str().is_empty() {
            return Err(AnalyzerError::Config(
                "detailed_report_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for a single run: command line values merged with the global config
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    /// Summary report destination; stdout when `None`
    pub output_path: Option<PathBuf>,
    /// Declared log format, only echoed in reports
    pub log_format: Option<String>,
    pub summary_limit: usize,
    pub max_entries: usize,
    detailed_default: PathBuf,
}

impl RunConfig {
    #[must_use]
    pub fn new(
        input_path: PathBuf,
        output_path: Option<PathBuf>,
        log_format: Option<String>,
        global: &GlobalConfig,
    ) -> Self {
        Self {
            input_path,
            output_path,
            log_format: log_format.filter(|f| !f.is_empty()),
            summary_limit: global.summary_limit,
            max_entries: global.max_entries,
            detailed_default: global.detailed_report_path.clone(),
        }
    }

    /// `<output>.detailed` next to the summary, or the configured default
    #[must_use]
    pub fn detailed_path(&self) -> PathBuf {
        self.output_path.as_ref().map_or_else(
            || self.detailed_default.clone(),
            |output| {
                let mut name = OsString::from(output.as_os_str());
                name.push(".detailed");
                PathBuf::from(name)
            },
        )
    }

    #[must_use]
    pub fn format_label(&self) -> &str {
        self.log_format.as_deref().unwrap_or("Auto-detected")
    }
}

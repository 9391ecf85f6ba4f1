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

pub mod advisor;
pub mod catalog;
pub mod detector;

pub use advisor::{AdviceScope, Recommendation};
pub use catalog::{Category, Signature};
pub use detector::Pattern;

use crate::error::AnalysisError;
use crate::parser::LogEntry;

/// Output of both analysis stages for one run
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Full catalog, ranked by frequency
    pub patterns: Vec<Pattern>,
    /// Most urgent first
    pub recommendations: Vec<Recommendation>,
}

impl Analysis {
    pub fn hits(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(|p| p.is_hit())
    }
}

/// Run detection with the built-in catalog, then derive recommendations
pub fn analyze(entries: &[LogEntry]) -> Result<Analysis, AnalysisError> {
    let catalog = catalog::load_catalog();
    tracing::info!("Analyzing patterns over {} entries", entries.len());
    let patterns = detector::detect(entries, &catalog)?;

    tracing::info!("Generating recommendations");
    let recommendations = advisor::generate(&patterns);

    Ok(Analysis {
        patterns,
        recommendations,
    })
}

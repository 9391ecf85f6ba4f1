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

//! The built-in catalog of fault signatures.
//!
//! The table is compiled in and its order matters: ranking ties are broken by
//! declaration order. Expressions are case-sensitive and unanchored.
//!
//! The percentage thresholds are digit classes, not numeric comparisons.
//! `[9][0-9]%` matches 90% to 99% but not 100%. They are kept verbatim so the
//! same logs produce the same hits as before.

use fancy_regex::Regex;
use std::fmt;

/// Upper bound on the number of signatures a catalog may hold
pub const MAX_CATALOG_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cpu,
    Memory,
    Disk,
    Network,
    Process,
    Database,
    Resources,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Disk => "disk",
            Self::Network => "network",
            Self::Process => "process",
            Self::Database => "database",
            Self::Resources => "resources",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of each built-in signature, so rules can refer to a specific one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    HighCpuUsage,
    HighLoadAverage,
    ExcessiveCpuProcess,
    OutOfMemory,
    AllocationFailure,
    LowFreeMemory,
    HighSwap,
    DiskFull,
    IoError,
    DeviceTimeout,
    FilesystemNearCapacity,
    NetworkUnreachable,
    ConnectionTimeout,
    PacketLoss,
    ProcessKilled,
    Segfault,
    CoreDumped,
    ProcessNotResponding,
    DbConnectionFailed,
    QueryTimeout,
    Deadlock,
    TooManyOpenFiles,
    FdLimitReached,
}

impl Signature {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::HighCpuUsage => "high-cpu-usage",
            Self::HighLoadAverage => "high-load-average",
            Self::ExcessiveCpuProcess => "excessive-cpu-process",
            Self::OutOfMemory => "out-of-memory",
            Self::AllocationFailure => "allocation-failure",
            Self::LowFreeMemory => "low-free-memory",
            Self::HighSwap => "high-swap",
            Self::DiskFull => "disk-full",
            Self::IoError => "io-error",
            Self::DeviceTimeout => "device-timeout",
            Self::FilesystemNearCapacity => "filesystem-near-capacity",
            Self::NetworkUnreachable => "network-unreachable",
            Self::ConnectionTimeout => "connection-timeout",
            Self::PacketLoss => "packet-loss",
            Self::ProcessKilled => "process-killed",
            Self::Segfault => "segfault",
            Self::CoreDumped => "core-dumped",
            Self::ProcessNotResponding => "process-not-responding",
            Self::DbConnectionFailed => "db-connection-failed",
            Self::QueryTimeout => "query-timeout",
            Self::Deadlock => "deadlock",
            Self::TooManyOpenFiles => "too-many-open-files",
            Self::FdLimitReached => "fd-limit-reached",
        }
    }
}

/// Uncompiled catalog row
#[derive(Debug, Clone, Copy)]
pub struct SignatureDef {
    pub signature: Signature,
    pub regex: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub severity: u8,
}

const fn def(
    signature: Signature,
    regex: &'static str,
    description: &'static str,
    category: Category,
    severity: u8,
) -> SignatureDef {
    SignatureDef {
        signature,
        regex,
        description,
        category,
        severity,
    }
}

#[rustfmt::skip]
pub const BUILTIN_SIGNATURES: [SignatureDef; 23] = [
    def(Signature::HighCpuUsage, r".*cpu usage.*[9][0-9]%.*", "High CPU usage detected", Category::Cpu, 4),
    def(Signature::HighLoadAverage, r".*load average:.*[5-9]\.[0-9].*", "High load average", Category::Cpu, 3),
    def(Signature::ExcessiveCpuProcess, r".*process.*using excessive cpu.*", "Process using excessive CPU", Category::Cpu, 4),
    def(Signature::OutOfMemory, r".*out of memory.*", "Out of memory condition", Category::Memory, 5),
    def(Signature::AllocationFailure, r".*memory allocation failed.*", "Memory allocation failure", Category::Memory, 4),
    def(Signature::LowFreeMemory, r".*free memory: [0-9]+ KB.*", "Low free memory", Category::Memory, 3),
    def(Signature::HighSwap, r".*swap used: [8-9][0-9]%.*", "High swap usage", Category::Memory, 4),
    def(Signature::DiskFull, r".*disk full.*", "Disk full condition", Category::Disk, 5),
    def(Signature::IoError, r".*i/o error.*", "Disk I/O error", Category::Disk, 4),
    def(Signature::DeviceTimeout, r".*device timeout.*", "Device timeout", Category::Disk, 3),
    def(Signature::FilesystemNearCapacity, r".*filesystem.*[9][0-9]%.*", "Filesystem near capacity", Category::Disk, 3),
    def(Signature::NetworkUnreachable, r".*network unreachable.*", "Network unreachable", Category::Network, 4),
    def(Signature::ConnectionTimeout, r".*connection timed out.*", "Connection timeout", Category::Network, 3),
    def(Signature::PacketLoss, r".*packet loss.*", "Network packet loss", Category::Network, 3),
    def(Signature::ProcessKilled, r".*process.*killed.*", "Process killed", Category::Process, 4),
    def(Signature::Segfault, r".*segmentation fault.*", "Segmentation fault", Category::Process, 5),
    def(Signature::CoreDumped, r".*core dumped.*", "Core dumped", Category::Process, 5),
    def(Signature::ProcessNotResponding, r".*process.*not responding.*", "Process not responding", Category::Process, 4),
    def(Signature::DbConnectionFailed, r".*database connection failed.*", "Database connection failure", Category::Database, 4),
    def(Signature::QueryTimeout, r".*query timeout.*", "Database query timeout", Category::Database, 3),
    def(Signature::Deadlock, r".*deadlock detected.*", "Database deadlock", Category::Database, 4),
    def(Signature::TooManyOpenFiles, r".*too many open files.*", "Too many open files", Category::Resources, 4),
    def(Signature::FdLimitReached, r".*file descriptor.*limit.*", "File descriptor limit reached", Category::Resources, 4),
];

/// A validated, compiled catalog row
#[derive(Debug, Clone)]
pub struct PatternSpec {
    pub signature: Signature,
    pub regex: Regex,
    pub description: &'static str,
    pub category: Category,
    pub severity: u8,
}

impl PatternSpec {
    /// Whether the signature occurs anywhere in `message`.
    /// Backtracking errors count as no match.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.regex.is_match(message).unwrap_or(false)
    }
}

/// Materialize the built-in catalog
#[must_use]
pub fn load_catalog() -> Vec<PatternSpec> {
    compile(&BUILTIN_SIGNATURES)
}

/// Compile and validate catalog rows, keeping declaration order.
///
/// A row whose expression does not compile or whose severity is outside 1..=5
/// is left out; the remaining rows still load.
#[must_use]
pub fn compile(defs: &[SignatureDef]) -> Vec<PatternSpec> {
    if defs.len() > MAX_CATALOG_SIZE {
        tracing::warn!(
            "Catalog has {} signatures, only the first {MAX_CATALOG_SIZE} are used",
            defs.len()
        );
    }

    let specs: Vec<PatternSpec> = defs
        .iter()
        .take(MAX_CATALOG_SIZE)
        .filter_map(|def| {
            if !(1..=5).contains(&def.severity) {
                tracing::warn!(
                    "Skipping signature {}: severity {} outside 1..=5",
                    def.signature.id(),
                    def.severity
                );
                return None;
            }
            let regex = Regex::new(def.regex)
                .map_err(|e| {
                    tracing::warn!(
                        "Skipping signature {}: invalid regex {:?}: {e}",
                        def.signature.id(),
                        def.regex
                    );
                })
                .ok()?;
            Some(PatternSpec {
                signature: def.signature,
                regex,
                description: def.description,
                category: def.category,
                severity: def.severity,
            })
        })
        .collect();

    tracing::debug!("Loaded {} of {} signatures", specs.len(), defs.len());
    specs
}

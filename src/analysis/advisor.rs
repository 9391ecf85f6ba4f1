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

//! Rule-based recommendations derived from ranked signature hits.
//!
//! Rules run in a fixed order (cpu, memory, disk, network, general) and the
//! result is stably sorted by priority, so equal priorities keep rule order.

use crate::analysis::catalog::{Category, Signature};
use crate::analysis::detector::Pattern;
use std::collections::HashSet;
use std::fmt;

/// What a recommendation is about: one signature category, or the run as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceScope {
    Category(Category),
    General,
}

impl fmt::Display for AdviceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => fmt::Display::fmt(category, f),
            Self::General => f.write_str("general"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    /// Higher is more urgent
    pub priority: u8,
    pub scope: AdviceScope,
    /// Static per rule, in 0.0..=1.0
    pub confidence: f32,
}

const fn advice(
    title: &'static str,
    description: &'static str,
    action: &'static str,
    priority: u8,
    scope: AdviceScope,
    confidence: f32,
) -> Recommendation {
    Recommendation {
        title,
        description,
        action,
        priority,
        scope,
        confidence,
    }
}

const CPU: AdviceScope = AdviceScope::Category(Category::Cpu);
const MEMORY: AdviceScope = AdviceScope::Category(Category::Memory);
const DISK: AdviceScope = AdviceScope::Category(Category::Disk);
const NETWORK: AdviceScope = AdviceScope::Category(Category::Network);

pub const ANALYZE_CPU: Recommendation = advice(
    "Analyze CPU-intensive processes",
    "The system is experiencing high CPU usage or load average.",
    "Use 'top' or 'htop' to identify CPU-intensive processes. Consider optimizing or throttling these processes.",
    4,
    CPU,
    0.8,
);
pub const RUNAWAY_PROCESSES: Recommendation = advice(
    "Check for runaway processes",
    "High CPU usage might be caused by runaway processes that need to be terminated.",
    "Use 'ps aux' to identify processes consuming excessive CPU and consider terminating them if appropriate.",
    3,
    CPU,
    0.7,
);
pub const CPU_LIMITS: Recommendation = advice(
    "Consider resource limits",
    "Setting resource limits can prevent processes from consuming excessive CPU.",
    "Use 'ulimit' or cgroups to set CPU limits for critical processes.",
    3,
    CPU,
    0.6,
);

pub const ANALYZE_MEMORY: Recommendation = advice(
    "Analyze memory usage",
    "The system is experiencing memory-related issues.",
    "Use 'free', 'vmstat', and 'ps' to analyze memory usage and identify memory-intensive processes.",
    4,
    MEMORY,
    0.8,
);
pub const OUT_OF_MEMORY: Recommendation = advice(
    "Address out-of-memory conditions",
    "The system's OOM (Out Of Memory) killer is being triggered.",
    "Increase available memory, reduce memory usage, or adjust the OOM killer settings using sysctl.",
    5,
    MEMORY,
    0.9,
);
pub const REDUCE_SWAP: Recommendation = advice(
    "Reduce swap usage",
    "The system is using excessive swap space, which can degrade performance.",
    "Increase physical memory, decrease swappiness parameter, or optimize applications to reduce memory footprint.",
    3,
    MEMORY,
    0.7,
);
pub const MEMORY_LIMITS: Recommendation = advice(
    "Consider memory limits",
    "Setting memory limits can prevent processes from consuming excessive memory.",
    "Use 'ulimit', cgroups, or container limits to restrict memory usage for critical processes.",
    3,
    MEMORY,
    0.6,
);

pub const FREE_DISK_SPACE: Recommendation = advice(
    "Free up disk space",
    "The system is running low on disk space.",
    "Use 'du' and 'df' to identify large files and directories. Consider removing unnecessary files, archiving old data, or expanding storage.",
    4,
    DISK,
    0.8,
);
pub const DISK_SPACE_MONITORING: Recommendation = advice(
    "Implement disk space monitoring",
    "Regular monitoring of disk space can prevent unexpected disk full conditions.",
    "Set up monitoring with tools like Nagios, Zabbix, or custom scripts with email alerts when disk usage exceeds thresholds.",
    3,
    DISK,
    0.7,
);
pub const DISK_HEALTH: Recommendation = advice(
    "Check disk health",
    "I/O errors or device timeouts may indicate disk hardware issues.",
    "Use 'smartctl' to check disk health, run 'fsck' to check filesystem integrity, and consider replacing the disk if hardware issues are confirmed.",
    5,
    DISK,
    0.8,
);
pub const OPTIMIZE_IO: Recommendation = advice(
    "Optimize I/O patterns",
    "Excessive or poorly optimized I/O operations can lead to timeouts and errors.",
    "Use 'iotop' to identify I/O-intensive processes and optimize their I/O patterns. Consider using buffers, caches, or asynchronous I/O.",
    3,
    DISK,
    0.6,
);

pub const NETWORK_CONNECTIVITY: Recommendation = advice(
    "Check network connectivity",
    "The system is experiencing network connectivity issues.",
    "Use 'ping', 'traceroute', and 'mtr' to diagnose network connectivity problems. Check DNS resolution, firewalls, and routing.",
    4,
    NETWORK,
    0.8,
);
pub const CONNECTION_TIMEOUTS: Recommendation = advice(
    "Adjust connection timeouts",
    "Connection timeouts may indicate network congestion or server overload.",
    "Consider increasing connection timeout settings, implementing retry logic, or load balancing to reduce timeouts.",
    3,
    NETWORK,
    0.7,
);
pub const PACKET_LOSS: Recommendation = advice(
    "Address packet loss",
    "Packet loss can degrade network performance and cause application errors.",
    "Check for network congestion, faulty hardware, or misconfigured network equipment. Consider QoS settings to prioritize critical traffic.",
    4,
    NETWORK,
    0.7,
);

pub const PERFORMANCE_MONITORING: Recommendation = advice(
    "Implement regular performance monitoring",
    "Regular monitoring can help identify and address performance issues before they become critical.",
    "Set up monitoring tools like Prometheus, Grafana, or similar to track system metrics and generate alerts.",
    2,
    AdviceScope::General,
    0.9,
);
pub const LOG_REVIEW: Recommendation = advice(
    "Review system logs regularly",
    "Regular log review can help identify recurring issues and patterns.",
    "Implement log aggregation and analysis tools like ELK stack, Graylog, or similar to centralize and analyze logs.",
    2,
    AdviceScope::General,
    0.8,
);

/// Which signatures and categories fired at least once
struct Hits {
    signatures: HashSet<Signature>,
    categories: HashSet<Category>,
}

impl Hits {
    fn collect(ranked: &[Pattern]) -> Self {
        let hit = || ranked.iter().filter(|p| p.is_hit());
        Self {
            signatures: hit().map(Pattern::signature).collect(),
            categories: hit().map(Pattern::category).collect(),
        }
    }

    fn any(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    fn fired(&self, signature: Signature) -> bool {
        self.signatures.contains(&signature)
    }
}

/// Turn a ranked pattern list into recommendations, most urgent first.
///
/// No hits means no recommendations; that is a valid, empty result.
#[must_use]
pub fn generate(ranked: &[Pattern]) -> Vec<Recommendation> {
    let hits = Hits::collect(ranked);
    let mut recommendations = Vec::new();

    cpu_rules(&hits, &mut recommendations);
    memory_rules(&hits, &mut recommendations);
    disk_rules(&hits, &mut recommendations);
    network_rules(&hits, &mut recommendations);

    if ranked.first().is_some_and(Pattern::is_hit) {
        recommendations.push(PERFORMANCE_MONITORING);
        recommendations.push(LOG_REVIEW);
    }

    // Stable: equal priorities stay in rule order
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));

    tracing::info!("Generated {} recommendations", recommendations.len());
    recommendations
}

fn cpu_rules(hits: &Hits, out: &mut Vec<Recommendation>) {
    if !hits.any(Category::Cpu) {
        return;
    }
    // These flags do not select different advice: every cpu hit gets the same
    // three recommendations.
    let high_usage = hits.fired(Signature::HighCpuUsage);
    let high_load = hits.fired(Signature::HighLoadAverage);
    tracing::debug!("cpu hits: high usage={high_usage}, high load={high_load}");

    out.extend([ANALYZE_CPU, RUNAWAY_PROCESSES, CPU_LIMITS]);
}

fn memory_rules(hits: &Hits, out: &mut Vec<Recommendation>) {
    if !hits.any(Category::Memory) {
        return;
    }
    out.push(ANALYZE_MEMORY);
    if hits.fired(Signature::OutOfMemory) {
        out.push(OUT_OF_MEMORY);
    }
    if hits.fired(Signature::HighSwap) {
        out.push(REDUCE_SWAP);
    }
    out.push(MEMORY_LIMITS);
}

fn disk_rules(hits: &Hits, out: &mut Vec<Recommendation>) {
    if hits.fired(Signature::DiskFull) || hits.fired(Signature::FilesystemNearCapacity) {
        out.extend([FREE_DISK_SPACE, DISK_SPACE_MONITORING]);
    }
    if hits.fired(Signature::IoError) || hits.fired(Signature::DeviceTimeout) {
        out.extend([DISK_HEALTH, OPTIMIZE_IO]);
    }
}

fn network_rules(hits: &Hits, out: &mut Vec<Recommendation>) {
    if !hits.any(Category::Network) {
        return;
    }
    out.push(NETWORK_CONNECTIVITY);
    if hits.fired(Signature::ConnectionTimeout) {
        out.push(CONNECTION_TIMEOUTS);
    }
    if hits.fired(Signature::PacketLoss) {
        out.push(PACKET_LOSS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::load_catalog;
    use crate::analysis::detector::{detect, PatternSet};
    use crate::parser::parse_line;

    fn ranked(lines: &[&str]) -> Vec<Pattern> {
        let entries: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| parse_line(line, idx + 1))
            .collect();
        detect(&entries, &load_catalog()).expect("detection should succeed")
    }

    fn titles(recommendations: &[Recommendation]) -> Vec<&'static str> {
        recommendations.iter().map(|r| r.title).collect()
    }

    #[test]
    fn test_no_hits_no_recommendations() {
        let zeroed = PatternSet::from_catalog(&load_catalog()).into_patterns();
        assert!(generate(&zeroed).is_empty());
        assert!(generate(&[]).is_empty());
        assert!(generate(&ranked(&["all systems nominal"])).is_empty());
    }

    #[test]
    fn test_oom_triggers_memory_trio() {
        let recs = generate(&ranked(&[
            "Jan 1 00:00:00 host kernel: out of memory killing process 123",
        ]));
        let memory: Vec<_> = recs
            .iter()
            .filter(|r| r.scope == AdviceScope::Category(Category::Memory))
            .map(|r| r.title)
            .collect();
        assert_eq!(
            memory,
            vec![OUT_OF_MEMORY.title, ANALYZE_MEMORY.title, MEMORY_LIMITS.title]
        );
        assert!(!recs.contains(&REDUCE_SWAP));
        assert_eq!(recs.len(), 5);
    }

    #[test]
    fn test_swap_without_oom() {
        let recs = generate(&ranked(&["vmstat: swap used: 92%"]));
        assert!(recs.contains(&REDUCE_SWAP));
        assert!(!recs.contains(&OUT_OF_MEMORY));
        assert!(recs.contains(&ANALYZE_MEMORY));
        assert!(recs.contains(&MEMORY_LIMITS));
    }

    #[test]
    fn test_disk_conditions_are_independent() {
        let recs = generate(&ranked(&["sda: disk full", "sda: i/o error"]));
        let disk: Vec<_> = recs
            .iter()
            .filter(|r| r.scope == AdviceScope::Category(Category::Disk))
            .collect();
        assert_eq!(disk.len(), 4);
        for expected in [&FREE_DISK_SPACE, &DISK_SPACE_MONITORING, &DISK_HEALTH, &OPTIMIZE_IO] {
            assert!(recs.contains(expected));
        }
    }

    #[test]
    fn test_device_timeout_only_triggers_io_pair() {
        let recs = generate(&ranked(&["scsi: device timeout on sdb"]));
        assert!(recs.contains(&DISK_HEALTH));
        assert!(recs.contains(&OPTIMIZE_IO));
        assert!(!recs.contains(&FREE_DISK_SPACE));
    }

    #[test]
    fn test_every_cpu_signature_gets_the_same_advice() {
        // The usage/load distinction is tracked but does not change the output
        let lines = [
            "monitor: cpu usage at 95%",
            "uptime: load average: 7.20, 6.00, 5.10",
            "watchdog: process 42 using excessive cpu",
        ];
        let expected = vec![ANALYZE_CPU.title, RUNAWAY_PROCESSES.title, CPU_LIMITS.title];
        for line in lines {
            let recs = generate(&ranked(&[line]));
            let cpu: Vec<_> = recs
                .iter()
                .filter(|r| r.scope == AdviceScope::Category(Category::Cpu))
                .map(|r| r.title)
                .collect();
            assert_eq!(cpu, expected, "line: {line}");
        }
    }

    #[test]
    fn test_network_conditionals() {
        let recs = generate(&ranked(&["eth0: network unreachable"]));
        assert!(recs.contains(&NETWORK_CONNECTIVITY));
        assert!(!recs.contains(&CONNECTION_TIMEOUTS));
        assert!(!recs.contains(&PACKET_LOSS));

        let recs = generate(&ranked(&["api: connection timed out", "eth0: packet loss 3%"]));
        assert!(recs.contains(&NETWORK_CONNECTIVITY));
        assert!(recs.contains(&CONNECTION_TIMEOUTS));
        assert!(recs.contains(&PACKET_LOSS));
    }

    #[test]
    fn test_uncovered_category_gets_only_general_advice() {
        let recs = generate(&ranked(&["kernel: segmentation fault at 0x0"]));
        assert_eq!(titles(&recs), vec![PERFORMANCE_MONITORING.title, LOG_REVIEW.title]);
    }

    #[test]
    fn test_priorities_non_increasing_with_rule_order_ties() {
        let recs = generate(&ranked(&[
            "monitor: cpu usage at 99%",
            "kernel: out of memory",
            "sda: disk full",
            "sda: i/o error",
            "api: connection timed out",
            "eth0: packet loss 2%",
        ]));
        assert!(recs.windows(2).all(|w| w[0].priority >= w[1].priority));
        assert_eq!(
            titles(&recs),
            vec![
                OUT_OF_MEMORY.title,
                DISK_HEALTH.title,
                ANALYZE_CPU.title,
                ANALYZE_MEMORY.title,
                FREE_DISK_SPACE.title,
                NETWORK_CONNECTIVITY.title,
                PACKET_LOSS.title,
                RUNAWAY_PROCESSES.title,
                CPU_LIMITS.title,
                MEMORY_LIMITS.title,
                DISK_SPACE_MONITORING.title,
                OPTIMIZE_IO.title,
                CONNECTION_TIMEOUTS.title,
                PERFORMANCE_MONITORING.title,
                LOG_REVIEW.title,
            ]
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(AdviceScope::Category(Category::Disk).to_string(), "disk");
        assert_eq!(AdviceScope::General.to_string(), "general");
    }

    #[test]
    fn test_confidence_in_range() {
        let recs = generate(&ranked(&[
            "monitor: cpu usage at 99%",
            "vmstat: swap used: 88%",
            "kernel: out of memory",
            "sda: disk full",
            "sda: device timeout",
            "api: connection timed out",
            "eth0: packet loss 2%",
        ]));
        assert_eq!(recs.len(), 16);
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.confidence)));
    }
}

//! Running statistics for a ride
//!
//! Counters are updated by the `Ride` facade as operations succeed or are
//! refused. They are informational only and never feed back into cycle
//! decisions.

use crate::ride::cycle::CycleReport;
use serde::{Deserialize, Serialize};
use std::cmp::max;
use std::fmt;

/// Operating statistics collected over the life of a ride
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RideStatistics {
    /// Cycles that admitted at least one visitor
    pub cycles_run: u64,
    /// Visitors moved from the queue into the history by cycles
    pub visitors_admitted: u64,
    /// Cycles that filled every seat allowed per cycle
    pub full_cycles: u64,
    /// Cycles that ran below the per-cycle limit
    pub partial_cycles: u64,
    /// Cycle requests refused by a precondition
    pub refused_cycles: u64,
    /// Longest queue observed
    pub peak_queue_length: usize,
    /// Records added to the history by imports
    pub visitors_imported: u64,
    /// Lines skipped by imports
    pub lines_skipped: u64,
}

impl RideStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Note the current queue length
    pub fn observe_queue_length(&mut self, length: usize) {
        self.peak_queue_length = max(self.peak_queue_length, length);
    }

    /// Account for a completed cycle
    pub fn record_cycle(&mut self, report: &CycleReport) {
        self.cycles_run += 1;
        self.visitors_admitted += report.admitted_count() as u64;
        if report.is_partial() {
            self.partial_cycles += 1;
        } else {
            self.full_cycles += 1;
        }
    }

    /// Account for a refused cycle request
    pub fn record_refusal(&mut self) {
        self.refused_cycles += 1;
    }

    /// Account for an import run
    pub fn record_import(&mut self, imported: usize, skipped: usize) {
        self.visitors_imported += imported as u64;
        self.lines_skipped += skipped as u64;
    }

    /// Mean number of riders per completed cycle
    pub fn average_riders_per_cycle(&self) -> f64 {
        if self.cycles_run == 0 {
            0.0
        } else {
            self.visitors_admitted as f64 / self.cycles_run as f64
        }
    }
}

impl fmt::Display for RideStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ride Statistics:")?;
        writeln!(f, "  Cycles Run: {}", self.cycles_run)?;
        writeln!(
            f,
            "  Full / Partial / Refused: {} / {} / {}",
            self.full_cycles, self.partial_cycles, self.refused_cycles
        )?;
        writeln!(f, "  Visitors Admitted: {}", self.visitors_admitted)?;
        writeln!(f, "  Average Riders per Cycle: {:.2}", self.average_riders_per_cycle())?;
        writeln!(f, "  Peak Queue Length: {}", self.peak_queue_length)?;
        write!(
            f,
            "  Imported / Skipped Lines: {} / {}",
            self.visitors_imported, self.lines_skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VisitorRecord;

    fn report(admitted: usize, max_riders: usize) -> CycleReport {
        CycleReport {
            cycle_number: 1,
            admitted: (0..admitted)
                .map(|i| VisitorRecord::new("Guest", 30, "Unknown", format!("V{}", i), "General", false))
                .collect(),
            remaining_in_queue: 0,
            max_riders,
        }
    }

    #[test]
    fn test_cycle_accounting() {
        let mut stats = RideStatistics::new();
        stats.record_cycle(&report(4, 4));
        stats.record_cycle(&report(1, 4));
        stats.record_refusal();

        assert_eq!(stats.cycles_run, 2);
        assert_eq!(stats.full_cycles, 1);
        assert_eq!(stats.partial_cycles, 1);
        assert_eq!(stats.refused_cycles, 1);
        assert_eq!(stats.visitors_admitted, 5);
        assert!((stats.average_riders_per_cycle() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_peak_queue_length() {
        let mut stats = RideStatistics::new();
        stats.observe_queue_length(3);
        stats.observe_queue_length(1);
        assert_eq!(stats.peak_queue_length, 3);
    }

    #[test]
    fn test_average_with_no_cycles() {
        assert_eq!(RideStatistics::new().average_riders_per_cycle(), 0.0);
    }
}

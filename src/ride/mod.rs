//! Ride operation management
//!
//! This module contains the admission queue, the ride history, cycle execution,
//! history orderings, statistics and the error taxonomy for a single ride.
//!
//! # Overview
//!
//! - **RideConfig**: name, type, capacity, operator and the per-cycle rider limit
//! - **AdmissionQueue**: FIFO line of waiting visitors
//! - **HistoryLog**: visitors who completed the ride, sortable in place
//! - **CycleExecutor**: moves visitors from queue to history one cycle at a time
//! - **Ride**: owns all of the above and exposes the day-to-day operations
//!
//! # Usage Example
//!
//! ```rust
//! use ride_operation_manager::ride::*;
//! use ride_operation_manager::types::*;
//!
//! let config = RideConfig::new("Thunder Bolt", "Roller Coaster", 24, 2)?
//!     .with_operator(StaffRecord::default())
//!     .with_operational(true);
//! let mut ride = Ride::new(config);
//!
//! ride.add_visitor_to_queue(VisitorRecord::new("Mike Wilson", 32, "Male", "V2001", "Family Pass", false))?;
//! ride.add_visitor_to_queue(VisitorRecord::new("Emma Davis", 25, "Female", "V2002", "Season Pass", true))?;
//!
//! let report = ride.run_one_cycle()?;
//! assert_eq!(report.admitted_count(), 2);
//! assert_eq!(ride.number_of_visitors(), 2);
//!
//! ride.sort_ride_history(SortPolicy::AgeName)?;
//! assert_eq!(ride.history().as_slice()[0].name, "Emma Davis");
//! # Ok::<(), RideError>(())
//! ```

pub mod cycle;
pub mod error;
pub mod history;
pub mod ordering;
pub mod queue;
pub mod statistics;

// Re-export all public types for convenience
pub use cycle::*;
pub use error::*;
pub use history::*;
pub use ordering::*;
pub use queue::*;
pub use statistics::*;

use crate::codec::{self, CodecOptions, ExportReport, ImportReport};
use crate::types::{StaffRecord, VisitorRecord};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Static description of a ride plus its cycle counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideConfig {
    /// Display name of the ride
    pub name: String,
    /// Category, e.g. "Roller Coaster"
    pub ride_type: String,
    /// Seating capacity, for display only
    #[serde(deserialize_with = "deserialize_positive")]
    capacity: u32,
    /// Whether the ride is open
    pub operational: bool,
    /// Employee operating the ride, if any
    pub operator: Option<StaffRecord>,
    /// Most visitors admitted by a single cycle
    #[serde(deserialize_with = "deserialize_positive")]
    max_riders_per_cycle: usize,
    /// Cycles completed so far, only advanced by `CycleExecutor`
    #[serde(skip_deserializing)]
    cycles_run: u64,
}

impl RideConfig {
    /// Create a closed ride with no operator
    ///
    /// Both `capacity` and `max_riders_per_cycle` must be positive.
    pub fn new(
        name: impl Into<String>,
        ride_type: impl Into<String>,
        capacity: u32,
        max_riders_per_cycle: usize,
    ) -> RideResult<Self> {
        if capacity == 0 {
            return Err(RideError::invalid_input("ride capacity must be positive"));
        }
        if max_riders_per_cycle == 0 {
            return Err(RideError::invalid_input("riders per cycle must be positive"));
        }

        Ok(Self {
            name: name.into(),
            ride_type: ride_type.into(),
            capacity,
            operational: false,
            operator: None,
            max_riders_per_cycle,
            cycles_run: 0,
        })
    }

    /// Assign an operator
    pub fn with_operator(mut self, operator: StaffRecord) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Set the operational flag
    pub fn with_operational(mut self, operational: bool) -> Self {
        self.operational = operational;
        self
    }

    /// Seating capacity
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Change the seating capacity, rejecting zero
    pub fn set_capacity(&mut self, capacity: u32) -> RideResult<()> {
        if capacity == 0 {
            warn!(ride = %self.name, "Rejected non-positive capacity");
            return Err(RideError::invalid_input("ride capacity must be positive"));
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Most visitors admitted by a single cycle
    pub fn max_riders_per_cycle(&self) -> usize {
        self.max_riders_per_cycle
    }

    /// Change the per-cycle rider limit, rejecting zero
    pub fn set_max_riders_per_cycle(&mut self, max_riders: usize) -> RideResult<()> {
        if max_riders == 0 {
            warn!(ride = %self.name, "Rejected non-positive rider limit");
            return Err(RideError::invalid_input("riders per cycle must be positive"));
        }
        self.max_riders_per_cycle = max_riders;
        Ok(())
    }

    /// Replace or remove the operator
    pub fn set_operator(&mut self, operator: Option<StaffRecord>) {
        match &operator {
            Some(staff) => info!(ride = %self.name, operator = %staff.name, "Operator assigned"),
            None => info!(ride = %self.name, "Operator removed"),
        }
        self.operator = operator;
    }

    /// Cycles completed so far
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    pub(crate) fn record_cycle(&mut self) -> u64 {
        self.cycles_run += 1;
        self.cycles_run
    }
}

/// Reject a zero count while deserializing
fn deserialize_positive<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default + PartialEq,
{
    let value = T::deserialize(deserializer)?;
    if value == T::default() {
        return Err(<D::Error as de::Error>::custom("value must be positive"));
    }
    Ok(value)
}

impl fmt::Display for RideConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = self.operator.as_ref().map_or("No operator assigned", |o| o.name.as_str());
        write!(
            f,
            "Ride [Name: {}, Type: {}, Capacity: {}, Operational: {}, Operator: {}]",
            self.name,
            self.ride_type,
            self.capacity,
            if self.operational { "Yes" } else { "No" },
            operator
        )
    }
}

/// A ride with its waiting line and history
///
/// The queue and the history live exactly as long as the ride and
/// exclusively own the records they hold.
#[derive(Debug, Clone)]
pub struct Ride {
    config: RideConfig,
    queue: AdmissionQueue,
    history: HistoryLog,
    statistics: RideStatistics,
}

impl Ride {
    /// Create a ride with an empty queue and history
    pub fn new(config: RideConfig) -> Self {
        info!(ride = %config.name, "Ride created");
        Self {
            config,
            queue: AdmissionQueue::new(),
            history: HistoryLog::new(),
            statistics: RideStatistics::new(),
        }
    }

    /// Ride configuration
    pub fn config(&self) -> &RideConfig {
        &self.config
    }

    /// Mutable ride configuration (operator, operational flag, capacity)
    pub fn config_mut(&mut self) -> &mut RideConfig {
        &mut self.config
    }

    /// The waiting line
    pub fn queue(&self) -> &AdmissionQueue {
        &self.queue
    }

    /// The ride history
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Statistics collected so far
    pub fn statistics(&self) -> &RideStatistics {
        &self.statistics
    }

    /// Put a visitor at the back of the line
    pub fn add_visitor_to_queue(
        &mut self,
        visitor: impl Into<Option<VisitorRecord>>,
    ) -> RideResult<()> {
        self.queue.enqueue(visitor)?;
        self.statistics.observe_queue_length(self.queue.size());
        Ok(())
    }

    /// Take the visitor at the front of the line out of the queue
    pub fn remove_visitor_from_queue(&mut self) -> RideResult<VisitorRecord> {
        self.queue.dequeue()
    }

    /// Waiting visitors in service order
    pub fn queue_listing(&self) -> Vec<&VisitorRecord> {
        self.queue.iter().collect()
    }

    /// Record a visitor directly in the history
    pub fn add_visitor_to_history(
        &mut self,
        visitor: impl Into<Option<VisitorRecord>>,
    ) -> RideResult<()> {
        self.history.append(visitor)
    }

    /// Whether an identical visitor has taken the ride
    pub fn check_visitor_from_history<'a>(
        &self,
        visitor: impl Into<Option<&'a VisitorRecord>>,
    ) -> bool {
        self.history.contains(visitor)
    }

    /// Number of visitors in the history
    pub fn number_of_visitors(&self) -> usize {
        self.history.count()
    }

    /// Snapshot of the history in its current order
    pub fn history_listing(&self) -> Vec<VisitorRecord> {
        self.history.iterate().collect()
    }

    /// Run one cycle of the ride
    pub fn run_one_cycle(&mut self) -> RideResult<CycleReport> {
        match CycleExecutor::run_one_cycle(&mut self.queue, &mut self.history, &mut self.config) {
            Ok(report) => {
                self.statistics.record_cycle(&report);
                Ok(report)
            }
            Err(error) => {
                self.statistics.record_refusal();
                Err(error)
            }
        }
    }

    /// Sort the history with a built-in policy
    pub fn sort_ride_history(&mut self, policy: SortPolicy) -> RideResult<usize> {
        self.history.sort_by_policy(policy)
    }

    /// Sort the history with a caller-supplied ordering
    pub fn sort_ride_history_with(
        &mut self,
        order: Option<&dyn Fn(&VisitorRecord, &VisitorRecord) -> std::cmp::Ordering>,
    ) -> RideResult<usize> {
        self.history.sort(order)
    }

    /// Write the history to a delimited text file
    pub fn export_ride_history(
        &self,
        path: impl AsRef<Path>,
        options: &CodecOptions,
    ) -> RideResult<ExportReport> {
        codec::export_history(&self.history, &self.config.name, path, options)
    }

    /// Append the records of a delimited text file to the history
    pub fn import_ride_history(
        &mut self,
        path: impl AsRef<Path>,
        options: &CodecOptions,
    ) -> RideResult<ImportReport> {
        let report = codec::import_history(&mut self.history, path, options)?;
        self.statistics.record_import(report.imported, report.skipped);
        Ok(report)
    }

    /// Enqueue every visitor decoded from a delimited text file
    ///
    /// Uses the history file format and its malformed-line policy.
    pub fn load_visitor_roster(
        &mut self,
        path: impl AsRef<Path>,
        options: &CodecOptions,
    ) -> RideResult<ImportReport> {
        let batch = codec::load_records(path, options)?;
        for visitor in batch.records {
            self.add_visitor_to_queue(visitor)?;
        }
        Ok(batch.report)
    }
}

impl fmt::Display for Ride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config)
    }
}

//! Ride cycle execution
//!
//! One cycle moves up to `max_riders_per_cycle` visitors from the head of the
//! admission queue into the ride history and bumps the cycle counter.
//!
//! Preconditions are checked in a fixed order, and the first one that fails
//! decides the reported error:
//!
//! 1. an operator is assigned, else `NoOperatorAssigned`
//! 2. the queue has someone waiting, else `EmptyQueue`
//! 3. the ride is operational, else `RideNotOperational`
//!
//! Nothing moves unless all three pass.

use crate::ride::error::{RideError, RideResult};
use crate::ride::history::HistoryLog;
use crate::ride::queue::AdmissionQueue;
use crate::ride::RideConfig;
use crate::types::VisitorRecord;
use std::cmp::min;
use tracing::{info, instrument, warn};

/// Outcome of a successful cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Value of the cycle counter after this cycle
    pub cycle_number: u64,
    /// Visitors admitted, in the order they boarded
    pub admitted: Vec<VisitorRecord>,
    /// Visitors still waiting after the cycle
    pub remaining_in_queue: usize,
    /// Rider limit in force for the cycle
    pub max_riders: usize,
}

impl CycleReport {
    /// Number of visitors admitted this cycle
    pub fn admitted_count(&self) -> usize {
        self.admitted.len()
    }

    /// Whether the cycle ran below the rider limit
    pub fn is_partial(&self) -> bool {
        self.admitted.len() < self.max_riders
    }
}

/// Moves visitors from the admission queue into the ride history
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleExecutor;

impl CycleExecutor {
    /// Run the ride once
    #[instrument(skip_all, fields(ride = %config.name, waiting = queue.size()))]
    pub fn run_one_cycle(
        queue: &mut AdmissionQueue,
        history: &mut HistoryLog,
        config: &mut RideConfig,
    ) -> RideResult<CycleReport> {
        Self::check_preconditions(queue, config)?;

        let riders = min(config.max_riders_per_cycle(), queue.size());
        if riders == 0 {
            warn!("Cycle refused: rider limit admits nobody");
            return Err(RideError::invalid_input("riders per cycle must be positive"));
        }
        let mut admitted = Vec::with_capacity(riders);
        for _ in 0..riders {
            // The queue holds at least `riders` visitors here.
            let visitor = queue.dequeue()?;
            admitted.push(visitor.clone());
            history.append(visitor)?;
        }

        let cycle_number = config.record_cycle();
        info!(
            cycle = cycle_number,
            admitted = admitted.len(),
            remaining = queue.size(),
            "Ride cycle completed"
        );

        Ok(CycleReport {
            cycle_number,
            admitted,
            remaining_in_queue: queue.size(),
            max_riders: config.max_riders_per_cycle(),
        })
    }

    fn check_preconditions(queue: &AdmissionQueue, config: &RideConfig) -> RideResult<()> {
        if config.operator.is_none() {
            warn!("Cycle refused: no operator assigned");
            return Err(RideError::NoOperatorAssigned { ride: config.name.clone() });
        }

        if queue.is_empty() {
            warn!("Cycle refused: nobody is waiting");
            return Err(RideError::EmptyQueue);
        }

        if !config.operational {
            warn!("Cycle refused: ride is not operational");
            return Err(RideError::RideNotOperational { ride: config.name.clone() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StaffRecord;

    fn visitor(name: &str, age: i32) -> VisitorRecord {
        VisitorRecord::new(name, age, "Unknown", format!("V-{}", name), "General", false)
    }

    fn open_ride(max_riders: usize) -> RideConfig {
        RideConfig::new("Thunder Bolt", "Roller Coaster", 24, max_riders)
            .unwrap()
            .with_operator(StaffRecord::default())
            .with_operational(true)
    }

    #[test]
    fn test_cycle_admits_up_to_limit_in_fifo_order() {
        let mut queue = AdmissionQueue::new();
        let mut history = HistoryLog::new();
        let mut config = open_ride(2);
        queue.enqueue(visitor("A", 20)).unwrap();
        queue.enqueue(visitor("B", 20)).unwrap();
        queue.enqueue(visitor("C", 21)).unwrap();

        let report = CycleExecutor::run_one_cycle(&mut queue, &mut history, &mut config).unwrap();

        assert_eq!(report.cycle_number, 1);
        assert_eq!(report.admitted_count(), 2);
        assert!(!report.is_partial());
        let names: Vec<&str> = history.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(queue.peek().map(|v| v.name.as_str()), Some("C"));
        assert_eq!(config.cycles_run(), 1);
    }

    #[test]
    fn test_partial_cycle_still_counts() {
        let mut queue = AdmissionQueue::new();
        let mut history = HistoryLog::new();
        let mut config = open_ride(5);
        queue.enqueue(visitor("A", 20)).unwrap();

        let report = CycleExecutor::run_one_cycle(&mut queue, &mut history, &mut config).unwrap();
        assert!(report.is_partial());
        assert_eq!(config.cycles_run(), 1);
        assert!(queue.is_empty());

        let again = CycleExecutor::run_one_cycle(&mut queue, &mut history, &mut config);
        assert!(matches!(again, Err(RideError::EmptyQueue)));
        assert_eq!(config.cycles_run(), 1);
    }

    #[test]
    fn test_operator_check_comes_first() {
        let mut queue = AdmissionQueue::new();
        let mut history = HistoryLog::new();
        let mut config = RideConfig::new("Sky Wheel", "Ferris Wheel", 40, 4).unwrap();

        // Empty queue and closed ride as well, but the operator is reported.
        let result = CycleExecutor::run_one_cycle(&mut queue, &mut history, &mut config);
        assert!(matches!(result, Err(RideError::NoOperatorAssigned { .. })));
    }

    #[test]
    fn test_empty_queue_reported_before_closed_ride() {
        let mut queue = AdmissionQueue::new();
        let mut history = HistoryLog::new();
        let mut config = open_ride(4).with_operational(false);

        let result = CycleExecutor::run_one_cycle(&mut queue, &mut history, &mut config);
        assert!(matches!(result, Err(RideError::EmptyQueue)));

        queue.enqueue(visitor("A", 20)).unwrap();
        let result = CycleExecutor::run_one_cycle(&mut queue, &mut history, &mut config);
        assert!(matches!(result, Err(RideError::RideNotOperational { .. })));
        assert_eq!(queue.size(), 1);
        assert!(history.is_empty());
        assert_eq!(config.cycles_run(), 0);
    }
}

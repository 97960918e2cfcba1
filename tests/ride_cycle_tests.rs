//! Tests for ride cycle execution
//!
//! These tests verify how many visitors a cycle admits, the order of the
//! precondition checks, and that refused cycles change nothing.

use ride_operation_manager::ride::{Ride, RideConfig, RideError};
use ride_operation_manager::types::{StaffRecord, VisitorRecord};

fn visitor(name: &str) -> VisitorRecord {
    VisitorRecord::new(name, 30, "Male", format!("V-{}", name), "General", false)
}

fn open_ride(max_riders: usize) -> Ride {
    let config = RideConfig::new("Thunder Bolt", "Roller Coaster", 24, max_riders)
        .unwrap()
        .with_operator(StaffRecord::default())
        .with_operational(true);
    Ride::new(config)
}

fn history_names(ride: &Ride) -> Vec<String> {
    ride.history_listing().into_iter().map(|v| v.name).collect()
}

/// Three waiting with a limit of two: two cycles drain the queue, the third is refused
#[test]
fn test_cycles_drain_queue_in_order() {
    let mut ride = open_ride(2);
    for name in ["A", "B", "C"] {
        ride.add_visitor_to_queue(visitor(name)).unwrap();
    }

    let first = ride.run_one_cycle().unwrap();
    assert_eq!(first.admitted_count(), 2);
    assert_eq!(first.cycle_number, 1);
    assert_eq!(history_names(&ride), vec!["A", "B"]);
    assert_eq!(ride.queue().size(), 1);

    let second = ride.run_one_cycle().unwrap();
    assert_eq!(second.admitted_count(), 1);
    assert!(second.is_partial());
    assert_eq!(history_names(&ride), vec!["A", "B", "C"]);
    assert!(ride.queue().is_empty());
    assert_eq!(ride.config().cycles_run(), 2);

    assert!(matches!(ride.run_one_cycle(), Err(RideError::EmptyQueue)));
    assert_eq!(ride.config().cycles_run(), 2);
    assert_eq!(ride.number_of_visitors(), 3);
}

/// Visitors are conserved across a cycle
#[test]
fn test_cycle_conserves_visitors() {
    let mut ride = open_ride(4);
    for i in 0..10 {
        ride.add_visitor_to_queue(visitor(&format!("Guest {}", i))).unwrap();
    }

    let before = ride.queue().size() + ride.number_of_visitors();
    let report = ride.run_one_cycle().unwrap();
    let after = ride.queue().size() + ride.number_of_visitors();

    assert_eq!(before, after);
    assert_eq!(report.admitted_count(), 4);
    assert_eq!(report.remaining_in_queue, 6);
    assert!(!report.is_partial());
}

/// A missing operator is reported before an empty queue
#[test]
fn test_operator_checked_first() {
    let config = RideConfig::new("Thunder Bolt", "Roller Coaster", 24, 2).unwrap();
    let mut ride = Ride::new(config);

    // Empty queue, closed ride and no operator at once
    match ride.run_one_cycle() {
        Err(RideError::NoOperatorAssigned { ride: name }) => assert_eq!(name, "Thunder Bolt"),
        other => panic!("Expected NoOperatorAssigned, got {:?}", other),
    }
}

/// An empty queue is reported before a closed ride
#[test]
fn test_queue_checked_before_operational() {
    let config = RideConfig::new("Thunder Bolt", "Roller Coaster", 24, 2)
        .unwrap()
        .with_operator(StaffRecord::default());
    let mut ride = Ride::new(config);

    assert!(matches!(ride.run_one_cycle(), Err(RideError::EmptyQueue)));

    ride.add_visitor_to_queue(visitor("A")).unwrap();
    assert!(matches!(ride.run_one_cycle(), Err(RideError::RideNotOperational { .. })));
}

/// Refused cycles leave queue, history and counter untouched
#[test]
fn test_refused_cycle_changes_nothing() {
    let mut ride = open_ride(2);
    ride.add_visitor_to_queue(visitor("A")).unwrap();
    ride.add_visitor_to_queue(visitor("B")).unwrap();
    ride.add_visitor_to_history(visitor("Z")).unwrap();

    ride.config_mut().set_operator(None);
    assert!(ride.run_one_cycle().is_err());

    ride.config_mut().set_operator(Some(StaffRecord::default()));
    ride.config_mut().operational = false;
    assert!(ride.run_one_cycle().is_err());

    let queued: Vec<&str> = ride.queue_listing().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(queued, vec!["A", "B"]);
    assert_eq!(history_names(&ride), vec!["Z"]);
    assert_eq!(ride.config().cycles_run(), 0);
    assert_eq!(ride.statistics().refused_cycles, 2);
}

/// Repeated calls on an empty queue keep failing the same way
#[test]
fn test_repeated_empty_queue_refusals() {
    let mut ride = open_ride(3);
    for _ in 0..3 {
        assert!(matches!(ride.run_one_cycle(), Err(RideError::EmptyQueue)));
    }
    assert_eq!(ride.config().cycles_run(), 0);
    assert_eq!(ride.number_of_visitors(), 0);
}

/// A rider limit larger than the queue admits everyone who is waiting
#[test]
fn test_limit_larger_than_queue() {
    let mut ride = open_ride(10);
    ride.add_visitor_to_queue(visitor("A")).unwrap();
    ride.add_visitor_to_queue(visitor("B")).unwrap();

    let report = ride.run_one_cycle().unwrap();
    assert_eq!(report.admitted_count(), 2);
    assert_eq!(report.remaining_in_queue, 0);
    assert_eq!(report.max_riders, 10);
}

/// Visitors who rode can be found in the history
#[test]
fn test_admitted_visitors_are_in_history() {
    let mut ride = open_ride(2);
    let amy = visitor("Amy");
    ride.add_visitor_to_queue(amy.clone()).unwrap();
    ride.run_one_cycle().unwrap();

    assert!(ride.check_visitor_from_history(&amy));
    assert!(!ride.check_visitor_from_history(&visitor("Bob")));
    assert!(!ride.check_visitor_from_history(None::<&VisitorRecord>));
}

/// The rider limit cannot be lowered to zero, so a cycle always admits someone
#[test]
fn test_zero_rider_limit_rejected() {
    let mut ride = open_ride(2);
    ride.add_visitor_to_queue(visitor("A")).unwrap();

    let result = ride.config_mut().set_max_riders_per_cycle(0);
    assert!(matches!(result, Err(RideError::InvalidInput(_))));
    assert_eq!(ride.config().max_riders_per_cycle(), 2);

    let report = ride.run_one_cycle().unwrap();
    assert_eq!(report.admitted_count(), 1);
    assert_eq!(ride.config().cycles_run(), 1);
    assert!(ride.queue().is_empty());
}

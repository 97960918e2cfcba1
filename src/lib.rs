//! Ride Operation Manager
//!
//! Operational core of a theme-park ride: a FIFO admission queue of waiting
//! visitors, a history of visitors who completed the ride, cycle execution
//! that moves visitors from one to the other, in-place history sorting, and a
//! delimited text format for exporting and importing the history.
//!
//! # Overview
//!
//! Everything is single-threaded and synchronous. A [`Ride`] exclusively owns
//! its queue and history; visitor records are moved, never shared.
//!
//! ## Key Features
//!
//! - **Admission Queue**: strict first-in-first-out order
//! - **Cycle Execution**: up to `max_riders_per_cycle` visitors per run, guarded
//!   by operator and operational checks
//! - **History Sorting**: stable in-place sort with built-in or custom orderings
//! - **History Files**: escaped delimited text with a comment header and
//!   per-line recovery on import
//! - **Configurable Driver**: CLI flags and JSON config files
//!
//! ## Quick Start
//!
//! ```rust
//! use ride_operation_manager::*;
//!
//! let config = ManagerConfig::default();
//! let mut ride = Ride::new(config.ride_config()?);
//!
//! ride.add_visitor_to_queue(VisitorRecord::new("Tom Brown", 12, "Male", "V2003", "Child Ticket", false))?;
//! let report = ride.run_one_cycle()?;
//!
//! assert_eq!(report.admitted_count(), 1);
//! assert!(ride.check_visitor_from_history(&ride.history_listing()[0]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: visitor and staff records, configuration
//! - [`ride`]: queue, history, cycles, orderings, statistics and errors
//! - [`codec`]: history file export and import
//! - [`logging`]: tracing subscriber setup
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │    Ride     │    │   Codec     │
//! │             │    │             │    │             │
//! │ Visitor     │◄───┤ Queue       │◄───┤ Export      │
//! │ Staff       │    │ History     │    │ Import      │
//! │ Config      │    │ Cycles      │    │ Format      │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                            ▲
//!                            │
//!                    ┌─────────────┐
//!                    │    main     │
//!                    │ CLI driver  │
//!                    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod codec;
pub mod logging;
pub mod ride;
pub mod types;

// Records and configuration
pub use types::{
    CliArgs, ConfigError, ConfigValidationError, ManagerConfig, StaffRecord, VisitorRecord,
};

// Ride operations
pub use ride::{
    AdmissionQueue, CycleExecutor, CycleReport, HistoryLog, Ride, RideConfig, RideError,
    RideResult, RideStatistics, SortPolicy,
};

// History files
pub use codec::{CodecOptions, ExportReport, ImportReport};

pub use logging::LoggingConfig;

//! Ride history file exchange
//!
//! This module reads and writes the ride history as delimited text.
//!
//! # File layout
//!
//! ```text
//! # Ride History Export for: <ride name>
//! # Export Date: <timestamp>
//! # Format: Name,Age,Gender,VisitorID,TicketType,HasSeasonPass
//! <name>,<age>,<gender>,<visitor id>,<ticket type>,<true|false>
//! ```
//!
//! The header is always written and optional on import. The delimiter defaults
//! to `,`; the same delimiter must be used for export and import.
//!
//! # Usage Example
//!
//! ```rust
//! use ride_operation_manager::codec::*;
//! use ride_operation_manager::ride::HistoryLog;
//! use ride_operation_manager::types::VisitorRecord;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("history.csv");
//!
//! let mut history = HistoryLog::new();
//! history.append(VisitorRecord::new("Emma Davis", 25, "Female", "V2002", "Season Pass", true)).unwrap();
//!
//! let options = CodecOptions::default();
//! let exported = export_history(&history, "Thunder Bolt", &path, &options).unwrap();
//! assert_eq!(exported.records_written, 1);
//!
//! let mut restored = HistoryLog::new();
//! let report = import_history(&mut restored, &path, &options).unwrap();
//! assert_eq!(report.imported, 1);
//! assert_eq!(restored.as_slice(), history.as_slice());
//! ```

pub mod export;
pub mod format;
pub mod import;

// Re-export all public types for convenience
pub use export::*;
pub use format::*;
pub use import::*;

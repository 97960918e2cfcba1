//! Core records and configuration for the ride operation manager
//!
//! This module contains the flat data records the ride works with and the
//! configuration structures for the command line driver.
//!
//! # Overview
//!
//! - **VisitorRecord**: one visitor, compared field by field
//! - **StaffRecord**: an employee who can operate a ride
//! - **Configuration**: CLI arguments, JSON config files and validation
//!
//! # Usage Example
//!
//! ```rust
//! use ride_operation_manager::types::*;
//!
//! let visitor = VisitorRecord::new("Mike Wilson", 32, "Male", "V2001", "Family Pass", false);
//! let operator = StaffRecord::new("John Smith", 28, "Male", "E1001", "Ride Operations", "Operator");
//!
//! let config = ManagerConfig {
//!     ride_name: "Thunder Bolt".to_string(),
//!     operator: Some(operator),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(visitor.age, 32);
//! ```

pub mod config;
pub mod staff;
pub mod visitor;

// Re-export all public types for convenience
pub use config::*;
pub use staff::*;
pub use visitor::*;

//! Visitor records supplied to the ride
//!
//! A `VisitorRecord` is a flat description of one park visitor. The ride core
//! only moves these records between the admission queue and the history log;
//! it never edits them, and only constructs new ones when decoding an
//! imported history line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single visitor, identified by all six of its fields
///
/// Equality is field-wise over every field. There is no dedicated identity
/// key, so two visitors with the same `visitor_id` but different ages are
/// different records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    /// Full name of the visitor
    pub name: String,
    /// Age in years
    pub age: i32,
    /// Free-form gender description
    pub gender: String,
    /// Ticket or session identifier (uniqueness is not enforced)
    pub visitor_id: String,
    /// Ticket type, e.g. "Family Pass" or "Season Pass"
    pub ticket_type: String,
    /// Whether the visitor holds a season pass
    pub has_season_pass: bool,
}

impl VisitorRecord {
    /// Create a new visitor record
    pub fn new(
        name: impl Into<String>,
        age: i32,
        gender: impl Into<String>,
        visitor_id: impl Into<String>,
        ticket_type: impl Into<String>,
        has_season_pass: bool,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender: gender.into(),
            visitor_id: visitor_id.into(),
            ticket_type: ticket_type.into(),
            has_season_pass,
        }
    }
}

impl fmt::Display for VisitorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Visitor [Name: {}, Age: {}, Gender: {}, ID: {}, Ticket: {}, Season Pass: {}]",
            self.name,
            self.age,
            self.gender,
            self.visitor_id,
            self.ticket_type,
            if self.has_season_pass { "Yes" } else { "No" }
        )
    }
}

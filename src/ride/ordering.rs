//! Orderings for the ride history
//!
//! Sort policies are plain comparison functions. `SortPolicy` names the three
//! built-in ones so they can be chosen from configuration or the command line.

use crate::types::VisitorRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Signature shared by every history ordering
pub type VisitorOrdering = fn(&VisitorRecord, &VisitorRecord) -> Ordering;

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Age ascending, then name ascending ignoring case
pub fn by_age_then_name(a: &VisitorRecord, b: &VisitorRecord) -> Ordering {
    a.age.cmp(&b.age).then_with(|| cmp_ignore_case(&a.name, &b.name))
}

/// Ticket type ascending ignoring case, then oldest first
pub fn by_ticket_type_then_age_desc(a: &VisitorRecord, b: &VisitorRecord) -> Ordering {
    cmp_ignore_case(&a.ticket_type, &b.ticket_type).then_with(|| b.age.cmp(&a.age))
}

/// Season pass holders first, then name ascending ignoring case
pub fn by_season_pass_then_name(a: &VisitorRecord, b: &VisitorRecord) -> Ordering {
    b.has_season_pass
        .cmp(&a.has_season_pass)
        .then_with(|| cmp_ignore_case(&a.name, &b.name))
}

/// Built-in history orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Youngest first, ties broken by name
    #[default]
    AgeName,
    /// Ticket type alphabetically, ties broken oldest first
    TicketAge,
    /// Season pass holders first, ties broken by name
    PassName,
}

impl SortPolicy {
    /// The comparison function behind this policy
    pub fn comparator(self) -> VisitorOrdering {
        match self {
            SortPolicy::AgeName => by_age_then_name,
            SortPolicy::TicketAge => by_ticket_type_then_age_desc,
            SortPolicy::PassName => by_season_pass_then_name,
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortPolicy::AgeName => write!(f, "age-name"),
            SortPolicy::TicketAge => write!(f, "ticket-age"),
            SortPolicy::PassName => write!(f, "pass-name"),
        }
    }
}

impl FromStr for SortPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "age-name" | "age" | "default" => Ok(SortPolicy::AgeName),
            "ticket-age" | "ticket" => Ok(SortPolicy::TicketAge),
            "pass-name" | "pass" | "season-pass" => Ok(SortPolicy::PassName),
            _ => Err(format!("Unknown sort policy: {}", s)),
        }
    }
}

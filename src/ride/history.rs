//! Append-ordered log of visitors who completed the ride

use crate::ride::error::{RideError, RideResult};
use crate::ride::ordering::SortPolicy;
use crate::types::VisitorRecord;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Visitors who have taken the ride
///
/// Records stay in insertion order until a sort is applied. Sorting is a
/// stable total reorder: the same records, in a different order.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    visitors: Vec<VisitorRecord>,
}

impl HistoryLog {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visitor at the end of the history
    pub fn append(&mut self, visitor: impl Into<Option<VisitorRecord>>) -> RideResult<()> {
        let Some(visitor) = visitor.into() else {
            warn!("Rejected append of an absent visitor to the ride history");
            return Err(RideError::invalid_input("cannot add an absent visitor to the history"));
        };

        debug!(visitor_id = %visitor.visitor_id, position = self.visitors.len(), "Visitor added to ride history");
        self.visitors.push(visitor);
        Ok(())
    }

    /// Whether an identical record is present
    ///
    /// An absent visitor is never found.
    pub fn contains<'a>(&self, visitor: impl Into<Option<&'a VisitorRecord>>) -> bool {
        let Some(visitor) = visitor.into() else {
            debug!("Lookup of an absent visitor in the ride history: not found");
            return false;
        };

        let found = self.visitors.iter().any(|v| v == visitor);
        debug!(visitor_id = %visitor.visitor_id, found, "Ride history lookup");
        found
    }

    /// Number of recorded visitors
    pub fn count(&self) -> usize {
        self.visitors.len()
    }

    /// Whether no visitor has been recorded
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Stable reorder using the supplied ordering
    ///
    /// Fails with `InvalidComparator` when no ordering is given and with
    /// `EmptyHistory` when there is nothing to sort; the log is unchanged in
    /// both cases. Returns the number of records sorted.
    pub fn sort(
        &mut self,
        order: Option<&dyn Fn(&VisitorRecord, &VisitorRecord) -> Ordering>,
    ) -> RideResult<usize> {
        let Some(order) = order else {
            warn!("Sort requested without a comparator");
            return Err(RideError::InvalidComparator);
        };

        if self.visitors.is_empty() {
            warn!("Sort requested on an empty ride history");
            return Err(RideError::EmptyHistory);
        }

        // `sort_by` is stable, so equal-ranked visitors keep insertion order.
        self.visitors.sort_by(|a, b| order(a, b));
        info!(records = self.visitors.len(), "Ride history sorted");
        Ok(self.visitors.len())
    }

    /// Sort with one of the built-in policies
    pub fn sort_by_policy(&mut self, policy: SortPolicy) -> RideResult<usize> {
        let comparator = policy.comparator();
        self.sort(Some(&comparator))
    }

    /// Ordered snapshot of the history as it is now
    ///
    /// Later changes to the log are not reflected in the returned records.
    pub fn iterate(&self) -> std::vec::IntoIter<VisitorRecord> {
        self.visitors.clone().into_iter()
    }

    /// Borrowing iterator over the current order
    pub fn iter(&self) -> std::slice::Iter<'_, VisitorRecord> {
        self.visitors.iter()
    }

    /// The records as a slice, in current order
    pub fn as_slice(&self) -> &[VisitorRecord] {
        &self.visitors
    }

    pub(crate) fn extend(&mut self, visitors: Vec<VisitorRecord>) {
        self.visitors.extend(visitors);
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a VisitorRecord;
    type IntoIter = std::slice::Iter<'a, VisitorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

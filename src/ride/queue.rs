//! FIFO admission queue for visitors waiting to ride

use crate::ride::error::{RideError, RideResult};
use crate::types::VisitorRecord;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Visitors waiting in line, served head first
///
/// The queue is unbounded and performs no duplicate detection.
#[derive(Debug, Clone, Default)]
pub struct AdmissionQueue {
    visitors: VecDeque<VisitorRecord>,
}

impl AdmissionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visitor to the tail of the line
    ///
    /// An absent visitor is rejected with `InvalidInput` and the queue is
    /// left unchanged.
    pub fn enqueue(&mut self, visitor: impl Into<Option<VisitorRecord>>) -> RideResult<()> {
        let Some(visitor) = visitor.into() else {
            warn!("Rejected enqueue of an absent visitor");
            return Err(RideError::invalid_input("cannot enqueue an absent visitor"));
        };

        debug!(visitor_id = %visitor.visitor_id, position = self.visitors.len(), "Visitor joined the queue");
        self.visitors.push_back(visitor);
        Ok(())
    }

    /// Remove and return the visitor at the head of the line
    pub fn dequeue(&mut self) -> RideResult<VisitorRecord> {
        match self.visitors.pop_front() {
            Some(visitor) => {
                debug!(visitor_id = %visitor.visitor_id, "Visitor left the queue");
                Ok(visitor)
            }
            None => {
                warn!("Dequeue requested on an empty queue");
                Err(RideError::EmptyQueue)
            }
        }
    }

    /// Look at the visitor at the head of the line without removing it
    pub fn peek(&self) -> Option<&VisitorRecord> {
        self.visitors.front()
    }

    /// Number of waiting visitors
    pub fn size(&self) -> usize {
        self.visitors.len()
    }

    /// Whether nobody is waiting
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Iterate head to tail, in service order
    pub fn iter(&self) -> impl Iterator<Item = &VisitorRecord> + '_ {
        self.visitors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(name: &str, id: &str) -> VisitorRecord {
        VisitorRecord::new(name, 30, "Female", id, "General", false)
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = AdmissionQueue::new();
        queue.enqueue(visitor("Ann", "V1")).unwrap();
        queue.enqueue(visitor("Ben", "V2")).unwrap();
        queue.enqueue(visitor("Cat", "V3")).unwrap();

        assert_eq!(queue.size(), 3);
        assert_eq!(queue.peek().map(|v| v.name.as_str()), Some("Ann"));

        let served: Vec<String> =
            (0..3).map(|_| queue.dequeue().unwrap().visitor_id).collect();
        assert_eq!(served, vec!["V1", "V2", "V3"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_enqueue_absent_visitor_is_rejected() {
        let mut queue = AdmissionQueue::new();
        let result = queue.enqueue(None::<VisitorRecord>);
        assert!(matches!(result, Err(RideError::InvalidInput(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dequeue_empty_queue() {
        let mut queue = AdmissionQueue::new();
        assert!(matches!(queue.dequeue(), Err(RideError::EmptyQueue)));
        assert!(queue.peek().is_none());
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let mut queue = AdmissionQueue::new();
        queue.enqueue(visitor("Ann", "V1")).unwrap();
        queue.enqueue(visitor("Ann", "V1")).unwrap();
        assert_eq!(queue.size(), 2);
    }

    #[test]
    fn test_iteration_is_head_to_tail() {
        let mut queue = AdmissionQueue::new();
        queue.enqueue(visitor("Ann", "V1")).unwrap();
        queue.enqueue(visitor("Ben", "V2")).unwrap();
        let names: Vec<&str> = queue.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Ben"]);
    }
}

use crate::core::OrderId;
use std::collections::{HashSet, VecDeque};

/// Bounded memory of order ids whose ack has been handled
///
/// Guards the ledger against duplicate ack delivery. The oldest id is
/// forgotten once `capacity` ids are held.
#[derive(Debug)]
pub struct AckDeduplicator {
    capacity: usize,
    seen: HashSet<OrderId>,
    order: VecDeque<OrderId>,
}

impl AckDeduplicator {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            seen: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Record `id`; returns `false` if it was already recorded
    pub fn insert(&mut self, id: OrderId) -> bool {
        if !self.seen.insert(id) {
            return false;
        }

        self.order.push_back(id);
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        true
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected() {
        let mut dedup = AckDeduplicator::new(4);
        assert!(dedup.insert(OrderId::new(1)));
        assert!(!dedup.insert(OrderId::new(1)));
        assert!(dedup.contains(&OrderId::new(1)));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_window_forgets_oldest() {
        let mut dedup = AckDeduplicator::new(2);
        dedup.insert(OrderId::new(1));
        dedup.insert(OrderId::new(2));
        dedup.insert(OrderId::new(3));

        assert!(!dedup.contains(&OrderId::new(1)));
        assert!(dedup.contains(&OrderId::new(2)));
        assert!(dedup.contains(&OrderId::new(3)));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut dedup = AckDeduplicator::new(0);
        assert!(dedup.insert(OrderId::new(1)));
        assert!(!dedup.insert(OrderId::new(1)));
    }
}

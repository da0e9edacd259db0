//! Room id allocation
//!
//! Rooms carry no state of their own: a room exists exactly as long as
//! some client in the registry is assigned to it. The allocator only
//! hands out identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::RoomId;

/// Issues strictly increasing room ids starting at 1.
///
/// Ids are never reused, even after a room empties, so two creation
/// events can never collide.
#[derive(Debug)]
pub struct RoomAllocator {
    next: AtomicU64,
}

impl RoomAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next room id.
    ///
    /// Safe under concurrent calls: every caller observes a distinct id.
    pub fn next_id(&self) -> RoomId {
        RoomId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RoomAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        let allocator = RoomAllocator::new();
        assert_eq!(allocator.next_id(), RoomId(1));
    }

    #[test]
    fn test_ids_strictly_increasing() {
        let allocator = RoomAllocator::new();
        let mut last = allocator.next_id();
        for _ in 0..100 {
            let id = allocator.next_id();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_concurrent_allocation_distinct() {
        let allocator = Arc::new(RoomAllocator::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || {
                    (0..100).map(|_| allocator.next_id()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "room id {} issued twice", id);
            }
        }
        assert_eq!(seen.len(), 800);
    }
}

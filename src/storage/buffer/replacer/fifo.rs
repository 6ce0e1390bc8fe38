use linked_hash_map::LinkedHashMap;

use crate::common::types::FrameId;
use crate::storage::buffer::frame::Frame;
use super::Replacer;

/// First-in first-out replacement: frames leave in the order their pages
/// arrived, regardless of later hits
pub struct FifoReplacer {
    // insertion order is arrival order
    queue: LinkedHashMap<FrameId, ()>,
}

impl FifoReplacer {
    pub fn new(pool_size: usize) -> Self {
        Self {
            queue: LinkedHashMap::with_capacity(pool_size),
        }
    }
}

impl Replacer for FifoReplacer {
    fn record_fill(&mut self, frame_id: FrameId) {
        // Re-enqueue at the tail
        self.queue.remove(&frame_id);
        self.queue.insert(frame_id, ());
    }

    fn record_access(&mut self, _frame_id: FrameId) {}

    fn victim(&mut self, frames: &[Frame]) -> Option<FrameId> {
        self.queue
            .keys()
            .copied()
            .find(|&id| frames[id as usize].is_evictable())
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.queue.remove(&frame_id);
    }
}

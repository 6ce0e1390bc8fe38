use crate::common::types::FrameId;
use crate::storage::buffer::frame::Frame;
use super::Replacer;

/// Least frequently used replacement. Counts restart when a frame is refilled;
/// ties go to the frame filled earliest.
pub struct LfuReplacer {
    next_fill: u64,
    counts: Vec<u64>,
    filled_at: Vec<u64>,
}

impl LfuReplacer {
    pub fn new(pool_size: usize) -> Self {
        Self {
            next_fill: 0,
            counts: vec![0; pool_size],
            filled_at: vec![0; pool_size],
        }
    }
}

impl Replacer for LfuReplacer {
    fn record_fill(&mut self, frame_id: FrameId) {
        let slot = frame_id as usize;
        self.counts[slot] = 1;
        self.filled_at[slot] = self.next_fill;
        self.next_fill += 1;
    }

    fn record_access(&mut self, frame_id: FrameId) {
        self.counts[frame_id as usize] += 1;
    }

    fn victim(&mut self, frames: &[Frame]) -> Option<FrameId> {
        frames
            .iter()
            .filter(|frame| frame.is_evictable())
            .map(|frame| {
                let slot = frame.frame_id() as usize;
                (self.counts[slot], self.filled_at[slot], frame.frame_id())
            })
            .min()
            .map(|(_, _, frame_id)| frame_id)
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.counts[frame_id as usize] = 0;
    }
}

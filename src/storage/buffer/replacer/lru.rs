use crate::common::types::FrameId;
use crate::storage::buffer::frame::Frame;
use super::Replacer;

/// Least recently used replacement driven by a logical clock.
///
/// Every fill or hit stamps the frame with the current clock value and then
/// advances the clock. The victim is the unpinned frame with the oldest
/// stamp; equal stamps cannot occur, but the lowest frame index wins if they
/// ever did.
pub struct LruReplacer {
    clock: u64,
    last_used: Vec<Option<u64>>,
}

impl LruReplacer {
    pub fn new(pool_size: usize) -> Self {
        Self {
            clock: 0,
            last_used: vec![None; pool_size],
        }
    }

    fn touch(&mut self, frame_id: FrameId) {
        self.last_used[frame_id as usize] = Some(self.clock);
        self.clock += 1;
    }
}

impl Replacer for LruReplacer {
    fn record_fill(&mut self, frame_id: FrameId) {
        self.touch(frame_id);
    }

    fn record_access(&mut self, frame_id: FrameId) {
        self.touch(frame_id);
    }

    fn victim(&mut self, frames: &[Frame]) -> Option<FrameId> {
        frames
            .iter()
            .filter(|frame| frame.is_evictable())
            .filter_map(|frame| {
                self.last_used[frame.frame_id() as usize].map(|stamp| (stamp, frame.frame_id()))
            })
            .min()
            .map(|(_, frame_id)| frame_id)
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.last_used[frame_id as usize] = None;
    }
}

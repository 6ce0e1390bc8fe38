use std::collections::VecDeque;

use crate::common::types::FrameId;
use crate::storage::buffer::frame::Frame;
use super::Replacer;

/// LRU-K replacement.
///
/// Each frame keeps the timestamps of its last K accesses. The victim is the
/// frame whose K-th most recent access is oldest. Frames with fewer than K
/// recorded accesses have infinite backward distance and are evicted first,
/// oldest first access among them.
pub struct LruKReplacer {
    k: usize,
    clock: u64,
    history: Vec<VecDeque<u64>>,
}

impl LruKReplacer {
    pub fn new(pool_size: usize, k: usize) -> Self {
        Self {
            k,
            clock: 0,
            history: vec![VecDeque::with_capacity(k); pool_size],
        }
    }

    fn touch(&mut self, frame_id: FrameId) {
        let history = &mut self.history[frame_id as usize];
        history.push_back(self.clock);
        while history.len() > self.k {
            history.pop_front();
        }
        self.clock += 1;
    }
}

impl Replacer for LruKReplacer {
    fn record_fill(&mut self, frame_id: FrameId) {
        self.history[frame_id as usize].clear();
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
                let history = &self.history[frame.frame_id() as usize];
                // Short histories sort first; within each group the oldest
                // front timestamp is the largest backward distance
                history
                    .front()
                    .map(|&oldest| (history.len() >= self.k, oldest, frame.frame_id()))
            })
            .min()
            .map(|(_, _, frame_id)| frame_id)
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.history[frame_id as usize].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::buffer::replacer::test_util::full_frames;

    #[test]
    fn test_short_history_evicted_first() {
        let frames = full_frames(3);
        let mut replacer = LruKReplacer::new(3, 2);
        replacer.record_fill(0);
        replacer.record_fill(1);
        replacer.record_fill(2);
        replacer.record_access(0);
        replacer.record_access(2);

        // Only frame 1 has fewer than two accesses
        assert_eq!(replacer.victim(&frames), Some(1));
    }

    #[test]
    fn test_largest_backward_distance() {
        let frames = full_frames(2);
        let mut replacer = LruKReplacer::new(2, 2);
        replacer.record_fill(0); // t0
        replacer.record_fill(1); // t1
        replacer.record_access(1); // t2
        replacer.record_access(0); // t3
        // Second most recent: frame 0 -> t0, frame 1 -> t1
        assert_eq!(replacer.victim(&frames), Some(0));

        replacer.record_access(0); // t4, frame 0 history is now t3,t4
        assert_eq!(replacer.victim(&frames), Some(1));
    }

    #[test]
    fn test_k_of_one_is_plain_lru() {
        let mut frames = full_frames(3);
        let mut replacer = LruKReplacer::new(3, 1);
        for id in 0..3 {
            replacer.record_fill(id);
        }
        replacer.record_access(0);
        assert_eq!(replacer.victim(&frames), Some(1));

        frames[1].pin_count = 1;
        assert_eq!(replacer.victim(&frames), Some(2));
    }
}

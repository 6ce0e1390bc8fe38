use crate::common::types::FrameId;
use crate::storage::buffer::frame::Frame;
use super::Replacer;

/// Second-chance replacement with a sweeping hand over per-frame reference bits
pub struct ClockReplacer {
    hand: usize,
    ref_bits: Vec<bool>,
}

impl ClockReplacer {
    pub fn new(pool_size: usize) -> Self {
        Self {
            hand: 0,
            ref_bits: vec![false; pool_size],
        }
    }

    fn advance(&mut self) {
        self.hand = (self.hand + 1) % self.ref_bits.len();
    }
}

impl Replacer for ClockReplacer {
    fn record_fill(&mut self, frame_id: FrameId) {
        self.ref_bits[frame_id as usize] = true;
    }

    fn record_access(&mut self, frame_id: FrameId) {
        self.ref_bits[frame_id as usize] = true;
    }

    fn victim(&mut self, frames: &[Frame]) -> Option<FrameId> {
        // The first sweep clears every bit it passes, so two are enough
        for _ in 0..2 * frames.len() {
            let frame = &frames[self.hand];
            if !frame.is_evictable() {
                self.advance();
                continue;
            }
            if self.ref_bits[self.hand] {
                self.ref_bits[self.hand] = false;
                self.advance();
            } else {
                let victim = self.hand as FrameId;
                self.advance();
                return Some(victim);
            }
        }
        None
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.ref_bits[frame_id as usize] = false;
    }
}

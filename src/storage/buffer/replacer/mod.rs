mod clock;
mod fifo;
mod lfu;
mod lru;
mod lru_k;

pub use clock::ClockReplacer;
pub use fifo::FifoReplacer;
pub use lfu::LfuReplacer;
pub use lru::LruReplacer;
pub use lru_k::LruKReplacer;

use crate::common::types::FrameId;
use crate::storage::buffer::config::{ReplacementStrategy, StrategyParams};
use crate::storage::buffer::frame::Frame;

/// Page replacement policy.
///
/// The buffer pool reports every page load (`record_fill`) and every hit on a
/// resident page (`record_access`) and asks for a victim when no frame is
/// free. All per-frame bookkeeping a policy needs lives inside the policy.
pub trait Replacer: Send {
    /// A new page was loaded into `frame_id`
    fn record_fill(&mut self, frame_id: FrameId);

    /// The page resident in `frame_id` was requested again
    fn record_access(&mut self, frame_id: FrameId);

    /// Pick a frame to evict. Only frames that are occupied and unpinned
    /// may be returned; `None` means no frame qualifies.
    fn victim(&mut self, frames: &[Frame]) -> Option<FrameId>;

    /// Stop tracking `frame_id` (its page was evicted or released)
    fn remove(&mut self, frame_id: FrameId);
}

/// Create the replacer for `strategy` sized for `pool_size` frames
pub fn build(
    strategy: ReplacementStrategy,
    params: &StrategyParams,
    pool_size: usize,
) -> Box<dyn Replacer> {
    match strategy {
        ReplacementStrategy::Fifo => Box::new(FifoReplacer::new(pool_size)),
        ReplacementStrategy::Lru => Box::new(LruReplacer::new(pool_size)),
        ReplacementStrategy::Clock => Box::new(ClockReplacer::new(pool_size)),
        ReplacementStrategy::Lfu => Box::new(LfuReplacer::new(pool_size)),
        ReplacementStrategy::LruK => Box::new(LruKReplacer::new(pool_size, params.lru_k)),
    }
}

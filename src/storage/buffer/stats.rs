use std::fmt;
use serde::Serialize;

use crate::common::types::{FrameId, PageId};
use crate::storage::buffer::config::ReplacementStrategy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    pub frame_id: FrameId,
    pub page_id: Option<PageId>,
    pub is_dirty: bool,
    pub pin_count: u32,
}

/// Read-only view of the frame table and I/O counters
#[derive(Debug, Clone, Serialize)]
pub struct PoolSnapshot {
    pub strategy: ReplacementStrategy,
    pub capacity: usize,
    pub frames: Vec<FrameInfo>,
    pub read_count: u64,
    pub write_count: u64,
}

impl PoolSnapshot {
    pub fn frame_contents(&self) -> Vec<Option<PageId>> {
        self.frames.iter().map(|f| f.page_id).collect()
    }

    pub fn dirty_flags(&self) -> Vec<bool> {
        self.frames.iter().map(|f| f.is_dirty).collect()
    }

    pub fn fix_counts(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.pin_count).collect()
    }
}

/// `{LRU 3}: [1x 2],[7 0],[- 0]`: page number, `x` when dirty, pin count
impl fmt::Display for PoolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}: ", self.strategy, self.capacity)?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match frame.page_id {
                Some(page_id) => write!(f, "[{}", page_id)?,
                None => f.write_str("[-")?,
            }
            if frame.is_dirty {
                f.write_str("x")?;
            }
            write!(f, " {}]", frame.pin_count)?;
        }
        Ok(())
    }
}

// Buffer pool manager over a fixed-block page file

pub mod common;
pub mod storage;

// Re-export key items for convenient access
pub use common::types::{FrameId, Page, PageId, PAGE_SIZE};
pub use storage::buffer::{
    BufferPoolConfig, BufferPoolError, BufferPoolManager, PageGuard, PageHandle, PoolSnapshot,
    ReplacementStrategy, StrategyParams,
};
pub use storage::disk::{PageFile, PageFileError, PageStore};

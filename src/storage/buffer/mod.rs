pub mod config;
pub mod error;
pub mod frame;
pub mod handle;
pub mod manager;
pub mod replacer;
pub mod stats;

pub use config::{validate_pool, BufferPoolConfig, ReplacementStrategy, StrategyParams};
pub use error::BufferPoolError;
pub use handle::{PageGuard, PageHandle};
pub use manager::BufferPoolManager;
pub use stats::{FrameInfo, PoolSnapshot};

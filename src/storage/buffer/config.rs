use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::storage::buffer::error::BufferPoolError;

/// Page replacement strategy used to pick eviction victims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplacementStrategy {
    #[serde(rename = "fifo")]
    Fifo,
    #[serde(rename = "lru")]
    Lru,
    #[serde(rename = "clock")]
    Clock,
    #[serde(rename = "lfu")]
    Lfu,
    #[serde(rename = "lru-k")]
    LruK,
}

impl fmt::Display for ReplacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplacementStrategy::Fifo => "FIFO",
            ReplacementStrategy::Lru => "LRU",
            ReplacementStrategy::Clock => "CLOCK",
            ReplacementStrategy::Lfu => "LFU",
            ReplacementStrategy::LruK => "LRU-K",
        };
        f.write_str(name)
    }
}

impl FromStr for ReplacementStrategy {
    type Err = BufferPoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(ReplacementStrategy::Fifo),
            "lru" => Ok(ReplacementStrategy::Lru),
            "clock" => Ok(ReplacementStrategy::Clock),
            "lfu" => Ok(ReplacementStrategy::Lfu),
            "lru-k" | "lru_k" | "lruk" => Ok(ReplacementStrategy::LruK),
            other => Err(BufferPoolError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// Policy-specific tuning; ignored by strategies that have no parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Number of past accesses LRU-K looks back over
    pub lru_k: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self { lru_k: 2 }
    }
}

/// Configuration for a buffer pool instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferPoolConfig {
    /// Path of the backing page file
    pub file_name: PathBuf,

    /// Number of frames in the pool
    pub capacity: usize,

    /// Eviction strategy
    pub strategy: ReplacementStrategy,

    /// Strategy tuning
    pub strategy_params: StrategyParams,
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from("database.db"),
            capacity: 64,
            strategy: ReplacementStrategy::Lru,
            strategy_params: StrategyParams::default(),
        }
    }
}

impl BufferPoolConfig {
    pub fn new(file_name: impl Into<PathBuf>, capacity: usize, strategy: ReplacementStrategy) -> Self {
        Self {
            file_name: file_name.into(),
            capacity,
            strategy,
            strategy_params: StrategyParams::default(),
        }
    }

    pub fn with_strategy_params(mut self, params: StrategyParams) -> Self {
        self.strategy_params = params;
        self
    }

    /// Reject configurations the pool cannot run with
    pub fn validate(&self) -> Result<(), BufferPoolError> {
        validate_pool(self.capacity, self.strategy, &self.strategy_params)
    }
}

/// Check a frame count and strategy tuning, independent of any backing file
pub fn validate_pool(
    capacity: usize,
    strategy: ReplacementStrategy,
    params: &StrategyParams,
) -> Result<(), BufferPoolError> {
    if capacity == 0 {
        return Err(BufferPoolError::InvalidConfig(
            "capacity must be at least 1".to_string(),
        ));
    }
    if u32::try_from(capacity).is_err() {
        return Err(BufferPoolError::InvalidConfig(format!(
            "capacity {} exceeds the frame index range",
            capacity
        )));
    }
    if strategy == ReplacementStrategy::LruK && params.lru_k == 0 {
        return Err(BufferPoolError::InvalidConfig(
            "LRU-K requires K of at least 1".to_string(),
        ));
    }
    Ok(())
}

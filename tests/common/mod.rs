#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use anyhow::Result;
use tempfile::NamedTempFile;

use bufmgr::{
    BufferPoolManager, PageFile, PageFileError, PageId, PageStore, ReplacementStrategy,
    StrategyParams, PAGE_SIZE,
};

pub const ALL_STRATEGIES: [ReplacementStrategy; 5] = [
    ReplacementStrategy::Fifo,
    ReplacementStrategy::Lru,
    ReplacementStrategy::Clock,
    ReplacementStrategy::Lfu,
    ReplacementStrategy::LruK,
];

// Create a temporary database file for testing
pub fn create_temp_db_file() -> Result<(NamedTempFile, String)> {
    let file = NamedTempFile::new()?;
    let path = file.path().to_str().unwrap().to_string();
    Ok((file, path))
}

// Create a buffer pool manager with a temporary database
pub fn create_test_buffer_pool(
    pool_size: usize,
    strategy: ReplacementStrategy,
) -> Result<(BufferPoolManager, NamedTempFile)> {
    let (file, path) = create_temp_db_file()?;
    let buffer_pool = BufferPoolManager::new(pool_size, path, strategy)?;
    Ok((buffer_pool, file))
}

// Pin a page and release it straight away
pub fn touch(pool: &BufferPoolManager, page_id: PageId) -> Result<()> {
    pool.pin_page(page_id)?.unpin()?;
    Ok(())
}

// Write `data` at the start of a page and mark it dirty, leaving it unpinned
pub fn write_page(pool: &BufferPoolManager, page_id: PageId, data: &[u8]) -> Result<()> {
    let handle = pool.pin_page(page_id)?;
    handle.write()?.data[..data.len()].copy_from_slice(data);
    handle.mark_dirty()?;
    handle.unpin()?;
    Ok(())
}

pub fn read_prefix(pool: &BufferPoolManager, page_id: PageId, len: usize) -> Result<Vec<u8>> {
    let handle = pool.pin_page(page_id)?;
    let prefix = handle.read()?.data[..len].to_vec();
    handle.unpin()?;
    Ok(prefix)
}

/// Switches for injecting I/O failures into a [`FaultyStore`]
#[derive(Clone, Default)]
pub struct Faults {
    pub fail_reads: Arc<AtomicBool>,
    pub fail_writes: Arc<AtomicBool>,
}

impl Faults {
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

/// Page file whose reads and writes can be made to fail on demand
pub struct FaultyStore {
    inner: PageFile,
    faults: Faults,
}

impl FaultyStore {
    pub fn open(path: &str, faults: Faults) -> Result<Self> {
        Ok(Self {
            inner: PageFile::open(path)?,
            faults,
        })
    }
}

fn injected(what: &str) -> PageFileError {
    PageFileError::Io(io::Error::new(io::ErrorKind::Other, format!("injected {} failure", what)))
}

impl PageStore for FaultyStore {
    fn read_block(&mut self, block: PageId, buf: &mut [u8; PAGE_SIZE]) -> Result<(), PageFileError> {
        if self.faults.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        self.inner.read_block(block, buf)
    }

    fn write_block(&mut self, block: PageId, buf: &[u8; PAGE_SIZE]) -> Result<(), PageFileError> {
        if self.faults.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        self.inner.write_block(block, buf)
    }

    fn ensure_capacity(&mut self, block: PageId) -> Result<(), PageFileError> {
        self.inner.ensure_capacity(block)
    }

    fn num_blocks(&self) -> usize {
        self.inner.num_blocks()
    }

    fn close(&mut self) -> Result<(), PageFileError> {
        self.inner.close()
    }
}

// Buffer pool over a FaultyStore backed by a temporary file
pub fn create_faulty_buffer_pool(
    pool_size: usize,
    strategy: ReplacementStrategy,
) -> Result<(BufferPoolManager, Faults, NamedTempFile)> {
    let (file, path) = create_temp_db_file()?;
    let faults = Faults::default();
    let store = FaultyStore::open(&path, faults.clone())?;
    let pool = BufferPoolManager::with_store(pool_size, strategy, &StrategyParams::default(), store)?;
    Ok((pool, faults, file))
}

mod page_file;

pub use page_file::{PageFile, PageFileError};

use crate::common::types::{PageId, PAGE_SIZE};

/// Fixed-block storage consumed by the buffer pool.
///
/// Blocks are `PAGE_SIZE` bytes and numbered from 0. Reads and writes past
/// the current end of the store fail; callers extend it first with
/// [`PageStore::ensure_capacity`].
pub trait PageStore: Send {
    /// Copy block `block` into `buf`
    fn read_block(&mut self, block: PageId, buf: &mut [u8; PAGE_SIZE]) -> Result<(), PageFileError>;

    /// Overwrite block `block` with `buf`
    fn write_block(&mut self, block: PageId, buf: &[u8; PAGE_SIZE]) -> Result<(), PageFileError>;

    /// Grow the store with zero-filled blocks so that `block` exists
    fn ensure_capacity(&mut self, block: PageId) -> Result<(), PageFileError>;

    /// Number of blocks currently in the store
    fn num_blocks(&self) -> usize;

    /// Flush everything to stable storage and release the handle
    fn close(&mut self) -> Result<(), PageFileError>;
}

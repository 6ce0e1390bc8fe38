use std::sync::Arc;
use parking_lot::RwLock;

/// Page size in bytes (4KB), shared by the buffer pool and the page file
pub const PAGE_SIZE: usize = 4096;

/// Page number within the backing file
pub type PageId = i32;

/// Buffer pool frame (slot) index
pub type FrameId = u32;

/// In-memory copy of one block of the page file. Which page it holds is
/// tracked by the owning frame.
#[derive(Debug, Clone)]
pub struct Page {
    pub data: [u8; PAGE_SIZE],
}

impl Page {
    pub fn new() -> Self {
        Self { data: [0; PAGE_SIZE] }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// Smart pointer to a page buffer
pub type PagePtr = Arc<RwLock<Page>>;

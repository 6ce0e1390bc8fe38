use std::ops::Deref;
use log::warn;
use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::common::types::{FrameId, Page, PageId, PagePtr};
use crate::storage::buffer::error::BufferPoolError;
use crate::storage::buffer::manager::BufferPoolManager;

/// A pinned page.
///
/// The handle borrows the pool, so it cannot outlive it and the pool cannot
/// be shut down while it exists. Content access is checked: once the frame
/// no longer holds this page pinned, `read` and `write` fail with
/// `StaleHandle`. Drop content guards before unpinning.
///
/// While a content guard is alive, pool operations that need the same
/// content (force, flush, eviction) return `PageBusy` instead of waiting.
pub struct PageHandle<'a> {
    pool: &'a BufferPoolManager,
    page_id: PageId,
    frame_id: FrameId,
    pin_count: u32,
    is_dirty: bool,
    page: PagePtr,
}

impl<'a> PageHandle<'a> {
    pub(crate) fn new(
        pool: &'a BufferPoolManager,
        page_id: PageId,
        frame_id: FrameId,
        pin_count: u32,
        is_dirty: bool,
        page: PagePtr,
    ) -> Self {
        Self {
            pool,
            page_id,
            frame_id,
            pin_count,
            is_dirty,
            page,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    /// Pin count right after this pin was taken
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    /// Dirty flag when this pin was taken
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Page>, BufferPoolError> {
        let content = self.page.read();
        self.pool.check_pinned(self.frame_id, self.page_id, false)?;
        Ok(content)
    }

    /// Mutable access to the content. The page is marked dirty.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Page>, BufferPoolError> {
        let content = self.page.write();
        self.pool.check_pinned(self.frame_id, self.page_id, true)?;
        Ok(content)
    }

    pub fn mark_dirty(&self) -> Result<(), BufferPoolError> {
        self.pool.mark_dirty(self.page_id)
    }

    pub fn force(&self) -> Result<(), BufferPoolError> {
        self.pool.force_page(self.page_id)
    }

    /// Release this pin
    pub fn unpin(self) -> Result<(), BufferPoolError> {
        self.pool.unpin_page(self.page_id)
    }
}

/// Pinned page that unpins itself when dropped
pub struct PageGuard<'a> {
    handle: PageHandle<'a>,
}

impl<'a> PageGuard<'a> {
    pub(crate) fn new(handle: PageHandle<'a>) -> Self {
        Self { handle }
    }
}

impl<'a> Deref for PageGuard<'a> {
    type Target = PageHandle<'a>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl Drop for PageGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.handle.pool.unpin_page(self.handle.page_id) {
            warn!("Failed to unpin page {} on guard drop: {}", self.handle.page_id, e);
        }
    }
}

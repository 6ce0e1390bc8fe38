use std::sync::Arc;
use parking_lot::RwLock;

use crate::common::types::{FrameId, Page, PageId, PagePtr};

/// One slot of the frame table
#[derive(Debug)]
pub struct Frame {
    frame_id: FrameId,
    pub(crate) page_id: Option<PageId>,
    pub(crate) pin_count: u32,
    pub(crate) is_dirty: bool,
    pub(crate) page: PagePtr,
}

impl Frame {
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            page_id: None,
            pin_count: 0,
            is_dirty: false,
            page: Arc::new(RwLock::new(Page::new())),
        }
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn page_id(&self) -> Option<PageId> {
        self.page_id
    }

    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_free(&self) -> bool {
        self.page_id.is_none()
    }

    /// Occupied and unpinned
    pub fn is_evictable(&self) -> bool {
        self.page_id.is_some() && self.pin_count == 0
    }

    /// Return the slot to the free state. Content is left to the caller,
    /// which must hold the page lock to touch it.
    pub(crate) fn reset(&mut self) {
        self.page_id = None;
        self.pin_count = 0;
        self.is_dirty = false;
    }
}

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use log::{debug, error, info, trace, warn};
use parking_lot::Mutex;

use crate::common::types::{FrameId, PageId};
use crate::storage::buffer::config::{
    validate_pool, BufferPoolConfig, ReplacementStrategy, StrategyParams,
};
use crate::storage::buffer::error::BufferPoolError;
use crate::storage::buffer::frame::Frame;
use crate::storage::buffer::handle::{PageGuard, PageHandle};
use crate::storage::buffer::replacer::{self, Replacer};
use crate::storage::buffer::stats::{FrameInfo, PoolSnapshot};
use crate::storage::disk::{PageFile, PageStore};

/// Fixed-capacity page cache in front of a [`PageStore`].
///
/// Every operation runs under one pool-wide lock, physical I/O included.
/// Page content is shared with callers through [`PageHandle`]s while the
/// page stays pinned.
///
/// Lock order is page content first, pool second. While holding the pool
/// lock the manager only try-locks page content and reports `PageBusy`
/// when a handle has it.
pub struct BufferPoolManager {
    pool_size: usize,
    strategy: ReplacementStrategy,
    state: Mutex<PoolState>,
}

struct PoolState {
    frames: Vec<Frame>,
    page_table: HashMap<PageId, FrameId>,
    free_list: VecDeque<FrameId>,
    replacer: Box<dyn Replacer>,
    // None once the pool has been shut down
    store: Option<Box<dyn PageStore>>,
    read_count: u64,
    write_count: u64,
}

impl BufferPoolManager {
    /// Open a pool of `pool_size` frames over the page file at `db_path`
    pub fn new(
        pool_size: usize,
        db_path: impl AsRef<Path>,
        strategy: ReplacementStrategy,
    ) -> Result<Self, BufferPoolError> {
        Self::from_config(&BufferPoolConfig::new(db_path.as_ref(), pool_size, strategy))
    }

    pub fn from_config(config: &BufferPoolConfig) -> Result<Self, BufferPoolError> {
        config.validate()?;
        let page_file = PageFile::open(&config.file_name).map_err(|source| BufferPoolError::FileOpen {
            path: config.file_name.clone(),
            source,
        })?;
        info!(
            "Opened buffer pool over {} ({} frames, {})",
            config.file_name.display(),
            config.capacity,
            config.strategy
        );
        Self::with_store(config.capacity, config.strategy, &config.strategy_params, page_file)
    }

    /// Build a pool over an already opened store
    pub fn with_store(
        pool_size: usize,
        strategy: ReplacementStrategy,
        params: &StrategyParams,
        store: impl PageStore + 'static,
    ) -> Result<Self, BufferPoolError> {
        validate_pool(pool_size, strategy, params)?;

        let frames: Vec<Frame> = (0..pool_size).map(|i| Frame::new(i as FrameId)).collect();
        let free_list: VecDeque<FrameId> = (0..pool_size as FrameId).collect();

        Ok(Self {
            pool_size,
            strategy,
            state: Mutex::new(PoolState {
                frames,
                page_table: HashMap::with_capacity(pool_size),
                free_list,
                replacer: replacer::build(strategy, params, pool_size),
                store: Some(Box::new(store)),
                read_count: 0,
                write_count: 0,
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.pool_size
    }

    pub fn strategy(&self) -> ReplacementStrategy {
        self.strategy
    }

    /// Pin a page, reading it from disk if it is not resident.
    ///
    /// Pages past the end of the file are created zero-filled. Fails with
    /// `PoolExhausted` when the page is absent and every frame is pinned.
    pub fn pin_page(&self, page_id: PageId) -> Result<PageHandle<'_>, BufferPoolError> {
        if page_id < 0 {
            return Err(BufferPoolError::InvalidPageNumber(page_id));
        }

        let mut state = self.state.lock();
        state.ensure_open()?;

        let frame_id = match state.find_slot(page_id) {
            Some(frame_id) => {
                state.frames[frame_id as usize].pin_count += 1;
                state.replacer.record_access(frame_id);
                trace!("Hit on page {} in frame {}", page_id, frame_id);
                frame_id
            }
            None => state.load_page(page_id)?,
        };

        let frame = &state.frames[frame_id as usize];
        Ok(PageHandle::new(
            self,
            page_id,
            frame_id,
            frame.pin_count,
            frame.is_dirty,
            Arc::clone(&frame.page),
        ))
    }

    /// Pin a page and unpin it automatically when the guard is dropped
    pub fn fetch_page(&self, page_id: PageId) -> Result<PageGuard<'_>, BufferPoolError> {
        self.pin_page(page_id).map(PageGuard::new)
    }

    /// Release one pin on a resident page
    pub fn unpin_page(&self, page_id: PageId) -> Result<(), BufferPoolError> {
        let mut state = self.state.lock();
        state.ensure_open()?;

        let frame_id = state.find_slot(page_id).ok_or(BufferPoolError::PageNotFound(page_id))?;
        let frame = &mut state.frames[frame_id as usize];
        if frame.pin_count == 0 {
            return Err(BufferPoolError::NotPinned(page_id));
        }
        frame.pin_count -= 1;
        Ok(())
    }

    /// Record that the in-memory copy of a resident page was modified
    pub fn mark_dirty(&self, page_id: PageId) -> Result<(), BufferPoolError> {
        let mut state = self.state.lock();
        state.ensure_open()?;

        let frame_id = state.find_slot(page_id).ok_or(BufferPoolError::PageNotFound(page_id))?;
        state.frames[frame_id as usize].is_dirty = true;
        Ok(())
    }

    /// Write a resident page to disk now, dirty or not
    pub fn force_page(&self, page_id: PageId) -> Result<(), BufferPoolError> {
        let mut state = self.state.lock();
        state.ensure_open()?;

        let frame_id = state.find_slot(page_id).ok_or(BufferPoolError::PageNotFound(page_id))?;
        state.write_back(frame_id)
    }

    /// Write back every dirty page that is not pinned and return how many
    /// were written. Pinned dirty pages stay dirty.
    pub fn flush_pool(&self) -> Result<usize, BufferPoolError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.flush_unpinned()
    }

    /// Flush and close the pool.
    ///
    /// Fails with `PoolBusy`, writing nothing, while any page is pinned.
    /// Every later operation fails with `PoolClosed`.
    pub fn shutdown(&mut self) -> Result<(), BufferPoolError> {
        let state = self.state.get_mut();
        state.ensure_open()?;

        let pinned = state.frames.iter().filter(|frame| frame.pin_count > 0).count();
        if pinned > 0 {
            return Err(BufferPoolError::PoolBusy(pinned));
        }

        state.flush_unpinned()?;
        state.frames.clear();
        state.page_table.clear();
        state.free_list.clear();

        if let Some(mut store) = state.store.take() {
            store.close()?;
        }
        info!(
            "Buffer pool shut down ({} reads, {} writes)",
            state.read_count, state.write_count
        );
        Ok(())
    }

    pub fn contains(&self, page_id: PageId) -> bool {
        self.state.lock().find_slot(page_id).is_some()
    }

    /// Page number held by each frame, `None` for free frames
    pub fn frame_contents(&self) -> Vec<Option<PageId>> {
        self.state.lock().frames.iter().map(Frame::page_id).collect()
    }

    pub fn dirty_flags(&self) -> Vec<bool> {
        self.state.lock().frames.iter().map(Frame::is_dirty).collect()
    }

    pub fn fix_counts(&self) -> Vec<u32> {
        self.state.lock().frames.iter().map(Frame::pin_count).collect()
    }

    /// Physical block reads performed so far
    pub fn read_count(&self) -> u64 {
        self.state.lock().read_count
    }

    /// Physical block writes performed so far
    pub fn write_count(&self) -> u64 {
        self.state.lock().write_count
    }

    /// Consistent view of every diagnostic at once
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        PoolSnapshot {
            strategy: self.strategy,
            capacity: self.pool_size,
            frames: state
                .frames
                .iter()
                .map(|frame| FrameInfo {
                    frame_id: frame.frame_id(),
                    page_id: frame.page_id(),
                    is_dirty: frame.is_dirty(),
                    pin_count: frame.pin_count(),
                })
                .collect(),
            read_count: state.read_count,
            write_count: state.write_count,
        }
    }

    /// Whether `frame_id` still holds `page_id` with at least one pin.
    /// Called by handles after they lock the page content, so the answer
    /// cannot change while the content guard lives.
    pub(crate) fn check_pinned(
        &self,
        frame_id: FrameId,
        page_id: PageId,
        mark_dirty: bool,
    ) -> Result<(), BufferPoolError> {
        let mut state = self.state.lock();
        match state.frames.get_mut(frame_id as usize) {
            Some(frame) if frame.page_id == Some(page_id) && frame.pin_count > 0 => {
                if mark_dirty {
                    frame.is_dirty = true;
                }
                Ok(())
            }
            _ => Err(BufferPoolError::StaleHandle(page_id)),
        }
    }
}

impl PoolState {
    fn ensure_open(&self) -> Result<(), BufferPoolError> {
        if self.store.is_none() {
            return Err(BufferPoolError::PoolClosed);
        }
        Ok(())
    }

    fn find_slot(&self, page_id: PageId) -> Option<FrameId> {
        self.page_table.get(&page_id).copied()
    }

    /// Bring `page_id` into a frame with a single pin
    fn load_page(&mut self, page_id: PageId) -> Result<FrameId, BufferPoolError> {
        let (frame_id, victim) = self.choose_frame()?;

        let page = Arc::clone(&self.frames[frame_id as usize].page);
        let Some(mut content) = page.try_write() else {
            // Only a handle that outlived its pin can hold an unpinned frame
            if victim.is_none() {
                self.free_list.push_front(frame_id);
            }
            return Err(BufferPoolError::PageBusy(victim.unwrap_or(page_id)));
        };

        if let Some(old_page_id) = victim {
            // A failed write-back leaves the victim resident and dirty
            if self.frames[frame_id as usize].is_dirty {
                self.store_mut()?.write_block(old_page_id, &content.data)?;
                self.write_count += 1;
                self.frames[frame_id as usize].is_dirty = false;
                debug!("Wrote page {} from frame {}", old_page_id, frame_id);
            }

            debug!("Evicting page {} from frame {}", old_page_id, frame_id);
            self.page_table.remove(&old_page_id);
            self.replacer.remove(frame_id);
            self.frames[frame_id as usize].reset();
        }

        let read = self.store_mut().and_then(|store| {
            store
                .ensure_capacity(page_id)
                .and_then(|_| store.read_block(page_id, &mut content.data))
                .map_err(BufferPoolError::from)
        });
        if let Err(e) = read {
            content.data.fill(0);
            self.free_list.push_front(frame_id);
            return Err(e);
        }
        drop(content);

        let frame = &mut self.frames[frame_id as usize];
        frame.page_id = Some(page_id);
        frame.pin_count = 1;
        frame.is_dirty = false;

        self.read_count += 1;
        self.page_table.insert(page_id, frame_id);
        self.replacer.record_fill(frame_id);
        trace!("Loaded page {} into frame {}", page_id, frame_id);
        Ok(frame_id)
    }

    /// Pick the frame for a new page: a free one, or the replacer's victim
    /// together with the page it still holds. Nothing is changed yet.
    fn choose_frame(&mut self) -> Result<(FrameId, Option<PageId>), BufferPoolError> {
        if let Some(frame_id) = self.free_list.pop_front() {
            return Ok((frame_id, None));
        }

        let frame_id = self
            .replacer
            .victim(&self.frames)
            .ok_or(BufferPoolError::PoolExhausted)?;

        let frame = &self.frames[frame_id as usize];
        match frame.page_id {
            Some(old_page_id) if frame.pin_count == 0 => Ok((frame_id, Some(old_page_id))),
            _ => {
                error!("Replacer offered frame {} which cannot be evicted", frame_id);
                Err(BufferPoolError::PoolExhausted)
            }
        }
    }

    fn store_mut(&mut self) -> Result<&mut (dyn PageStore + 'static), BufferPoolError> {
        match self.store.as_deref_mut() {
            Some(store) => Ok(store),
            None => Err(BufferPoolError::PoolClosed),
        }
    }

    fn write_back(&mut self, frame_id: FrameId) -> Result<(), BufferPoolError> {
        let frame = &self.frames[frame_id as usize];
        let Some(page_id) = frame.page_id else {
            return Ok(());
        };

        let page = Arc::clone(&frame.page);
        let content = page.try_read().ok_or(BufferPoolError::PageBusy(page_id))?;
        self.store_mut()?.write_block(page_id, &content.data)?;
        drop(content);

        self.frames[frame_id as usize].is_dirty = false;
        self.write_count += 1;
        debug!("Wrote page {} from frame {}", page_id, frame_id);
        Ok(())
    }

    fn flush_unpinned(&mut self) -> Result<usize, BufferPoolError> {
        let targets: Vec<FrameId> = self
            .frames
            .iter()
            .filter(|frame| frame.is_evictable() && frame.is_dirty)
            .map(Frame::frame_id)
            .collect();

        for &frame_id in &targets {
            self.write_back(frame_id)?;
        }
        Ok(targets.len())
    }
}

impl Drop for BufferPoolManager {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.store.is_none() {
            return;
        }

        let pinned = state.frames.iter().filter(|frame| frame.pin_count > 0).count();
        if pinned > 0 {
            warn!("Buffer pool dropped with {} pinned frame(s)", pinned);
        }
        if let Err(e) = state.flush_unpinned() {
            error!("Failed to flush buffer pool on drop: {}", e);
        }
        if let Some(mut store) = state.store.take() {
            if let Err(e) = store.close() {
                error!("Failed to close page file on drop: {}", e);
            }
        }
    }
}

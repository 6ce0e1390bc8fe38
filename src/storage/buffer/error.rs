use std::path::PathBuf;
use thiserror::Error;
use crate::common::types::PageId;
use crate::storage::disk::PageFileError;

#[derive(Error, Debug)]
pub enum BufferPoolError {
    #[error("Invalid buffer pool configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot open page file {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid page number: {0}")]
    InvalidPageNumber(PageId),
    #[error("Page {0} not found in buffer pool")]
    PageNotFound(PageId),
    #[error("Page {0} is not pinned")]
    NotPinned(PageId),
    #[error("Buffer pool exhausted: every frame is pinned")]
    PoolExhausted,
    #[error("Buffer pool busy: {0} frame(s) still pinned")]
    PoolBusy(usize),
    #[error("Unsupported replacement strategy: {0}")]
    UnsupportedStrategy(String),
    #[error("Page {0} content is locked by a page handle")]
    PageBusy(PageId),
    #[error("Handle for page {0} outlived its pin")]
    StaleHandle(PageId),
    #[error("Buffer pool has been shut down")]
    PoolClosed,
    #[error("Page file error: {0}")]
    Io(#[from] PageFileError),
}

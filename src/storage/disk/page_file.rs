use std::fs::{File, OpenOptions};
use std::io::{Read, Write, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::common::types::{PageId, PAGE_SIZE};
use super::PageStore;

#[derive(Error, Debug)]
pub enum PageFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid block number: {0}")]
    InvalidBlock(PageId),
    #[error("Block {block} is beyond end of file ({num_blocks} blocks)")]
    BlockOutOfRange { block: PageId, num_blocks: usize },
    #[error("Page file is closed")]
    Closed,
}

/// PageFile stores fixed-size blocks in a single file on disk
#[derive(Debug)]
pub struct PageFile {
    path: PathBuf,
    file: Option<File>,
    num_blocks: usize,
}

impl PageFile {
    /// Open the page file at `path`, creating an empty one if it does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        // A trailing partial block is not addressable
        let num_blocks = (file.metadata()?.len() / PAGE_SIZE as u64) as usize;

        Ok(Self {
            path,
            file: Some(file),
            num_blocks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> Result<&mut File, PageFileError> {
        self.file.as_mut().ok_or(PageFileError::Closed)
    }

    fn check_block(&self, block: PageId) -> Result<u64, PageFileError> {
        if block < 0 {
            return Err(PageFileError::InvalidBlock(block));
        }
        if block as usize >= self.num_blocks {
            return Err(PageFileError::BlockOutOfRange {
                block,
                num_blocks: self.num_blocks,
            });
        }
        Ok(Self::block_offset(block))
    }

    /// Calculate the offset of a block in the file
    fn block_offset(block: PageId) -> u64 {
        block as u64 * PAGE_SIZE as u64
    }
}

impl PageStore for PageFile {
    fn read_block(&mut self, block: PageId, buf: &mut [u8; PAGE_SIZE]) -> Result<(), PageFileError> {
        let offset = self.check_block(block)?;
        let file = self.file()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&mut self, block: PageId, buf: &[u8; PAGE_SIZE]) -> Result<(), PageFileError> {
        let offset = self.check_block(block)?;
        let file = self.file()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)?;
        Ok(())
    }

    fn ensure_capacity(&mut self, block: PageId) -> Result<(), PageFileError> {
        if block < 0 {
            return Err(PageFileError::InvalidBlock(block));
        }
        let wanted = block as usize + 1;
        if wanted <= self.num_blocks {
            return Ok(());
        }

        // set_len zero-fills the extension
        self.file()?.set_len(wanted as u64 * PAGE_SIZE as u64)?;
        self.num_blocks = wanted;
        Ok(())
    }

    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn close(&mut self) -> Result<(), PageFileError> {
        match self.file.take() {
            Some(file) => {
                file.sync_all()?;
                Ok(())
            }
            None => Err(PageFileError::Closed),
        }
    }
}

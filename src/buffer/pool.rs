//! Buffer pool implementation
//!
//! One slot per page in the file, each either unloaded or holding the
//! decoded page.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, SyncStrategy};
use crate::error::{PageKvError, Result};
use crate::page::{Page, PAGE_SIZE};

/// Owns the data file and caches its pages in memory
///
/// Single-threaded: every method takes `&mut self`. Callers sharing a pool
/// across threads wrap it in a lock (see `Store`).
pub struct BufferPool {
    /// Path of the data file (for logging)
    path: PathBuf,

    /// Data file handle, read/write
    file: File,

    /// Page slots indexed by page index; `None` = not loaded yet
    pages: Vec<Option<Page>>,

    /// When page writes are fsynced
    sync_strategy: SyncStrategy,
}

impl BufferPool {
    /// Open the data file and size the pool from it
    ///
    /// The file length must be a whole number of pages. No page is read
    /// until it is first requested.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(config.create_if_missing)
            .open(&config.path)?;

        let len = file.metadata()?.len();
        if len % PAGE_SIZE as u64 != 0 {
            return Err(PageKvError::InvalidFileSize { len });
        }

        let page_count = u32::try_from(len / PAGE_SIZE as u64).map_err(|_| {
            PageKvError::Corruption(format!("file holds too many pages ({} bytes)", len))
        })?;

        tracing::debug!(
            "Opened buffer pool at {} with {} pages",
            config.path.display(),
            page_count
        );

        Ok(Self {
            path: config.path.clone(),
            file,
            pages: (0..page_count).map(|_| None).collect(),
            sync_strategy: config.sync_strategy,
        })
    }

    /// Append a page at the end of the file and write it through.
    ///
    /// Returns the new page's index.
    pub fn add_page(&mut self, page: impl Into<Page>) -> Result<u32> {
        let index = self.page_count();
        self.pages.push(Some(page.into()));

        // Keep the logical page count in step with the file
        if let Err(e) = self.flush_page(index) {
            self.pages.pop();
            return Err(e);
        }

        tracing::debug!("Added page {} to {}", index, self.path.display());
        Ok(index)
    }

    /// Fetch a page, reading it from disk on first access.
    ///
    /// Repeated calls return the same cached page.
    pub fn get_page(&mut self, index: u32) -> Result<&mut Page> {
        let page_count = self.page_count();
        let slot = self
            .pages
            .get_mut(index as usize)
            .ok_or(PageKvError::PageOutOfRange { index, page_count })?;

        if slot.is_none() {
            let page = Self::read_page(&mut self.file, index)?;
            tracing::debug!("Loaded page {} ({:?})", index, page.kind());
            *slot = Some(page);
        }

        slot.as_mut().ok_or(PageKvError::PageNotLoaded(index))
    }

    /// Write a loaded page back to its file offset
    pub fn flush_page(&mut self, index: u32) -> Result<()> {
        let page = self
            .pages
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(PageKvError::PageNotLoaded(index))?;

        self.file.seek(SeekFrom::Start(Self::page_offset(index)))?;
        self.file.write_all(page.as_bytes())?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }

        tracing::trace!("Flushed page {}", index);
        Ok(())
    }

    /// Flush every loaded page in index order, then sync the file
    pub fn flush_all(&mut self) -> Result<()> {
        for index in 0..self.page_count() {
            if self.is_loaded(index) {
                self.flush_page(index)?;
            }
        }
        self.file.sync_data()?;
        Ok(())
    }

    /// Flush all loaded pages and release the file and every buffer
    pub fn close(mut self) -> Result<()> {
        let result = self.flush_all();
        self.pages.clear();
        tracing::debug!("Closed buffer pool at {}", self.path.display());
        result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of pages in the file
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Number of pages currently cached
    pub fn loaded_count(&self) -> usize {
        self.pages.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_loaded(&self, index: u32) -> bool {
        matches!(self.pages.get(index as usize), Some(Some(_)))
    }

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn page_offset(index: u32) -> u64 {
        index as u64 * PAGE_SIZE as u64
    }

    fn read_page(file: &mut File, index: u32) -> Result<Page> {
        let mut data = vec![0u8; PAGE_SIZE].into_boxed_slice();
        file.seek(SeekFrom::Start(Self::page_offset(index)))?;
        file.read_exact(&mut data)?;
        Page::decode(data)
    }
}

impl Drop for BufferPool {
    fn drop(&mut self) {
        if self.loaded_count() == 0 {
            return;
        }

        // Pool dropped without close()
        if let Err(e) = self.flush_all() {
            tracing::warn!(
                "Failed to flush pages of {} on drop: {}",
                self.path.display(),
                e
            );
        }
    }
}

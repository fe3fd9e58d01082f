//! Store Module
//!
//! The key/value facade over the buffer pool.
//!
//! ## Responsibilities
//! - Open the data file and make sure a root page exists
//! - Route get/set to the root leaf (page 0)
//! - Flush and close the pool

use std::path::Path;

use parking_lot::Mutex;

use crate::buffer::BufferPool;
use crate::config::Config;
use crate::error::{PageKvError, Result};
use crate::page::{LeafPage, Page};

/// The embedded key/value store
///
/// ## Concurrency Model
///
/// All page access goes through one `Mutex` around the buffer pool, so
/// every operation runs to completion before the next one starts. There
/// is no file locking: one process must own the data file.
///
/// ## Storage Model
///
/// Every key lives in the root leaf (page 0). There is no page splitting,
/// so a full root page rejects further inserts with `PageFull`.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Page cache and file owner
    pool: Mutex<BufferPool>,
}

impl Store {
    /// Index of the root page
    const ROOT_PAGE: u32 = 0;

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Open the data file through the buffer pool
    /// 2. Add an empty root leaf if the file holds no pages
    pub fn open(config: Config) -> Result<Self> {
        let mut pool = BufferPool::open(&config)?;

        if pool.page_count() == 0 {
            pool.add_page(LeafPage::new_root())?;
            tracing::debug!("Created root page in {}", config.path.display());
        }

        tracing::debug!(
            "Opened store at {} ({} pages)",
            config.path.display(),
            pool.page_count()
        );

        Ok(Self {
            config,
            pool: Mutex::new(pool),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Get a value by key
    ///
    /// A missing key is `Ok(None)`, not an error.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut pool = self.pool.lock();
        let root = Self::root_leaf(&mut pool)?;
        Ok(root.find_cell(key))
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert a new key/value pair
    ///
    /// Keys can only be inserted once: an existing key fails with
    /// `DuplicateKey` and the stored value is left as is. A pair that
    /// does not fit in the root page fails with `PageFull`.
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut pool = self.pool.lock();
        let root = Self::root_leaf(&mut pool)?;

        if root.find_cell(key).is_some() {
            return Err(PageKvError::DuplicateKey);
        }

        root.add_cell(key, value)
    }

    /// Flush every loaded page to disk without closing
    pub fn flush(&self) -> Result<()> {
        self.pool.lock().flush_all()
    }

    /// Run a read-only closure against the root leaf
    ///
    /// Used by debugging and dump tools that walk the cells.
    pub fn visit_root<R>(&self, visit: impl FnOnce(&LeafPage) -> R) -> Result<R> {
        let mut pool = self.pool.lock();
        let root = Self::root_leaf(&mut pool)?;
        Ok(visit(root))
    }

    /// Close the store, flushing every loaded page
    pub fn close(self) -> Result<()> {
        tracing::debug!("Closing store at {}", self.config.path.display());
        self.pool.into_inner().close()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the number of pages in the data file
    pub fn page_count(&self) -> u32 {
        self.pool.lock().page_count()
    }

    /// Get the free space left in the root page
    pub fn root_free_space(&self) -> Result<u32> {
        self.visit_root(LeafPage::free_space)
    }

    /// Get the number of cells in the root page
    pub fn root_cell_count(&self) -> Result<u32> {
        self.visit_root(LeafPage::num_cells)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn root_leaf(pool: &mut BufferPool) -> Result<&mut LeafPage> {
        match pool.get_page(Self::ROOT_PAGE)? {
            Page::Leaf(leaf) => Ok(leaf),
            other => Err(PageKvError::UnsupportedPageKind(other.kind())),
        }
    }
}

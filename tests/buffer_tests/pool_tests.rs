//! Tests for BufferPool
//!
//! These tests verify:
//! - Opening/creating data files and sizing the pool from them
//! - Write-through on add_page
//! - Lazy, cached page loads
//! - Flushing loaded pages (and refusing unloaded ones)
//! - Close and drop persisting in-memory changes

use std::fs;
use std::path::{Path, PathBuf};

use pagekv::buffer::BufferPool;
use pagekv::config::{Config, SyncStrategy};
use pagekv::page::{InternalPage, LeafPage, Page, PageHeader, PageKind, PAGE_SIZE};
use pagekv::PageKvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.db");
    (temp_dir, path)
}

fn config_for(path: &Path) -> Config {
    Config::builder().path(path).build()
}

fn leaf_with(entries: &[(&[u8], &[u8])]) -> LeafPage {
    let mut leaf = LeafPage::new_root();
    for (key, value) in entries {
        leaf.add_cell(key, value).unwrap();
    }
    leaf
}

fn leaf_mut(page: &mut Page) -> &mut LeafPage {
    page.as_leaf_mut().unwrap()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_empty_file() {
    let (_temp, path) = setup_temp_file();
    assert!(!path.exists());

    let pool = BufferPool::open(&config_for(&path)).unwrap();

    assert!(path.exists());
    assert_eq!(pool.page_count(), 0);
    assert_eq!(pool.loaded_count(), 0);
    assert_eq!(pool.path(), path.as_path());
}

#[test]
fn test_open_missing_file_without_create() {
    let (_temp, path) = setup_temp_file();
    let config = Config::builder().path(&path).create_if_missing(false).build();

    let result = BufferPool::open(&config);

    assert!(matches!(result, Err(PageKvError::Io(_))));
    assert!(!path.exists());
}

#[test]
fn test_open_rejects_partial_page() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, vec![0u8; PAGE_SIZE + 10]).unwrap();

    let result = BufferPool::open(&config_for(&path));

    assert!(matches!(
        result,
        Err(PageKvError::InvalidFileSize { len }) if len == PAGE_SIZE as u64 + 10
    ));
}

#[test]
fn test_open_rejects_empty_path() {
    let config = Config::builder().path("").build();

    let result = BufferPool::open(&config);

    assert!(matches!(result, Err(PageKvError::Config(_))));
}

#[test]
fn test_open_counts_existing_pages_without_loading() {
    let (_temp, path) = setup_temp_file();
    {
        let mut pool = BufferPool::open(&config_for(&path)).unwrap();
        pool.add_page(LeafPage::new_root()).unwrap();
        pool.add_page(LeafPage::new_root()).unwrap();
        pool.add_page(LeafPage::new_root()).unwrap();
        pool.close().unwrap();
    }

    let pool = BufferPool::open(&config_for(&path)).unwrap();

    assert_eq!(pool.page_count(), 3);
    assert_eq!(pool.loaded_count(), 0);
    assert!(!pool.is_loaded(0));
}

// =============================================================================
// Add Page Tests
// =============================================================================

#[test]
fn test_add_page_writes_through() {
    let (_temp, path) = setup_temp_file();
    let mut pool = BufferPool::open(&config_for(&path)).unwrap();

    let leaf = leaf_with(&[(b"k", b"v")]);
    let expected = leaf.data().to_vec();

    let index = pool.add_page(leaf).unwrap();

    assert_eq!(index, 0);
    assert!(pool.is_loaded(0));
    // Visible on disk before any flush or close
    let on_disk = fs::read(&path).unwrap();
    assert_eq!(on_disk.len(), PAGE_SIZE);
    assert_eq!(on_disk, expected);
}

#[test]
fn test_add_page_assigns_sequential_indexes() {
    let (_temp, path) = setup_temp_file();
    let mut pool = BufferPool::open(&config_for(&path)).unwrap();

    assert_eq!(pool.add_page(LeafPage::new_root()).unwrap(), 0);
    assert_eq!(pool.add_page(InternalPage::new()).unwrap(), 1);
    assert_eq!(pool.add_page(LeafPage::new_root()).unwrap(), 2);

    assert_eq!(pool.page_count(), 3);
    assert_eq!(fs::metadata(&path).unwrap().len(), 3 * PAGE_SIZE as u64);
}

// =============================================================================
// Get Page Tests
// =============================================================================

#[test]
fn test_get_page_out_of_range() {
    let (_temp, path) = setup_temp_file();
    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    pool.add_page(LeafPage::new_root()).unwrap();

    let result = pool.get_page(1);

    assert!(matches!(
        result,
        Err(PageKvError::PageOutOfRange { index: 1, page_count: 1 })
    ));
}

#[test]
fn test_get_page_on_empty_pool() {
    let (_temp, path) = setup_temp_file();
    let mut pool = BufferPool::open(&config_for(&path)).unwrap();

    assert!(matches!(
        pool.get_page(0),
        Err(PageKvError::PageOutOfRange { index: 0, page_count: 0 })
    ));
}

#[test]
fn test_get_page_loads_lazily() {
    let (_temp, path) = setup_temp_file();
    {
        let mut pool = BufferPool::open(&config_for(&path)).unwrap();
        pool.add_page(leaf_with(&[(b"a", b"1")])).unwrap();
        pool.add_page(leaf_with(&[(b"b", b"2")])).unwrap();
        pool.close().unwrap();
    }

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    let page = pool.get_page(1).unwrap();

    assert_eq!(page.kind(), PageKind::Leaf);
    assert_eq!(page.as_leaf().unwrap().find_cell(b"b"), Some(b"2".to_vec()));
    assert!(pool.is_loaded(1));
    assert!(!pool.is_loaded(0));
    assert_eq!(pool.loaded_count(), 1);
}

#[test]
fn test_get_page_returns_cached_instance() {
    let (_temp, path) = setup_temp_file();
    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    pool.add_page(LeafPage::new_root()).unwrap();

    leaf_mut(pool.get_page(0).unwrap()).add_cell(b"cached", b"yes").unwrap();

    // Not flushed yet, so a reload from disk would not see the cell
    let page = pool.get_page(0).unwrap();
    assert_eq!(
        page.as_leaf().unwrap().find_cell(b"cached"),
        Some(b"yes".to_vec())
    );
}

#[test]
fn test_get_page_decodes_internal_page() {
    let (_temp, path) = setup_temp_file();
    {
        let mut pool = BufferPool::open(&config_for(&path)).unwrap();
        let mut internal = InternalPage::new();
        internal.set_right_child_index(4);
        pool.add_page(internal).unwrap();
        pool.close().unwrap();
    }

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    let page = pool.get_page(0).unwrap();

    assert_eq!(page.kind(), PageKind::Internal);
    assert_eq!(page.as_internal().unwrap().right_child_index(), 4);
}

#[test]
fn test_get_page_unknown_kind() {
    let (_temp, path) = setup_temp_file();
    let mut bytes = vec![0u8; PAGE_SIZE];
    bytes[0] = 9;
    fs::write(&path, bytes).unwrap();

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();

    assert!(matches!(pool.get_page(0), Err(PageKvError::UnknownPageKind(9))));
    assert!(!pool.is_loaded(0));
}

#[test]
fn test_get_page_unallocated_kind() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, vec![0u8; PAGE_SIZE]).unwrap();

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();

    assert!(matches!(
        pool.get_page(0),
        Err(PageKvError::UnsupportedPageKind(PageKind::Unallocated))
    ));
}

// =============================================================================
// Flush / Close Tests
// =============================================================================

#[test]
fn test_flush_unloaded_page_fails() {
    let (_temp, path) = setup_temp_file();
    {
        let mut pool = BufferPool::open(&config_for(&path)).unwrap();
        pool.add_page(LeafPage::new_root()).unwrap();
        pool.close().unwrap();
    }

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();

    assert!(matches!(pool.flush_page(0), Err(PageKvError::PageNotLoaded(0))));
    assert!(matches!(pool.flush_page(5), Err(PageKvError::PageNotLoaded(5))));
}

#[test]
fn test_flush_page_persists_changes() {
    let (_temp, path) = setup_temp_file();
    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    pool.add_page(LeafPage::new_root()).unwrap();
    pool.add_page(LeafPage::new_root()).unwrap();

    leaf_mut(pool.get_page(1).unwrap()).add_cell(b"k", b"v").unwrap();
    pool.flush_page(1).unwrap();

    let on_disk = fs::read(&path).unwrap();
    let page = &on_disk[PAGE_SIZE..2 * PAGE_SIZE];
    assert_eq!(&page[8..12], &[1, 0, 0, 0]);
    assert_eq!(&page[12..16], &[1, 0, 0, 0]);
    assert_eq!(page[16], b'k');
}

#[test]
fn test_close_flushes_loaded_pages() {
    let (_temp, path) = setup_temp_file();
    {
        let mut pool = BufferPool::open(&config_for(&path)).unwrap();
        pool.add_page(LeafPage::new_root()).unwrap();
        leaf_mut(pool.get_page(0).unwrap()).add_cell(b"durable", b"1").unwrap();
        pool.close().unwrap();
    }

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    let leaf = pool.get_page(0).unwrap().as_leaf().unwrap();

    assert_eq!(leaf.find_cell(b"durable"), Some(b"1".to_vec()));
}

#[test]
fn test_drop_without_close_flushes() {
    let (_temp, path) = setup_temp_file();
    {
        let mut pool = BufferPool::open(&config_for(&path)).unwrap();
        pool.add_page(LeafPage::new_root()).unwrap();
        leaf_mut(pool.get_page(0).unwrap()).add_cell(b"dropped", b"1").unwrap();
    }

    let mut pool = BufferPool::open(&config_for(&path)).unwrap();
    let leaf = pool.get_page(0).unwrap().as_leaf().unwrap();

    assert_eq!(leaf.find_cell(b"dropped"), Some(b"1".to_vec()));
}

#[test]
fn test_every_write_sync_strategy() {
    let (_temp, path) = setup_temp_file();
    let config = Config::builder()
        .path(&path)
        .sync_strategy(SyncStrategy::EveryWrite)
        .build();
    let mut pool = BufferPool::open(&config).unwrap();

    pool.add_page(leaf_with(&[(b"x", b"y")])).unwrap();
    pool.flush_all().unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), PAGE_SIZE as u64);
}

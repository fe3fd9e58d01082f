//! # pagekv
//!
//! An embedded, single-file, page-oriented key-value store with:
//! - Fixed-size 4 KB pages with a bit-exact binary layout
//! - Sorted leaf cells maintained by in-place byte shifting
//! - A buffer pool that loads pages lazily and writes them back in place
//! - A small get/set facade over the root page
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                               │
//! │                (open / get / set / close)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ page 0
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Buffer Pool                            │
//! │          (page cache, read-through / write-through)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Page     │          │  Data File  │
//!   │ (leaf/int.) │          │ (N × 4 KB)  │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pagekv::{Config, Store};
//!
//! let store = Store::open(Config::builder().path("/tmp/example.db").build())?;
//! store.set(b"hello", b"world")?;
//! assert_eq!(store.get(b"hello")?, Some(b"world".to_vec()));
//! store.close()?;
//! # Ok::<(), pagekv::PageKvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod page;
pub mod buffer;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PageKvError, Result};
pub use config::{Config, SyncStrategy};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Buffer Pool Module
//!
//! Single authority over the data file's bytes.
//!
//! ## Responsibilities
//! - Map page index → in-memory page
//! - Load pages lazily on first access (read-through)
//! - Write new pages through to disk as soon as they are added
//! - Flush loaded pages back to their file offsets
//!
//! ## File Layout
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────┐
//! │ Page 0 (4KB) │ Page 1 (4KB) │ Page 2 (4KB) │ ... │
//! └──────────────┴──────────────┴──────────────┴─────┘
//!   offset = index * PAGE_SIZE
//! ```
//!
//! Pages are never evicted: every loaded page stays cached until the pool
//! is closed.

mod pool;

pub use pool::BufferPool;

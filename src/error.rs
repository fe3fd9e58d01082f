//! Error types for pagekv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::page::PageKind;

/// Result type alias using PageKvError
pub type Result<T> = std::result::Result<T, PageKvError>;

/// Unified error type for pagekv operations
#[derive(Debug, Error)]
pub enum PageKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format / Corruption Errors
    // -------------------------------------------------------------------------
    #[error("Page corruption detected: {0}")]
    Corruption(String),

    #[error("Unknown page kind tag: {0}")]
    UnknownPageKind(u8),

    #[error("Invalid file size: {len} bytes is not a multiple of the page size")]
    InvalidFileSize { len: u64 },

    #[error("Unsupported page kind: {0:?}")]
    UnsupportedPageKind(PageKind),

    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("Not enough space left in page: required {required} bytes, free {free} bytes")]
    PageFull { required: u32, free: u32 },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key already exists; updating existing keys is not supported")]
    DuplicateKey,

    // -------------------------------------------------------------------------
    // Buffer Pool Errors
    // -------------------------------------------------------------------------
    #[error("Page index {index} out of range (page count {page_count})")]
    PageOutOfRange { index: u32, page_count: u32 },

    #[error("Tried to flush unloaded page {0}")]
    PageNotLoaded(u32),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

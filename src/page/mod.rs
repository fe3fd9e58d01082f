//! Page Module
//!
//! Fixed-size pages and their on-disk binary layouts.
//!
//! ## Responsibilities
//! - Decode the page kind tag and dispatch to the matching page type
//! - Shared header prefix (kind, root flag, parent index)
//! - Leaf pages: sorted key/value cells with free-space tracking
//! - Internal pages: reserved layout for separator keys and child pointers
//!
//! ## Page Header (all kinds)
//! ```text
//! ┌────────┬──────┬──────────────────────────────────────┐
//! │ Offset │ Size │ Field                                │
//! ├────────┼──────┼──────────────────────────────────────┤
//! │      0 │    1 │ kind (0=unallocated 1=header 2=leaf  │
//! │        │      │       3=internal)                    │
//! │      1 │    1 │ is root (0/1)                        │
//! │      2 │    2 │ reserved                             │
//! │      4 │    4 │ parent index (i32, -1 = none)        │
//! │      8 │    4 │ cell count                           │
//! │     12 │    4 │ right child index (internal only)    │
//! └────────┴──────┴──────────────────────────────────────┘
//! ```
//!
//! ## Leaf Cell
//! ```text
//! [KeyLen: u32][Key][ValLen: u32][Value]
//! ```
//!
//! ## Internal Cell
//! ```text
//! [ChildIndex: u32][KeyLen: u32][Key]
//! ```

pub mod header;
mod internal;
mod leaf;

pub use header::{PageHeader, NO_PARENT};
pub use internal::{internal_cell_size, InternalPage, INTERNAL_CELL_PREFIX_SIZE, INTERNAL_HEADER_SIZE};
pub use leaf::{LeafCell, LeafCells, LeafPage, CELL_PREFIX_SIZE, LEAF_HEADER_SIZE};

use crate::error::{PageKvError, Result};

/// Size of every page, in memory and on disk
pub const PAGE_SIZE: usize = 4096;

/// Kind tag stored in the first byte of every page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PageKind {
    Unallocated = 0,
    Header = 1,
    Leaf = 2,
    Internal = 3,
}

impl TryFrom<u8> for PageKind {
    type Error = PageKvError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(PageKind::Unallocated),
            1 => Ok(PageKind::Header),
            2 => Ok(PageKind::Leaf),
            3 => Ok(PageKind::Internal),
            other => Err(PageKvError::UnknownPageKind(other)),
        }
    }
}

/// An in-memory page, one variant per kind that has a page type
#[derive(Debug)]
pub enum Page {
    Leaf(LeafPage),
    Internal(InternalPage),
}

impl Page {
    /// Decode a page read from disk, choosing the page type by its kind tag.
    ///
    /// Unallocated and header pages have no in-memory representation.
    pub fn decode(data: Box<[u8]>) -> Result<Self> {
        header::check_page_len(&data)?;
        match header::read_kind(&data)? {
            PageKind::Leaf => Ok(Page::Leaf(LeafPage::from_bytes(data)?)),
            PageKind::Internal => Ok(Page::Internal(InternalPage::from_bytes(data)?)),
            kind @ (PageKind::Unallocated | PageKind::Header) => {
                Err(PageKvError::UnsupportedPageKind(kind))
            }
        }
    }

    pub fn kind(&self) -> PageKind {
        match self {
            Page::Leaf(_) => PageKind::Leaf,
            Page::Internal(_) => PageKind::Internal,
        }
    }

    /// Raw page bytes, exactly `PAGE_SIZE` long
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Page::Leaf(leaf) => leaf.data(),
            Page::Internal(internal) => internal.data(),
        }
    }

    pub fn is_root(&self) -> bool {
        match self {
            Page::Leaf(leaf) => leaf.is_root(),
            Page::Internal(internal) => internal.is_root(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafPage> {
        match self {
            Page::Leaf(leaf) => Some(leaf),
            Page::Internal(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafPage> {
        match self {
            Page::Leaf(leaf) => Some(leaf),
            Page::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalPage> {
        match self {
            Page::Internal(internal) => Some(internal),
            Page::Leaf(_) => None,
        }
    }
}

impl From<LeafPage> for Page {
    fn from(leaf: LeafPage) -> Self {
        Page::Leaf(leaf)
    }
}

impl From<InternalPage> for Page {
    fn from(internal: InternalPage) -> Self {
        Page::Internal(internal)
    }
}

//! Internal pages
//!
//! Reserved layout for separator keys and child pointers. `num_cells`
//! separator keys partition `num_cells + 1` children, the last one being
//! `right_child_index`. Nothing here walks or mutates the cells.

use std::fmt;

use crate::error::{PageKvError, Result};

use super::header::{self, PageBytesMut, PageHeader, KIND_OFFSET, NO_PARENT, NUM_CELLS_OFFSET};
use super::{PageKind, PAGE_SIZE};

/// Offset of the right-most child pointer
const RIGHT_CHILD_OFFSET: usize = 12;

/// Header size: common prefix (8) + cell count (4) + right child (4) = 16 bytes
pub const INTERNAL_HEADER_SIZE: usize = 16;

/// Per-cell overhead: child index (4) + key length (4)
pub const INTERNAL_CELL_PREFIX_SIZE: usize = 8;

/// Bytes an internal cell with a key of `key_len` bytes occupies
pub const fn internal_cell_size(key_len: usize) -> usize {
    INTERNAL_CELL_PREFIX_SIZE + key_len
}

/// An internal page owning its page buffer
pub struct InternalPage {
    data: Box<[u8]>,
}

impl InternalPage {
    /// Create an empty internal root page
    pub fn new() -> Self {
        let mut data = vec![0u8; PAGE_SIZE].into_boxed_slice();
        data[KIND_OFFSET] = PageKind::Internal as u8;

        let mut page = Self { data };
        page.set_is_root(true);
        page.set_parent_index(NO_PARENT);
        header::write_u32(&mut page.data, NUM_CELLS_OFFSET, 0);
        page
    }

    pub fn from_bytes(data: Box<[u8]>) -> Result<Self> {
        header::check_page_len(&data)?;

        let kind = header::read_kind(&data)?;
        if kind != PageKind::Internal {
            return Err(PageKvError::Corruption(format!(
                "expected an internal page, found {:?}",
                kind
            )));
        }

        Ok(Self { data })
    }

    /// Number of separator keys
    pub fn num_cells(&self) -> u32 {
        header::read_u32(&self.data, NUM_CELLS_OFFSET)
    }

    /// Child holding every key greater than all separators
    pub fn right_child_index(&self) -> u32 {
        header::read_u32(&self.data, RIGHT_CHILD_OFFSET)
    }

    pub fn set_right_child_index(&mut self, index: u32) {
        header::write_u32(&mut self.data, RIGHT_CHILD_OFFSET, index);
    }
}

impl Default for InternalPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageHeader for InternalPage {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PageBytesMut for InternalPage {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Debug for InternalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalPage")
            .field("is_root", &self.is_root())
            .field("parent_index", &self.parent_index())
            .field("num_cells", &self.num_cells())
            .field("right_child_index", &self.right_child_index())
            .finish()
    }
}

//! Leaf pages
//!
//! Sorted key/value cells packed contiguously after the header.
//!
//! ```text
//! ┌──────────────┬────────┬────────┬─────┬────────┬──────────────────┐
//! │ Header (12)  │ Cell 0 │ Cell 1 │ ... │ Cell N │    Free space    │
//! └──────────────┴────────┴────────┴─────┴────────┴──────────────────┘
//! ```
//!
//! Cells are kept in ascending key order with no gaps, so inserting in
//! the middle shifts every following cell forward.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};

use super::header::{self, PageBytesMut, PageHeader, KIND_OFFSET, NO_PARENT, NUM_CELLS_OFFSET};
use super::{PageKind, PAGE_SIZE};

/// Header size: common prefix (8) + cell count (4) = 12 bytes
pub const LEAF_HEADER_SIZE: usize = 12;

/// Per-cell overhead: key length (4) + value length (4)
pub const CELL_PREFIX_SIZE: usize = 8;

/// A leaf page owning its page buffer
pub struct LeafPage {
    data: Box<[u8]>,
    /// Bytes between the end of the last cell and the end of the page
    free_space: u32,
}

impl LeafPage {
    /// Create an empty root leaf: no parent, zero cells
    pub fn new_root() -> Self {
        let mut data = vec![0u8; PAGE_SIZE].into_boxed_slice();
        data[KIND_OFFSET] = PageKind::Leaf as u8;

        let mut page = Self {
            data,
            free_space: (PAGE_SIZE - LEAF_HEADER_SIZE) as u32,
        };
        page.set_is_root(true);
        page.set_parent_index(NO_PARENT);
        page.set_num_cells(0);
        page
    }

    /// Wrap a page buffer read from disk.
    ///
    /// Walks every cell once to check it lies inside the page and to
    /// compute the free space.
    pub fn from_bytes(data: Box<[u8]>) -> Result<Self> {
        header::check_page_len(&data)?;

        let kind = header::read_kind(&data)?;
        if kind != PageKind::Leaf {
            return Err(PageKvError::Corruption(format!(
                "expected a leaf page, found {:?}",
                kind
            )));
        }

        let end = Self::scan_cells_end(&data)?;

        Ok(Self {
            data,
            free_space: (PAGE_SIZE - end) as u32,
        })
    }

    /// Offset just past the last cell, validating every length field on the way
    fn scan_cells_end(data: &[u8]) -> Result<usize> {
        let num_cells = header::read_u32(data, NUM_CELLS_OFFSET);
        let mut offset = LEAF_HEADER_SIZE;

        for cell in 0..num_cells {
            for _field in 0..2 {
                let len = data
                    .get(offset..offset + 4)
                    .map(|mut field| field.get_u32_le() as usize)
                    .ok_or_else(|| truncated_cell(cell, num_cells))?;

                offset = (offset + 4)
                    .checked_add(len)
                    .filter(|&end| end <= PAGE_SIZE)
                    .ok_or_else(|| truncated_cell(cell, num_cells))?;
            }
        }

        Ok(offset)
    }

    /// Number of cells stored in this page
    pub fn num_cells(&self) -> u32 {
        header::read_u32(&self.data, NUM_CELLS_OFFSET)
    }

    fn set_num_cells(&mut self, num_cells: u32) {
        header::write_u32(&mut self.data, NUM_CELLS_OFFSET, num_cells);
    }

    /// Bytes available for new cells
    pub fn free_space(&self) -> u32 {
        self.free_space
    }

    /// Bytes occupied by the header and all cells
    pub fn used_space(&self) -> u32 {
        PAGE_SIZE as u32 - self.free_space
    }

    /// Offset where the free space begins
    fn cells_end(&self) -> usize {
        PAGE_SIZE - self.free_space as usize
    }

    /// Iterate over cells in stored (ascending key) order.
    ///
    /// Each call starts a fresh scan from the header.
    pub fn iter(&self) -> LeafCells<'_> {
        LeafCells {
            data: &self.data,
            offset: LEAF_HEADER_SIZE,
            remaining: self.num_cells(),
        }
    }

    /// Look up a key, returning a copy of its value
    pub fn find_cell(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.iter()
            .find(|cell| cell.key == key)
            .map(|cell| cell.value.to_vec())
    }

    /// Insert a cell at its sorted position.
    ///
    /// Fails with `PageFull`, leaving the page untouched, when the cell
    /// does not fit. The caller guarantees the key is not already present.
    pub fn add_cell(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let free = self.free_space;
        let required = u32::try_from(key.len() + value.len() + CELL_PREFIX_SIZE)
            .unwrap_or(u32::MAX);
        if required > free {
            return Err(PageKvError::PageFull { required, free });
        }

        // First cell with a greater key, or append after the last one
        let end = self.cells_end();
        let insert_at = self
            .iter()
            .find(|cell| cell.key > key)
            .map(|cell| cell.offset as usize)
            .unwrap_or(end);

        let cell_len = required as usize;
        self.data.copy_within(insert_at..end, insert_at + cell_len);

        let mut cell = &mut self.data[insert_at..insert_at + cell_len];
        cell.put_u32_le(key.len() as u32);
        cell.put_slice(key);
        cell.put_u32_le(value.len() as u32);
        cell.put_slice(value);

        let num_cells = self.num_cells();
        self.set_num_cells(num_cells + 1);
        self.free_space -= required;

        tracing::trace!(
            "Inserted cell at offset {} ({} bytes, {} free)",
            insert_at,
            required,
            self.free_space
        );

        Ok(())
    }
}

impl PageHeader for LeafPage {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PageBytesMut for LeafPage {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Debug for LeafPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafPage")
            .field("is_root", &self.is_root())
            .field("parent_index", &self.parent_index())
            .field("num_cells", &self.num_cells())
            .field("free_space", &self.free_space)
            .finish()
    }
}

fn truncated_cell(cell: u32, num_cells: u32) -> PageKvError {
    PageKvError::Corruption(format!(
        "leaf cell {} of {} extends past the end of the page",
        cell, num_cells
    ))
}

/// A cell borrowed from a leaf page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafCell<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
    /// Byte offset of the cell within the page
    pub offset: u32,
}

impl LeafCell<'_> {
    /// Bytes the cell occupies, length prefixes included
    pub fn size(&self) -> usize {
        CELL_PREFIX_SIZE + self.key.len() + self.value.len()
    }
}

/// Lazy iterator over the cells of a leaf page
pub struct LeafCells<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u32,
}

impl<'a> Iterator for LeafCells<'a> {
    type Item = LeafCell<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let data = self.data;
        let start = self.offset;

        let key_start = start + 4;
        let key_len = header::read_u32(data, start) as usize;
        let key = &data[key_start..key_start + key_len];

        let value_start = key_start + key_len + 4;
        let value_len = header::read_u32(data, key_start + key_len) as usize;
        let value = &data[value_start..value_start + value_len];

        self.offset = value_start + value_len;
        self.remaining -= 1;

        Some(LeafCell {
            key,
            value,
            offset: start as u32,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LeafCells<'_> {}

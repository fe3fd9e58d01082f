//! Page header codec
//!
//! Fixed-offset access to the header prefix every page shares.
//! All multi-byte fields are little-endian.

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};

use super::{PageKind, PAGE_SIZE};

/// Offset of the one-byte kind tag
pub const KIND_OFFSET: usize = 0;

/// Offset of the one-byte root flag
pub const IS_ROOT_OFFSET: usize = 1;

/// Offset of the signed parent page index (bytes 2..4 are reserved)
pub const PARENT_INDEX_OFFSET: usize = 4;

/// Offset of the cell count shared by leaf and internal pages
pub const NUM_CELLS_OFFSET: usize = 8;

/// Parent index stored by a page that has no parent
pub const NO_PARENT: i32 = -1;

/// Decode the kind tag from the first byte of a page buffer.
///
/// Unknown tags are reported as corruption, never defaulted.
pub fn read_kind(data: &[u8]) -> Result<PageKind> {
    let tag = data
        .get(KIND_OFFSET)
        .copied()
        .ok_or_else(|| PageKvError::Corruption("empty page buffer".to_string()))?;
    PageKind::try_from(tag)
}

/// Reject buffers that are not exactly one page long
pub(crate) fn check_page_len(data: &[u8]) -> Result<()> {
    if data.len() != PAGE_SIZE {
        return Err(PageKvError::Corruption(format!(
            "page buffer is {} bytes, expected {}",
            data.len(),
            PAGE_SIZE
        )));
    }
    Ok(())
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> u32 {
    (&data[offset..offset + 4]).get_u32_le()
}

pub(crate) fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    (&mut data[offset..offset + 4]).put_u32_le(value);
}

mod sealed {
    /// Raw mutable access to a page buffer, kept inside the crate so cell
    /// bytes only change through the page's own operations.
    pub trait PageBytesMut {
        fn data_mut(&mut self) -> &mut [u8];
    }
}

pub(crate) use sealed::PageBytesMut;

/// Header fields common to every page kind.
///
/// Implementors expose their page-sized buffer read-only; the only public
/// header mutators are `set_is_root` and `set_parent_index`. To rewrite raw
/// bytes, copy them out and rebuild the page with its validating constructor.
///
/// ```compile_fail
/// use pagekv::page::{LeafPage, PageHeader};
///
/// let mut leaf = LeafPage::new_root();
/// leaf.data_mut()[8] = 0xFF;
/// ```
pub trait PageHeader: sealed::PageBytesMut {
    /// The full page buffer
    fn data(&self) -> &[u8];

    fn is_root(&self) -> bool {
        self.data()[IS_ROOT_OFFSET] == 1
    }

    fn set_is_root(&mut self, is_root: bool) {
        self.data_mut()[IS_ROOT_OFFSET] = u8::from(is_root);
    }

    /// Parent page index, `NO_PARENT` (-1) for a root
    fn parent_index(&self) -> i32 {
        (&self.data()[PARENT_INDEX_OFFSET..PARENT_INDEX_OFFSET + 4]).get_i32_le()
    }

    fn set_parent_index(&mut self, parent_index: i32) {
        (&mut self.data_mut()[PARENT_INDEX_OFFSET..PARENT_INDEX_OFFSET + 4])
            .put_i32_le(parent_index);
    }
}

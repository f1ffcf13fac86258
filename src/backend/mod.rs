use crate::types::{PageId, PageInfo, Result};

/// Contract every page store backend implements.
///
/// Each call is atomic on its own; sequences are not. A `get` racing a
/// `delete` on the same page may see `PageNotFound` even if it was issued
/// first. Callers needing stronger ordering serialize above the store.
pub trait PageStore: Send + Sync {
    /// Store a copy of `page` under `page_id`, replacing any existing page.
    ///
    /// Fails with `ResourceExhausted` when the backend cannot hold the page.
    fn put(&self, page_id: &PageId, page: &[u8]) -> Result<()>;

    /// Copy part of a stored page into `buf` starting at `buf_offset`.
    ///
    /// Copies `min(bytes_to_read, page_len - page_offset, buf.len() - buf_offset)`
    /// bytes and returns that count. Fails with `InvalidArgument` when
    /// `buf_offset > buf.len()` or `page_offset > page_len`, before writing
    /// anything, and with `PageNotFound` when no page is stored.
    fn get(
        &self,
        page_id: &PageId,
        page_offset: usize,
        bytes_to_read: usize,
        buf: &mut [u8],
        buf_offset: usize,
    ) -> Result<usize>;

    /// Remove a page. Fails with `PageNotFound` if it is absent, including
    /// when it was already deleted.
    fn delete(&self, page_id: &PageId) -> Result<()>;

    /// Drop every page and invalidate the store.
    ///
    /// Must not run concurrently with other operations on the same store;
    /// nothing enforces this.
    fn close(&self);

    /// Describe the resident pages. Lazy; call again to start over.
    fn pages(&self) -> Result<Box<dyn Iterator<Item = PageInfo> + '_>>;

    /// Usable byte budget, regardless of how much is stored
    fn capacity(&self) -> u64;
}

pub mod memory;

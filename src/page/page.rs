use crate::types::{PageId, PageInfo, PageStoreError, Result};

/// A resident page: an independently owned copy of the caller's bytes
pub(crate) struct Page {
    /// Page identifier, kept so listings can report it
    pub id: PageId,

    /// The page contents
    data: Box<[u8]>,
}

impl Page {
    /// Copy `bytes` into a freshly allocated page.
    ///
    /// The allocation is fallible; when the allocator refuses it the copy is
    /// abandoned and `ResourceExhausted` is returned with `capacity` attached.
    pub fn copy_from(id: PageId, bytes: &[u8], capacity: u64) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(bytes.len())
            .map_err(|_| PageStoreError::ResourceExhausted {
                requested: bytes.len() as u64,
                capacity,
            })?;
        data.extend_from_slice(bytes);

        Ok(Self {
            id,
            data: data.into_boxed_slice(),
        })
    }

    /// Stored length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Copy up to `bytes_to_read` bytes starting at `page_offset` into
    /// `buf[buf_offset..]`, returning the number copied.
    ///
    /// Both offsets are checked before anything is written. The count is
    /// bounded by the request, the bytes left in the page, and the room left
    /// in the buffer.
    pub fn read_into(
        &self,
        page_offset: usize,
        bytes_to_read: usize,
        buf: &mut [u8],
        buf_offset: usize,
    ) -> Result<usize> {
        if buf_offset > buf.len() {
            return Err(PageStoreError::invalid(format!(
                "buffer offset {} should be less or equal than buffer length {}",
                buf_offset,
                buf.len()
            )));
        }
        if page_offset > self.data.len() {
            return Err(PageStoreError::invalid(format!(
                "page offset {} exceeded page size {}",
                page_offset,
                self.data.len()
            )));
        }

        let to_copy = bytes_to_read
            .min(self.data.len() - page_offset)
            .min(buf.len() - buf_offset);

        buf[buf_offset..buf_offset + to_copy]
            .copy_from_slice(&self.data[page_offset..page_offset + to_copy]);

        Ok(to_copy)
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            page_id: self.id.clone(),
            page_size: self.data.len() as u64,
        }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .finish()
    }
}

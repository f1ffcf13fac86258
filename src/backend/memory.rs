use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::backend::PageStore;
use crate::key::KeyEncoder;
use crate::options::{AdmissionPolicy, PageStoreOptions};
use crate::page::Page;
use crate::profiling::Profiler;
use crate::types::{PageId, PageInfo, PageStoreError, Result};

/// Page store holding every page in process memory.
///
/// Pages live in a sharded concurrent map owned by this instance, keyed by the
/// bucketed storage key. `get` copies straight into the caller's buffer and
/// never allocates.
pub struct MemoryPageStore {
    options: PageStoreOptions,

    encoder: KeyEncoder,

    /// `cache_size / (1 + overhead_ratio)`, fixed at construction
    capacity: u64,

    pages: DashMap<String, Page>,

    /// Bytes reserved by resident pages (may briefly overcount during a put)
    used_bytes: AtomicU64,

    closed: AtomicBool,

    profiler: Profiler,
}

impl MemoryPageStore {
    /// Create a store from validated options. `root_dir` is ignored.
    pub fn new(options: PageStoreOptions) -> Result<Self> {
        options.validate()?;

        let capacity = options.usable_capacity();
        info!(
            "Creating in-memory page store: capacity {} bytes, {} file buckets, admission {:?}",
            capacity, options.file_buckets, options.admission
        );

        Ok(Self {
            encoder: KeyEncoder::new(options.file_buckets),
            capacity,
            pages: DashMap::new(),
            used_bytes: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            profiler: Profiler::new(),
            options,
        })
    }

    /// Create a store with the in-memory defaults
    pub fn with_defaults() -> Result<Self> {
        Self::new(PageStoreOptions::memory())
    }

    /// Storage key a page is held under
    pub fn key_of(&self, page_id: &PageId) -> String {
        self.encoder.key(page_id)
    }

    pub fn options(&self) -> &PageStoreOptions {
        &self.options
    }

    /// Number of resident pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Bytes held by resident pages
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Get access to the profiler for metrics
    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Reserve `len` bytes against capacity.
    ///
    /// `replacing` is the size of the page about to be overwritten; it is freed
    /// once the insert lands, so it counts as available here.
    fn reserve(&self, len: u64, replacing: u64) -> Result<()> {
        let capacity = self.capacity;
        let admitted = match self.options.admission {
            AdmissionPolicy::Advisory => {
                self.used_bytes.fetch_add(len, Ordering::AcqRel);
                true
            }
            AdmissionPolicy::Enforce => self
                .used_bytes
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                    let after = used.saturating_sub(replacing).checked_add(len)?;
                    (after <= capacity).then(|| used + len)
                })
                .is_ok(),
        };

        if admitted {
            Ok(())
        } else {
            Err(PageStoreError::ResourceExhausted {
                requested: len,
                capacity,
            })
        }
    }

    /// Reserve room for `page` and copy it, releasing the reservation if the
    /// copy cannot be allocated. Runs under the entry's shard lock.
    fn admit(&self, page_id: &PageId, page: &[u8], replacing: u64) -> Result<Page> {
        let len = page.len() as u64;
        self.reserve(len, replacing).map_err(|e| self.reject(e))?;

        Page::copy_from(page_id.clone(), page, self.capacity).map_err(|e| {
            self.used_bytes.fetch_sub(len, Ordering::AcqRel);
            self.reject(e)
        })
    }

    fn reject(&self, err: PageStoreError) -> PageStoreError {
        self.profiler.record_rejected_put();
        warn!("Memory page store is full, configured with {} bytes: {}", self.capacity, err);
        err
    }
}

impl PageStore for MemoryPageStore {
    fn put(&self, page_id: &PageId, page: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(PageStoreError::Closed);
        }
        if page.len() as u64 > self.options.page_size {
            return Err(PageStoreError::invalid(format!(
                "page {} is {} bytes, larger than page size {}",
                page_id,
                page.len(),
                self.options.page_size
            )));
        }

        let key = self.encoder.key(page_id);
        let len = page.len() as u64;

        // The entry guard holds the shard write lock, so the replaced length
        // read here is the one the insert removes.
        let replaced = match self.pages.entry(key) {
            Entry::Occupied(mut occupied) => {
                let old = occupied.get().len();
                let stored = self.admit(page_id, page, old as u64)?;
                self.profiler.record_put(page.len(), Some(old));
                self.used_bytes.fetch_sub(old as u64, Ordering::AcqRel);
                occupied.insert(stored);
                Some(old)
            }
            Entry::Vacant(vacant) => {
                let stored = self.admit(page_id, page, 0)?;
                // Counted before the page becomes visible to `delete`
                self.profiler.record_put(page.len(), None);
                vacant.insert(stored);
                None
            }
        };

        debug!(
            "Stored page {} ({} bytes, replaced: {:?})",
            page_id,
            len,
            replaced
        );
        Ok(())
    }

    fn get(
        &self,
        page_id: &PageId,
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

        let key = self.encoder.key(page_id);
        let Some(page) = self.pages.get(&key) else {
            self.profiler.record_miss();
            return Err(PageStoreError::PageNotFound { key });
        };

        let read = page.read_into(page_offset, bytes_to_read, buf, buf_offset)?;
        self.profiler.record_get(read);
        Ok(read)
    }

    fn delete(&self, page_id: &PageId) -> Result<()> {
        let key = self.encoder.key(page_id);
        match self.pages.remove(&key) {
            Some((_, page)) => {
                self.used_bytes
                    .fetch_sub(page.len() as u64, Ordering::AcqRel);
                self.profiler.record_delete(page.len());
                debug!(
                    "Removed cached page {}, {} pages resident",
                    page_id,
                    self.pages.len()
                );
                Ok(())
            }
            None => {
                self.profiler.record_miss();
                Err(PageStoreError::PageNotFound { key })
            }
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let dropped = self.pages.len();
        self.pages.clear();
        self.pages.shrink_to_fit();
        self.used_bytes.store(0, Ordering::Release);
        self.profiler.record_clear();
        info!("Closed in-memory page store, dropped {} pages", dropped);
    }

    fn pages(&self) -> Result<Box<dyn Iterator<Item = PageInfo> + '_>> {
        // Snapshot, so no shard guard outlives this call and the caller may
        // change the store while walking the listing.
        let listed: Vec<PageInfo> = self
            .pages
            .iter()
            .map(|entry| entry.value().info())
            .collect();
        Ok(Box::new(listed.into_iter()))
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl std::fmt::Debug for MemoryPageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPageStore")
            .field("capacity", &self.capacity)
            .field("file_buckets", &self.encoder.file_buckets())
            .field("page_count", &self.pages.len())
            .field("used_bytes", &self.used_bytes.load(Ordering::Acquire))
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

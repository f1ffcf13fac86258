use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::{PageStoreError, Result};

/// Overhead assumed for the in-memory backend: with 1.2GB configured, no more
/// than 1GB of page data is expected to fit.
pub const MEMORY_OVERHEAD_RATIO: f64 = 0.2;

/// Bucket count for the in-memory backend. Keep `files / buckets` under ~100k.
pub const MEMORY_FILE_BUCKETS: u32 = 2000;

/// Backend kind. Consumed by whoever builds the store; nothing here dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStoreType {
    /// Pages as files under `root_dir`
    Local,
    /// Pages in an embedded key-value database under `root_dir`
    Rocks,
    /// Pages held in process memory
    Memory,
}

impl fmt::Display for PageStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageStoreType::Local => "LOCAL",
            PageStoreType::Rocks => "ROCKS",
            PageStoreType::Memory => "MEM",
        };
        f.write_str(name)
    }
}

/// Whether a store checks its usable capacity on `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdmissionPolicy {
    /// Capacity is informational. Admission is left to the cache manager and
    /// only a failed allocation rejects a page.
    #[default]
    Advisory,
    /// `put` fails with `ResourceExhausted` when resident bytes would exceed capacity.
    Enforce,
}

/// Configuration for a page store
#[derive(Debug, Clone, PartialEq)]
pub struct PageStoreOptions {
    /// Root location of the store (unused by the in-memory backend)
    pub root_dir: PathBuf,

    /// Maximum size of a page in bytes (default: 1MB)
    pub page_size: u64,

    /// Nominal byte budget of the store (default: 512MB)
    pub cache_size: u64,

    /// Fraction of `cache_size` reserved for bookkeeping (default: 0.1)
    pub overhead_ratio: f64,

    /// Number of buckets file ids are spread over (default: 1000)
    pub file_buckets: u32,

    /// Per-operation timeout for backends that block on I/O
    pub timeout: Option<Duration>,

    /// Worker threads backing timed operations (default: 32)
    pub timeout_threads: usize,

    /// Backend kind
    pub store_type: PageStoreType,

    /// Capacity check on `put`
    pub admission: AdmissionPolicy,
}

impl Default for PageStoreOptions {
    fn default() -> Self {
        Self {
            root_dir: std::env::temp_dir().join("page_store"),
            page_size: 1024 * 1024,       // 1MB
            cache_size: 512 * 1024 * 1024, // 512MB
            overhead_ratio: 0.1,
            file_buckets: 1000,
            timeout: None,
            timeout_threads: 32,
            store_type: PageStoreType::Local,
            admission: AdmissionPolicy::Advisory,
        }
    }
}

impl PageStoreOptions {
    /// Defaults for the in-memory backend
    pub fn memory() -> Self {
        Self {
            overhead_ratio: MEMORY_OVERHEAD_RATIO,
            file_buckets: MEMORY_FILE_BUCKETS,
            store_type: PageStoreType::Memory,
            ..Default::default()
        }
    }

    /// Start a builder from the in-memory defaults
    pub fn builder() -> PageStoreOptionsBuilder {
        PageStoreOptionsBuilder {
            options: Self::memory(),
        }
    }

    /// Usable bytes once the overhead ratio is taken off `cache_size`
    pub fn usable_capacity(&self) -> u64 {
        (self.cache_size as f64 / (1.0 + self.overhead_ratio)) as u64
    }

    /// Check every field, returning `InvalidArgument` on the first bad one
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PageStoreError::invalid("page size must be positive"));
        }
        if self.cache_size == 0 {
            return Err(PageStoreError::invalid("cache size must be positive"));
        }
        if !self.overhead_ratio.is_finite() || self.overhead_ratio < 0.0 {
            return Err(PageStoreError::invalid(format!(
                "overhead ratio must be a non-negative number, got {}",
                self.overhead_ratio
            )));
        }
        if self.file_buckets == 0 {
            return Err(PageStoreError::invalid("file buckets must be positive"));
        }
        if self.timeout_threads == 0 {
            return Err(PageStoreError::invalid("timeout threads must be positive"));
        }
        Ok(())
    }
}

impl fmt::Display for PageStoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PageStoreOptions {{ type: {}, root_dir: {}, page_size: {}, cache_size: {}, \
             overhead_ratio: {}, file_buckets: {}, timeout: {:?}, timeout_threads: {}, \
             admission: {:?} }}",
            self.store_type,
            self.root_dir.display(),
            self.page_size,
            self.cache_size,
            self.overhead_ratio,
            self.file_buckets,
            self.timeout,
            self.timeout_threads,
            self.admission,
        )
    }
}

/// Builder producing validated [`PageStoreOptions`]
#[derive(Debug, Clone)]
pub struct PageStoreOptionsBuilder {
    options: PageStoreOptions,
}

impl PageStoreOptionsBuilder {
    pub fn root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.options.root_dir = root_dir.into();
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.options.page_size = page_size;
        self
    }

    pub fn cache_size(mut self, cache_size: u64) -> Self {
        self.options.cache_size = cache_size;
        self
    }

    pub fn overhead_ratio(mut self, overhead_ratio: f64) -> Self {
        self.options.overhead_ratio = overhead_ratio;
        self
    }

    pub fn file_buckets(mut self, file_buckets: u32) -> Self {
        self.options.file_buckets = file_buckets;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn timeout_threads(mut self, timeout_threads: usize) -> Self {
        self.options.timeout_threads = timeout_threads;
        self
    }

    pub fn store_type(mut self, store_type: PageStoreType) -> Self {
        self.options.store_type = store_type;
        self
    }

    pub fn admission(mut self, admission: AdmissionPolicy) -> Self {
        self.options.admission = admission;
        self
    }

    /// Validate and return the options
    pub fn build(self) -> Result<PageStoreOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_preset() {
        let options = PageStoreOptions::memory();
        assert_eq!(options.store_type, PageStoreType::Memory);
        assert_eq!(options.overhead_ratio, MEMORY_OVERHEAD_RATIO);
        assert_eq!(options.file_buckets, MEMORY_FILE_BUCKETS);
        assert_eq!(options.admission, AdmissionPolicy::Advisory);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_usable_capacity() {
        let options = PageStoreOptions::builder()
            .cache_size(1200)
            .overhead_ratio(0.2)
            .build()
            .unwrap();
        assert_eq!(options.usable_capacity(), 1000);

        let options = PageStoreOptions::builder()
            .cache_size(4096)
            .overhead_ratio(0.0)
            .build()
            .unwrap();
        assert_eq!(options.usable_capacity(), 4096);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        let cases = [
            PageStoreOptions::builder().page_size(0),
            PageStoreOptions::builder().cache_size(0),
            PageStoreOptions::builder().overhead_ratio(-0.1),
            PageStoreOptions::builder().overhead_ratio(f64::NAN),
            PageStoreOptions::builder().overhead_ratio(f64::INFINITY),
            PageStoreOptions::builder().file_buckets(0),
            PageStoreOptions::builder().timeout_threads(0),
        ];

        for builder in cases {
            match builder.build() {
                Err(PageStoreError::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = PageStoreOptions::builder()
            .root_dir("/mnt/cache")
            .page_size(4096)
            .file_buckets(16)
            .timeout(Duration::from_secs(5))
            .timeout_threads(4)
            .store_type(PageStoreType::Rocks)
            .admission(AdmissionPolicy::Enforce)
            .build()
            .unwrap();

        assert_eq!(options.root_dir, PathBuf::from("/mnt/cache"));
        assert_eq!(options.page_size, 4096);
        assert_eq!(options.file_buckets, 16);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.timeout_threads, 4);
        assert_eq!(options.store_type, PageStoreType::Rocks);
        assert_eq!(options.admission, AdmissionPolicy::Enforce);
    }

    #[test]
    fn test_display_lists_fields() {
        let rendered = PageStoreOptions::memory().to_string();
        assert!(rendered.contains("type: MEM"));
        assert!(rendered.contains("file_buckets: 2000"));
        assert!(rendered.contains("overhead_ratio: 0.2"));
    }
}

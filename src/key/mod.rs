//! Storage key encoding.
//!
//! Every page is stored under `bucket_fileId_pageIndex`. The bucket depends on
//! the file id alone, so all pages of one file land in the same bucket and a
//! backend that shards physical storage by bucket keeps each partition bounded.
//!
//! Distinct file ids may share a bucket; the literal file id and page index
//! stay in the key, so only an identical file id can produce an identical key.

use crate::types::PageId;

/// Bucket a file id falls into, in `0..file_buckets`.
///
/// Uses FxHash, which is deterministic across processes, so keys written by a
/// disk-backed sibling stay valid after restart.
#[inline]
pub fn file_bucket(file_id: &str, file_buckets: u32) -> u32 {
    debug_assert!(file_buckets > 0);
    (fxhash::hash64(file_id) % u64::from(file_buckets)) as u32
}

/// Encode a page id into its storage key
pub fn page_key(page_id: &PageId, file_buckets: u32) -> String {
    format!(
        "{}_{}_{}",
        file_bucket(page_id.file_id(), file_buckets),
        page_id.file_id(),
        page_id.page_index()
    )
}

/// Key encoder bound to a fixed bucket count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEncoder {
    file_buckets: u32,
}

impl KeyEncoder {
    /// Create an encoder. `file_buckets` must be non-zero; a zero count is
    /// clamped to one so every file shares a single bucket.
    pub fn new(file_buckets: u32) -> Self {
        Self {
            file_buckets: file_buckets.max(1),
        }
    }

    pub fn file_buckets(&self) -> u32 {
        self.file_buckets
    }

    pub fn bucket(&self, file_id: &str) -> u32 {
        file_bucket(file_id, self.file_buckets)
    }

    pub fn key(&self, page_id: &PageId) -> String {
        page_key(page_id, self.file_buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_is_stable() {
        let encoder = KeyEncoder::new(2000);
        let first = encoder.bucket("some/file/id");
        for _ in 0..100 {
            assert_eq!(encoder.bucket("some/file/id"), first);
        }
        assert!(first < 2000);
    }

    #[test]
    fn test_bucket_independent_of_page_index() {
        let encoder = KeyEncoder::new(17);
        let bucket = encoder.bucket("file-a");

        for index in [0u64, 1, 42, u64::MAX] {
            let key = encoder.key(&PageId::new("file-a", index));
            assert_eq!(key, format!("{}_file-a_{}", bucket, index));
        }
    }

    #[test]
    fn test_single_bucket() {
        let encoder = KeyEncoder::new(1);
        assert_eq!(encoder.bucket("anything"), 0);
        assert_eq!(encoder.key(&PageId::new("x", 3)), "0_x_3");
    }

    #[test]
    fn test_zero_buckets_clamped() {
        let encoder = KeyEncoder::new(0);
        assert_eq!(encoder.file_buckets(), 1);
        assert_eq!(encoder.bucket("f"), 0);
    }

    #[test]
    fn test_buckets_spread() {
        // A thousand files over eight buckets should touch more than one bucket
        let encoder = KeyEncoder::new(8);
        let mut seen = [false; 8];
        for i in 0..1000 {
            seen[encoder.bucket(&format!("file-{}", i)) as usize] = true;
        }
        assert!(seen.iter().filter(|s| **s).count() > 1);
    }

    #[test]
    fn test_distinct_ids_distinct_keys() {
        let encoder = KeyEncoder::new(4);
        let a = encoder.key(&PageId::new("f1", 10));
        let b = encoder.key(&PageId::new("f1", 1));
        let c = encoder.key(&PageId::new("f2", 10));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}

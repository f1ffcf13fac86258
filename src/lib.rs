//! # Page Store
//!
//! Storage layer for a client-side page cache: fixed-size chunks ("pages") of
//! file content, addressed by `(file id, page index)`, kept under a nominal
//! byte budget behind a swappable backend.
//!
//! ## Features
//!
//! - **One Contract**: every backend implements [`PageStore`]
//! - **Caller-Owned Buffers**: byte-range reads copy straight into your buffer
//! - **Bucketed Keys**: pages of one file share a bucket, bounding partition size
//! - **Typed Errors**: invalid arguments, misses and exhaustion are distinct
//!
//! Eviction and admission belong to the cache manager above the store.
//!
//! ## Example
//!
//! ```rust
//! use page_store::{MemoryPageStore, PageId, PageStore, PageStoreOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = PageStoreOptions::builder()
//!     .cache_size(1200)
//!     .overhead_ratio(0.2)
//!     .build()?;
//! let store = MemoryPageStore::new(options)?;
//! assert_eq!(store.capacity(), 1000);
//!
//! let id = PageId::new("f1", 0);
//! store.put(&id, &[1, 2, 3])?;
//!
//! let mut buf = [0u8; 5];
//! let read = store.get(&id, 1, 2, &mut buf, 0)?;
//! assert_eq!(&buf[..read], &[2, 3]);
//!
//! store.delete(&id)?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod connector;
pub mod key;
pub mod options;
mod page;
pub mod profiling;
pub mod types;

pub use backend::{memory::MemoryPageStore, PageStore};
pub use key::KeyEncoder;
pub use options::{AdmissionPolicy, PageStoreOptions, PageStoreType};
pub use profiling::{ProfileStats, Profiler};
pub use types::{PageId, PageInfo, PageStoreError, Result};

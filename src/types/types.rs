use std::fmt;
use thiserror::Error;

/// Identifies one page of a logical file.
///
/// Two ids compare equal only when both the file id and the page index match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    /// Logical file the page belongs to
    file_id: String,

    /// Index of the page within the file
    page_index: u64,
}

impl PageId {
    /// Create a new page id
    pub fn new(file_id: impl Into<String>, page_index: u64) -> Self {
        Self {
            file_id: file_id.into(),
            page_index,
        }
    }

    /// Get the file id
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Get the page index within the file
    pub fn page_index(&self) -> u64 {
        self.page_index
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file_id, self.page_index)
    }
}

/// Descriptor of a resident page, produced when listing a store.
///
/// Never carries the page bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Page the descriptor refers to
    pub page_id: PageId,

    /// Stored length in bytes
    pub page_size: u64,
}

/// Errors that can occur in a page store
#[derive(Error, Debug)]
pub enum PageStoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Page not found: {key}")]
    PageNotFound { key: String },

    #[error("Store is full (requested: {requested} bytes, capacity: {capacity} bytes)")]
    ResourceExhausted { requested: u64, capacity: u64 },

    #[error("Store has been closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageStoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PageStoreError::InvalidArgument(msg.into())
    }

    /// True for misses, which callers usually treat as a cache miss rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageStoreError::PageNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, PageStoreError>;

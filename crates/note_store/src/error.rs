use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures of a note store write. Listing never fails; it logs and degrades to empty.
pub enum NoteStoreError {
    /// The key/value storage rejected a read or write (unavailable, quota exceeded).
    #[error("note storage failure: {0}")]
    Storage(String),
    /// The stored collection is not a JSON array, so a write would destroy it.
    #[error("stored note collection is unreadable, refusing to overwrite: {0}")]
    Decode(String),
    /// The collection could not be serialized.
    #[error("note collection encode failed: {0}")]
    Encode(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Editor-side validation failures raised before a draft reaches the store.
pub enum NoteDraftError {
    /// Title is empty or whitespace only.
    #[error("note title must not be empty")]
    EmptyTitle,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures while persisting authentication flags.
pub enum AuthError {
    /// The key/value storage rejected the write.
    #[error("auth storage failure: {0}")]
    Storage(String),
}

//! Beta Stack Storage Library
//!
//! Storage abstraction for uploaded files and its local filesystem implementation.
//!
//! # Layout
//!
//! The upload root is flat: every stored file is a direct child of the root and its
//! name is a single path component. Names must not contain separators, `..` or a
//! leading dot; `LocalStorage` rejects anything else before touching the disk.

pub mod local;
pub mod stream;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use stream::copy_stream;
pub use traits::{Storage, StorageError, StorageResult, StoredFile, StreamOptions};

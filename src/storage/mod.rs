//! Persistence media the task collection can be stored into
//!
//! Both implement [`KeyValueStore`](crate::traits::KeyValueStore).

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

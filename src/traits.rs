use std::error::Error;

use async_trait::async_trait;

use crate::Task;

/// A persistence medium: an opaque store of string values, addressed by keys
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if nothing was ever stored there
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    /// Store `value` under `key`, replacing the previous value.
    /// Implementors must make this replacement atomic: a failed `set` keeps the previous value readable.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;
}

/// An external, read-only source of task collections, used to seed a [`TaskStore`](crate::store::TaskStore)
#[async_trait]
pub trait SeedSource {
    /// Fetch the whole collection this source provides.
    /// This may be a long process, or may even fail, e.g. in case of a remote server
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>>;
}

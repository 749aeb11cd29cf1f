use std::collections::HashMap;
use std::error::Error;
#[cfg(any(test, feature = "mocked_storage"))]
use std::sync::{Arc, Mutex};

use crate::traits::KeyValueStore;
#[cfg(any(test, feature = "mocked_storage"))]
use crate::mock_behaviour::MockBehaviour;

/// A key-value store that only lives in memory.
///
/// This is useful for tests, or for apps that do not want anything written to disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,

    #[cfg(any(test, feature = "mocked_storage"))]
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds `value` under `key`
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.to_string(), value.to_string());
        storage
    }

    /// Returns the raw value stored under `key`, bypassing any mock behaviour
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    #[cfg(any(test, feature = "mocked_storage"))]
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        #[cfg(any(test, feature = "mocked_storage"))]
        self.mock_behaviour.as_ref().map_or(Ok(()), |b| b.lock().unwrap().can_get())?;

        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        #[cfg(any(test, feature = "mocked_storage"))]
        self.mock_behaviour.as_ref().map_or(Ok(()), |b| b.lock().unwrap().can_set())?;

        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

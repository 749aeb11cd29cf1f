//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The storage key that holds the whole task collection.
/// Feel free to override it when initing this library.
pub static STORAGE_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("tasks".to_string())));

/// The folder (relative to the current directory) the CLI stores its data into, unless told otherwise.
/// Feel free to override it when initing this library.
pub static DATA_FOLDER: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new(".tasklist".to_string())));

/// Returns the current value of [`STORAGE_KEY`]
pub fn storage_key() -> String {
    read_setting(&STORAGE_KEY)
}

/// Returns the current value of [`DATA_FOLDER`]
pub fn data_folder() -> String {
    read_setting(&DATA_FOLDER)
}

fn read_setting(setting: &Mutex<String>) -> String {
    match setting.lock() {
        Ok(value) => value.clone(),
        // A panic while holding the lock cannot leave a String half-written
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::traits::KeyValueStore;

/// A key-value store that keeps every key in its own JSON file, inside a folder
#[derive(Clone, Debug, PartialEq)]
pub struct FileStorage {
    folder: PathBuf,
}

impl FileStorage {
    /// Create a storage backed by `folder`. The folder is created on the first write
    pub fn new(folder: &Path) -> Self {
        Self { folder: PathBuf::from(folder) }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Get the path of the file that holds `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.folder.join(format!("{}.json", sanitize_filename::sanitize(key)))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        if let Err(err) = std::fs::create_dir_all(&self.folder) {
            return Err(format!("Unable to create folder {:?}: {}", self.folder, err).into());
        }

        // Write aside, then rename over the target, so that readers never see a partial file
        let path = self.path_for(key);
        let tmp_name = format!(".{}.{}.tmp",
            sanitize_filename::sanitize(key),
            uuid::Uuid::new_v4().to_hyphenated());
        let tmp_path = self.folder.join(tmp_name);

        if let Err(err) = std::fs::write(&tmp_path, value) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(format!("Unable to write file {:?}: {}", tmp_path, err).into());
        }
        if let Err(err) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(format!("Unable to replace file {:?}: {}", path, err).into());
        }
        log::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

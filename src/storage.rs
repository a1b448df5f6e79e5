//! Persistence backends for the folder store
//!
//! A backend loads and saves the complete record set. The store hands it a
//! fully prepared snapshot on every commit, so a backend only has to make a
//! single save either land completely or not at all.

use crate::domain::Folder;
use crate::error::{FolderKitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Current on-disk format version
pub const STORE_FORMAT_VERSION: u32 = 1;

pub trait StorageBackend {
    /// Load every persisted folder
    fn load(&mut self) -> Result<Vec<Folder>>;

    /// Replace the persisted state with `folders`
    fn save(&mut self, folders: &[Folder]) -> Result<()>;
}

/// Keeps the committed snapshot in memory.
///
/// Saves can be made to fail on demand, which is how commit failures are
/// exercised in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    committed: Vec<Folder>,
    failing_saves: usize,
    save_count: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` saves fail with a persistence error
    pub fn fail_next_saves(&mut self, count: usize) {
        self.failing_saves = count;
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn committed(&self) -> &[Folder] {
        &self.committed
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&mut self) -> Result<Vec<Folder>> {
        Ok(self.committed.clone())
    }

    fn save(&mut self, folders: &[Folder]) -> Result<()> {
        if self.failing_saves > 0 {
            self.failing_saves -= 1;
            return Err(FolderKitError::persistence("simulated save failure"));
        }

        self.committed = folders.to_vec();
        self.save_count += 1;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    folders: Vec<Folder>,
}

#[derive(Debug, Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    folders: &'a [Folder],
}

/// Stores folders as a single JSON document.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Vec<Folder>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "store file missing, starting empty");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            FolderKitError::persistence(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let file: StoreFile = serde_json::from_str(&contents).map_err(|e| {
            FolderKitError::persistence(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if file.version > STORE_FORMAT_VERSION {
            return Err(FolderKitError::persistence(format!(
                "Unsupported store version {} (expected at most {})",
                file.version, STORE_FORMAT_VERSION
            )));
        }

        Ok(file.folders)
    }

    fn save(&mut self, folders: &[Folder]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir).map_err(|e| {
            FolderKitError::persistence(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let contents = serde_json::to_vec_pretty(&StoreFileRef {
            version: STORE_FORMAT_VERSION,
            folders,
        })
        .map_err(|e| FolderKitError::persistence(format!("Failed to serialize store: {}", e)))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| {
            FolderKitError::persistence(format!("Failed to create temp file: {}", e))
        })?;
        temp.write_all(&contents)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| FolderKitError::persistence(format!("Failed to write store: {}", e)))?;

        temp.persist(&self.path).map_err(|e| {
            FolderKitError::persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FolderColor;

    mod memory_backend_tests {
        use super::*;

        #[test]
        fn test_memory_backend_round_trip() {
            let mut backend = MemoryBackend::new();
            let folder = Folder::new("Reports", "Work", FolderColor::Blue);

            backend.save(&[folder.clone()]).unwrap();

            assert_eq!(backend.load().unwrap(), vec![folder]);
            assert_eq!(backend.save_count(), 1);
        }

        #[test]
        fn test_memory_backend_injected_failure() {
            let mut backend = MemoryBackend::new();
            backend.fail_next_saves(1);

            let folder = Folder::new("Reports", "Work", FolderColor::Blue);
            let result = backend.save(&[folder.clone()]);
            assert!(matches!(result, Err(FolderKitError::Persistence(_))));
            assert!(backend.committed().is_empty());

            backend.save(&[folder]).unwrap();
            assert_eq!(backend.committed().len(), 1);
        }
    }

    mod json_backend_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_json_backend_missing_file_is_empty() {
            let temp_dir = TempDir::new().unwrap();
            let mut backend = JsonFileBackend::new(temp_dir.path().join("folders.json"));

            assert!(backend.load().unwrap().is_empty());
        }

        #[test]
        fn test_json_backend_persists_between_instances() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("nested").join("folders.json");
            let folder = Folder::new("Reports", "Work", FolderColor::Green);

            JsonFileBackend::new(&path).save(&[folder.clone()]).unwrap();

            let loaded = JsonFileBackend::new(&path).load().unwrap();
            assert_eq!(loaded, vec![folder]);
        }

        #[test]
        fn test_json_backend_writes_version() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("folders.json");

            JsonFileBackend::new(&path).save(&[]).unwrap();

            let raw: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(raw["version"], 1);
            assert!(raw["folders"].as_array().unwrap().is_empty());
        }

        #[test]
        fn test_json_backend_rejects_corrupt_file() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("folders.json");
            fs::write(&path, b"{ not json").unwrap();

            let result = JsonFileBackend::new(&path).load();
            assert!(matches!(result, Err(FolderKitError::Persistence(_))));
        }

        #[test]
        fn test_json_backend_rejects_newer_version() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("folders.json");
            fs::write(&path, br#"{"version": 99, "folders": []}"#).unwrap();

            let result = JsonFileBackend::new(&path).load();
            assert!(matches!(result, Err(FolderKitError::Persistence(_))));
        }

        #[test]
        fn test_json_backend_leaves_no_temp_files() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("folders.json");
            let mut backend = JsonFileBackend::new(&path);

            backend.save(&[]).unwrap();
            backend
                .save(&[Folder::new("a", "Work", FolderColor::Blue)])
                .unwrap();

            let entries = fs::read_dir(temp_dir.path()).unwrap().count();
            assert_eq!(entries, 1);
        }
    }
}

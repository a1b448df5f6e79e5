//! Error types shared by the store, the coordinator and the CLI

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolderKitError {
    /// Input was rejected before any state changed (empty name, reserved category, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// An active folder with this name already exists in the category
    #[error("A folder named '{name}' already exists in '{category}'")]
    Conflict {
        name: String,
        category: String,
        /// Id of the folder currently holding the name
        existing: String,
    },

    /// The backing store could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FolderKitError {
    pub fn validation(message: impl Into<String>) -> Self {
        FolderKitError::Validation(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        FolderKitError::Persistence(message.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, FolderKitError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, FolderKitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_folder_and_category() {
        let err = FolderKitError::Conflict {
            name: "Reports".to_string(),
            category: "Work".to_string(),
            existing: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "A folder named 'Reports' already exists in 'Work'"
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn test_io_error_converts() {
        let err: FolderKitError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, FolderKitError::Io(_)));
        assert!(!err.is_conflict());
    }
}

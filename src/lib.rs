//! Folderkit - folder organization with favorites and a soft-delete bin
//!
//! This crate provides the core of the Folderkit application: a folder store
//! with category-scoped unique names, a naming resolver for auto-suffixed and
//! conflicting names, and copy/move between categories.

pub mod attachment;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

// Re-export primary types for convenience
pub use attachment::{import_file, PickedAttachment};
pub use config::UserConfig;
pub use domain::naming::Resolution;
pub use domain::store::{FolderStore, Listing};
pub use domain::transfer::{Clipboard, ConflictChoice, PasteOutcome, TransferMode};
pub use domain::{
    Attachment, AttachmentId, FileKind, Folder, FolderColor, FolderId, FolderQuery, SortBy,
    SortOptions, BIN_CATEGORY, FAVORITES_CATEGORY,
};
pub use error::{FolderKitError, Result};
pub use storage::{JsonFileBackend, MemoryBackend, StorageBackend};

//! Copying and moving folders between categories
//!
//! The pending copy/move is an explicit [`Clipboard`] value the caller holds
//! and passes to [`FolderStore::paste`].

use super::naming::{self, Resolution};
use super::store::{conflict, validate_target_category, FolderStore};
use super::{Folder, FolderId};
use crate::error::{FolderKitError, Result};
use crate::storage::StorageBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

/// A folder marked for copying or moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clipboard {
    pub folder_id: FolderId,
    pub mode: TransferMode,
}

impl Clipboard {
    pub fn copy(folder_id: FolderId) -> Self {
        Self {
            folder_id,
            mode: TransferMode::Copy,
        }
    }

    pub fn cut(folder_id: FolderId) -> Self {
        Self {
            folder_id,
            mode: TransferMode::Move,
        }
    }
}

/// How the caller wants a paste conflict handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Delete the folder holding the name and paste under the original name
    Replace,
    /// Paste as "<name> copy", "<name> copy 2", ...
    Rename,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasteOutcome {
    /// The folder now sitting in the target category
    pub folder: Folder,
    /// Folder purged to make room, for [`ConflictChoice::Replace`]
    pub replaced: Option<FolderId>,
    /// Whether the source record was removed (moves only)
    pub source_removed: bool,
}

impl<B: StorageBackend> FolderStore<B> {
    /// Copies a folder into `into_category`, leaving the original untouched.
    pub fn copy_folder(
        &mut self,
        id: FolderId,
        into_category: &str,
        on_conflict: Option<ConflictChoice>,
    ) -> Result<PasteOutcome> {
        self.paste(Clipboard::copy(id), into_category, on_conflict)
    }

    /// Moves a folder into `into_category`.
    pub fn move_folder(
        &mut self,
        id: FolderId,
        into_category: &str,
        on_conflict: Option<ConflictChoice>,
    ) -> Result<PasteOutcome> {
        self.paste(Clipboard::cut(id), into_category, on_conflict)
    }

    /// Pastes the clipboard's folder into `into_category`.
    ///
    /// Without `on_conflict`, a name collision is returned as
    /// [`FolderKitError::Conflict`] and nothing changes. The new record, any
    /// replaced folder and, for moves, the removal of the source are committed
    /// together, so a failed commit leaves the source where it was.
    pub fn paste(
        &mut self,
        clipboard: Clipboard,
        into_category: &str,
        on_conflict: Option<ConflictChoice>,
    ) -> Result<PasteOutcome> {
        let source = self
            .get(clipboard.folder_id)
            .cloned()
            .ok_or_else(|| FolderKitError::NotFound(format!("folder {}", clipboard.folder_id)))?;

        if source.is_deleted {
            return Err(FolderKitError::validation(format!(
                "Folder '{}' is in the Bin; restore it before pasting",
                source.name
            )));
        }
        let into_category = validate_target_category(into_category)?;

        let is_move = clipboard.mode == TransferMode::Move;
        if is_move && source.category == into_category {
            return Ok(unchanged(source));
        }

        let (name, replaced) = match self.resolve(&source.name, into_category) {
            Resolution::UseAsIs => (source.name.clone(), None),
            Resolution::Conflict(existing) => match on_conflict {
                None => return Err(conflict(&source.name, existing)),
                Some(ConflictChoice::Replace) if existing.id == source.id => {
                    return Ok(unchanged(source));
                }
                Some(ConflictChoice::Replace) => (source.name.clone(), Some(existing.id)),
                Some(ConflictChoice::Rename) => (
                    naming::copy_name(self.all(), &source.name, into_category),
                    None,
                ),
            },
        };

        let pasted = source.duplicate(name, into_category);
        let outcome = PasteOutcome {
            folder: pasted.clone(),
            replaced,
            source_removed: is_move,
        };

        self.commit(if is_move { "move" } else { "copy" }, |folders| {
            if let Some(replaced) = replaced {
                folders.retain(|f| f.id != replaced);
            }
            folders.push(pasted);
            if is_move {
                folders.retain(|f| f.id != source.id);
            }
            Ok(())
        })?;

        tracing::info!(
            source = %source.id,
            pasted = %outcome.folder.id,
            name = %outcome.folder.name,
            category = into_category,
            mode = ?clipboard.mode,
            replaced = ?outcome.replaced,
            "folder pasted"
        );
        Ok(outcome)
    }
}

fn unchanged(folder: Folder) -> PasteOutcome {
    PasteOutcome {
        folder,
        replaced: None,
        source_removed: false,
    }
}

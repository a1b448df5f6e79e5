use super::naming::{self, Resolution, DEFAULT_FOLDER_NAME};
use super::{
    is_reserved_category, Attachment, AttachmentId, Folder, FolderColor, FolderId, FolderQuery,
    SortOptions, BIN_CATEGORY,
};
use crate::attachment::PickedAttachment;
use crate::error::{FolderKitError, Result};
use crate::storage::StorageBackend;
use chrono::Utc;

/// Ordered, restartable view over the folders matching a query
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    items: Vec<&'a Folder>,
}

impl<'a> Listing<'a> {
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a Folder>> {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.items.iter().map(|&f| f.name.as_str()).collect()
    }

    pub fn ids(&self) -> Vec<FolderId> {
        self.items.iter().map(|f| f.id).collect()
    }
}

impl<'a> IntoIterator for Listing<'a> {
    type Item = &'a Folder;
    type IntoIter = std::vec::IntoIter<&'a Folder>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b Listing<'a> {
    type Item = &'a Folder;
    type IntoIter = std::iter::Copied<std::slice::Iter<'b, &'a Folder>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}

/// Folder records backed by a [`StorageBackend`].
///
/// Every mutation is applied to a working copy of the records, saved through
/// the backend, and only then made visible. A failed save leaves the store
/// exactly as it was after the last successful commit.
#[derive(Debug)]
pub struct FolderStore<B: StorageBackend> {
    backend: B,
    folders: Vec<Folder>,
    default_color: FolderColor,
}

impl<B: StorageBackend> FolderStore<B> {
    /// Opens a store over the records already persisted in `backend`
    pub fn open(mut backend: B) -> Result<Self> {
        let folders = backend.load().map_err(|e| {
            tracing::error!(error = %e, "failed to load folders");
            e
        })?;
        tracing::debug!(count = folders.len(), "folder store opened");

        Ok(Self {
            backend,
            folders,
            default_color: FolderColor::default(),
        })
    }

    /// Color used when a caller creates a folder without picking one
    pub fn with_default_color(mut self, color: FolderColor) -> Self {
        self.default_color = color;
        self
    }

    pub fn default_color(&self) -> FolderColor {
        self.default_color
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Every record, binned ones included, in storage order
    pub fn all(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    fn require(&self, id: FolderId) -> Result<&Folder> {
        self.get(id)
            .ok_or_else(|| FolderKitError::NotFound(format!("folder {}", id)))
    }

    fn require_binned(&self, id: FolderId) -> Result<&Folder> {
        let folder = self.require(id)?;
        if !folder.is_deleted {
            return Err(FolderKitError::validation(format!(
                "Folder '{}' is not in the {}",
                folder.name, BIN_CATEGORY
            )));
        }
        Ok(folder)
    }

    /// Finds the single folder whose id starts with `prefix`
    pub fn resolve_id(&self, prefix: &str) -> Result<FolderId> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Err(FolderKitError::validation("Folder id cannot be empty"));
        }

        let mut matches = self.folders.iter().filter(|f| {
            let full = f.id.to_string();
            full.starts_with(&prefix) || full.replace('-', "").starts_with(&prefix)
        });

        match (matches.next(), matches.next()) {
            (Some(folder), None) => Ok(folder.id),
            (Some(_), Some(_)) => Err(FolderKitError::validation(format!(
                "Folder id '{}' is ambiguous",
                prefix
            ))),
            (None, _) => Err(FolderKitError::NotFound(format!("folder {}", prefix))),
        }
    }

    /// Folders matching `query`, in the requested order.
    ///
    /// `"Favorites"` lists active favorites from every category and `"Bin"`
    /// lists every soft-deleted folder.
    pub fn find(&self, query: &FolderQuery) -> Listing<'_> {
        let mut items: Vec<&Folder> = self.folders.iter().filter(|f| query.matches(f)).collect();
        query.sort.sort_folders(&mut items);
        tracing::debug!(category = %query.category, count = items.len(), "folders listed");
        Listing { items }
    }

    /// Active folders in `category`, sorted by name
    pub fn find_in(&self, category: &str) -> Listing<'_> {
        self.find(&FolderQuery::new(category))
    }

    pub fn resolve(&self, desired: &str, category: &str) -> Resolution<'_> {
        naming::resolve(&self.folders, desired, category.trim())
    }

    /// Applies `change` to a working copy and commits it through the backend.
    pub(crate) fn commit<T>(
        &mut self,
        action: &str,
        change: impl FnOnce(&mut Vec<Folder>) -> Result<T>,
    ) -> Result<T> {
        let mut working = self.folders.clone();
        let output = change(&mut working)?;

        if let Err(e) = self.backend.save(&working) {
            tracing::error!(action, error = %e, "commit failed, state unchanged");
            return Err(e);
        }

        self.folders = working;
        tracing::debug!(action, count = self.folders.len(), "committed");
        Ok(output)
    }

    /// Applies `change` to the folder with `id` and commits.
    fn update(
        &mut self,
        action: &str,
        id: FolderId,
        change: impl FnOnce(&mut Folder) -> Result<()>,
    ) -> Result<Folder> {
        self.require(id)?;
        self.commit(action, |folders| {
            let folder = folders
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| FolderKitError::NotFound(format!("folder {}", id)))?;
            change(folder)?;
            Ok(folder.clone())
        })
    }

    /// Creates a folder. Uniqueness is not checked here; consult
    /// [`FolderStore::resolve`] first.
    pub fn create(
        &mut self,
        name: &str,
        category: &str,
        color: Option<FolderColor>,
        is_favorite: bool,
    ) -> Result<Folder> {
        let name = validate_name(name)?;
        let category = validate_target_category(category)?;

        let mut folder = Folder::new(name, category, color.unwrap_or(self.default_color));
        folder.is_favorite = is_favorite;

        let created = folder.clone();
        self.commit("create", move |folders| {
            folders.push(folder);
            Ok(())
        })?;

        tracing::info!(id = %created.id, name = %created.name, category, "folder created");
        Ok(created)
    }

    /// Adds a folder under the next free "Newfolder" name.
    pub fn create_auto(&mut self, category: &str) -> Result<Folder> {
        let category = validate_target_category(category)?;
        let name = naming::auto_name(&self.folders, DEFAULT_FOLDER_NAME, category);
        self.create(&name, category, None, false)
    }

    pub fn rename(&mut self, id: FolderId, new_name: &str) -> Result<Folder> {
        let new_name = validate_name(new_name)?.to_string();
        let existing = self.require(id)?;

        if existing.is_active() {
            if let Resolution::Conflict(other) = self.resolve(&new_name, &existing.category) {
                if other.id != id {
                    return Err(conflict(&new_name, other));
                }
            }
        }

        let renamed = self.update("rename", id, |folder| {
            folder.name = new_name;
            Ok(())
        })?;
        tracing::info!(id = %id, name = %renamed.name, "folder renamed");
        Ok(renamed)
    }

    /// Moves a folder to the Bin.
    pub fn soft_delete(&mut self, id: FolderId) -> Result<Folder> {
        if self.require(id)?.is_deleted {
            return Ok(self.require(id)?.clone());
        }

        let deleted = self.update("soft_delete", id, |folder| {
            folder.deleted_from = Some(std::mem::replace(
                &mut folder.category,
                BIN_CATEGORY.to_string(),
            ));
            folder.is_deleted = true;
            Ok(())
        })?;
        tracing::info!(id = %id, from = ?deleted.deleted_from, "folder moved to bin");
        Ok(deleted)
    }

    /// Brings a folder back from the Bin into `into_category`.
    pub fn restore(&mut self, id: FolderId, into_category: &str) -> Result<Folder> {
        let into_category = validate_target_category(into_category)?;
        let folder = self.require_binned(id)?;

        if let Resolution::Conflict(other) = self.resolve(&folder.name, into_category) {
            if other.id != id {
                return Err(conflict(&folder.name, other));
            }
        }

        let restored = self.update("restore", id, |folder| {
            folder.is_deleted = false;
            folder.category = into_category.to_string();
            folder.deleted_from = None;
            Ok(())
        })?;
        tracing::info!(id = %id, category = into_category, "folder restored");
        Ok(restored)
    }

    /// Restores a binned folder into the category it was deleted from
    pub fn restore_to_origin(&mut self, id: FolderId) -> Result<Folder> {
        let folder = self.require_binned(id)?;
        let origin = folder.deleted_from.clone().ok_or_else(|| {
            FolderKitError::validation(format!(
                "Folder '{}' has no recorded origin category",
                folder.name
            ))
        })?;
        self.restore(id, &origin)
    }

    /// Removes a folder permanently.
    pub fn purge(&mut self, id: FolderId) -> Result<Folder> {
        let removed = self.require(id)?.clone();
        self.commit("purge", |folders| {
            folders.retain(|f| f.id != id);
            Ok(())
        })?;
        tracing::info!(id = %id, name = %removed.name, "folder purged");
        Ok(removed)
    }

    /// Empties the Bin, returning how many folders were removed
    pub fn purge_all(&mut self) -> Result<usize> {
        let count = self.folders.iter().filter(|f| f.is_deleted).count();
        if count == 0 {
            return Ok(0);
        }

        self.commit("purge_all", |folders| {
            folders.retain(|f| !f.is_deleted);
            Ok(())
        })?;
        tracing::info!(count, "bin emptied");
        Ok(count)
    }

    pub fn toggle_favorite(&mut self, id: FolderId) -> Result<Folder> {
        let toggled = self.update("toggle_favorite", id, |folder| {
            folder.is_favorite = !folder.is_favorite;
            Ok(())
        })?;
        tracing::info!(id = %id, favorite = toggled.is_favorite, "favorite toggled");
        Ok(toggled)
    }

    /// Sets the color from a tag; unknown tags fall back to the default color.
    pub fn set_color(&mut self, id: FolderId, tag: &str) -> Result<Folder> {
        let color = FolderColor::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!(tag, fallback = %self.default_color, "unknown color tag");
            self.default_color
        });

        self.update("set_color", id, |folder| {
            folder.color = color;
            Ok(())
        })
    }

    /// Stores a picked photo or document inside the folder.
    pub fn attach(&mut self, id: FolderId, picked: PickedAttachment) -> Result<Attachment> {
        let attachment = picked.into_attachment(Utc::now());
        let stored = attachment.clone();

        self.update("attach", id, move |folder| {
            folder.attachments.push(attachment);
            Ok(())
        })?;
        tracing::info!(
            folder = %id,
            attachment = %stored.id,
            name = %stored.name,
            bytes = stored.size(),
            "attachment stored"
        );
        Ok(stored)
    }

    pub fn rename_attachment(
        &mut self,
        id: FolderId,
        attachment_id: AttachmentId,
        new_name: &str,
    ) -> Result<Attachment> {
        let new_name = validate_name(new_name)?.to_string();
        let folder = self.update("rename_attachment", id, |folder| {
            let attachment = find_attachment_mut(folder, attachment_id)?;
            attachment.name = new_name;
            Ok(())
        })?;

        folder
            .attachment(attachment_id)
            .cloned()
            .ok_or_else(|| FolderKitError::NotFound(format!("attachment {}", attachment_id)))
    }

    pub fn detach(&mut self, id: FolderId, attachment_id: AttachmentId) -> Result<Attachment> {
        let removed = self
            .require(id)?
            .attachment(attachment_id)
            .cloned()
            .ok_or_else(|| FolderKitError::NotFound(format!("attachment {}", attachment_id)))?;

        self.update("detach", id, |folder| {
            folder.attachments.retain(|a| a.id != attachment_id);
            Ok(())
        })?;
        tracing::info!(folder = %id, attachment = %attachment_id, "attachment removed");
        Ok(removed)
    }

    pub fn attachments(&self, id: FolderId, sort: SortOptions) -> Result<Vec<&Attachment>> {
        let mut attachments: Vec<&Attachment> = self.require(id)?.attachments.iter().collect();
        sort.sort_attachments(&mut attachments);
        Ok(attachments)
    }
}

fn find_attachment_mut(folder: &mut Folder, id: AttachmentId) -> Result<&mut Attachment> {
    folder
        .attachments
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| FolderKitError::NotFound(format!("attachment {}", id)))
}

pub(crate) fn conflict(name: &str, existing: &Folder) -> FolderKitError {
    FolderKitError::Conflict {
        name: name.to_string(),
        category: existing.category.clone(),
        existing: existing.id.to_string(),
    }
}

/// Trims `name`, rejecting it when nothing is left
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FolderKitError::validation("Name cannot be empty"));
    }
    Ok(trimmed)
}

/// Trims `category`, rejecting empty names and the reserved Bin/Favorites views
pub fn validate_target_category(category: &str) -> Result<&str> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(FolderKitError::validation("Category cannot be empty"));
    }
    if is_reserved_category(trimmed) {
        return Err(FolderKitError::validation(format!(
            "'{}' is not a category folders can be placed in",
            trimmed
        )));
    }
    Ok(trimmed)
}

//! Executes CLI commands against a folder store and prints the result

use crate::attachment;
use crate::cli::{AppConfig, Command};
use crate::domain::naming::Resolution;
use crate::domain::store::{conflict, FolderStore};
use crate::domain::transfer::PasteOutcome;
use crate::domain::{
    Attachment, AttachmentId, Folder, FolderColor, FolderId, FolderQuery, BIN_CATEGORY,
};
use crate::error::{FolderKitError, Result};
use crate::storage::StorageBackend;
use std::io::Write;

/// Category listed when `list` is run without `-c`
pub const DEFAULT_LIST_CATEGORY: &str = "My Files";

/// Runs one command, writing human-readable output to `out`.
pub fn execute<B: StorageBackend, W: Write>(
    command: Command,
    config: &AppConfig,
    store: &mut FolderStore<B>,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Add {
            name,
            category,
            color,
            favorite,
        } => {
            if let Resolution::Conflict(existing) = store.resolve(name.trim(), &category) {
                return Err(conflict(name.trim(), existing));
            }
            let color = color.map(|tag| parse_color(&tag, store.default_color()));
            let folder = store.create(&name, &category, color, favorite)?;
            writeln!(out, "Created {}", format_folder(&folder))?;
        }

        Command::New { category } => {
            let folder = store.create_auto(&category)?;
            writeln!(out, "Created {}", format_folder(&folder))?;
        }

        Command::List {
            category,
            sort_by,
            reverse,
            include_deleted,
        } => {
            let category = category.unwrap_or_else(|| DEFAULT_LIST_CATEGORY.to_string());
            let query = FolderQuery::new(&category)
                .include_deleted(include_deleted)
                .sorted(config.sort_for(sort_by, reverse));
            let listing = store.find(&query);

            if listing.is_empty() {
                writeln!(out, "No folders in {}", category)?;
            }
            for folder in &listing {
                writeln!(out, "{}", format_folder(folder))?;
            }
        }

        Command::Rename { id, name } => {
            let id = store.resolve_id(&id)?;
            let folder = store.rename(id, &name)?;
            writeln!(out, "Renamed {}", format_folder(&folder))?;
        }

        Command::Color { id, color } => {
            let id = store.resolve_id(&id)?;
            let folder = store.set_color(id, &color)?;
            writeln!(out, "Updated {}", format_folder(&folder))?;
        }

        Command::Favorite { id } => {
            let id = store.resolve_id(&id)?;
            let folder = store.toggle_favorite(id)?;
            let verb = if folder.is_favorite { "Added" } else { "Removed" };
            writeln!(out, "{} favorite {}", verb, format_folder(&folder))?;
        }

        Command::Delete { id } => {
            let id = store.resolve_id(&id)?;
            let folder = store.soft_delete(id)?;
            writeln!(out, "Moved to {}: {}", BIN_CATEGORY, format_folder(&folder))?;
        }

        Command::Restore { id, category } => {
            let id = store.resolve_id(&id)?;
            let folder = match category {
                Some(category) => store.restore(id, &category)?,
                None => store.restore_to_origin(id)?,
            };
            writeln!(out, "Restored {}", format_folder(&folder))?;
        }

        Command::Purge { id } => {
            let id = store.resolve_id(&id)?;
            let folder = store.purge(id)?;
            writeln!(out, "Deleted {} permanently", folder.name)?;
        }

        Command::EmptyBin => {
            let count = store.purge_all()?;
            writeln!(out, "Removed {} folder(s) from the {}", count, BIN_CATEGORY)?;
        }

        Command::Copy {
            id,
            category,
            on_conflict,
        } => {
            let id = store.resolve_id(&id)?;
            let outcome = store.copy_folder(id, &category, on_conflict.map(Into::into))?;
            write_paste(out, "Copied", &outcome)?;
        }

        Command::Move {
            id,
            category,
            on_conflict,
        } => {
            let id = store.resolve_id(&id)?;
            let outcome = store.move_folder(id, &category, on_conflict.map(Into::into))?;
            write_paste(out, "Moved", &outcome)?;
        }

        Command::Attach { id, path } => {
            let id = store.resolve_id(&id)?;
            let picked = attachment::import_file_blocking(&path)?;
            let stored = store.attach(id, picked)?;
            writeln!(out, "Attached {}", format_attachment(&stored))?;
        }

        Command::Attachments {
            id,
            sort_by,
            reverse,
        } => {
            let id = store.resolve_id(&id)?;
            let attachments = store.attachments(id, config.sort_for(sort_by, reverse))?;
            if attachments.is_empty() {
                writeln!(out, "No attachments")?;
            }
            for attachment in attachments {
                writeln!(out, "{}", format_attachment(attachment))?;
            }
        }

        Command::Detach { id, attachment } => {
            let id = store.resolve_id(&id)?;
            let attachment_id = resolve_attachment_id(store, id, &attachment)?;
            let removed = store.detach(id, attachment_id)?;
            writeln!(out, "Removed {}", removed.name)?;
        }
    }

    Ok(())
}

fn parse_color(tag: &str, fallback: FolderColor) -> FolderColor {
    FolderColor::from_tag(tag).unwrap_or_else(|| {
        tracing::warn!(tag, %fallback, "unknown color tag");
        fallback
    })
}

fn resolve_attachment_id<B: StorageBackend>(
    store: &FolderStore<B>,
    folder_id: FolderId,
    prefix: &str,
) -> Result<AttachmentId> {
    let prefix = prefix.trim().to_lowercase().replace('-', "");
    if prefix.is_empty() {
        return Err(FolderKitError::validation("Attachment id cannot be empty"));
    }

    let folder = store
        .get(folder_id)
        .ok_or_else(|| FolderKitError::NotFound(format!("folder {}", folder_id)))?;

    let mut matches = folder
        .attachments
        .iter()
        .filter(|a| a.id.to_string().replace('-', "").starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(attachment), None) => Ok(attachment.id),
        (Some(_), Some(_)) => Err(FolderKitError::validation(format!(
            "Attachment id '{}' is ambiguous",
            prefix
        ))),
        (None, _) => Err(FolderKitError::NotFound(format!("attachment {}", prefix))),
    }
}

fn write_paste<W: Write>(out: &mut W, verb: &str, outcome: &PasteOutcome) -> Result<()> {
    writeln!(out, "{} {}", verb, format_folder(&outcome.folder))?;
    if let Some(replaced) = outcome.replaced {
        writeln!(out, "Replaced {}", replaced.short())?;
    }
    Ok(())
}

/// One-line summary: short id, name, category, color, favorite marker
pub fn format_folder(folder: &Folder) -> String {
    let mut line = format!(
        "{}  {}  [{}]  {}",
        folder.id.short(),
        folder.name,
        folder.category,
        folder.color
    );
    if folder.is_favorite {
        line.push_str("  *");
    }
    if let Some(origin) = &folder.deleted_from {
        line.push_str(&format!("  (from {})", origin));
    }
    if !folder.attachments.is_empty() {
        line.push_str(&format!("  {} item(s)", folder.attachments.len()));
    }
    line
}

pub fn format_attachment(attachment: &Attachment) -> String {
    format!(
        "{}  {}  {}  {} bytes",
        attachment.id.short(),
        attachment.name,
        attachment.file_type.as_deref().unwrap_or("-"),
        attachment.size()
    )
}

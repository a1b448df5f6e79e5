//! Attachment ingestion
//!
//! Picked photos and documents arrive as raw bytes plus whatever name and
//! type the source could tell us. Reading them is async; storing them goes
//! back through the synchronous [`FolderStore`](crate::domain::store::FolderStore).

use crate::domain::{Attachment, AttachmentId, FileKind};
use crate::error::Result;
use chrono::{DateTime, Local, Utc};
use std::path::Path;

/// Payload handed over by a photo/document picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAttachment {
    pub bytes: Vec<u8>,
    pub suggested_name: Option<String>,
    /// Extension-like tag such as "pdf" or "jpg"
    pub type_tag: Option<String>,
}

impl PickedAttachment {
    pub fn new(bytes: Vec<u8>, suggested_name: Option<String>, type_tag: Option<String>) -> Self {
        Self {
            bytes,
            suggested_name,
            type_tag,
        }
    }

    /// A photo with no name of its own
    pub fn photo(bytes: Vec<u8>) -> Self {
        Self::new(bytes, None, Some("jpg".to_string()))
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_extension(self.type_tag.as_deref().unwrap_or(""))
    }

    /// Turns the payload into a stored attachment created at `now`.
    ///
    /// Nameless photos are named `IMG_yyyyMMdd_HHmmss` after local time;
    /// other nameless payloads fall back to `File_yyyyMMdd_HHmmss`.
    pub fn into_attachment(self, now: DateTime<Utc>) -> Attachment {
        let kind = self.kind();
        let file_type = self
            .type_tag
            .map(|t| t.trim().trim_start_matches('.').to_lowercase())
            .filter(|t| !t.is_empty());

        let name = match self.suggested_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => generated_name(kind, now.with_timezone(&Local)),
        };

        Attachment {
            id: AttachmentId::new(),
            name,
            kind,
            file_type,
            data: self.bytes.into(),
            created_date: now,
        }
    }
}

fn generated_name(kind: FileKind, at: DateTime<Local>) -> String {
    let prefix = match kind {
        FileKind::Image => "IMG",
        _ => "File",
    };
    format!("{}_{}", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Reads a file from disk as a picked attachment
pub async fn import_file(path: impl AsRef<Path>) -> Result<PickedAttachment> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;

    let suggested_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string());
    let type_tag = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "file imported");
    Ok(PickedAttachment::new(bytes, suggested_name, type_tag))
}

/// Runs [`import_file`] to completion on a current-thread runtime
pub fn import_file_blocking(path: impl AsRef<Path>) -> Result<PickedAttachment> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(import_file(path))
}

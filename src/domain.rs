pub mod naming;
pub mod store;
pub mod transfer;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Category that holds soft-deleted folders
pub const BIN_CATEGORY: &str = "Bin";

/// Derived view over every active favorite, regardless of category
pub const FAVORITES_CATEGORY: &str = "Favorites";

/// Returns true for the category names that are views rather than real scopes.
pub fn is_reserved_category(category: &str) -> bool {
    category == BIN_CATEGORY || category == FAVORITES_CATEGORY
}

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The first eight hex digits, enough to tell records apart on screen
            pub fn short(&self) -> String {
                self.0.simple().to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_type!(FolderId);
id_type!(AttachmentId);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    Red,
    Green,
    #[default]
    Blue,
    Yellow,
    Black,
    Gradient,
}

impl FolderColor {
    pub const ALL: [FolderColor; 6] = [
        FolderColor::Red,
        FolderColor::Green,
        FolderColor::Blue,
        FolderColor::Yellow,
        FolderColor::Black,
        FolderColor::Gradient,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "red" => Some(FolderColor::Red),
            "green" => Some(FolderColor::Green),
            "blue" => Some(FolderColor::Blue),
            "yellow" => Some(FolderColor::Yellow),
            "black" => Some(FolderColor::Black),
            "gradient" => Some(FolderColor::Gradient),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            FolderColor::Red => "red",
            FolderColor::Green => "green",
            FolderColor::Blue => "blue",
            FolderColor::Yellow => "yellow",
            FolderColor::Black => "black",
            FolderColor::Gradient => "gradient",
        }
    }
}

impl fmt::Display for FolderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Broad kind of an attachment payload, derived from its type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Text,
    Document,
    Binary,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "heic" | "heif" | "tiff" => {
                FileKind::Image
            }

            "pdf" => FileKind::Pdf,

            "txt" | "md" | "csv" | "json" | "xml" | "html" | "log" => FileKind::Text,

            "doc" | "docx" | "odt" | "rtf" | "pages" | "xls" | "xlsx" | "ppt" | "pptx" => {
                FileKind::Document
            }

            _ => FileKind::Binary,
        }
    }
}

/// A photo or document stored inside a folder.
///
/// The payload is shared, so cloning a folder record never copies its bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub kind: FileKind,
    /// Lowercase extension such as "pdf" or "jpg"
    pub file_type: Option<String>,
    #[serde(
        serialize_with = "serialize_payload",
        deserialize_with = "deserialize_payload"
    )]
    pub data: Arc<[u8]>,
    pub created_date: DateTime<Utc>,
}

impl Attachment {
    /// A copy of this attachment under a fresh id, for folder duplication
    pub fn duplicate(&self) -> Self {
        Attachment {
            id: AttachmentId::new(),
            ..self.clone()
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

fn serialize_payload<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}

fn deserialize_payload<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<[u8]>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map(Arc::from)
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub category: String,
    pub color: FolderColor,
    pub is_favorite: bool,
    pub is_deleted: bool,
    /// Category the folder lived in before it was moved to the Bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_from: Option<String>,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Folder {
    pub fn new(name: impl Into<String>, category: impl Into<String>, color: FolderColor) -> Self {
        Folder {
            id: FolderId::new(),
            name: name.into(),
            category: category.into(),
            color,
            is_favorite: false,
            is_deleted: false,
            deleted_from: None,
            created_date: Utc::now(),
            attachments: Vec::new(),
        }
    }

    /// Builds the record a copy or move lands as: new id, new creation time,
    /// same color and favorite flag, attachments copied under new ids.
    pub fn duplicate(&self, name: impl Into<String>, category: impl Into<String>) -> Self {
        Folder {
            id: FolderId::new(),
            name: name.into(),
            category: category.into(),
            color: self.color,
            is_favorite: self.is_favorite,
            is_deleted: false,
            deleted_from: None,
            created_date: Utc::now(),
            attachments: self.attachments.iter().map(Attachment::duplicate).collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub fn attachment(&self, id: AttachmentId) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.id == id)
    }
}

/// Sort key for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Sort by name (case-insensitive)
    #[default]
    Name,
    /// Sort by creation date
    Date,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub sort_by: SortBy,
    /// Descending instead of ascending
    pub reverse: bool,
}

impl SortOptions {
    pub fn new(sort_by: SortBy, reverse: bool) -> Self {
        Self { sort_by, reverse }
    }

    fn compare(
        &self,
        (a_name, a_date): (&str, &DateTime<Utc>),
        (b_name, b_date): (&str, &DateTime<Utc>),
    ) -> Ordering {
        let ordering = match self.sort_by {
            SortBy::Name => a_name
                .to_lowercase()
                .cmp(&b_name.to_lowercase())
                .then_with(|| a_name.cmp(b_name))
                .then_with(|| a_date.cmp(b_date)),
            SortBy::Date => a_date.cmp(b_date).then_with(|| a_name.cmp(b_name)),
        };

        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    pub fn sort_folders(&self, folders: &mut [&Folder]) {
        folders.sort_by(|a, b| {
            self.compare((a.name.as_str(), &a.created_date), (b.name.as_str(), &b.created_date))
        });
    }

    pub fn sort_attachments(&self, attachments: &mut [&Attachment]) {
        attachments.sort_by(|a, b| {
            self.compare((a.name.as_str(), &a.created_date), (b.name.as_str(), &b.created_date))
        });
    }
}

/// What a listing should contain and in which order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderQuery {
    pub category: String,
    /// Also list bin entries that were deleted from `category`
    pub include_deleted: bool,
    pub sort: SortOptions,
}

impl FolderQuery {
    /// Query for `category`; surrounding whitespace is ignored.
    pub fn new(category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            category: category.trim().to_string(),
            include_deleted: false,
            sort: SortOptions::default(),
        }
    }

    pub fn include_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    pub fn sorted(mut self, sort: SortOptions) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, folder: &Folder) -> bool {
        match self.category.as_str() {
            FAVORITES_CATEGORY => folder.is_favorite && !folder.is_deleted,
            BIN_CATEGORY => folder.is_deleted,
            category => {
                (!folder.is_deleted && folder.category == category)
                    || (self.include_deleted
                        && folder.is_deleted
                        && folder.deleted_from.as_deref() == Some(category))
            }
        }
    }
}

//! Name resolution for folders entering a category
//!
//! A name is taken when an active folder with exactly that name already
//! lives in the target category. Binned folders never block a name.

use super::Folder;

/// Base name used by the "add folder" action
pub const DEFAULT_FOLDER_NAME: &str = "Newfolder";

/// Outcome of checking a desired name against a category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The name is free
    UseAsIs,
    /// An active folder already holds the name
    Conflict(&'a Folder),
}

impl Resolution<'_> {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Resolution::Conflict(_))
    }
}

/// Active folder named `name` in `category`, if any
pub fn find_active<'a>(folders: &'a [Folder], name: &str, category: &str) -> Option<&'a Folder> {
    folders
        .iter()
        .find(|f| !f.is_deleted && f.category == category && f.name == name)
}

pub fn is_taken(folders: &[Folder], name: &str, category: &str) -> bool {
    find_active(folders, name, category).is_some()
}

pub fn resolve<'a>(folders: &'a [Folder], desired: &str, category: &str) -> Resolution<'a> {
    match find_active(folders, desired, category) {
        Some(existing) => Resolution::Conflict(existing),
        None => Resolution::UseAsIs,
    }
}

/// `base`, or the first of `base1`, `base2`, ... that is free.
pub fn auto_name(folders: &[Folder], base: &str, category: &str) -> String {
    first_free(folders, category, base.to_string(), |n| format!("{}{}", base, n))
}

/// `base copy`, or the first of `base copy 2`, `base copy 3`, ... that is free.
pub fn copy_name(folders: &[Folder], base: &str, category: &str) -> String {
    first_free(folders, category, format!("{} copy", base), |n| {
        format!("{} copy {}", base, n + 1)
    })
}

fn first_free(
    folders: &[Folder],
    category: &str,
    first: String,
    candidate: impl Fn(usize) -> String,
) -> String {
    if !is_taken(folders, &first, category) {
        return first;
    }

    (1..)
        .map(candidate)
        .find(|name| !is_taken(folders, name, category))
        .unwrap_or(first)
}

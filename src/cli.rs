// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::transfer::ConflictChoice;
use crate::domain::{SortBy, SortOptions};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Folderkit - organize folders, favorites and the bin from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "folderkit")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Store file to use instead of the configured one
    #[arg(long = "data", global = true)]
    pub data_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a folder with the given name
    Add {
        name: String,
        #[arg(short = 'c', long = "category")]
        category: String,
        /// red, green, blue, yellow, black or gradient
        #[arg(long = "color")]
        color: Option<String>,
        /// Mark the new folder as a favorite
        #[arg(short = 'f', long = "favorite", action = ArgAction::SetTrue)]
        favorite: bool,
    },

    /// Create a folder named Newfolder, Newfolder1, ...
    New {
        #[arg(short = 'c', long = "category")]
        category: String,
    },

    /// List folders in a category ("Favorites" and "Bin" are views)
    List {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,
        #[arg(short = 's', long = "sort", value_enum)]
        sort_by: Option<SortOrder>,
        /// Reverse sort order
        #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
        reverse: bool,
        /// Also list bin entries deleted from this category
        #[arg(long = "include-deleted", action = ArgAction::SetTrue)]
        include_deleted: bool,
    },

    /// Rename a folder
    Rename { id: String, name: String },

    /// Change a folder's color
    Color { id: String, color: String },

    /// Add or remove a folder from favorites
    Favorite { id: String },

    /// Move a folder to the bin
    Delete { id: String },

    /// Bring a folder back from the bin
    Restore {
        id: String,
        /// Target category; defaults to the category it was deleted from
        #[arg(short = 'c', long = "category")]
        category: Option<String>,
    },

    /// Permanently delete a folder
    Purge { id: String },

    /// Permanently delete everything in the bin
    EmptyBin,

    /// Copy a folder into another category
    Copy {
        id: String,
        #[arg(short = 'c', long = "category")]
        category: String,
        #[arg(long = "on-conflict", value_enum)]
        on_conflict: Option<ConflictArg>,
    },

    /// Move a folder into another category
    Move {
        id: String,
        #[arg(short = 'c', long = "category")]
        category: String,
        #[arg(long = "on-conflict", value_enum)]
        on_conflict: Option<ConflictArg>,
    },

    /// Store a file from disk inside a folder
    Attach { id: String, path: PathBuf },

    /// List the attachments of a folder
    Attachments {
        id: String,
        #[arg(short = 's', long = "sort", value_enum)]
        sort_by: Option<SortOrder>,
        #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
        reverse: bool,
    },

    /// Remove an attachment from a folder
    Detach { id: String, attachment: String },
}

impl Command {
    /// Whether the command takes `--on-conflict`
    pub fn accepts_conflict_choice(&self) -> bool {
        matches!(self, Command::Copy { .. } | Command::Move { .. })
    }
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortOrder {
    /// Sort by name (alphabetical)
    #[default]
    Name,
    /// Sort by creation date (oldest first)
    Date,
}

impl From<SortOrder> for SortBy {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Name => SortBy::Name,
            SortOrder::Date => SortBy::Date,
        }
    }
}

/// What to do when a pasted name is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    /// Delete the existing folder and keep the name
    Replace,
    /// Paste as "<name> copy", "<name> copy 2", ...
    Rename,
}

impl From<ConflictArg> for ConflictChoice {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Replace => ConflictChoice::Replace,
            ConflictArg::Rename => ConflictChoice::Rename,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Log filter directive for the requested verbosity
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "folderkit=info",
            1 => "folderkit=debug",
            _ => "folderkit=trace",
        }
    }
}

/// Configuration derived from CLI arguments and the user config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: Option<PathBuf>,
    pub default_sort: SortOptions,
    pub user: UserConfig,
}

impl AppConfig {
    pub fn new(args: &Args, user: UserConfig) -> Self {
        AppConfig {
            data_file: args.data_file.clone().or_else(|| user.data_path()),
            default_sort: SortOptions::new(user.default_sort, user.reverse_sort),
            user,
        }
    }

    /// Sort options for a listing, falling back to the configured default
    pub fn sort_for(&self, sort_by: Option<SortOrder>, reverse: bool) -> SortOptions {
        match sort_by {
            Some(order) => SortOptions::new(order.into(), reverse),
            None => SortOptions::new(
                self.default_sort.sort_by,
                self.default_sort.reverse ^ reverse,
            ),
        }
    }
}

//! Directory operation options and error types.

use std::fmt;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for include/exclude name lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumDirPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Substring match.
    Literal,
}

/// Symlink handling policy during copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumDirSymlinkStrategy {
    /// Create a symbolic link at the destination (do not copy target bytes).
    CopyLinks,
    /// Follow the link and copy the target bytes/entries.
    Dereference,
    /// Ignore symlink entries.
    SkipLinks,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OptionsAndErrors

/// Input options for [`crate::dir::copy_with`].
#[derive(Debug, Clone)]
pub struct SpecDirCopyOptions {
    /// Include patterns applied to file basenames.
    pub patterns_include_files: Option<Vec<String>>,
    /// Exclude patterns applied to file basenames.
    pub patterns_exclude_files: Option<Vec<String>>,
    /// Include patterns applied to directory basenames.
    pub patterns_include_dirs: Option<Vec<String>>,
    /// Exclude patterns applied to directory basenames.
    pub patterns_exclude_dirs: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumDirPatternMode,
    /// Symlink handling behavior.
    pub rule_symlink: EnumDirSymlinkStrategy,
    /// Carry timestamps and extended attributes to copied files (Linux).
    pub if_preserve_metadata: bool,
    /// Do not mutate the filesystem; validate and count only.
    pub if_dry_run: bool,
}

impl Default for SpecDirCopyOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: None,
            patterns_exclude_files: None,
            patterns_include_dirs: None,
            patterns_exclude_dirs: None,
            rule_pattern: EnumDirPatternMode::Glob,
            rule_symlink: EnumDirSymlinkStrategy::CopyLinks,
            if_preserve_metadata: true,
            if_dry_run: false,
        }
    }
}

/// Failure of a directory operation, scoped to the offending path.
///
/// Directory operations report a definitive yes/no as `bool` where nothing
/// can go half-wrong (`prepare`), and this type everywhere an operation can
/// be attempted and fail partway.
#[derive(Debug)]
pub enum DirOpError {
    /// Path is not an existing directory where one is required.
    NotADirectory(PathBuf),
    /// Directory exists but cannot be read.
    NotReadable(PathBuf),
    /// Directory (or its nearest existing ancestor) cannot be written.
    NotWritable(PathBuf),
    /// Source and destination overlap (one contains the other).
    TreeOverlap {
        /// Source directory.
        source: PathBuf,
        /// Destination directory.
        destination: PathBuf,
    },
    /// Invalid include/exclude pattern.
    InvalidPattern(String),
    /// Directory creation failed.
    CreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Directory listing or entry inspection failed.
    ReadFailed {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// File or link copy failed.
    CopyFailed {
        /// Source path that could not be copied.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// File or directory removal failed.
    RemoveFailed {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl DirOpError {
    /// Failing path, where the failure is scoped to one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotADirectory(path)
            | Self::NotReadable(path)
            | Self::NotWritable(path) => Some(path),
            Self::TreeOverlap { source, .. } => Some(source),
            Self::InvalidPattern(_) => None,
            Self::CreateFailed { path, .. }
            | Self::ReadFailed { path, .. }
            | Self::CopyFailed { path, .. }
            | Self::RemoveFailed { path, .. } => Some(path),
        }
    }
}

impl fmt::Display for DirOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory(path) => {
                write!(f, "Not a directory: {}", path.display())
            }
            Self::NotReadable(path) => {
                write!(f, "Directory is not readable: {}", path.display())
            }
            Self::NotWritable(path) => {
                write!(f, "Directory is not writable: {}", path.display())
            }
            Self::TreeOverlap {
                source,
                destination,
            } => write!(
                f,
                "Source and destination directories overlap: {} <-> {}",
                source.display(),
                destination.display()
            ),
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::CreateFailed { path, message } => {
                write!(f, "Failed to create directory {}: {message}", path.display())
            }
            Self::ReadFailed { path, message } => {
                write!(f, "Failed to read {}: {message}", path.display())
            }
            Self::CopyFailed { path, message } => {
                write!(f, "Failed to copy {}: {message}", path.display())
            }
            Self::RemoveFailed { path, message } => {
                write!(f, "Failed to remove {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for DirOpError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{DirOpError, EnumDirPatternMode, SpecDirCopyOptions};

////////////////////////////////////////////////////////////////////////////////
// #region NamePatterns

#[derive(Debug, Clone)]
pub(crate) enum TypeNamePatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypeNamePatternSeq {
    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Literal(l_patterns) => l_patterns.iter().any(|p| name.contains(p.as_str())),
            Self::Glob(l_patterns) => l_patterns.iter().any(|p| p.is_match(name)),
            Self::Regex(l_patterns) => l_patterns.iter().any(|p| p.is_match(name)),
        }
    }
}

/// Compiled include/exclude basename filters for one copy run.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpecNamePatterns {
    patterns_include_files: Option<TypeNamePatternSeq>,
    patterns_exclude_files: Option<TypeNamePatternSeq>,
    patterns_include_dirs: Option<TypeNamePatternSeq>,
    patterns_exclude_dirs: Option<TypeNamePatternSeq>,
}

impl SpecNamePatterns {
    pub(crate) fn from_options(options: &SpecDirCopyOptions) -> Result<Self, DirOpError> {
        let rule_pattern = options.rule_pattern;
        Ok(Self {
            patterns_include_files: _compile(options.patterns_include_files.as_deref(), rule_pattern)?,
            patterns_exclude_files: _compile(options.patterns_exclude_files.as_deref(), rule_pattern)?,
            patterns_include_dirs: _compile(options.patterns_include_dirs.as_deref(), rule_pattern)?,
            patterns_exclude_dirs: _compile(options.patterns_exclude_dirs.as_deref(), rule_pattern)?,
        })
    }

    pub(crate) fn excludes_file(&self, name: &str) -> bool {
        _excludes(
            name,
            self.patterns_include_files.as_ref(),
            self.patterns_exclude_files.as_ref(),
        )
    }

    pub(crate) fn excludes_dir(&self, name: &str) -> bool {
        _excludes(
            name,
            self.patterns_include_dirs.as_ref(),
            self.patterns_exclude_dirs.as_ref(),
        )
    }
}

fn _excludes(
    name: &str,
    patterns_include: Option<&TypeNamePatternSeq>,
    patterns_exclude: Option<&TypeNamePatternSeq>,
) -> bool {
    if let Some(patterns_include) = patterns_include
        && !patterns_include.is_match(name)
    {
        return true;
    }
    patterns_exclude.is_some_and(|p| p.is_match(name))
}

fn _compile(
    patterns: Option<&[String]>,
    rule_pattern: EnumDirPatternMode,
) -> Result<Option<TypeNamePatternSeq>, DirOpError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumDirPatternMode::Literal => Ok(Some(TypeNamePatternSeq::Literal(patterns.to_vec()))),
        EnumDirPatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let matcher = Glob::new(pattern)
                    .map_err(|e| {
                        DirOpError::InvalidPattern(format!(
                            "Invalid pattern in include/exclude: {e}"
                        ))
                    })?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(Some(TypeNamePatternSeq::Glob(l_glob)))
        }
        EnumDirPatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = Regex::new(pattern).map_err(|e| {
                    DirOpError::InvalidPattern(format!("Invalid pattern in include/exclude: {e}"))
                })?;
                l_regex.push(regex);
            }
            Ok(Some(TypeNamePatternSeq::Regex(l_regex)))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathHelpers

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(path_resolved) = fs::canonicalize(path) {
        return path_resolved;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

pub(crate) fn is_tree_overlap(path_dir_src: &Path, path_dir_dst: &Path) -> bool {
    let path_src_resolved = _normalize_path(path_dir_src);
    let path_dst_resolved = _normalize_path(path_dir_dst);
    path_dst_resolved.starts_with(&path_src_resolved)
        || path_src_resolved.starts_with(&path_dst_resolved)
}

/// Closest ancestor present on disk; the path itself when it exists.
///
/// A relative path with no existing component resolves to `.`.
pub(crate) fn nearest_existing_ancestor(path: &Path) -> Option<PathBuf> {
    let mut path_cursor = path;
    loop {
        if path_cursor.as_os_str().is_empty() {
            return Some(PathBuf::from("."));
        }
        if fs::symlink_metadata(path_cursor).is_ok() {
            return Some(path_cursor.to_path_buf());
        }
        path_cursor = path_cursor.parent()?;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CopyPrimitives

/// Recreate the symlink `path_link_src` at `path_link_dst`.
pub(crate) fn copy_symbolic_link(
    path_link_src: &Path,
    path_link_dst: &Path,
) -> Result<(), io::Error> {
    let path_target = fs::read_link(path_link_src)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&path_target, path_link_dst)
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        if path_link_src.is_dir() {
            symlink_dir(&path_target, path_link_dst)
        } else {
            symlink_file(&path_target, path_link_dst)
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = path_target;
        Err(io::Error::other(
            "Symbolic links are unsupported on this platform",
        ))
    }
}

/// Byte-exact file copy.
///
/// `fs::copy` already carries permission bits; with `if_preserve_metadata`
/// the copy additionally receives the source's timestamps and extended
/// attributes on Linux.
pub(crate) fn copy_file_bytes(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_preserve_metadata: bool,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    if if_preserve_metadata {
        _apply_file_metadata(path_file_src, path_file_dst)?;
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn _apply_file_metadata(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    _copy_xattrs(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn _copy_xattrs(path_file_src: &Path, path_file_dst: &Path) {
    let Ok(iter_xattr_names) = xattr::list(path_file_src) else {
        return;
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

#[cfg(not(target_os = "linux"))]
fn _apply_file_metadata(_path_file_src: &Path, _path_file_dst: &Path) -> Result<(), io::Error> {
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

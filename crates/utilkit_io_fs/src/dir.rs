//! Directory queries, preparation, recursive copy and removal.
//!
//! Every operation is a pure function of the current filesystem state plus
//! its single side effect; nothing is cached between calls. Mutating
//! operations are best-effort: a partway failure aborts with the failing
//! path and leaves already-applied changes in place.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::{ReportDirCopy, ReportDirCopyBuilder};
use crate::spec::{DirOpError, EnumDirSymlinkStrategy, SpecDirCopyOptions};
use crate::status::PathStatus;
use crate::util::{
    SpecNamePatterns, copy_file_bytes, copy_symbolic_link, is_tree_overlap,
    nearest_existing_ancestor,
};

/// True iff `path` is an existing directory readable by the current process.
pub fn is_readable<P: AsRef<Path>>(path: P) -> bool {
    PathStatus::query(path).contains(PathStatus::READABLE)
}

/// True iff `path` is an existing writable directory, or does not exist but
/// could be created because its nearest existing ancestor is one.
///
/// The asymmetry with [`is_readable`] is deliberate: writability is a
/// meaningful question for not-yet-created paths (see [`prepare`]).
pub fn is_writable<P: AsRef<Path>>(path: P) -> bool {
    match nearest_existing_ancestor(path.as_ref()) {
        Some(path_existing) => PathStatus::query(&path_existing).contains(PathStatus::WRITABLE),
        None => false,
    }
}

/// Idempotent directory creation.
///
/// An existing writable directory is success with no side effect. A missing
/// path is created together with all missing ancestors. Returns false when a
/// component exists as a non-directory or creation fails; ancestors created
/// before a partway failure are kept.
pub fn prepare<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let status_path = PathStatus::query(path);
    if status_path.contains(PathStatus::EXISTS) {
        return status_path.contains(PathStatus::WRITABLE);
    }
    fs::create_dir_all(path).is_ok()
}

/// True iff the readable directory `path` contains zero entries.
pub fn is_empty<P: AsRef<Path>>(path: P) -> Result<bool, DirOpError> {
    let path = path.as_ref();
    let status_path = PathStatus::query(path);
    if !status_path.contains(PathStatus::EXISTS | PathStatus::IS_DIR) {
        return Err(DirOpError::NotADirectory(path.to_path_buf()));
    }
    if !status_path.contains(PathStatus::READABLE) {
        return Err(DirOpError::NotReadable(path.to_path_buf()));
    }

    let mut iter_entries = fs::read_dir(path).map_err(|e| DirOpError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(iter_entries.next().is_none())
}

/// Recursively copy `dir_source` into `dir_destination` with default options.
pub fn copy<P, Q>(dir_source: P, dir_destination: Q) -> Result<ReportDirCopy, DirOpError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    copy_with(dir_source, dir_destination, SpecDirCopyOptions::default())
}

/// Recursively copy `dir_source` into `dir_destination`.
///
/// Validation happens before any write: the source must be a readable
/// directory, source and destination must not overlap, and the destination
/// must be (or become) a writable directory. Traversal is depth-first in
/// sorted name order, subdirectories before files; an existing destination
/// is merged into and colliding files are overwritten byte-exact. The first
/// failing entry aborts the run; entries copied before the failure are kept.
pub fn copy_with<P, Q>(
    dir_source: P,
    dir_destination: Q,
    options: SpecDirCopyOptions,
) -> Result<ReportDirCopy, DirOpError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    let status_src = PathStatus::query(&path_dir_src);
    if !status_src.contains(PathStatus::EXISTS | PathStatus::IS_DIR) {
        return Err(DirOpError::NotADirectory(path_dir_src));
    }
    if !status_src.contains(PathStatus::READABLE) {
        return Err(DirOpError::NotReadable(path_dir_src));
    }
    if is_tree_overlap(&path_dir_src, &path_dir_dst) {
        return Err(DirOpError::TreeOverlap {
            source: path_dir_src,
            destination: path_dir_dst,
        });
    }

    let status_dst = PathStatus::query(&path_dir_dst);
    if status_dst.contains(PathStatus::EXISTS) {
        if !status_dst.contains(PathStatus::IS_DIR) {
            return Err(DirOpError::NotADirectory(path_dir_dst));
        }
        if !status_dst.contains(PathStatus::WRITABLE) {
            return Err(DirOpError::NotWritable(path_dir_dst));
        }
    } else if options.if_dry_run {
        if !is_writable(&path_dir_dst) {
            return Err(DirOpError::NotWritable(path_dir_dst));
        }
    } else {
        fs::create_dir_all(&path_dir_dst).map_err(|e| DirOpError::CreateFailed {
            path: path_dir_dst.clone(),
            message: e.to_string(),
        })?;
    }

    let patterns = SpecNamePatterns::from_options(&options)?;
    let mut spec_cp_ctx = SpecDirCopyContext {
        options,
        patterns,
        builder: ReportDirCopyBuilder::default(),
        set_visited_dirs: HashSet::new(),
    };
    copy_directory(&path_dir_src, &path_dir_dst, &mut spec_cp_ctx)?;
    Ok(spec_cp_ctx.builder.build())
}

/// Recursively delete `path` and everything beneath it.
///
/// A missing `path` is success (idempotent deletion). Children are removed
/// depth-first, child directories before child files, in sorted name order;
/// the first failure aborts with the failing path while earlier deletions
/// are kept. Symbolic links are removed, never followed.
pub fn remove<P: AsRef<Path>>(path: P) -> Result<(), DirOpError> {
    let path = path.as_ref();
    let meta_path = match fs::symlink_metadata(path) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(DirOpError::ReadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    if !meta_path.file_type().is_dir() {
        return fs::remove_file(path).map_err(|e| DirOpError::RemoveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        });
    }
    remove_directory(path)
}

#[derive(Debug)]
struct SpecDirCopyContext {
    options: SpecDirCopyOptions,
    patterns: SpecNamePatterns,
    builder: ReportDirCopyBuilder,
    set_visited_dirs: HashSet<(u64, u64)>,
}

#[derive(Debug, Clone)]
struct SpecWalkEntry {
    path_entry: PathBuf,
    name_entry: String,
    if_is_symlink: bool,
}

fn copy_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_cp_ctx: &mut SpecDirCopyContext,
) -> Result<(), DirOpError> {
    if spec_cp_ctx.options.rule_symlink == EnumDirSymlinkStrategy::Dereference
        && !mark_directory_visited(path_dir_src, spec_cp_ctx)?
    {
        return Ok(());
    }

    let (l_dirs, l_files) = list_directory_sorted(path_dir_src)?;

    for entry_dir in l_dirs {
        spec_cp_ctx.builder.add_scanned();
        if spec_cp_ctx.patterns.excludes_dir(&entry_dir.name_entry) {
            spec_cp_ctx.builder.add_skipped();
            continue;
        }
        let path_dir_dst_sub = path_dir_dst.join(&entry_dir.name_entry);

        if entry_dir.if_is_symlink {
            match spec_cp_ctx.options.rule_symlink {
                EnumDirSymlinkStrategy::SkipLinks => {
                    spec_cp_ctx.builder.add_skipped();
                    continue;
                }
                EnumDirSymlinkStrategy::CopyLinks => {
                    if !spec_cp_ctx.options.if_dry_run {
                        copy_symbolic_link(&entry_dir.path_entry, &path_dir_dst_sub).map_err(
                            |e| DirOpError::CopyFailed {
                                path: entry_dir.path_entry.clone(),
                                message: e.to_string(),
                            },
                        )?;
                    }
                    spec_cp_ctx.builder.add_link_copied();
                    continue;
                }
                EnumDirSymlinkStrategy::Dereference => {}
            }
        }

        if spec_cp_ctx.options.if_dry_run {
            spec_cp_ctx.builder.add_dir_created();
        } else {
            match fs::create_dir(&path_dir_dst_sub) {
                Ok(_) => spec_cp_ctx.builder.add_dir_created(),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path_dir_dst_sub.is_dir() => {
                }
                Err(e) => {
                    return Err(DirOpError::CreateFailed {
                        path: path_dir_dst_sub,
                        message: e.to_string(),
                    });
                }
            }
        }
        copy_directory(&entry_dir.path_entry, &path_dir_dst_sub, spec_cp_ctx)?;
    }

    for entry_file in l_files {
        spec_cp_ctx.builder.add_scanned();
        if spec_cp_ctx.patterns.excludes_file(&entry_file.name_entry) {
            spec_cp_ctx.builder.add_skipped();
            continue;
        }
        let path_file_dst = path_dir_dst.join(&entry_file.name_entry);
        copy_file_entry(&entry_file, &path_file_dst, spec_cp_ctx)?;
    }

    Ok(())
}

fn copy_file_entry(
    entry_file: &SpecWalkEntry,
    path_file_dst: &Path,
    spec_cp_ctx: &mut SpecDirCopyContext,
) -> Result<(), DirOpError> {
    let path_file_src = &entry_file.path_entry;

    if entry_file.if_is_symlink {
        match spec_cp_ctx.options.rule_symlink {
            EnumDirSymlinkStrategy::SkipLinks => {
                spec_cp_ctx.builder.add_skipped();
                return Ok(());
            }
            EnumDirSymlinkStrategy::CopyLinks => {
                if !spec_cp_ctx.options.if_dry_run {
                    copy_symbolic_link(path_file_src, path_file_dst).map_err(|e| {
                        DirOpError::CopyFailed {
                            path: path_file_src.clone(),
                            message: e.to_string(),
                        }
                    })?;
                }
                spec_cp_ctx.builder.add_link_copied();
                return Ok(());
            }
            EnumDirSymlinkStrategy::Dereference => {
                if !path_file_src.exists() {
                    return Err(DirOpError::CopyFailed {
                        path: path_file_src.clone(),
                        message: "Broken symbolic link".to_string(),
                    });
                }
            }
        }
    }

    // follows the link in dereference mode
    let meta_file_src = fs::metadata(path_file_src).map_err(|e| DirOpError::ReadFailed {
        path: path_file_src.clone(),
        message: e.to_string(),
    })?;
    if !meta_file_src.is_file() {
        spec_cp_ctx
            .builder
            .add_warning(format!("Special file skipped: {}", path_file_src.display()));
        spec_cp_ctx.builder.add_skipped();
        return Ok(());
    }

    if !spec_cp_ctx.options.if_dry_run {
        copy_file_bytes(
            path_file_src,
            path_file_dst,
            spec_cp_ctx.options.if_preserve_metadata,
        )
        .map_err(|e| DirOpError::CopyFailed {
            path: path_file_src.clone(),
            message: e.to_string(),
        })?;
    }
    spec_cp_ctx.builder.add_file_copied();
    Ok(())
}

fn list_directory_sorted(
    path_dir: &Path,
) -> Result<(Vec<SpecWalkEntry>, Vec<SpecWalkEntry>), DirOpError> {
    let iter_entries = fs::read_dir(path_dir).map_err(|e| DirOpError::ReadFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut l_dirs: Vec<SpecWalkEntry> = Vec::new();
    let mut l_files: Vec<SpecWalkEntry> = Vec::new();
    for entry_res in iter_entries {
        let entry = entry_res.map_err(|e| DirOpError::ReadFailed {
            path: path_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path_entry = entry.path();
        let name_entry = entry.file_name().to_string_lossy().to_string();
        let file_type_entry = entry.file_type().map_err(|e| DirOpError::ReadFailed {
            path: path_entry.clone(),
            message: e.to_string(),
        })?;

        let b_is_symlink = file_type_entry.is_symlink();
        let b_is_dir = file_type_entry.is_dir() || (b_is_symlink && path_entry.is_dir());
        let spec_entry = SpecWalkEntry {
            path_entry,
            name_entry,
            if_is_symlink: b_is_symlink,
        };
        if b_is_dir {
            l_dirs.push(spec_entry);
        } else {
            l_files.push(spec_entry);
        }
    }

    l_dirs.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
    l_files.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
    Ok((l_dirs, l_files))
}

#[cfg(unix)]
fn mark_directory_visited(
    path_dir: &Path,
    spec_cp_ctx: &mut SpecDirCopyContext,
) -> Result<bool, DirOpError> {
    use std::os::unix::fs::MetadataExt;

    let stat_dir = fs::metadata(path_dir).map_err(|e| DirOpError::ReadFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })?;
    if !spec_cp_ctx
        .set_visited_dirs
        .insert((stat_dir.dev(), stat_dir.ino()))
    {
        spec_cp_ctx
            .builder
            .add_warning(format!("Symlink loop detected: {}", path_dir.display()));
        return Ok(false);
    }
    Ok(true)
}

#[cfg(not(unix))]
fn mark_directory_visited(
    _path_dir: &Path,
    _spec_cp_ctx: &mut SpecDirCopyContext,
) -> Result<bool, DirOpError> {
    Ok(true)
}

fn remove_directory(path_dir: &Path) -> Result<(), DirOpError> {
    let iter_entries = fs::read_dir(path_dir).map_err(|e| DirOpError::ReadFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut l_dirs: Vec<PathBuf> = Vec::new();
    let mut l_files: Vec<PathBuf> = Vec::new();
    for entry_res in iter_entries {
        let entry = entry_res.map_err(|e| DirOpError::ReadFailed {
            path: path_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let file_type_entry = entry.file_type().map_err(|e| DirOpError::ReadFailed {
            path: entry.path(),
            message: e.to_string(),
        })?;
        // symlinks land with the files: the link itself is removed
        if file_type_entry.is_dir() {
            l_dirs.push(entry.path());
        } else {
            l_files.push(entry.path());
        }
    }
    l_dirs.sort();
    l_files.sort();

    for path_dir_sub in l_dirs {
        remove_directory(&path_dir_sub)?;
    }
    for path_file in l_files {
        fs::remove_file(&path_file).map_err(|e| DirOpError::RemoveFailed {
            path: path_file.clone(),
            message: e.to_string(),
        })?;
    }
    fs::remove_dir(path_dir).map_err(|e| DirOpError::RemoveFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })
}

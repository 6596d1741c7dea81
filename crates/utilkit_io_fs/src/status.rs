//! Path status mask.

use std::fs;
use std::path::Path;

use bitflags::bitflags;

bitflags! {
    /// Point-in-time classification of a filesystem path.
    ///
    /// The mask is computed fresh on every [`PathStatus::query`] call and is
    /// never cached: two queries of the same path may disagree if the
    /// filesystem changed in between.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PathStatus: u8 {
        /// Path exists.
        const EXISTS = 1;
        /// Path is a directory.
        const IS_DIR = 1 << 1;
        /// Path is readable by the current process.
        const IS_READABLE = 1 << 2;
        /// Path is writable by the current process.
        const IS_WRITABLE = 1 << 3;
        /// Existing directory that can be read.
        const READABLE = Self::EXISTS.bits() | Self::IS_DIR.bits() | Self::IS_READABLE.bits();
        /// Existing directory that can be written.
        const WRITABLE = Self::EXISTS.bits() | Self::IS_DIR.bits() | Self::IS_WRITABLE.bits();
        /// Existing directory that can be read and written.
        const READABLE_WRITABLE = Self::READABLE.bits() | Self::WRITABLE.bits();
    }
}

impl PathStatus {
    /// Classify `path` against the current filesystem state.
    ///
    /// Non-existent paths yield the empty mask. Symbolic links are followed,
    /// so a link to a directory reports `IS_DIR`.
    pub fn query<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let Ok(meta_path) = fs::metadata(path) else {
            return Self::empty();
        };

        let mut status_path = Self::EXISTS;
        if meta_path.is_dir() {
            status_path |= Self::IS_DIR;
        }
        if check_native_access(path, AccessProbe::Read) {
            status_path |= Self::IS_READABLE;
        }
        if check_native_access(path, AccessProbe::Write) {
            status_path |= Self::IS_WRITABLE;
        }
        status_path
    }
}

#[derive(Debug, Clone, Copy)]
enum AccessProbe {
    Read,
    Write,
}

#[cfg(unix)]
fn check_native_access(path: &Path, probe: AccessProbe) -> bool {
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    let n_mode = match probe {
        AccessProbe::Read => libc::R_OK,
        AccessProbe::Write => libc::W_OK,
    };
    unsafe { libc::access(c_path.as_ptr(), n_mode) == 0 }
}

#[cfg(not(unix))]
fn check_native_access(path: &Path, probe: AccessProbe) -> bool {
    match probe {
        AccessProbe::Read => fs::metadata(path).is_ok(),
        AccessProbe::Write => fs::metadata(path)
            .map(|meta_path| !meta_path.permissions().readonly())
            .unwrap_or(false),
    }
}

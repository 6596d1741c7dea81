//! `utilkit_io_fs` v1:
//! Directory utility kernel.
//!
//! - `dir`    : directory queries and recursive operations
//! - `report` : run-time report model
//! - `spec`   : enums/options/errors
//! - `status` : path status mask
//! - `util`   : shared helper functions

pub mod dir;
pub mod report;
pub mod spec;
pub mod status;
mod util;

pub use dir::{copy, copy_with, is_empty, is_readable, is_writable, prepare, remove};
pub use report::{ReportDirCopy, ReportDirCopyBuilder};
pub use spec::{DirOpError, EnumDirPatternMode, EnumDirSymlinkStrategy, SpecDirCopyOptions};
pub use status::PathStatus;

//! Copy report model and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one copy run.
#[derive(Debug, Default, Clone)]
pub struct ReportDirCopy {
    /// Total scanned directory/file entries.
    pub cnt_scanned: u64,
    /// Number of destination directories created.
    pub cnt_dirs_created: u64,
    /// Number of regular files copied byte-exact.
    pub cnt_files_copied: u64,
    /// Number of symbolic links recreated at the destination.
    pub cnt_links_copied: u64,
    /// Number of entries skipped by filter or strategy.
    pub cnt_skipped: u64,
    /// Non-fatal conditions collected during traversal.
    pub warnings: Vec<String>,
}

impl ReportDirCopy {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_dirs_created".to_string(), self.cnt_dirs_created);
        dict_counts.insert("cnt_files_copied".to_string(), self.cnt_files_copied);
        dict_counts.insert("cnt_links_copied".to_string(), self.cnt_links_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} dirs={} files={} links={} skipped={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_dirs_created"],
            dict_counts["cnt_files_copied"],
            dict_counts["cnt_links_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportDirCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportDirCopyBuilder {
    /// See [`ReportDirCopy::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportDirCopy::cnt_dirs_created`].
    pub cnt_dirs_created: u64,
    /// See [`ReportDirCopy::cnt_files_copied`].
    pub cnt_files_copied: u64,
    /// See [`ReportDirCopy::cnt_links_copied`].
    pub cnt_links_copied: u64,
    /// See [`ReportDirCopy::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportDirCopy::warnings`].
    pub warnings: Vec<String>,
}

impl ReportDirCopyBuilder {
    /// Increment scanned count by one.
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Increment created-directory count by one.
    pub fn add_dir_created(&mut self) {
        self.cnt_dirs_created += 1;
    }

    /// Increment copied-file count by one.
    pub fn add_file_copied(&mut self) {
        self.cnt_files_copied += 1;
    }

    /// Increment copied-link count by one.
    pub fn add_link_copied(&mut self) {
        self.cnt_links_copied += 1;
    }

    /// Increment skipped count by one.
    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportDirCopy {
        ReportDirCopy {
            cnt_scanned: self.cnt_scanned,
            cnt_dirs_created: self.cnt_dirs_created,
            cnt_files_copied: self.cnt_files_copied,
            cnt_links_copied: self.cnt_links_copied,
            cnt_skipped: self.cnt_skipped,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReportDirCopy;

    #[test]
    fn report_to_dict_and_format_agree() {
        let report = ReportDirCopy {
            cnt_scanned: 9,
            cnt_dirs_created: 2,
            cnt_files_copied: 5,
            cnt_links_copied: 1,
            cnt_skipped: 1,
            warnings: vec!["w".to_string()],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_scanned"], 9);
        assert_eq!(dict_counts["cnt_dirs_created"], 2);
        assert_eq!(dict_counts["cnt_files_copied"], 5);
        assert_eq!(dict_counts["cnt_links_copied"], 1);
        assert_eq!(dict_counts["cnt_skipped"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[COPY]");
        assert_eq!(
            txt,
            "[COPY] scanned=9 dirs=2 files=5 links=1 skipped=1 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
    }
}

use crate::diff::TagClassification;
use crate::dictionary::{name_of, truncate_value, DISPLAY_LIMIT};
use crate::types::BatchResult;
use crate::uid::{ConsistencyReport, SharedAssignment};
use colored::Colorize;
use dicom_core::Tag;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// Text report for a two-file comparison
///
/// Differing tags are always listed; `all` adds the common and unique sets.
/// Every section is in ascending tag order.
pub struct DiffReport<'a> {
    classification: &'a TagClassification,
    left: &'a Path,
    right: &'a Path,
    all: bool,
    color: bool,
}

impl<'a> DiffReport<'a> {
    pub fn new(classification: &'a TagClassification, left: &'a Path, right: &'a Path) -> Self {
        Self {
            classification,
            left,
            right,
            all: false,
            color: true,
        }
    }

    /// Include common and unique tags
    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Colour file A red and file B green
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: String, left: bool) -> String {
        match (self.color, left) {
            (false, _) => text,
            (true, true) => text.red().to_string(),
            (true, false) => text.green().to_string(),
        }
    }

    fn write_tags(&self, f: &mut fmt::Formatter<'_>, title: &str, tags: &[Tag]) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{} ({}):", title, tags.len())?;
        for tag in tags {
            writeln!(f, "{} {}", tag, name_of(*tag))?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for DiffReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Comparing DICOM tags between {} and {}",
            self.left.display(),
            self.right.display()
        )?;

        if self.all {
            self.write_tags(f, "Common Tags", &self.classification.common)?;
            self.write_tags(f, "Unique Tags in File 1", &self.classification.unique_to_a)?;
            self.write_tags(f, "Unique Tags in File 2", &self.classification.unique_to_b)?;
        }

        writeln!(f)?;
        writeln!(f, "Differing Tags ({}):", self.classification.differing.len())?;
        for diff in &self.classification.differing {
            writeln!(f, "{} {}:", diff.tag, name_of(diff.tag))?;
            let left = format!("  File 1: {}", truncate_value(&diff.left, DISPLAY_LIMIT));
            let right = format!("  File 2: {}", truncate_value(&diff.right, DISPLAY_LIMIT));
            writeln!(f, "{}", self.paint(left, true))?;
            writeln!(f, "{}", self.paint(right, false))?;
        }
        Ok(())
    }
}

/// Summary of a batch run: counts, the failure flag, and each failure
pub struct BatchSummary<'a> {
    result: &'a BatchResult,
}

impl<'a> BatchSummary<'a> {
    pub fn new(result: &'a BatchResult) -> Self {
        Self { result }
    }
}

impl<'a> fmt::Display for BatchSummary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files processed: {}", self.result.total())?;
        writeln!(f, "Updated:         {}", self.result.success_count())?;
        writeln!(f, "Failed:          {}", self.result.failure_count())?;
        writeln!(f, "Had failures:    {}", self.result.had_failures())?;
        for (path, err) in self.result.failures() {
            writeln!(f, "  {}: {}", path.display(), err)?;
        }
        Ok(())
    }
}

/// Report for a shared identifier assignment
pub struct AssignmentReport<'a> {
    assignment: &'a SharedAssignment,
}

impl<'a> AssignmentReport<'a> {
    pub fn new(assignment: &'a SharedAssignment) -> Self {
        Self { assignment }
    }
}

impl<'a> fmt::Display for AssignmentReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}",
            self.assignment.scope.tag_name(),
            self.assignment.uid
        )?;
        for path in self.assignment.result.successes() {
            writeln!(f, "Set {} for {}", self.assignment.scope.tag_name(), path.display())?;
        }
        write!(f, "{}", BatchSummary::new(&self.assignment.result))
    }
}

/// Report for an identifier consistency check
pub struct ConsistencySummary<'a> {
    report: &'a ConsistencyReport,
}

impl<'a> ConsistencySummary<'a> {
    pub fn new(report: &'a ConsistencyReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for ConsistencySummary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files checked: {}", self.report.files_checked)?;
        for check in &self.report.scopes {
            let status = if check.is_consistent() { "ok" } else { "INCONSISTENT" };
            writeln!(f)?;
            writeln!(
                f,
                "{} ({}): {} distinct value(s), {} missing, {}",
                check.scope.tag_name(),
                check.scope,
                check.values.len(),
                check.missing.len(),
                status
            )?;
            if check.scope.is_shared() {
                if check.values.len() > 1 {
                    for (value, paths) in &check.values {
                        writeln!(f, "  {} ({} file(s))", value, paths.len())?;
                    }
                }
            } else {
                for (value, paths) in check.duplicates() {
                    writeln!(f, "  duplicate {}:", value)?;
                    for path in paths {
                        writeln!(f, "    {}", path.display())?;
                    }
                }
            }
        }
        if !self.report.unreadable.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unreadable: {}", self.report.unreadable.len())?;
            for (path, err) in &self.report.unreadable {
                writeln!(f, "  {}: {}", path.display(), err)?;
            }
        }
        Ok(())
    }
}

/// `key=[values]` lines for a two-tag scan
pub struct GroupReport<'a> {
    groups: &'a BTreeMap<String, BTreeSet<String>>,
}

impl<'a> GroupReport<'a> {
    pub fn new(groups: &'a BTreeMap<String, BTreeSet<String>>) -> Self {
        Self { groups }
    }
}

impl<'a> fmt::Display for GroupReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, values) in self.groups {
            let joined: Vec<&str> = values.iter().map(String::as_str).collect();
            writeln!(f, "{}=[{}]", key, joined.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TagDifference;
    use crate::dictionary::{MODALITY, PATIENT_ID, PATIENT_NAME};
    use crate::error::DcmTagsError;
    use crate::types::FileOutcome;
    use std::path::PathBuf;

    fn classification() -> TagClassification {
        TagClassification {
            common: vec![PATIENT_NAME],
            differing: vec![TagDifference {
                tag: MODALITY,
                left: "CT".to_string(),
                right: "x".repeat(150),
            }],
            unique_to_a: vec![PATIENT_ID],
            unique_to_b: vec![],
        }
    }

    #[test]
    fn test_diff_report_format() {
        let c = classification();
        let report = DiffReport::new(&c, Path::new("a.dcm"), Path::new("b.dcm")).color(false);
        let output = format!("{}", report);

        assert!(output.contains("Comparing DICOM tags between a.dcm and b.dcm"));
        assert!(output.contains("Differing Tags (1):"));
        assert!(output.contains("(0008,0060) Modality:"));
        assert!(output.contains("  File 1: CT"));
        assert!(output.contains(&format!("  File 2: {}...", "x".repeat(100))));
        assert!(!output.contains("Common Tags"));
    }

    #[test]
    fn test_diff_report_all_sections() {
        let c = classification();
        let output = format!(
            "{}",
            DiffReport::new(&c, Path::new("a"), Path::new("b"))
                .all(true)
                .color(false)
        );
        assert!(output.contains("Common Tags (1):"));
        assert!(output.contains("(0010,0010) PatientName"));
        assert!(output.contains("Unique Tags in File 1 (1):"));
        assert!(output.contains("(0010,0020) PatientID"));
        assert!(output.contains("Unique Tags in File 2 (0):"));
    }

    #[test]
    fn test_batch_summary_lists_failures() {
        let mut result = BatchResult::new();
        result.push(FileOutcome::success(PathBuf::from("a.dcm")));
        result.push(FileOutcome::failed(
            PathBuf::from("b.dcm"),
            DcmTagsError::parse(Path::new("b.dcm"), "truncated"),
        ));
        let output = format!("{}", BatchSummary::new(&result));

        assert!(output.contains("Files processed: 2"));
        assert!(output.contains("Updated:         1"));
        assert!(output.contains("Failed:          1"));
        assert!(output.contains("Had failures:    true"));
        assert!(output.contains("b.dcm: Failed to parse b.dcm: truncated"));
    }

    #[test]
    fn test_group_report() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "CT".to_string(),
            ["HEAD", "CHEST"].iter().map(|s| s.to_string()).collect(),
        );
        let output = format!("{}", GroupReport::new(&groups));
        assert_eq!(output, "CT=[CHEST, HEAD]\n");
    }
}

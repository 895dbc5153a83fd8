//! Tag projections over a directory
//!
//! [`TagTable`] is one row per file (or per distinct combination of values),
//! written as delimited text. [`scan_two_tags`] groups one tag's values by
//! another's, e.g. the body parts seen for each modality.

use crate::batch::collect_dicom_files;
use crate::dataset::{open_dataset, Dataset};
use crate::dictionary::{render_value, TagEntry};
use crate::error::{DcmTagsError, Result};
use crate::types::BatchConfig;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Values of the requested tags for a set of files
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TagTable {
    /// Requested tag names, in request order
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Files skipped because they could not be read
    #[cfg_attr(feature = "json", serde(skip))]
    pub skipped: Vec<(PathBuf, String)>,
}

impl TagTable {
    /// Projects `tags` over every DICOM file under `root`
    ///
    /// Absent tags give empty cells. With `dedup`, only the first row of
    /// each distinct value combination is kept, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns a usage error if `tags` is empty and `NotFound` if `root` is
    /// missing. Unreadable files are skipped and listed in `skipped`.
    pub fn project(
        root: &Path,
        tags: &[TagEntry],
        dedup: bool,
        config: &BatchConfig,
    ) -> Result<Self> {
        if tags.is_empty() {
            return Err(DcmTagsError::Usage("no tags requested".to_string()));
        }

        let mut table = TagTable {
            headers: tags.iter().map(|t| t.name.clone()).collect(),
            ..Default::default()
        };
        let mut seen: HashSet<Vec<String>> = HashSet::new();

        for path in collect_dicom_files(root, config)? {
            let obj = match open_dataset(&path) {
                Ok(obj) => obj,
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    table.skipped.push((path, e.to_string()));
                    continue;
                }
            };
            let row = project_row(&*obj, tags);
            if dedup && !seen.insert(row.clone()) {
                debug!("Duplicate row from {}", path.display());
                continue;
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Writes the header and rows as delimited text
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        out.write_record(&self.headers).map_err(csv_error)?;
        for row in &self.rows {
            out.write_record(row).map_err(csv_error)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> DcmTagsError {
    DcmTagsError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// One row of rendered values, one cell per requested tag
pub fn project_row<D: Dataset + ?Sized>(dcm: &D, tags: &[TagEntry]) -> Vec<String> {
    tags.iter()
        .map(|t| dcm.get_element(t.tag).map(render_value).unwrap_or_default())
        .collect()
}

/// Groups the values of `value_tag` by the value of `key_tag`
///
/// Unreadable files are skipped with a warning.
pub fn scan_two_tags(
    root: &Path,
    key_tag: &TagEntry,
    value_tag: &TagEntry,
    config: &BatchConfig,
) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for path in collect_dicom_files(root, config)? {
        let obj = match open_dataset(&path) {
            Ok(obj) => obj,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        let row = project_row(&*obj, &[key_tag.clone(), value_tag.clone()]);
        let mut cells = row.into_iter();
        let key = cells.next().unwrap_or_default();
        let value = cells.next().unwrap_or_default();
        groups.entry(key).or_default().insert(value);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::{make_object, write_object};
    use crate::dictionary::{lookup, BODY_PART_EXAMINED, IMAGE_TYPE, MODALITY};
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use std::fs;
    use tempfile::TempDir;

    fn write_with(dir: &Path, name: &str, modality: &str, body_part: Option<&str>) {
        let sop = format!("1.2.3.{}", name.len() + modality.len());
        let mut obj = make_object(&sop);
        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from(modality)));
        if let Some(part) = body_part {
            obj.put(DataElement::new(BODY_PART_EXAMINED, VR::CS, PrimitiveValue::from(part)));
        }
        obj.put(DataElement::new(
            IMAGE_TYPE,
            VR::CS,
            PrimitiveValue::Strs(vec!["ORIGINAL".to_string(), "PRIMARY".to_string()].into()),
        ));
        write_object(&dir.join(name), obj, &sop);
    }

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        write_with(temp_dir.path(), "a.dcm", "CT", Some("HEAD"));
        write_with(temp_dir.path(), "b.dcm", "CT", Some("HEAD"));
        write_with(temp_dir.path(), "c.dcm", "CT", Some("CHEST"));
        write_with(temp_dir.path(), "d.dcm", "MR", None);
        fs::write(temp_dir.path().join("e.dcm"), b"broken").unwrap();
        temp_dir
    }

    #[test]
    fn test_project_one_row_per_file() {
        let dir = fixture();
        let tags = vec![lookup("Modality").unwrap(), lookup("BodyPartExamined").unwrap()];
        let table = TagTable::project(dir.path(), &tags, false, &BatchConfig::default()).unwrap();

        assert_eq!(table.headers, vec!["Modality", "BodyPartExamined"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[3], vec!["MR".to_string(), String::new()]);
        assert_eq!(table.skipped.len(), 1);
    }

    #[test]
    fn test_project_dedup_keeps_first_seen_order() {
        let dir = fixture();
        let tags = vec![lookup("Modality").unwrap(), lookup("BodyPartExamined").unwrap()];
        let table = TagTable::project(dir.path(), &tags, true, &BatchConfig::default()).unwrap();

        assert_eq!(
            table.rows,
            vec![
                vec!["CT".to_string(), "HEAD".to_string()],
                vec!["CT".to_string(), "CHEST".to_string()],
                vec!["MR".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn test_write_delimited() {
        let dir = fixture();
        let tags = vec![lookup("Modality").unwrap(), lookup("ImageType").unwrap()];
        let table = TagTable::project(dir.path(), &tags, true, &BatchConfig::default()).unwrap();

        let mut buf = Vec::new();
        table.write_delimited(&mut buf, b',').unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Modality,ImageType\nCT,ORIGINAL\\PRIMARY\nMR,ORIGINAL\\PRIMARY\n"
        );
    }

    #[test]
    fn test_project_requires_tags() {
        let dir = fixture();
        assert!(TagTable::project(dir.path(), &[], false, &BatchConfig::default()).is_err());
    }

    #[test]
    fn test_scan_two_tags() {
        let dir = fixture();
        let groups = scan_two_tags(
            dir.path(),
            &lookup("Modality").unwrap(),
            &lookup("BodyPartExamined").unwrap(),
            &BatchConfig::default(),
        )
        .unwrap();

        assert_eq!(groups.len(), 2);
        let ct: Vec<_> = groups["CT"].iter().cloned().collect();
        assert_eq!(ct, vec!["CHEST", "HEAD"]);
        assert!(groups["MR"].contains(""));
    }
}

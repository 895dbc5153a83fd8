//! Dataset capability and the file load/save boundary
//!
//! Parsing and serialisation are delegated to `dicom-object`. The rest of
//! the crate only sees the [`Dataset`] capability: enumerate, get, set and
//! remove elements by tag.

use crate::error::{DcmTagsError, Result};
use dicom_core::header::Header;
use dicom_core::Tag;
use dicom_object::mem::InMemElement;
use dicom_object::{open_file, DefaultDicomObject, InMemDicomObject};
use log::debug;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Element-level access to a tag/value dataset
pub trait Dataset {
    /// All top-level elements, in ascending tag order
    fn iter_elements(&self) -> Vec<&InMemElement>;

    /// Element at `tag`, if present
    fn get_element(&self, tag: Tag) -> Option<&InMemElement>;

    /// Inserts or replaces the element at its tag, returning the previous one
    fn set_element(&mut self, element: InMemElement) -> Option<InMemElement>;

    /// Removes the element at `tag`, returning whether it was present
    fn remove_tag(&mut self, tag: Tag) -> bool;

    /// All top-level tags, ascending
    fn sorted_tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.iter_elements().iter().map(|e| e.tag()).collect();
        tags.sort();
        tags
    }

    /// Whether `tag` is present, regardless of its value
    fn contains(&self, tag: Tag) -> bool {
        self.get_element(tag).is_some()
    }
}

impl Dataset for InMemDicomObject {
    fn iter_elements(&self) -> Vec<&InMemElement> {
        self.into_iter().collect()
    }

    fn get_element(&self, tag: Tag) -> Option<&InMemElement> {
        self.element(tag).ok()
    }

    fn set_element(&mut self, element: InMemElement) -> Option<InMemElement> {
        self.put(element)
    }

    fn remove_tag(&mut self, tag: Tag) -> bool {
        self.remove_element(tag)
    }
}

/// Loads a DICOM file
///
/// # Errors
///
/// - `NotFound` if the path does not exist
/// - `Parse` if the file is not a valid DICOM dataset
pub fn open_dataset(path: &Path) -> Result<DefaultDicomObject> {
    if !path.exists() {
        return Err(DcmTagsError::NotFound(path.to_path_buf()));
    }
    debug!("Reading {}", path.display());
    open_file(path).map_err(|e| DcmTagsError::parse(path, e))
}

/// Writes a DICOM file in place of `path`
///
/// The object is first serialised to a temporary file in the same
/// directory, then renamed over the target, so a failed write never leaves
/// a partially rewritten file behind. An existing target keeps its
/// permissions.
///
/// # Errors
///
/// Returns `Write` if serialisation or the final rename fails.
pub fn save_dataset(obj: &DefaultDicomObject, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| DcmTagsError::write(path, e))?;
    obj.write_to_file(tmp.path())
        .map_err(|e| DcmTagsError::write(path, e))?;
    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), existing.permissions())
            .map_err(|e| DcmTagsError::write(path, e))?;
    }
    tmp.persist(path).map_err(|e| DcmTagsError::write(path, e.error))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Keeps the file meta MediaStorageSOPInstanceUID in step with SOPInstanceUID
pub fn sync_media_storage_instance_uid(obj: &mut DefaultDicomObject, uid: &str) {
    let meta = obj.meta_mut();
    meta.media_storage_sop_instance_uid = uid.to_string();
    meta.update_information_group_length();
}

#[cfg(test)]
pub(crate) mod testing {
    //! Synthesised DICOM files for unit tests

    use super::*;
    use crate::dictionary::tags::{MODALITY, PATIENT_NAME, SOP_CLASS_UID, SOP_INSTANCE_UID};
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_object::FileMetaTableBuilder;

    pub const SECONDARY_CAPTURE: &str = "1.2.840.10008.5.1.4.1.1.7";
    pub const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

    /// Minimal dataset with class/instance identifiers and a few common tags
    pub fn make_object(sop_uid: &str) -> InMemDicomObject {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            SOP_CLASS_UID,
            VR::UI,
            PrimitiveValue::from(SECONDARY_CAPTURE),
        ));
        obj.put(DataElement::new(
            SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from(sop_uid),
        ));
        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("OT")));
        obj.put(DataElement::new(
            PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from("Doe^Jane"),
        ));
        obj
    }

    /// Wraps a dataset with a file meta group
    pub fn into_file(obj: InMemDicomObject, sop_uid: &str) -> DefaultDicomObject {
        let meta = FileMetaTableBuilder::new()
            .media_storage_sop_class_uid(SECONDARY_CAPTURE)
            .media_storage_sop_instance_uid(sop_uid)
            .transfer_syntax(EXPLICIT_VR_LE)
            .build()
            .unwrap();
        obj.with_exact_meta(meta)
    }

    /// Writes a minimal DICOM file at `path`
    pub fn write_file(path: &Path, sop_uid: &str) {
        write_object(path, make_object(sop_uid), sop_uid);
    }

    /// Writes the given dataset as a DICOM file at `path`
    pub fn write_object(path: &Path, obj: InMemDicomObject, sop_uid: &str) {
        into_file(obj, sop_uid).write_to_file(path).unwrap();
    }
}

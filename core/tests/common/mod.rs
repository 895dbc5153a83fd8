//! DICOM fixtures shared by the integration tests

#![allow(dead_code)]

use dcmtags_core::dictionary::{
    MODALITY, PATIENT_ID, PATIENT_NAME, SERIES_INSTANCE_UID, SOP_CLASS_UID, SOP_INSTANCE_UID,
    STUDY_INSTANCE_UID,
};
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use std::fs;
use std::path::{Path, PathBuf};

pub const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
pub const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

/// One instance of a CT series
pub fn ct_instance(study: &str, series: &str, sop: &str) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(
        SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(CT_IMAGE_STORAGE),
    ));
    obj.put(DataElement::new(SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(sop)));
    obj.put(DataElement::new(STUDY_INSTANCE_UID, VR::UI, PrimitiveValue::from(study)));
    obj.put(DataElement::new(SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from(series)));
    obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("CT")));
    obj.put(DataElement::new(PATIENT_NAME, VR::PN, PrimitiveValue::from("Smith^John")));
    obj.put(DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::from("P-0001")));
    obj
}

pub fn with_string(mut obj: InMemDicomObject, tag: Tag, vr: VR, value: &str) -> InMemDicomObject {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    obj
}

/// Writes `obj` as a DICOM file, using its SOPInstanceUID for the file meta
pub fn write_instance(path: &Path, obj: InMemDicomObject) {
    let sop = obj
        .element(SOP_INSTANCE_UID)
        .unwrap()
        .to_str()
        .unwrap()
        .trim_end_matches('\0')
        .to_string();
    let meta = FileMetaTableBuilder::new()
        .media_storage_sop_class_uid(CT_IMAGE_STORAGE)
        .media_storage_sop_instance_uid(sop)
        .transfer_syntax(EXPLICIT_VR_LE)
        .build()
        .unwrap();
    obj.with_exact_meta(meta).write_to_file(path).unwrap();
}

/// Writes a series of `count` instances into `dir` as `slice<N>.dcm`
pub fn write_series(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("slice{}.dcm", i));
            let obj = ct_instance("1.2.3.100", "1.2.3.100.1", &format!("1.2.3.100.1.{}", i + 1));
            write_instance(&path, obj);
            path
        })
        .collect()
}

/// Writes a `.dcm` file that is not a DICOM dataset
pub fn write_malformed(path: &Path) {
    fs::write(path, b"this is not a DICOM file").unwrap();
}

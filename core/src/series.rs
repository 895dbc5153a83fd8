//! Inserting a new instance into an existing series
//!
//! The new file takes every attribute of a template instance except the
//! pixel data, keeps its own pixels, and gets a fresh SOPInstanceUID.
//! Study, series and frame-of-reference identifiers come from the template
//! unchanged, so the result joins the template's series.

use crate::dataset::{open_dataset, save_dataset, sync_media_storage_instance_uid, Dataset};
use crate::dictionary::{
    PERFORMING_PHYSICIAN_NAME, PHOTOMETRIC_INTERPRETATION, PHYSICIANS_OF_RECORD, PIXEL_DATA,
    PLANAR_CONFIGURATION, REFERRING_PHYSICIAN_NAME, REQUESTING_PHYSICIAN, SAMPLES_PER_PIXEL,
    SOP_INSTANCE_UID,
};
use crate::error::Result;
use crate::uid::UidGenerator;
use dicom_core::header::Header;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::{DataElement, Tag, VR};
use dicom_object::DefaultDicomObject;
use log::info;
use std::path::Path;

/// Person-name tags normalised after copying
const PERSON_NAME_TAGS: [Tag; 4] = [
    REFERRING_PHYSICIAN_NAME,
    PERFORMING_PHYSICIAN_NAME,
    PHYSICIANS_OF_RECORD,
    REQUESTING_PHYSICIAN,
];

/// Most components a person name can carry
const MAX_PN_COMPONENTS: usize = 5;

/// Options for series insertion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceOptions {
    /// Declare the pixel data as interleaved 8-bit RGB
    pub force_rgb: bool,
}

/// Copies `template`'s attributes into `input` and writes the result to `output`
///
/// Both inputs are loaded before anything is written; any failure aborts
/// the whole operation. Returns the new SOPInstanceUID.
///
/// # Errors
///
/// - `NotFound` / `Parse` if either input cannot be loaded
/// - `Write` if the output cannot be saved
pub fn insert_into_series(
    input: &Path,
    template: &Path,
    output: &Path,
    generator: &UidGenerator,
    options: SliceOptions,
) -> Result<String> {
    let mut obj = open_dataset(input)?;
    let template_obj = open_dataset(template)?;

    let uid = copy_template(&mut obj, &template_obj, generator, options);
    save_dataset(&obj, output)?;
    info!(
        "Wrote {} into series of {} as {}",
        output.display(),
        template.display(),
        uid
    );
    Ok(uid)
}

/// In-memory part of [`insert_into_series`]
pub fn copy_template(
    obj: &mut DefaultDicomObject,
    template: &DefaultDicomObject,
    generator: &UidGenerator,
    options: SliceOptions,
) -> String {
    for elem in template.iter_elements() {
        if elem.tag() != PIXEL_DATA {
            obj.set_element(elem.clone());
        }
    }

    let uid = generator.generate();
    obj.set_element(DataElement::new(
        SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(uid.as_str()),
    ));
    sync_media_storage_instance_uid(obj, &uid);

    for tag in PERSON_NAME_TAGS {
        normalize_person_name(obj, tag);
    }

    if options.force_rgb {
        obj.set_element(DataElement::new(
            PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("RGB"),
        ));
        obj.set_element(DataElement::new(
            SAMPLES_PER_PIXEL,
            VR::US,
            PrimitiveValue::from(3_u16),
        ));
        obj.set_element(DataElement::new(
            PLANAR_CONFIGURATION,
            VR::US,
            PrimitiveValue::from(0_u16),
        ));
    }
    uid
}

/// Truncates each name of a PN element to its first five `^` components
fn normalize_person_name(obj: &mut DefaultDicomObject, tag: Tag) {
    let names: Vec<String> = match obj.get_element(tag).map(|e| e.value()) {
        Some(Value::Primitive(PrimitiveValue::Empty)) | None => return,
        Some(Value::Primitive(v)) => v.to_multi_str().iter().map(|s| clip_pn(s)).collect(),
        Some(_) => return,
    };

    let value = if names.len() == 1 {
        PrimitiveValue::from(names[0].as_str())
    } else {
        PrimitiveValue::Strs(names.into_iter().collect())
    };
    obj.set_element(DataElement::new(tag, VR::PN, value));
}

fn clip_pn(name: &str) -> String {
    name.split('^')
        .take(MAX_PN_COMPONENTS)
        .collect::<Vec<_>>()
        .join("^")
}

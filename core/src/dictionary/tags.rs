use crate::error::{DcmTagsError, Result};
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry, TagRange};
use dicom_core::{Tag, VR};
use dicom_dictionary_std::StandardDataDictionary;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
pub const OTHER_PATIENT_IDS: Tag = Tag(0x0010, 0x1000);
pub const PATIENT_BIRTH_NAME: Tag = Tag(0x0010, 0x1005);
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);
pub const PATIENT_ADDRESS: Tag = Tag(0x0010, 0x1040);
pub const PATIENT_MOTHER_BIRTH_NAME: Tag = Tag(0x0010, 0x1060);
pub const PATIENT_TELEPHONE_NUMBERS: Tag = Tag(0x0010, 0x2154);
pub const ETHNIC_GROUP: Tag = Tag(0x0010, 0x2160);
pub const OCCUPATION: Tag = Tag(0x0010, 0x2180);
pub const ADDITIONAL_PATIENT_HISTORY: Tag = Tag(0x0010, 0x21B0);
pub const PATIENT_COMMENTS: Tag = Tag(0x0010, 0x4000);

// Institution/Staff Tags
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
pub const INSTITUTION_ADDRESS: Tag = Tag(0x0008, 0x0081);
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const PHYSICIANS_OF_RECORD: Tag = Tag(0x0008, 0x1048);
pub const PERFORMING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x1050);
pub const NAME_OF_PHYSICIANS_READING_STUDY: Tag = Tag(0x0008, 0x1060);
pub const OPERATORS_NAME: Tag = Tag(0x0008, 0x1070);
pub const REQUESTING_PHYSICIAN: Tag = Tag(0x0032, 0x1032);
pub const DEVICE_SERIAL_NUMBER: Tag = Tag(0x0018, 0x1000);
pub const PROTOCOL_NAME: Tag = Tag(0x0018, 0x1030);

// Study/Series Identification Tags
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);

// Acquisition Tags
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);

// Image Pixel Tags
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
pub const PLANAR_CONFIGURATION: Tag = Tag(0x0028, 0x0006);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Built-in name table, consulted before the standard dictionary
static BUILTIN: &[(&str, Tag, VR)] = &[
    ("PatientName", PATIENT_NAME, VR::PN),
    ("PatientID", PATIENT_ID, VR::LO),
    ("PatientBirthDate", PATIENT_BIRTH_DATE, VR::DA),
    ("PatientSex", PATIENT_SEX, VR::CS),
    ("OtherPatientIDs", OTHER_PATIENT_IDS, VR::LO),
    ("PatientBirthName", PATIENT_BIRTH_NAME, VR::PN),
    ("PatientAge", PATIENT_AGE, VR::AS),
    ("PatientAddress", PATIENT_ADDRESS, VR::LO),
    ("PatientMotherBirthName", PATIENT_MOTHER_BIRTH_NAME, VR::PN),
    ("PatientTelephoneNumbers", PATIENT_TELEPHONE_NUMBERS, VR::SH),
    ("EthnicGroup", ETHNIC_GROUP, VR::SH),
    ("Occupation", OCCUPATION, VR::SH),
    ("AdditionalPatientHistory", ADDITIONAL_PATIENT_HISTORY, VR::LT),
    ("PatientComments", PATIENT_COMMENTS, VR::LT),
    ("InstitutionName", INSTITUTION_NAME, VR::LO),
    ("InstitutionAddress", INSTITUTION_ADDRESS, VR::ST),
    ("ReferringPhysicianName", REFERRING_PHYSICIAN_NAME, VR::PN),
    ("PhysiciansOfRecord", PHYSICIANS_OF_RECORD, VR::PN),
    ("PerformingPhysicianName", PERFORMING_PHYSICIAN_NAME, VR::PN),
    ("NameOfPhysiciansReadingStudy", NAME_OF_PHYSICIANS_READING_STUDY, VR::PN),
    ("OperatorsName", OPERATORS_NAME, VR::PN),
    ("RequestingPhysician", REQUESTING_PHYSICIAN, VR::PN),
    ("DeviceSerialNumber", DEVICE_SERIAL_NUMBER, VR::LO),
    ("ProtocolName", PROTOCOL_NAME, VR::LO),
    ("SOPClassUID", SOP_CLASS_UID, VR::UI),
    ("SOPInstanceUID", SOP_INSTANCE_UID, VR::UI),
    ("StudyDate", STUDY_DATE, VR::DA),
    ("AccessionNumber", ACCESSION_NUMBER, VR::SH),
    ("StudyDescription", STUDY_DESCRIPTION, VR::LO),
    ("SeriesDescription", SERIES_DESCRIPTION, VR::LO),
    ("StudyInstanceUID", STUDY_INSTANCE_UID, VR::UI),
    ("SeriesInstanceUID", SERIES_INSTANCE_UID, VR::UI),
    ("StudyID", STUDY_ID, VR::SH),
    ("SeriesNumber", SERIES_NUMBER, VR::IS),
    ("InstanceNumber", INSTANCE_NUMBER, VR::IS),
    ("FrameOfReferenceUID", FRAME_OF_REFERENCE_UID, VR::UI),
    ("ImageType", IMAGE_TYPE, VR::CS),
    ("Modality", MODALITY, VR::CS),
    ("Manufacturer", MANUFACTURER, VR::LO),
    ("BodyPartExamined", BODY_PART_EXAMINED, VR::CS),
    ("ImagePositionPatient", IMAGE_POSITION_PATIENT, VR::DS),
    ("ImageOrientationPatient", IMAGE_ORIENTATION_PATIENT, VR::DS),
    ("SamplesPerPixel", SAMPLES_PER_PIXEL, VR::US),
    ("PhotometricInterpretation", PHOTOMETRIC_INTERPRETATION, VR::CS),
    ("PlanarConfiguration", PLANAR_CONFIGURATION, VR::US),
    ("Rows", ROWS, VR::US),
    ("Columns", COLUMNS, VR::US),
    ("PixelSpacing", PIXEL_SPACING, VR::DS),
    ("PixelData", PIXEL_DATA, VR::OW),
];

/// A resolved dictionary entry: canonical name, tag and declared VR
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TagEntry {
    pub name: String,
    #[cfg_attr(feature = "json", serde(serialize_with = "serialize_tag"))]
    pub tag: Tag,
    #[cfg_attr(feature = "json", serde(serialize_with = "serialize_vr"))]
    pub vr: VR,
}

impl TagEntry {
    pub fn new(name: impl Into<String>, tag: Tag, vr: VR) -> Self {
        Self {
            name: name.into(),
            tag,
            vr,
        }
    }
}

impl fmt::Display for TagEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag, self.name)
    }
}

#[cfg(feature = "json")]
fn serialize_tag<S: serde::Serializer>(tag: &Tag, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(tag)
}

#[cfg(feature = "json")]
fn serialize_vr<S: serde::Serializer>(vr: &VR, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(vr.to_string().as_str())
}

/// Resolves a canonical tag keyword (or a hex `gggg,eeee` form) to its entry
///
/// Resolution order:
/// 1. Built-in table
/// 2. Standard data dictionary (single-tag entries only)
/// 3. Hex forms `(gggg,eeee)`, `gggg,eeee`, `ggggeeee`
///
/// # Errors
///
/// Returns `UnknownTag` when the name resolves to nothing. A new field is
/// never created implicitly from an unrecognised name.
pub fn lookup(name: &str) -> Result<TagEntry> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DcmTagsError::UnknownTag(String::new()));
    }

    if let Some((alias, tag, vr)) = BUILTIN.iter().find(|(alias, _, _)| *alias == name) {
        return Ok(TagEntry::new(*alias, *tag, *vr));
    }

    let dict = StandardDataDictionary;
    if let Some(entry) = dict.by_name(name) {
        if let TagRange::Single(tag) = entry.tag_range() {
            return Ok(TagEntry::new(entry.alias(), tag, entry.vr().relaxed()));
        }
    }

    if let Some(tag) = parse_hex_tag(name) {
        return Ok(entry_for_tag(tag));
    }

    Err(DcmTagsError::UnknownTag(name.to_string()))
}

/// Resolves several names, failing on the first unknown one
pub fn lookup_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<TagEntry>> {
    names.iter().map(|n| lookup(n.as_ref())).collect()
}

/// Builds an entry for a known tag, naming it from the dictionaries
///
/// Tags absent from both dictionaries are named by their hex form with VR `UN`.
pub fn entry_for_tag(tag: Tag) -> TagEntry {
    if let Some((alias, _, vr)) = BUILTIN.iter().find(|(_, t, _)| *t == tag) {
        return TagEntry::new(*alias, tag, *vr);
    }
    let dict = StandardDataDictionary;
    match dict.by_tag(tag) {
        Some(entry) => TagEntry::new(entry.alias(), tag, entry.vr().relaxed()),
        None => TagEntry::new(format!("{:04X},{:04X}", tag.group(), tag.element()), tag, VR::UN),
    }
}

/// Canonical keyword for a tag, for display
pub fn name_of(tag: Tag) -> String {
    entry_for_tag(tag).name
}

fn parse_hex_tag(s: &str) -> Option<Tag> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^\(?([0-9A-Fa-f]{4}),?([0-9A-Fa-f]{4})\)?$").expect("Failed to compile regex")
    });

    let caps = re.captures(s)?;
    let group = u16::from_str_radix(&caps[1], 16).ok()?;
    let element = u16::from_str_radix(&caps[2], 16).ok()?;
    Some(Tag(group, element))
}

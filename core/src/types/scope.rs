use crate::dictionary::tags::{
    FRAME_OF_REFERENCE_UID, SERIES_INSTANCE_UID, SOP_INSTANCE_UID, STUDY_INSTANCE_UID,
};
use dicom_core::Tag;
use std::fmt;

/// Group of files over which an identifier is shared or kept distinct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum IdentifierScope {
    /// One StudyInstanceUID for every file of a study
    Study,
    /// One SeriesInstanceUID for every file of a series
    Series,
    /// One FrameOfReferenceUID for every file sharing a coordinate frame
    FrameOfReference,
    /// A distinct SOPInstanceUID per file
    Instance,
}

impl IdentifierScope {
    /// All scopes, widest first
    pub const ALL: [IdentifierScope; 4] = [
        IdentifierScope::Study,
        IdentifierScope::Series,
        IdentifierScope::FrameOfReference,
        IdentifierScope::Instance,
    ];

    /// Tag holding this scope's identifier
    pub fn tag(&self) -> Tag {
        match self {
            IdentifierScope::Study => STUDY_INSTANCE_UID,
            IdentifierScope::Series => SERIES_INSTANCE_UID,
            IdentifierScope::FrameOfReference => FRAME_OF_REFERENCE_UID,
            IdentifierScope::Instance => SOP_INSTANCE_UID,
        }
    }

    /// Keyword of this scope's tag
    pub fn tag_name(&self) -> &'static str {
        match self {
            IdentifierScope::Study => "StudyInstanceUID",
            IdentifierScope::Series => "SeriesInstanceUID",
            IdentifierScope::FrameOfReference => "FrameOfReferenceUID",
            IdentifierScope::Instance => "SOPInstanceUID",
        }
    }

    /// Whether every file in the group must hold the same value
    pub fn is_shared(&self) -> bool {
        !matches!(self, IdentifierScope::Instance)
    }

    /// Scope whose identifier lives at `tag`, if any
    pub fn from_tag(tag: Tag) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.tag() == tag)
    }
}

impl fmt::Display for IdentifierScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierScope::Study => "study",
            IdentifierScope::Series => "series",
            IdentifierScope::FrameOfReference => "frame-of-reference",
            IdentifierScope::Instance => "instance",
        };
        write!(f, "{}", name)
    }
}

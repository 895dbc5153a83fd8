//! Literal anonymization profiles
//!
//! A profile is an ordered list of `(tag, value)` pairs. Applying it writes
//! exactly those values into every file of a subtree: nothing is inferred,
//! added or removed beyond the configured pairs, and values are not checked
//! against the tag's declared VR.

use crate::batch::{BatchTagMutator, MutationSpec};
use crate::dictionary::{lookup, TagEntry};
use crate::error::{DcmTagsError, Result};
use crate::types::BatchResult;
use log::info;
use std::path::Path;

/// Default replacement set for direct patient and staff identifiers
pub const DEFAULT_PROFILE: &[(&str, &str)] = &[
    ("PatientName", "anonymous"),
    ("PatientID", "anonymous"),
    ("OtherPatientIDs", "anonymous"),
    ("PatientBirthDate", "19000101"),
    ("PatientSex", "O"),
    ("PatientAddress", "anonymous"),
    ("InstitutionName", "anonymous"),
    ("ReferringPhysicianName", "anonymous"),
    ("OperatorsName", "anonymous"),
    ("PhysiciansOfRecord", "anonymous"),
    ("PerformingPhysicianName", "anonymous"),
    ("NameOfPhysiciansReadingStudy", "anonymous"),
    ("PatientBirthName", "anonymous"),
    ("PatientMotherBirthName", "anonymous"),
    ("PatientTelephoneNumbers", "anonymous"),
    ("EthnicGroup", "anonymous"),
    ("Occupation", "anonymous"),
    ("AdditionalPatientHistory", "anonymous"),
    ("PatientComments", "anonymous"),
    ("DeviceSerialNumber", "anonymous"),
    ("ProtocolName", "anonymous"),
];

/// One profile entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub target: TagEntry,
    pub value: String,
}

/// Ordered tag→literal mapping applied uniformly to every file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymizationProfile {
    entries: Vec<ProfileEntry>,
}

impl AnonymizationProfile {
    /// An empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from keyword/value pairs, keeping their order
    ///
    /// # Errors
    ///
    /// Returns `UnknownTag` for the first keyword not in the dictionary.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut profile = Self::new();
        for (name, value) in pairs {
            profile.push(lookup(name.as_ref())?, value.as_ref());
        }
        Ok(profile)
    }

    /// Parses the line-oriented profile format
    ///
    /// One `Keyword=value` per line. Blank lines and lines starting with `#`
    /// are ignored. Everything after the first `=` is the value, verbatim.
    ///
    /// # Errors
    ///
    /// Returns a usage error naming the line for a malformed entry, or
    /// `UnknownTag` for an unrecognised keyword.
    ///
    /// # Example
    ///
    /// ```
    /// use dcmtags_core::AnonymizationProfile;
    ///
    /// let profile = AnonymizationProfile::parse(
    ///     "# site profile\nPatientName=anonymous\nPatientBirthDate=19000101\n",
    /// )
    /// .unwrap();
    /// assert_eq!(profile.len(), 2);
    /// assert_eq!(profile.entries()[0].target.name, "PatientName");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut profile = Self::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (name, value) = line.split_once('=').ok_or_else(|| {
                DcmTagsError::Usage(format!(
                    "profile line {}: expected Keyword=value, got '{}'",
                    number + 1,
                    line
                ))
            })?;
            profile.push(lookup(name)?, value);
        }
        Ok(profile)
    }

    /// Parses a JSON profile: an array of `{"tag": .., "value": ..}` objects
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct RawEntry {
            tag: String,
            value: String,
        }

        let raw: Vec<RawEntry> = serde_json::from_str(json)
            .map_err(|e| DcmTagsError::Usage(format!("invalid JSON profile: {}", e)))?;
        let mut profile = Self::new();
        for entry in raw {
            profile.push(lookup(&entry.tag)?, entry.value);
        }
        Ok(profile)
    }

    /// Loads a profile file, JSON if it ends in `.json`, line format otherwise
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DcmTagsError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            #[cfg(feature = "json")]
            {
                return Self::from_json_str(&text);
            }
            #[cfg(not(feature = "json"))]
            {
                return Err(DcmTagsError::Usage(
                    "JSON profiles require the 'json' feature".to_string(),
                ));
            }
        }
        Self::parse(&text)
    }

    /// Appends an entry; a repeated tag is applied again, later value wins
    pub fn push(&mut self, target: TagEntry, value: impl Into<String>) {
        self.entries.push(ProfileEntry {
            target,
            value: value.into(),
        });
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The profile as literal mutations, in order
    pub fn to_mutations(&self) -> Vec<MutationSpec> {
        self.entries
            .iter()
            .map(|e| MutationSpec::literal(e.target.clone(), e.value.clone()))
            .collect()
    }

    /// Applies the profile to every DICOM file under `root`
    ///
    /// # Errors
    ///
    /// Fails before touching any file if the profile is empty or `root` is
    /// missing. Per-file failures are collected in the [`BatchResult`].
    pub fn apply(&self, mutator: &BatchTagMutator, root: &Path) -> Result<BatchResult> {
        if self.is_empty() {
            return Err(DcmTagsError::Usage("anonymization profile is empty".to_string()));
        }
        info!(
            "Applying {} anonymization entries under {}",
            self.len(),
            root.display()
        );
        mutator.mutate(root, &self.to_mutations())
    }
}

/// The built-in profile
pub fn default_profile() -> AnonymizationProfile {
    // every keyword in DEFAULT_PROFILE is in the built-in table
    AnonymizationProfile::from_pairs(DEFAULT_PROFILE).unwrap_or_default()
}

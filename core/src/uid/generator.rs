use crate::error::Result;
use crate::types::{validate_uid_prefix, BatchConfig};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Maximum length of a DICOM UID
pub const MAX_UID_LEN: usize = 64;

/// Mints dotted numeric identifiers under a fixed organisational prefix
///
/// The suffix is the decimal form of a random 128-bit value, truncated to
/// fit the 64-character UID limit. Uniqueness only needs to hold against
/// the corpus being processed, so nothing is recorded between runs.
///
/// # Example
///
/// ```
/// use dcmtags_core::uid::{is_valid_uid, UidGenerator};
///
/// let generator = UidGenerator::new("1.2.3.").unwrap();
/// let uid = generator.generate();
/// assert!(uid.starts_with("1.2.3."));
/// assert!(is_valid_uid(&uid));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidGenerator {
    prefix: String,
}

impl UidGenerator {
    /// Creates a generator rooted at `prefix`
    ///
    /// # Errors
    ///
    /// Returns a usage error if the prefix is not a valid UID root.
    pub fn new(prefix: &str) -> Result<Self> {
        validate_uid_prefix(prefix)?;
        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    /// Creates a generator from the configured prefix
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        Self::new(&config.uid_prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mints a new identifier
    pub fn generate(&self) -> String {
        let room = MAX_UID_LEN - self.prefix.len();
        let digits = Uuid::new_v4().as_u128().to_string();
        let suffix: String = digits.chars().take(room).collect();
        format!("{}{}", self.prefix, suffix)
    }
}

/// Checks that `uid` is a well-formed DICOM UID
pub fn is_valid_uid(uid: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*$").expect("Failed to compile regex")
    });
    uid.len() <= MAX_UID_LEN && re.is_match(uid)
}

use crate::error::{DcmTagsError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Organisational root used for generated identifiers unless configured
pub const DEFAULT_UID_PREFIX: &str = "1.2.826.0.1.3680043.8.498.";

/// Longest accepted prefix
///
/// Generated UIDs are capped at 64 characters, so this leaves at least 32
/// random digits after the prefix.
pub const MAX_UID_PREFIX_LEN: usize = 32;

/// Configuration for directory traversal and identifier generation
///
/// Passed explicitly to [`BatchTagMutator`](crate::batch::BatchTagMutator)
/// and [`UidCoordinator`](crate::uid::UidCoordinator); there is no global
/// configuration state.
///
/// # Example
///
/// ```
/// use dcmtags_core::BatchConfig;
///
/// let config = BatchConfig::default()
///     .with_uid_prefix("1.2.3.")
///     .unwrap()
///     .follow_symlinks(true);
///
/// assert_eq!(config.uid_prefix, "1.2.3.");
/// assert!(config.follow_symlinks);
/// assert!(config.content_detection);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct BatchConfig {
    /// Dotted numeric root for generated UIDs, ending in `.`
    pub uid_prefix: String,

    /// Follow symbolic links while walking the directory tree
    pub follow_symlinks: bool,

    /// File extensions accepted as DICOM without looking at content
    pub extensions: Vec<String>,

    /// Accept any file carrying the `DICM` marker, whatever its name
    pub content_detection: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            uid_prefix: DEFAULT_UID_PREFIX.to_string(),
            follow_symlinks: false,
            extensions: vec!["dcm".to_string(), "dicom".to_string()],
            content_detection: true,
        }
    }
}

impl BatchConfig {
    /// Builder: Set the UID prefix
    ///
    /// # Errors
    ///
    /// Returns a usage error unless the prefix is a dotted numeric string
    /// ending in `.` and at most [`MAX_UID_PREFIX_LEN`] characters long.
    pub fn with_uid_prefix(mut self, prefix: &str) -> Result<Self> {
        validate_uid_prefix(prefix)?;
        self.uid_prefix = prefix.to_string();
        Ok(self)
    }

    /// Builder: Follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Builder: Set the extensions accepted without content sniffing
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: Enable or disable `DICM` marker detection
    pub fn content_detection(mut self, enabled: bool) -> Self {
        self.content_detection = enabled;
        self
    }
}

/// Checks that `prefix` can root generated UIDs
pub fn validate_uid_prefix(prefix: &str) -> Result<()> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*\.$").expect("Failed to compile regex")
    });

    if prefix.len() > MAX_UID_PREFIX_LEN {
        return Err(DcmTagsError::Usage(format!(
            "UID prefix '{}' is longer than {} characters",
            prefix, MAX_UID_PREFIX_LEN
        )));
    }
    if !re.is_match(prefix) {
        return Err(DcmTagsError::Usage(format!(
            "UID prefix '{}' must be dotted numeric components ending in '.'",
            prefix
        )));
    }
    Ok(())
}

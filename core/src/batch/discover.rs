use crate::error::{DcmTagsError, Result};
use crate::types::BatchConfig;
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collects candidate DICOM files under `root`, sorted by path
///
/// A file is a candidate if its extension is one of the configured ones
/// (case-insensitive) or, with content detection on, if it carries the
/// `DICM` marker. Candidates are not parsed here; a candidate that turns
/// out to be malformed is reported by the batch that processes it.
///
/// # Errors
///
/// Returns `NotFound` if `root` does not exist. Unreadable entries below
/// the root are skipped with a warning.
pub fn collect_dicom_files(root: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(DcmTagsError::NotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(config.follow_symlinks) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if has_accepted_extension(path, &config.extensions) {
            files.push(path.to_path_buf());
        } else if config.content_detection && is_dicom_file(path) {
            debug!("Found DICOM file by content: {}", path.display());
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e.as_str())))
        .unwrap_or(false)
}

/// Checks if a file has a DICOM header
///
/// DICOM files typically have:
/// - 128-byte preamble
/// - 4-byte "DICM" magic string at offset 128
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    // Read first 132 bytes (128-byte preamble + 4-byte "DICM" magic)
    let mut buffer = [0u8; 132];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[128..132] == b"DICM",
        Err(_) => false,
    }
}

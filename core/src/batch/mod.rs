//! Directory-wide tag mutation
//!
//! Discovery walks the tree and picks candidate files; the mutator applies
//! an ordered list of [`MutationSpec`]s to each, one file at a time.

mod discover;
mod mutator;

pub use discover::{collect_dicom_files, is_dicom_file};
pub use mutator::{BatchTagMutator, MutationSpec, MutationValue};

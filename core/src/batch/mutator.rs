use crate::batch::discover::collect_dicom_files;
use crate::dataset::{open_dataset, save_dataset, sync_media_storage_instance_uid, Dataset};
use crate::dictionary::{literal_to_primitive, lookup, TagEntry, SOP_INSTANCE_UID};
use crate::error::{DcmTagsError, Result};
use crate::types::{BatchConfig, BatchResult, FileOutcome};
use crate::uid::{validate_specs, UidGenerator};
use dicom_core::DataElement;
use dicom_object::DefaultDicomObject;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// What a mutation writes into its target tag
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum MutationValue {
    /// The same literal value in every file
    Literal(String),
    /// A freshly minted identifier per file
    NewUid,
    /// Delete the tag
    Remove,
}

/// One tag mutation applied to every file of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MutationSpec {
    pub target: TagEntry,
    pub value: MutationValue,
}

impl MutationSpec {
    pub fn literal(target: TagEntry, value: impl Into<String>) -> Self {
        Self {
            target,
            value: MutationValue::Literal(value.into()),
        }
    }

    pub fn new_uid(target: TagEntry) -> Self {
        Self {
            target,
            value: MutationValue::NewUid,
        }
    }

    pub fn remove(target: TagEntry) -> Self {
        Self {
            target,
            value: MutationValue::Remove,
        }
    }

    /// Builds a literal mutation from a tag keyword
    ///
    /// # Errors
    ///
    /// Returns `UnknownTag` if the keyword is not in the dictionary.
    pub fn parse_literal(name: &str, value: &str) -> Result<Self> {
        Ok(Self::literal(lookup(name)?, value))
    }

    /// Whether re-applying this mutation leaves the output unchanged
    pub fn is_idempotent(&self) -> bool {
        !matches!(self.value, MutationValue::NewUid)
    }
}

/// Applies ordered tag mutations to every DICOM file under a directory
///
/// Files are processed one at a time. A file is rewritten only if every
/// mutation succeeds on it; otherwise it is left untouched and the failure
/// is recorded. Failures never stop the traversal.
#[derive(Debug, Clone)]
pub struct BatchTagMutator {
    config: BatchConfig,
    generator: UidGenerator,
}

impl BatchTagMutator {
    /// Creates a mutator from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns a usage error if the configured UID prefix is invalid.
    pub fn new(config: BatchConfig) -> Result<Self> {
        let generator = UidGenerator::from_config(&config)?;
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn generator(&self) -> &UidGenerator {
        &self.generator
    }

    /// Candidate files under `root`, in processing order
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        collect_dicom_files(root, &self.config)
    }

    /// Applies `specs` to every candidate file under `root`
    ///
    /// # Errors
    ///
    /// Fails before touching any file if `root` is missing, `specs` is
    /// empty, or the specs would break identifier scope rules. Per-file
    /// errors are collected in the returned [`BatchResult`].
    pub fn mutate(&self, root: &Path, specs: &[MutationSpec]) -> Result<BatchResult> {
        let files = self.discover(root)?;
        info!("Found {} DICOM files under {}", files.len(), root.display());
        self.mutate_files(&files, specs)
    }

    /// Applies `specs` to an explicit list of files
    pub fn mutate_files(&self, files: &[PathBuf], specs: &[MutationSpec]) -> Result<BatchResult> {
        if specs.is_empty() {
            return Err(DcmTagsError::Usage("no mutations given".to_string()));
        }
        validate_specs(specs, files.len())?;

        let mut result = BatchResult::new();
        for path in files {
            match self.mutate_file(path, specs) {
                Ok(()) => {
                    info!("Updated: {}", path.display());
                    result.push(FileOutcome::success(path.clone()));
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", path.display(), e);
                    result.push(FileOutcome::failed(path.clone(), e));
                }
            }
        }

        info!(
            "Batch finished: {} updated, {} failed",
            result.success_count(),
            result.failure_count()
        );
        Ok(result)
    }

    /// Loads, mutates and saves one file; all or nothing
    pub fn mutate_file(&self, path: &Path, specs: &[MutationSpec]) -> Result<()> {
        let mut obj = open_dataset(path)?;
        for spec in specs {
            self.apply(&mut obj, spec)?;
        }
        save_dataset(&obj, path)
    }

    /// Applies one mutation to an in-memory object
    pub fn apply(&self, obj: &mut DefaultDicomObject, spec: &MutationSpec) -> Result<()> {
        let target = &spec.target;
        if target.tag.group() == 0x0002 {
            return Err(DcmTagsError::InvalidValue {
                tag: target.tag,
                message: "file meta group tags cannot be mutated".to_string(),
            });
        }

        let literal = match &spec.value {
            MutationValue::Remove => {
                obj.remove_tag(target.tag);
                return Ok(());
            }
            MutationValue::NewUid => self.generator.generate(),
            MutationValue::Literal(value) => value.clone(),
        };

        // an existing element keeps its encoded VR
        let vr = obj
            .get_element(target.tag)
            .map(|e| e.vr())
            .unwrap_or(target.vr);
        let value = literal_to_primitive(vr, &literal).map_err(|message| {
            DcmTagsError::InvalidValue {
                tag: target.tag,
                message: format!("{}: {}", target.name, message),
            }
        })?;
        obj.set_element(DataElement::new(target.tag, vr, value));

        if target.tag == SOP_INSTANCE_UID {
            sync_media_storage_instance_uid(obj, &literal);
        }
        Ok(())
    }
}

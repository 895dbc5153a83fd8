use crate::batch::{BatchTagMutator, MutationSpec, MutationValue};
use crate::dataset::open_dataset;
use crate::dictionary::{get_non_empty_string, lookup};
use crate::error::{DcmTagsError, Result};
use crate::types::{BatchConfig, BatchResult, IdentifierScope};
use crate::uid::is_valid_uid;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result of assigning one shared identifier across a batch
#[derive(Debug)]
pub struct SharedAssignment {
    pub scope: IdentifierScope,
    /// The identifier written into every file
    pub uid: String,
    pub result: BatchResult,
}

/// Rejects mutation lists that would break identifier scope rules
///
/// - A minted per-file identifier must not target a shared-scope tag.
/// - A literal must not be written into the instance identifier of more
///   than one file.
pub fn validate_specs(specs: &[MutationSpec], file_count: usize) -> Result<()> {
    for spec in specs {
        let Some(scope) = IdentifierScope::from_tag(spec.target.tag) else {
            continue;
        };
        match &spec.value {
            MutationValue::NewUid if scope.is_shared() => {
                return Err(DcmTagsError::Usage(format!(
                    "{} is shared by every file of a {}; a per-file identifier would split it",
                    scope.tag_name(),
                    scope
                )));
            }
            MutationValue::Literal(_) if !scope.is_shared() && file_count > 1 => {
                return Err(DcmTagsError::Usage(format!(
                    "{} must be distinct per file; refusing to write one literal into {} files",
                    scope.tag_name(),
                    file_count
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Checks that no file already carries a value for a shared scope's tag
///
/// Files that cannot be parsed are skipped here; the batch that follows
/// reports them as failures.
///
/// # Errors
///
/// Returns `PreconditionViolation` naming the first file that already
/// holds a non-empty value.
pub fn ensure_scope_unset(files: &[PathBuf], scope: IdentifierScope) -> Result<()> {
    for path in files {
        let obj = match open_dataset(path) {
            Ok(obj) => obj,
            Err(e) => {
                warn!("Skipping {} during pre-scan: {}", path.display(), e);
                continue;
            }
        };
        if let Some(value) = get_non_empty_string(&*obj, scope.tag()) {
            return Err(DcmTagsError::PreconditionViolation {
                path: path.clone(),
                name: scope.tag_name(),
                tag: scope.tag(),
                value,
            });
        }
    }
    Ok(())
}

/// Mints identifiers and keeps them consistent across a batch
#[derive(Debug, Clone)]
pub struct UidCoordinator {
    mutator: BatchTagMutator,
}

impl UidCoordinator {
    /// Creates a coordinator from an explicit configuration
    pub fn new(config: BatchConfig) -> Result<Self> {
        Ok(Self {
            mutator: BatchTagMutator::new(config)?,
        })
    }

    pub fn mutator(&self) -> &BatchTagMutator {
        &self.mutator
    }

    /// Assigns one new identifier to `scope`'s tag in every file under `root`
    ///
    /// Every candidate file is scanned first. If any already holds a value
    /// for the scope's tag, nothing is written.
    ///
    /// # Errors
    ///
    /// - `Usage` if `scope` is not a shared scope
    /// - `NotFound` if `root` is missing
    /// - `PreconditionViolation` if any file already carries the identifier
    pub fn assign_shared(&self, root: &Path, scope: IdentifierScope) -> Result<SharedAssignment> {
        if !scope.is_shared() {
            return Err(DcmTagsError::Usage(format!(
                "{} is not a shared identifier",
                scope.tag_name()
            )));
        }

        let files = self.mutator.discover(root)?;
        info!(
            "Checking {} files for an existing {}",
            files.len(),
            scope.tag_name()
        );
        ensure_scope_unset(&files, scope)?;

        let uid = self.mutator.generator().generate();
        info!("Assigning {} {}", scope.tag_name(), uid);
        let spec = MutationSpec::literal(lookup(scope.tag_name())?, uid.clone());
        let result = self.mutator.mutate_files(&files, &[spec])?;

        Ok(SharedAssignment { scope, uid, result })
    }

    /// Re-keys every file under `root` into one new study
    ///
    /// All files receive the same StudyInstanceUID, `study_uid` if given or
    /// a freshly minted one. With `patient_id`, PatientID and PatientName
    /// are both set to it. Series and instance identifiers are untouched.
    ///
    /// # Errors
    ///
    /// - `Usage` if `study_uid` is not a well-formed UID
    /// - `NotFound` if `root` is missing
    pub fn new_study(
        &self,
        root: &Path,
        study_uid: Option<&str>,
        patient_id: Option<&str>,
    ) -> Result<SharedAssignment> {
        let uid = match study_uid {
            Some(uid) if is_valid_uid(uid) => uid.to_string(),
            Some(uid) => {
                return Err(DcmTagsError::Usage(format!("'{}' is not a valid UID", uid)));
            }
            None => self.mutator.generator().generate(),
        };

        let scope = IdentifierScope::Study;
        let mut specs = vec![MutationSpec::literal(lookup(scope.tag_name())?, uid.clone())];
        if let Some(id) = patient_id {
            info!("Setting patient id/name to {}", id);
            specs.push(MutationSpec::literal(lookup("PatientID")?, id));
            specs.push(MutationSpec::literal(lookup("PatientName")?, id));
        }

        let result = self.mutator.mutate(root, &specs)?;
        Ok(SharedAssignment { scope, uid, result })
    }

    /// Reports how identifiers are distributed over the files under `root`
    pub fn check_consistency(&self, root: &Path) -> Result<ConsistencyReport> {
        let files = self.mutator.discover(root)?;
        let mut report = ConsistencyReport {
            files_checked: 0,
            scopes: IdentifierScope::ALL
                .into_iter()
                .map(|scope| ScopeCheck {
                    scope,
                    values: BTreeMap::new(),
                    missing: Vec::new(),
                })
                .collect(),
            unreadable: Vec::new(),
        };

        for path in files {
            let obj = match open_dataset(&path) {
                Ok(obj) => obj,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.unreadable.push((path, e));
                    continue;
                }
            };
            report.files_checked += 1;
            for check in report.scopes.iter_mut() {
                match get_non_empty_string(&*obj, check.scope.tag()) {
                    Some(value) => check.values.entry(value).or_default().push(path.clone()),
                    None => check.missing.push(path.clone()),
                }
            }
        }
        Ok(report)
    }
}

/// Distribution of one scope's identifier over a file set
#[derive(Debug)]
pub struct ScopeCheck {
    pub scope: IdentifierScope,
    /// Each distinct value and the files holding it
    pub values: BTreeMap<String, Vec<PathBuf>>,
    /// Files without a value
    pub missing: Vec<PathBuf>,
}

impl ScopeCheck {
    /// Whether the scope invariant holds
    ///
    /// A shared scope needs one value in every file, or no value anywhere.
    /// An instance scope needs every present value held by exactly one file.
    pub fn is_consistent(&self) -> bool {
        if self.scope.is_shared() {
            self.values.is_empty() || (self.values.len() == 1 && self.missing.is_empty())
        } else {
            self.values.values().all(|paths| paths.len() == 1)
        }
    }

    /// Instance values held by more than one file
    pub fn duplicates(&self) -> impl Iterator<Item = (&String, &Vec<PathBuf>)> {
        self.values.iter().filter(|(_, paths)| paths.len() > 1)
    }
}

/// Identifier consistency over a directory
#[derive(Debug)]
pub struct ConsistencyReport {
    pub files_checked: usize,
    pub scopes: Vec<ScopeCheck>,
    pub unreadable: Vec<(PathBuf, DcmTagsError)>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.scopes.iter().all(|s| s.is_consistent())
    }

    pub fn scope(&self, scope: IdentifierScope) -> Option<&ScopeCheck> {
        self.scopes.iter().find(|s| s.scope == scope)
    }
}

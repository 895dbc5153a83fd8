pub mod batch;
pub mod cli;
pub mod dataset;
pub mod diff;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod profile;
pub mod series;
pub mod types;
pub mod uid;

pub use batch::{BatchTagMutator, MutationSpec, MutationValue};
pub use cli::report::{AssignmentReport, BatchSummary, ConsistencySummary, DiffReport, GroupReport};
pub use dataset::{open_dataset, save_dataset, Dataset};
pub use diff::{TagClassification, TagDiffEngine, TagDifference};
pub use dictionary::{lookup, TagEntry};
pub use error::{DcmTagsError, Result};
pub use export::{scan_two_tags, TagTable};
pub use profile::{default_profile, AnonymizationProfile, DEFAULT_PROFILE};
pub use series::{insert_into_series, SliceOptions};
pub use types::*;
pub use uid::{ConsistencyReport, SharedAssignment, UidCoordinator, UidGenerator};

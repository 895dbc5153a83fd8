//! Identifier generation and scope coordination
//!
//! Shared-scope identifiers (study, series, frame of reference) must hold
//! one value across a group of files; instance identifiers must differ per
//! file. The [`UidCoordinator`] enforces both while mutating a batch.

mod coordinator;
mod generator;

pub use coordinator::{
    ensure_scope_unset, validate_specs, ConsistencyReport, ScopeCheck, SharedAssignment,
    UidCoordinator,
};
pub use generator::{is_valid_uid, UidGenerator, MAX_UID_LEN};

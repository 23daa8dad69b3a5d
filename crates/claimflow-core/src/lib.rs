//! # claimflow-core: Foundational Types for claimflow
//!
//! Defines the data model shared by every other crate in the workspace:
//! extracted clinical entities, AI code suggestions, the operator-curated
//! approved code set, the in-flight claim draft, and historical claim records.
//!
//! ## Key Design Principles
//!
//! 1. **The approved set is a type, not a `Vec`.** `ApprovedSet` owns the
//!    toggle/add/remove/update semantics keyed by `code`, so every caller
//!    gets the same membership rules.
//!
//! 2. **Open vocabularies stay open.** `EntityLabel` and `CodeSystem` model the
//!    well-known values as variants but round-trip any other string verbatim,
//!    because the extraction and suggestion services are free to emit new ones.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is always UTC, seconds precision,
//!    rendered as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `claimflow-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod approved;
pub mod claim;
pub mod domain;
pub mod error;
pub mod temporal;

pub use approved::ApprovedSet;
pub use claim::{sanitize_amount, shorten_hash, ClaimDraft, ClaimId, ClaimRecord};
pub use domain::{CodePatch, CodeSuggestion, CodeSystem, Entity, EntityLabel};
pub use error::CoreError;
pub use temporal::Timestamp;

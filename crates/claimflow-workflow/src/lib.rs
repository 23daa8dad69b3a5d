//! # claimflow-workflow: Claim Preparation Workflow
//!
//! Guides an operator from a clinical document to a generated claim:
//!
//! - **Controller** (`controller.rs`): stage navigation with entry guards,
//!   ingestion, the suggestion auto-fetch, claim generation, and the
//!   confirmation hand-off to the claims history.
//! - **Stages** (`stage.rs`): the stage enum and its transition log records.
//! - **Editor** (`editor.rs`): toggle, manual entry, description edits, and
//!   removal on the approved set.
//! - **Form** (`form.rs`): CMS-1500 header autofill and diagnosis-pointer
//!   parsing.
//!
//! The controller owns no persistent state of its own: the draft and the
//! history are injected [`claimflow_store`] handles, and every service call
//! goes through the [`claimflow_client::CodingService`] trait.

pub mod controller;
pub mod editor;
pub mod error;
pub mod form;
pub mod stage;

pub use controller::{
    Confirmation, IngestSummary, WorkflowController, SUGGEST_TOP_K, TRANSITION_LOG_LIMIT,
};
pub use editor::{ApprovalEditor, ManualCode, MANUAL_REASON, MANUAL_SCORE};
pub use error::{ValidationError, WorkflowError};
pub use form::{
    parse_pointers, FormDraft, PdfDocument, CLAIM_PDF_FILENAME, FORM_PDF_FILENAME, MAX_FORM_ROWS,
};
pub use stage::{Stage, StageTransition};

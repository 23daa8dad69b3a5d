//! # Workflow Errors
//!
//! Validation errors carry the exact operator-facing message in their
//! `Display` form and are raised before any service call.

use claimflow_client::ClientError;
use thiserror::Error;

use crate::stage::Stage;

/// Input rejected on the client side. Never sent to the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Ingest-text was given blank text.
    #[error("Please enter some clinical text")]
    EmptyText,

    /// Tried to leave Suggest with nothing approved.
    #[error("Please select at least one code to continue")]
    NoCodesSelected,

    /// Tried to generate with nothing approved.
    #[error("Please add at least one code")]
    NoApprovedCodes,

    /// Tried to generate with a blank signer.
    #[error("Please sign the claim")]
    Unsigned,

    /// Manual entry without a code.
    #[error("Code is required")]
    CodeRequired,

    /// Manual entry or edit without a description.
    #[error("Description is required")]
    DescriptionRequired,
}

/// Errors from workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A coding service call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The requested stage change is not allowed.
    #[error("invalid stage transition: {from} -> {to}")]
    InvalidTransition {
        /// Current stage.
        from: Stage,
        /// Requested stage.
        to: Stage,
    },

    /// A claim generation request is already outstanding.
    #[error("a claim is already being generated")]
    GenerationInProgress,
}

impl WorkflowError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

//! # claimflow-cli: Terminal Front End
//!
//! Drives the claim workflow from a shell. Each invocation reopens the draft
//! and history from the state directory, so a claim is prepared across
//! several commands:
//!
//! ```text
//! claimflow ingest --text "Patient has type 2 diabetes"
//! claimflow suggest
//! claimflow codes toggle E11.9
//! claimflow review --amount 250 --signed-by "Dr. Smith"
//! claimflow generate
//! ```
//!
//! ## Subcommands
//!
//! - `ingest`, `suggest`: extraction and code suggestions
//! - `codes`: approved-set edits
//! - `review`, `generate`, `claim-pdf`: sign-off and submission
//! - `form`: CMS-1500 autofill and render
//! - `history`, `status`, `reset`, `health`
//!
//! Handlers return `anyhow::Result<u8>`; the value is the process exit code.

pub mod claim;
pub mod codes;
pub mod form;
pub mod history;
pub mod ingest;
pub mod session;
pub mod status;

pub use session::{Session, DEFAULT_STATE_DIR};

//! # Error Types
//!
//! Errors raised while constructing core values from untrusted input.
//! Store mutations and approved-set operations are total and never fail;
//! only parsing paths return these.

use thiserror::Error;

/// Errors from core type construction.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timestamp string is not valid RFC 3339 or is out of range.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

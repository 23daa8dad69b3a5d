//! # Workflow Stages
//!
//! ```text
//! Upload ──▶ Suggest ──▶ Review ──▶ Generated ──▶ Claims
//!   ▲          │  ▲        │        (dismiss)
//!   └──────────┘  └────────┘
//!   (redirect)    (redirect)
//! ```
//!
//! `Upload`, `Suggest`, `Review`, and `Claims` are freely navigable subject
//! to the entry guards in [`crate::controller`]. `Generated` is entered only
//! by a successful generation and left only by dismissing the confirmation.

use claimflow_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Where the operator is in the claim pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Ingest a clinical document.
    #[default]
    Upload,
    /// Review AI-suggested codes and approve some.
    Suggest,
    /// Finalize codes, amount, and signature.
    Review,
    /// A claim was generated; its confirmation is showing.
    Generated,
    /// Browse the claims history.
    Claims,
}

impl Stage {
    /// Returns the canonical stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload => "UPLOAD",
            Self::Suggest => "SUGGEST",
            Self::Review => "REVIEW",
            Self::Generated => "GENERATED",
            Self::Claims => "CLAIMS",
        }
    }

    /// Whether the stage can only be left by dismissal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Generated)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of a single stage change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    /// Stage before the change.
    pub from: Stage,
    /// Stage after the change.
    pub to: Stage,
    /// When the change happened (UTC).
    pub timestamp: Timestamp,
    /// Why the change happened, e.g. the guard that redirected.
    pub reason: Option<String>,
}

//! # claimflow-store: Persisted Client-Side Stores
//!
//! Two independent state containers, each backed by its own named partition
//! in a local state directory:
//!
//! - **Draft** (`draft.rs`): the single in-flight [`ClaimDraft`], partition
//!   `claim-storage`.
//! - **History** (`history.rs`): the newest-first, 200-entry bounded list of
//!   [`ClaimRecord`]s, partition `claims-history`.
//!
//! ## Contract
//!
//! Store mutations are synchronous and total. Every mutation is written
//! through to the partition before it returns; a failed write is logged and
//! the in-memory state stays authoritative. Loading never fails: missing,
//! unreadable, malformed, or incompatible data yields the empty state.
//!
//! Store handles are cheap to clone and share one state, so every holder sees
//! a mutation immediately. Partition files have no cross-process locking; the
//! last writer wins.
//!
//! [`ClaimDraft`]: claimflow_core::ClaimDraft
//! [`ClaimRecord`]: claimflow_core::ClaimRecord

pub mod draft;
pub mod history;
pub mod partition;

pub use draft::DraftStore;
pub use history::{HistoryStore, HISTORY_LIMIT};
pub use partition::{LocalStorage, Partition, PartitionError, SCHEMA_VERSION};

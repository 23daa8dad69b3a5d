//! # Versioned Local Partitions
//!
//! A partition is one JSON file in the state directory, named after the
//! partition (`{root}/{name}.json`). Its content is an envelope:
//!
//! ```json
//! { "version": 1, "state": { ... } }
//! ```
//!
//! ## Loading
//!
//! | File content | Result |
//! |--------------|--------|
//! | absent | empty state |
//! | unreadable or not JSON | empty state, logged |
//! | envelope, current version | decoded state |
//! | envelope, other version | [`migrate`] result, or empty state |
//! | bare payload (no envelope) | treated as version 0 and migrated |
//! | decodes to the wrong shape | empty state, logged |
//!
//! ## Writing
//!
//! Writes go to `{name}.json.tmp` and are renamed over the partition file,
//! so a crash mid-write leaves the previous state readable.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Current persisted schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from writing a partition. Reads never error.
#[derive(Error, Debug)]
pub enum PartitionError {
    /// Filesystem error.
    #[error("partition {path}: {source}")]
    Io {
        /// File being written.
        path: PathBuf,
        source: std::io::Error,
    },

    /// State could not be encoded.
    #[error("partition encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The state directory holding all partitions.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Use `root` as the state directory. It is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The state directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The partition called `name`.
    pub fn partition(&self, name: &'static str) -> Partition {
        Partition {
            name,
            path: Some(self.root.join(format!("{name}.json"))),
        }
    }
}

/// A named, versioned JSON partition, or an in-memory stand-in with no file.
#[derive(Debug, Clone)]
pub struct Partition {
    name: &'static str,
    path: Option<PathBuf>,
}

impl Partition {
    /// A partition that loads empty and discards writes.
    pub fn ephemeral(name: &'static str) -> Self {
        Self { name, path: None }
    }

    /// Partition name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the partition state, falling back to `T::default()` on any
    /// problem.
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        let Some(path) = &self.path else {
            return T::default();
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(partition = self.name, "no persisted state, starting empty");
                return T::default();
            }
            Err(e) => {
                tracing::warn!(partition = self.name, path = %path.display(), "unreadable partition, starting empty: {e}");
                return T::default();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(partition = self.name, "corrupt partition, starting empty: {e}");
                return T::default();
            }
        };

        let (version, state) = split_envelope(value);
        let Some(state) = migrate(version, state) else {
            tracing::warn!(
                partition = self.name,
                found = version,
                expected = SCHEMA_VERSION,
                "incompatible partition version, starting empty"
            );
            return T::default();
        };

        match serde_json::from_value(state) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(partition = self.name, "partition shape mismatch, starting empty: {e}");
                T::default()
            }
        }
    }

    /// Write `state` to the partition in a current-version envelope.
    pub fn save<T: Serialize>(&self, state: &T) -> Result<(), PartitionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let envelope = serde_json::json!({
            "version": SCHEMA_VERSION,
            "state": state,
        });
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        let io_err = |source| PartitionError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

/// Separate a persisted value into `(version, state)`. Anything that is not
/// an envelope is a version-0 bare payload.
fn split_envelope(value: Value) -> (u32, Value) {
    if let Value::Object(mut map) = value {
        let version = map
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok());
        if let (Some(version), true) = (version, map.contains_key("state")) {
            let state = map.remove("state").unwrap_or(Value::Null);
            return (version, state);
        }
        return (0, Value::Object(map));
    }
    (0, value)
}

/// Bring a persisted state from `version` to [`SCHEMA_VERSION`].
///
/// Version 0 payloads predate the envelope but share the current shape.
/// Unknown versions return `None` and the caller resets to empty.
pub fn migrate(version: u32, state: Value) -> Option<Value> {
    match version {
        0 | SCHEMA_VERSION => Some(state),
        _ => None,
    }
}

//! # CLI Session
//!
//! Every invocation opens the persisted draft and history from the state
//! directory, builds a coding client, and wraps them in a
//! [`WorkflowController`]. The controller starts at `Upload` each time; the
//! stage is not persisted, so handlers navigate to the stage they need
//! before acting.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use claimflow_client::{ClientConfig, CodingClient};
use claimflow_store::{DraftStore, HistoryStore, LocalStorage};
use claimflow_workflow::{Stage, ValidationError, WorkflowController};

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".claimflow";

/// Workflow controller over the on-disk stores and the HTTP client.
pub struct Session {
    controller: WorkflowController<CodingClient>,
    state_dir: PathBuf,
}

impl Session {
    /// Open the session stored under `state_dir`.
    ///
    /// `api_url` overrides `CLAIMFLOW_API_URL`; the remaining client
    /// settings still come from the environment.
    pub fn open(api_url: Option<&str>, state_dir: &Path) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("invalid client configuration")?;
        if let Some(raw) = api_url {
            let base = ClientConfig::for_url(raw).context("invalid --api-url")?;
            config.base_url = base.base_url;
        }
        tracing::debug!(?config, state_dir = %state_dir.display(), "opening session");

        let client = CodingClient::new(config).context("failed to build HTTP client")?;
        let storage = LocalStorage::new(state_dir);
        let controller = WorkflowController::new(
            client,
            DraftStore::open(&storage),
            HistoryStore::open(&storage),
        );
        Ok(Self {
            controller,
            state_dir: state_dir.to_path_buf(),
        })
    }

    pub fn controller(&self) -> &WorkflowController<CodingClient> {
        &self.controller
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Navigate to `Review`, failing with the guard's message when the
    /// draft is not ready for it.
    pub async fn enter_review(&self) -> Result<()> {
        match self.controller.navigate(Stage::Review).await? {
            Stage::Review => Ok(()),
            Stage::Upload => bail!("no document ingested; run `claimflow ingest` first"),
            _ => bail!(ValidationError::NoCodesSelected),
        }
    }
}

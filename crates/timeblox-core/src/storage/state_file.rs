//! JSON snapshot of a [`PlannerState`].
//!
//! Lets the CLI carry state between invocations. The layout follows the
//! serde derives and is not a compatibility contract.

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::Result;
use crate::planner::PlannerState;

#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/state.json`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, or `seed()` when none has been written yet.
    pub fn load_or(&self, seed: impl FnOnce() -> PlannerState) -> Result<PlannerState> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state file yet");
                Ok(seed())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, state: &PlannerState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}

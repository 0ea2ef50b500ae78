//! Persisted run flag and next-check timestamp

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// The only state that survives a restart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub next_check_timestamp: i64,
    pub auto_redeem_running: bool,
}

/// JSON file holding [`PersistedState`]; memory-only when no path is given
#[derive(Debug)]
pub struct StateStore {
    path: Option<PathBuf>,
    current: Mutex<PersistedState>,
}

impl StateStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: Mutex::new(PersistedState::default()),
        }
    }

    /// Open the state file at `path`; a missing file starts from defaults
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let current = read_state(&path)?;
        debug!("Loaded persisted state from {}: {:?}", path.display(), current);

        Ok(Self {
            path: Some(path),
            current: Mutex::new(current),
        })
    }

    /// Last persisted values
    pub fn load(&self) -> PersistedState {
        self.current
            .lock()
            .map(|state| *state)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    pub fn set_next_check_timestamp(&self, timestamp: i64) -> Result<(), StoreError> {
        self.update(|state| state.next_check_timestamp = timestamp)
    }

    pub fn set_running(&self, running: bool) -> Result<(), StoreError> {
        self.update(|state| state.auto_redeem_running = running)
    }

    fn update<F>(&self, updater: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut PersistedState),
    {
        let mut state = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        updater(&mut state);

        match &self.path {
            Some(path) => write_state(path, &state),
            None => Ok(()),
        }
    }
}

fn read_state(path: &Path) -> Result<PersistedState, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(PersistedState::default()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedState::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_state(path: &Path, state: &PersistedState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Readers only ever see a complete document
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

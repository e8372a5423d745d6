//! The demo/live session flag.
//!
//! The mode is an explicit value passed to whatever renders figures. Switching
//! always goes through a [`Confirmer`] and is persisted before it takes effect.

use banking::model::session::SessionMode;
use banking::traits::confirm::Confirmer;
use banking::traits::mode_store::ModeStore;
use banking::BankingError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fs::{load_state, save_state};

/// Result of a mode change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    Unchanged,
    Declined,
    Switched { from: SessionMode, to: SessionMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    mode: SessionMode,
}

impl SessionState {
    pub fn new(mode: SessionMode) -> Self {
        Self { mode }
    }

    /// Restores the persisted mode. Missing or unreadable state means demo.
    pub fn load(store: &dyn ModeStore) -> Self {
        let mode = match store.load() {
            Ok(Some(mode)) => mode,
            Ok(None) => SessionMode::Demo,
            Err(e) => {
                warn!("Could not read session mode ({}), starting in demo mode", e);
                SessionMode::Demo
            }
        };
        Self { mode }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        self.mode.is_live()
    }

    /// Moves to `target` if the user confirms and the store accepts it.
    pub fn request_mode(
        &mut self,
        target: SessionMode,
        confirmer: &dyn Confirmer,
        store: &dyn ModeStore,
    ) -> Result<ModeTransition, BankingError> {
        if target == self.mode {
            return Ok(ModeTransition::Unchanged);
        }

        let prompt = match target {
            SessionMode::Live => {
                "Switch to live mode? Figures will come from your connected wallet on-chain."
            }
            SessionMode::Demo => "Switch to demo mode? Figures will show sample data.",
        };
        if !confirmer.confirm(prompt) {
            info!("Switch to {} mode declined", target);
            return Ok(ModeTransition::Declined);
        }

        store.save(target)?;
        let from = self.mode;
        self.mode = target;
        info!("Session mode switched: {} -> {}", from, target);
        Ok(ModeTransition::Switched { from, to: target })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    is_live_mode: SessionMode,
}

/// Stores the flag as `{"is_live_mode": bool}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileModeStore {
    path: PathBuf,
}

impl FileModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModeStore for FileModeStore {
    fn load(&self) -> Result<Option<SessionMode>, BankingError> {
        load_state::<SessionFile>(&self.path)
            .map(|file| file.map(|f| f.is_live_mode))
            .map_err(|e| BankingError::Storage(format!("{:#}", e)))
    }

    fn save(&self, mode: SessionMode) -> Result<(), BankingError> {
        save_state(&self.path, &SessionFile { is_live_mode: mode })
            .map_err(|e| BankingError::Storage(format!("{:#}", e)))
    }
}

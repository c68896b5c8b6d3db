//! Session Store
//!
//! Mock user database with per-user detection history, persisted as a
//! single JSON file in the local data directory. The store is an
//! append-only receiver of finalized detection records; while nobody is
//! logged in, records are simply not retained here.
//!
//! This is a demo credential model: signup records the username only
//! and login checks nothing but its existence.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::SESSION_HISTORY_CAP;
use crate::logic::detection::DetectionEvent;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// USER PROFILE
// ============================================================================

/// One registered demo user and their recent history (newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub detection_history: Vec<DetectionEvent>,
}

/// On-disk store format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    users: Vec<UserProfile>,
}

// ============================================================================
// SESSION STORE
// ============================================================================

/// User database plus the currently logged-in user, if any.
pub struct SessionStore {
    path: Option<PathBuf>,
    users: Vec<UserProfile>,
    current: Option<Uuid>,
}

impl SessionStore {
    /// Open the store at the default location under the local data
    /// directory, loading any existing user database.
    pub fn open_default() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ai-demo")
            .join("session_store.json");
        Self::open(path)
    }

    /// Open the store at an explicit path.
    pub fn open(path: PathBuf) -> Self {
        let users = match Self::load_users(&path) {
            Ok(users) => users,
            Err(e) => {
                log::warn!("Session store load failed ({}), starting empty", e);
                Vec::new()
            }
        };
        Self { path: Some(path), users, current: None }
    }

    /// Purely in-memory store, nothing persisted.
    pub fn in_memory() -> Self {
        Self { path: None, users: Vec::new(), current: None }
    }

    fn load_users(path: &PathBuf) -> Result<Vec<UserProfile>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&content)?;
        Ok(file.users)
    }

    /// Write the user database back to disk. In-memory stores skip this.
    fn persist(&self) {
        let Some(path) = &self.path else { return };

        let write = || -> Result<(), StoreError> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = StoreFile { users: self.users.clone() };
            let content = serde_json::to_string_pretty(&file)?;
            fs::write(path, content)?;
            Ok(())
        };

        if let Err(e) = write() {
            log::error!("Failed to persist session store: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Account operations
    // ------------------------------------------------------------------

    /// Register a new user and log them in. Fails only when the
    /// username is taken. The password is accepted but not stored.
    pub fn signup(&mut self, username: &str, _password: &str) -> bool {
        if self.users.iter().any(|u| u.username == username) {
            return false;
        }

        let user = UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            detection_history: Vec::new(),
        };
        self.current = Some(user.id);
        self.users.push(user);
        self.persist();
        log::info!("User signed up: {}", username);
        true
    }

    /// Log in an existing user. Only the username is checked.
    pub fn login(&mut self, username: &str, _password: &str) -> bool {
        match self.users.iter().find(|u| u.username == username) {
            Some(user) => {
                self.current = Some(user.id);
                log::info!("User logged in: {}", username);
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        let id = self.current?;
        self.users.iter().find(|u| u.id == id)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Append one finalized record to the logged-in user's history,
    /// newest first, capped at the most recent entries. No-op while
    /// logged out.
    pub fn save_event(&mut self, event: &DetectionEvent) {
        let Some(id) = self.current else { return };
        let Some(user) = self.users.iter_mut().find(|u| u.id == id) else { return };

        user.detection_history.insert(0, event.clone());
        user.detection_history.truncate(SESSION_HISTORY_CAP);
        self.persist();
    }

    /// The logged-in user's history, newest first. Empty while logged out.
    pub fn history(&self) -> Vec<DetectionEvent> {
        self.current_user()
            .map(|u| u.detection_history.clone())
            .unwrap_or_default()
    }
}

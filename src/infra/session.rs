//! Session collaborator: bearer token and customer identity.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::util::persistence::{
    clear_session_at, load_session_from, save_session_to, session_file, PersistSaveError,
    PersistedSession,
};

pub const ENV_ACCESS_TOKEN: &str = "SHIPCALC_ACCESS_TOKEN";
pub const ENV_CUSTOMER_ID: &str = "SHIPCALC_CUSTOMER_ID";

/// Narrow view of the session the API client and workflow depend on.
pub trait SessionContext: Send + Sync {
    fn current_token(&self) -> Option<String>;

    fn customer_id(&self) -> Option<String>;

    /// Called when any endpoint answers `401`. Forces re-authentication.
    fn on_unauthorized(&self);
}

/// Token and customer id held in memory, optionally mirrored to disk.
#[derive(Debug, Default)]
pub struct StoredSession {
    state: RwLock<PersistedSession>,
    path: Option<PathBuf>,
}

impl StoredSession {
    pub fn in_memory(access_token: Option<String>, customer_id: Option<String>) -> Self {
        Self {
            state: RwLock::new(PersistedSession {
                access_token,
                customer_id,
            }),
            path: None,
        }
    }

    /// Loads whatever is stored at `path`. A missing or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let state = load_session_from(&path).unwrap_or_default();
        Self {
            state: RwLock::new(state),
            path: Some(path),
        }
    }

    /// Platform session file, overridden by `SHIPCALC_ACCESS_TOKEN` / `SHIPCALC_CUSTOMER_ID`.
    pub fn from_environment() -> Self {
        let session = match session_file() {
            Some(path) => Self::open(path),
            None => Self::default(),
        };
        {
            let mut state = session.write();
            if let Some(token) = non_empty_env(ENV_ACCESS_TOKEN) {
                state.access_token = Some(token);
            }
            if let Some(customer) = non_empty_env(ENV_CUSTOMER_ID) {
                state.customer_id = Some(customer);
            }
        }
        session
    }

    pub fn set_credentials(
        &self,
        access_token: String,
        customer_id: Option<String>,
    ) -> Result<(), PersistSaveError> {
        let snapshot = {
            let mut state = self.write();
            state.access_token = Some(access_token);
            state.customer_id = customer_id;
            state.clone()
        };
        match &self.path {
            Some(path) => save_session_to(path, &snapshot),
            None => Ok(()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().access_token.is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, PersistedSession> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PersistedSession> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionContext for StoredSession {
    fn current_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    fn customer_id(&self) -> Option<String> {
        self.read().customer_id.clone()
    }

    /// Drops the token in memory and on disk. The customer id is kept.
    fn on_unauthorized(&self) {
        debug!("session rejected by server, clearing stored token");
        let snapshot = {
            let mut state = self.write();
            state.access_token = None;
            state.clone()
        };
        let Some(path) = &self.path else {
            return;
        };
        let outcome = if snapshot.customer_id.is_some() {
            save_session_to(path, &snapshot)
        } else {
            clear_session_at(path)
        };
        if let Err(err) = outcome {
            warn!(error = %err, path = %path.display(), "failed to update persisted session");
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

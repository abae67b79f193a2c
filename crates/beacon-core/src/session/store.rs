//! Persisted session store

use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{Session, SESSION_KEY};
use crate::clock::Clock;
use crate::error::{BeaconError, BeaconResult};
use crate::ids::IdGenerator;
use crate::store::SharedStore;

/// Owner of the persisted session record
///
/// Cheap to clone; clones share the underlying store and collaborators.
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Create a session store over the given collaborators
    pub fn new(store: SharedStore, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { store, ids, clock }
    }

    /// Start a session, overwriting any previously active one.
    ///
    /// Uses `explicit_id` as the session id when supplied, otherwise mints
    /// one from the id generator (generation failure propagates).
    pub async fn start(&self, explicit_id: Option<String>) -> BeaconResult<Session> {
        let id = match explicit_id {
            Some(id) => id,
            None => self.ids.generate()?,
        };

        let session = Session::new(id, self.clock.now());
        self.save(&session).await?;

        debug!("Started session {}", session.id);
        Ok(session)
    }

    /// Persist the given session record under the session key
    pub async fn save(&self, session: &Session) -> BeaconResult<()> {
        let value = serde_json::to_value(session)
            .map_err(|e| BeaconError::json(format!("Failed to serialize session: {}", e)))?;
        self.store.set(SESSION_KEY, value).await
    }

    /// The persisted session, if one is active
    pub async fn current(&self) -> BeaconResult<Option<Session>> {
        match self.store.get(SESSION_KEY).await? {
            Some(value) => {
                let session = serde_json::from_value(value).map_err(|e| {
                    BeaconError::json(format!("Stored session is malformed: {}", e))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Remove the persisted session record
    pub async fn clear(&self) -> BeaconResult<()> {
        self.store.delete(SESSION_KEY).await?;
        debug!("Cleared session");
        Ok(())
    }

    /// The current session's id, or `None` when no session is active.
    ///
    /// Store read failures are logged and treated as no active session.
    pub async fn id(&self) -> Option<String> {
        match self.current().await {
            Ok(session) => session.map(|s| s.id),
            Err(e) => {
                warn!("Failed to read current session: {}", e);
                None
            }
        }
    }
}

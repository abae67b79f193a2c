//! Identity binding
//!
//! Binds a user identity to the current session and project by emitting an
//! identify envelope. The user record itself is never persisted here; it
//! only rides the wire.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::config::ConfigAccessor;
use crate::envelope::{Envelope, Op};
use crate::error::{BeaconError, BeaconResult};
use crate::session::{SessionStore, SESSION_ID_KEY};
use crate::transport::Transmitter;

/// Emitter of identify envelopes
#[derive(Clone)]
pub struct IdentityBinder {
    config: ConfigAccessor,
    sessions: SessionStore,
    transmitter: Arc<dyn Transmitter>,
}

impl IdentityBinder {
    /// Create a binder over the given collaborators
    pub fn new(
        config: ConfigAccessor,
        sessions: SessionStore,
        transmitter: Arc<dyn Transmitter>,
    ) -> Self {
        Self {
            config,
            sessions,
            transmitter,
        }
    }

    /// Bind `user` to the current session and project.
    ///
    /// `user` must carry a non-empty `id`, checked before any side
    /// effect. The configured project id is attached into the user record,
    /// and the current session id (when one is active) correlates the
    /// emission.
    pub async fn identify(&self, user: Map<String, Value>) -> BeaconResult<()> {
        let has_id = user
            .get("id")
            .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));
        if !has_id {
            return Err(BeaconError::MissingUserId);
        }

        let mut user = user;
        if let Some(project_id) = self.config.project_id().await {
            user.insert("project-id".to_string(), Value::String(project_id));
        }

        let mut record = Map::new();
        if let Some(session_id) = self.sessions.id().await {
            record.insert(SESSION_ID_KEY.to_string(), Value::String(session_id));
        }
        record.insert("user".to_string(), Value::Object(user));

        self.transmitter
            .send(Envelope::new(Op::Identify, Value::Object(record)))
            .await?;

        debug!("Identified user");
        Ok(())
    }
}

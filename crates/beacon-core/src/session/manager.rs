//! Session lifecycle manager
//!
//! Starts and ends sessions: persists the session record through
//! `SessionStore`, builds the outgoing session-started / session-ended
//! records, and hands them to the transmitter.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::store::SessionStore;
use super::types::{Session, SESSION_ID_KEY};
use crate::clock::Clock;
use crate::config::ConfigAccessor;
use crate::env::EnvironmentProvider;
use crate::envelope::{Envelope, Op};
use crate::error::{BeaconError, BeaconResult};
use crate::merge::merge;
use crate::transport::Transmitter;

/// Session lifecycle manager; owns the session store
#[derive(Clone)]
pub struct SessionManager {
    config: ConfigAccessor,
    store: SessionStore,
    env: Arc<dyn EnvironmentProvider>,
    clock: Arc<dyn Clock>,
    transmitter: Arc<dyn Transmitter>,
}

impl SessionManager {
    /// Create a manager over the given collaborators
    pub fn new(
        config: ConfigAccessor,
        store: SessionStore,
        env: Arc<dyn EnvironmentProvider>,
        clock: Arc<dyn Clock>,
        transmitter: Arc<dyn Transmitter>,
    ) -> Self {
        Self {
            config,
            store,
            env,
            clock,
            transmitter,
        }
    }

    /// The session store this manager owns
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a session and emit a session-started envelope.
    ///
    /// When `data` carries the reserved `session-id` key, that value is
    /// used as the session id and stripped from the outgoing data;
    /// otherwise a fresh id is minted. Any previously active session is
    /// silently overwritten without a session-ended emission for it.
    ///
    /// The outgoing record is the merge of environment defaults (hostname,
    /// locale, screen dimensions) and `data`, plus the session id, project
    /// identity, and start time. When `user` is supplied, its `id` becomes
    /// the record's `user-id` and the whole user record rides the envelope
    /// metadata.
    pub async fn start(
        &self,
        data: Option<Map<String, Value>>,
        user: Option<Map<String, Value>>,
    ) -> BeaconResult<Session> {
        let mut data = data.unwrap_or_default();

        let explicit_id = match data.remove(SESSION_ID_KEY) {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            Some(other) => {
                warn!("Ignoring non-string {} in session data: {}", SESSION_ID_KEY, other);
                None
            }
            None => None,
        };

        let mut session = self.store.start(explicit_id).await?;

        let user_id = user
            .as_ref()
            .and_then(|u| u.get("id"))
            .and_then(Value::as_str)
            .map(String::from);
        let tags = data
            .get("tags")
            .and_then(|v| serde_json::from_value::<Vec<String>>(v.clone()).ok());

        if user_id.is_some() || tags.is_some() {
            session.user_id = user_id.clone();
            session.tags = tags;
            self.store.save(&session).await?;
        }

        let snapshot = self.env.snapshot();
        let mut record = merge(&[snapshot.session_defaults(), data]);
        record.insert(
            SESSION_ID_KEY.to_string(),
            Value::String(session.id.clone()),
        );

        let config = self.config.config().await;
        if let Some(project_id) = config.project_id {
            record.insert("project-id".to_string(), Value::String(project_id));
        }
        if let Some(version_id) = config.project_version_id {
            record.insert("project-version-id".to_string(), Value::String(version_id));
        }
        record.insert(
            "started-at".to_string(),
            serde_json::to_value(session.started_at)
                .map_err(|e| BeaconError::json(format!("Failed to serialize timestamp: {}", e)))?,
        );
        if let Some(id) = &user_id {
            record.insert("user-id".to_string(), Value::String(id.clone()));
        }

        let mut envelope = Envelope::new(Op::SessionStarted, Value::Object(record));
        if let Some(user) = user {
            envelope = envelope.with_user(user);
        }

        self.transmitter.send(envelope).await?;

        info!("Session {} started", session.id);
        Ok(session)
    }

    /// End the active session and emit a session-ended envelope.
    ///
    /// With no active session this is a recoverable no-op: a warning is
    /// logged, nothing is emitted, and the call returns `Ok`.
    pub async fn end(&self) -> BeaconResult<()> {
        let Some(id) = self.store.id().await else {
            warn!("No active session to end");
            return Ok(());
        };

        let mut record = Map::new();
        record.insert(SESSION_ID_KEY.to_string(), Value::String(id.clone()));
        record.insert(
            "ended-at".to_string(),
            serde_json::to_value(self.clock.now())
                .map_err(|e| BeaconError::json(format!("Failed to serialize timestamp: {}", e)))?,
        );

        let mut envelope = Envelope::new(Op::SessionEnded, Value::Object(record));
        if let Some(project_id) = self.config.project_id().await {
            envelope = envelope.with_project_id(project_id);
        }

        self.transmitter.send(envelope).await?;
        self.store.clear().await?;

        info!("Session {} ended", id);
        Ok(())
    }
}

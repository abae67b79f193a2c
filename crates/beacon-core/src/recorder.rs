//! Event tracking
//!
//! `EventRecorder` assembles a track event from overlapping sources
//! (generated defaults, referrer context, page context, caller data) with
//! a fixed precedence, and emits it as a single-element events envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::ConfigAccessor;
use crate::env::EnvironmentProvider;
use crate::envelope::{Envelope, Op};
use crate::error::{BeaconError, BeaconResult};
use crate::ids::IdGenerator;
use crate::merge::merge;
use crate::session::{SessionStore, SESSION_ID_KEY};
use crate::transport::Transmitter;

/// Reserved key carrying the event id through the merge layers
const EVENT_ID_KEY: &str = "event-id";

/// Reserved key carrying the project id through the merge layers
const PROJECT_ID_KEY: &str = "project-id";

/// A discrete named occurrence correlated to a session
///
/// Transient: built per `track` call and handed to the transmitter
/// immediately, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event-id")]
    pub id: String,
    #[serde(rename = "project-id", skip_serializing_if = "Option::is_none", default)]
    pub project_id: Option<String>,
    #[serde(rename = "session-id", skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
    pub name: String,
    #[serde(rename = "created-at")]
    pub created_at: DateTime<Utc>,
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tags: Option<Vec<String>>,
}

/// Builder and emitter of track events
#[derive(Clone)]
pub struct EventRecorder {
    config: ConfigAccessor,
    sessions: SessionStore,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    env: Arc<dyn EnvironmentProvider>,
    transmitter: Arc<dyn Transmitter>,
}

impl EventRecorder {
    /// Create a recorder over the given collaborators
    pub fn new(
        config: ConfigAccessor,
        sessions: SessionStore,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        env: Arc<dyn EnvironmentProvider>,
        transmitter: Arc<dyn Transmitter>,
    ) -> Self {
        Self {
            config,
            sessions,
            ids,
            clock,
            env,
            transmitter,
        }
    }

    /// Build and emit one track event.
    ///
    /// Fails with [`BeaconError::MissingName`] when `name` is empty,
    /// before any side effect. The event's `data` is composed from four
    /// layers, lowest to highest precedence: generated defaults (event id,
    /// current session id, current project id), referrer context (only
    /// when the snapshot carries a referrer), page context (current URL
    /// and title), and caller `data`. The reserved correlation keys are
    /// then lifted out of the merged map into the event's own fields, so a
    /// caller override of `session-id` or `event-id` takes effect.
    ///
    /// `tags` are attached verbatim (full replace, no merge). Exactly one
    /// transmitter call per invocation.
    pub async fn track(
        &self,
        name: &str,
        data: Option<Map<String, Value>>,
        tags: Option<Vec<String>>,
    ) -> BeaconResult<Event> {
        if name.is_empty() {
            return Err(BeaconError::MissingName);
        }

        let generated_id = self.ids.generate()?;

        let mut defaults = Map::new();
        defaults.insert(
            EVENT_ID_KEY.to_string(),
            Value::String(generated_id.clone()),
        );
        if let Some(session_id) = self.sessions.id().await {
            defaults.insert(SESSION_ID_KEY.to_string(), Value::String(session_id));
        }
        if let Some(project_id) = self.config.project_id().await {
            defaults.insert(PROJECT_ID_KEY.to_string(), Value::String(project_id));
        }

        let snapshot = self.env.snapshot();
        let mut merged = merge(&[
            defaults,
            snapshot.referrer_context(),
            snapshot.page_context(),
            data.unwrap_or_default(),
        ]);

        let event = Event {
            id: take_id(&mut merged, EVENT_ID_KEY).unwrap_or(generated_id),
            project_id: take_id(&mut merged, PROJECT_ID_KEY),
            session_id: take_id(&mut merged, SESSION_ID_KEY),
            name: name.to_string(),
            created_at: self.clock.now(),
            data: merged,
            tags,
        };

        let payload = serde_json::to_value(&event)
            .map_err(|e| BeaconError::json(format!("Failed to serialize event: {}", e)))?;

        // Single-element sequence: the collector batches downstream.
        self.transmitter
            .send(Envelope::new(Op::Events, Value::Array(vec![payload])))
            .await?;

        Ok(event)
    }
}

/// Lift a correlation id out of the merged map.
///
/// A `null` (a caller explicitly suppressing the key) reads as absent;
/// non-string scalars are stringified.
fn take_id(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id),
        Some(other) => Some(other.to_string()),
    }
}

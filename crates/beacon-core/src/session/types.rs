//! Session record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store key under which the active session is persisted
pub const SESSION_KEY: &str = "session";

/// Reserved key in session-start data carrying a caller-chosen session id
pub const SESSION_ID_KEY: &str = "session-id";

/// Persisted session record
///
/// Exactly one session is active per store scope at a time. While it
/// exists its id is stable and is attached to every event and identify
/// record emitted until the session is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "session-id")]
    pub id: String,
    #[serde(rename = "started-at")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "user-id", skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tags: Option<Vec<String>>,
}

impl Session {
    /// Create a session record with the given id and start time
    pub fn new(id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            started_at,
            user_id: None,
            tags: None,
        }
    }
}

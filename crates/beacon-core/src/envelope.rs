//! Wire-level envelope
//!
//! Every emission (identify, session lifecycle, events) is wrapped in an
//! Envelope combining operation metadata with the payload record(s). The
//! envelope is the unit handed to the transmitter and serialized verbatim
//! as the POST body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operation discriminator carried in envelope metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Op {
    Identify,
    SessionStarted,
    SessionEnded,
    Events,
}

/// Envelope metadata: the operation plus op-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub op: Op,
    /// Project the payload belongs to (session-ended)
    #[serde(rename = "project-id", skip_serializing_if = "Option::is_none", default)]
    pub project_id: Option<String>,
    /// User record attached at session start
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<Map<String, Value>>,
}

impl EnvelopeMetadata {
    /// Metadata carrying only the operation
    pub fn new(op: Op) -> Self {
        Self {
            op,
            project_id: None,
            user: None,
        }
    }
}

/// Wire unit handed to the transmitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub metadata: EnvelopeMetadata,
    /// A single record, or a sequence of records for batched ops
    pub data: Value,
}

impl Envelope {
    /// Create an envelope for the given operation and payload
    pub fn new(op: Op, data: Value) -> Self {
        Self {
            metadata: EnvelopeMetadata::new(op),
            data,
        }
    }

    /// Attach a project id to the metadata
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.metadata.project_id = Some(project_id.into());
        self
    }

    /// Attach a user record to the metadata
    pub fn with_user(mut self, user: Map<String, Value>) -> Self {
        self.metadata.user = Some(user);
        self
    }
}

//! Envelope transmission
//!
//! The terminal step of every pipeline: serialize the envelope and hand it
//! to the collector. Delivery is fire-and-forget: the POST is detached
//! onto the runtime and its outcome is logged, never surfaced. The only
//! failure a caller sees is a missing endpoint, raised before anything
//! leaves the process.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::ConfigAccessor;
use crate::envelope::Envelope;
use crate::error::{BeaconError, BeaconResult};

/// Sink for outgoing envelopes
#[async_trait]
pub trait Transmitter: Send + Sync {
    /// Serialize and dispatch one envelope
    async fn send(&self, envelope: Envelope) -> BeaconResult<()>;
}

/// HTTP transmitter POSTing JSON to the configured collector endpoint
pub struct HttpTransmitter {
    http: reqwest::Client,
    config: ConfigAccessor,
}

impl HttpTransmitter {
    /// Create a transmitter reading its endpoint from the given config
    pub fn new(config: ConfigAccessor) -> BeaconResult<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| BeaconError::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl Transmitter for HttpTransmitter {
    async fn send(&self, envelope: Envelope) -> BeaconResult<()> {
        let endpoint = self
            .config
            .endpoint()
            .await
            .ok_or_else(|| BeaconError::config("Collector endpoint is not configured"))?;

        let op = envelope.metadata.op;
        let request = self.http.post(&endpoint).json(&envelope);

        // Detach the request; delivery outcome is logged, not observed.
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Delivered {:?} envelope", op);
                }
                Ok(response) => {
                    warn!(
                        "Collector rejected {:?} envelope with status {}",
                        op,
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("Failed to deliver {:?} envelope: {}", op, e);
                }
            }
        });

        Ok(())
    }
}

/// In-memory transmitter capturing envelopes (for testing)
#[derive(Default)]
pub struct MemoryTransmitter {
    sent: Mutex<Vec<Envelope>>,
}

impl MemoryTransmitter {
    /// Create a new capturing transmitter
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle, ready to hand to component constructors
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Envelopes captured so far, in emission order
    pub async fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Transmitter for MemoryTransmitter {
    async fn send(&self, envelope: Envelope) -> BeaconResult<()> {
        self.sent.lock().await.push(envelope);
        Ok(())
    }
}

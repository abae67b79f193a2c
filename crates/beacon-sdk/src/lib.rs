//! Beacon SDK
//!
//! High-level facade over `beacon-core` for embedding applications: a
//! single [`BeaconClient`] wires the production collaborators (file-backed
//! store, UUID ids, system clock, HTTP transmitter) behind a builder, and
//! exposes the telemetry operations directly.
//!
//! # Example
//!
//! ```no_run
//! use beacon_sdk::{BeaconClient, ProjectConfig};
//!
//! # async fn example() -> beacon_sdk::BeaconResult<()> {
//! let client = BeaconClient::new()?;
//!
//! client
//!     .init(ProjectConfig {
//!         project_id: Some("p-1".to_string()),
//!         project_version_id: None,
//!         endpoint: Some("https://collector.example/ingest".to_string()),
//!     })
//!     .await?;
//!
//! client.start_session(None, None).await?;
//! client.track("page-viewed", None, None).await?;
//! client.end_session().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{BeaconBuilder, BeaconClient};

// Re-export commonly used types from core
pub use beacon_core::{
    BeaconError, BeaconResult, EnvironmentProvider, EnvironmentSnapshot, Envelope, Event, Op,
    ProjectConfig, Session, StaticEnvironment,
};

//! Beacon Core Library
//!
//! This crate provides the core functionality of the Beacon telemetry
//! client: session lifecycle, identity binding, event tracking, and the
//! deterministic record-construction pipeline feeding the collector.
//!
//! All ambient state (the persisted key/value store, the page/navigation
//! context, id generation, the clock, and the network transport) is
//! injected through traits, so every component runs unchanged against
//! in-memory fakes.

pub mod clock;
pub mod config;
pub mod env;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod ids;
pub mod merge;
pub mod recorder;
pub mod session;
pub mod store;
pub mod transport;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigAccessor, ProjectConfig, CONFIG_KEY};
pub use env::{EnvironmentProvider, EnvironmentSnapshot, StaticEnvironment};
pub use envelope::{Envelope, EnvelopeMetadata, Op};
pub use error::{BeaconError, BeaconResult};
pub use identity::IdentityBinder;
pub use ids::{IdGenerator, UuidGenerator};
pub use merge::merge;
pub use recorder::{Event, EventRecorder};
pub use session::{Session, SessionManager, SessionStore, SESSION_ID_KEY, SESSION_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, SharedStore};
pub use transport::{HttpTransmitter, MemoryTransmitter, Transmitter};

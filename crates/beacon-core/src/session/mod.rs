//! Session lifecycle
//!
//! A session is a bounded period of user activity identified by a stable
//! id. This module provides the persisted session record, the store that
//! owns it, and the manager that starts and ends sessions and emits the
//! corresponding envelopes.

pub mod manager;
pub mod store;
pub mod types;

pub use manager::SessionManager;
pub use store::SessionStore;
pub use types::{Session, SESSION_ID_KEY, SESSION_KEY};

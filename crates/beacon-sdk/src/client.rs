//! SDK client implementation

use std::path::PathBuf;
use std::sync::Arc;

use beacon_core::{
    BeaconError, BeaconResult, Clock, ConfigAccessor, EnvironmentProvider, EnvironmentSnapshot,
    Event, EventRecorder, FileStore, HttpTransmitter, IdGenerator, IdentityBinder, ProjectConfig,
    Session, SessionManager, SessionStore, SharedStore, StaticEnvironment, SystemClock,
    Transmitter, UuidGenerator,
};
use serde_json::{Map, Value};

/// High-level telemetry client
///
/// Wires the core components over one shared store and transmitter. All
/// methods delegate to the corresponding core component; see
/// `beacon-core` for the record-construction contracts.
pub struct BeaconClient {
    config: ConfigAccessor,
    sessions: SessionManager,
    recorder: EventRecorder,
    identity: IdentityBinder,
}

impl BeaconClient {
    /// Create a client with the production defaults: file store under
    /// `~/.beacon`, UUID ids, system clock, HTTP transmitter, and an
    /// empty environment snapshot.
    pub fn new() -> BeaconResult<Self> {
        BeaconBuilder::new().build()
    }

    /// Start building a client with custom collaborators
    pub fn builder() -> BeaconBuilder {
        BeaconBuilder::new()
    }

    /// Persist the project configuration
    pub async fn init(&self, config: ProjectConfig) -> BeaconResult<()> {
        self.config.init(config).await
    }

    /// The persisted project configuration
    pub async fn config(&self) -> ProjectConfig {
        self.config.config().await
    }

    /// Start a session; see [`SessionManager::start`]
    pub async fn start_session(
        &self,
        data: Option<Map<String, Value>>,
        user: Option<Map<String, Value>>,
    ) -> BeaconResult<Session> {
        self.sessions.start(data, user).await
    }

    /// End the active session; see [`SessionManager::end`]
    pub async fn end_session(&self) -> BeaconResult<()> {
        self.sessions.end().await
    }

    /// The active session's id, if any
    pub async fn session_id(&self) -> Option<String> {
        self.sessions.store().id().await
    }

    /// Record a track event; see [`EventRecorder::track`]
    pub async fn track(
        &self,
        name: &str,
        data: Option<Map<String, Value>>,
        tags: Option<Vec<String>>,
    ) -> BeaconResult<Event> {
        self.recorder.track(name, data, tags).await
    }

    /// Bind a user identity to the current session; see
    /// [`IdentityBinder::identify`]
    pub async fn identify(&self, user: Map<String, Value>) -> BeaconResult<()> {
        self.identity.identify(user).await
    }
}

/// Builder for [`BeaconClient`]
///
/// Every collaborator can be swapped out; anything left unset falls back
/// to the production default.
#[derive(Default)]
pub struct BeaconBuilder {
    store: Option<SharedStore>,
    store_dir: Option<PathBuf>,
    environment: Option<Arc<dyn EnvironmentProvider>>,
    transmitter: Option<Arc<dyn Transmitter>>,
    ids: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
}

impl BeaconBuilder {
    /// Create a builder with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Root directory for the file-backed store (default `~/.beacon`)
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Use the given store instead of the file-backed default
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Use the given environment provider
    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentProvider>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Use a fixed environment snapshot
    pub fn with_snapshot(self, snapshot: EnvironmentSnapshot) -> Self {
        self.with_environment(StaticEnvironment::shared(snapshot))
    }

    /// Use the given transmitter instead of the HTTP default
    pub fn with_transmitter(mut self, transmitter: Arc<dyn Transmitter>) -> Self {
        self.transmitter = Some(transmitter);
        self
    }

    /// Use the given id generator
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Use the given clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Wire the components and build the client
    pub fn build(self) -> BeaconResult<BeaconClient> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let dir = match self.store_dir {
                    Some(dir) => dir,
                    None => default_store_dir()?,
                };
                tracing::debug!("Using file store at {:?}", dir);
                Arc::new(FileStore::new(dir))
            }
        };

        let config = ConfigAccessor::new(store.clone());
        let ids: Arc<dyn IdGenerator> = self.ids.unwrap_or_else(|| Arc::new(UuidGenerator));
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(StaticEnvironment::default()));
        let transmitter: Arc<dyn Transmitter> = match self.transmitter {
            Some(transmitter) => transmitter,
            None => Arc::new(HttpTransmitter::new(config.clone())?),
        };

        let session_store = SessionStore::new(store, ids.clone(), clock.clone());
        let sessions = SessionManager::new(
            config.clone(),
            session_store.clone(),
            environment.clone(),
            clock.clone(),
            transmitter.clone(),
        );
        let recorder = EventRecorder::new(
            config.clone(),
            session_store.clone(),
            ids,
            clock,
            environment,
            transmitter.clone(),
        );
        let identity = IdentityBinder::new(config.clone(), session_store, transmitter);

        Ok(BeaconClient {
            config,
            sessions,
            recorder,
            identity,
        })
    }
}

/// Default base directory for the persisted store
fn default_store_dir() -> BeaconResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BeaconError::config("Could not determine home directory"))?;
    Ok(home.join(".beacon"))
}

//! Integration tests for the Beacon record pipeline
//!
//! Exercises the full flow (init, session start, identify, track, session
//! end) against the in-memory store and a capturing transmitter.

use beacon_core::{
    ConfigAccessor, EnvironmentSnapshot, EventRecorder, IdentityBinder, MemoryStore,
    MemoryTransmitter, Op, ProjectConfig, SessionManager, SessionStore, SharedStore,
    StaticEnvironment, SystemClock, UuidGenerator,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

struct Client {
    config: ConfigAccessor,
    sessions: SessionManager,
    recorder: EventRecorder,
    identity: IdentityBinder,
    transmitter: Arc<MemoryTransmitter>,
}

fn client(snapshot: EnvironmentSnapshot) -> Client {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let config = ConfigAccessor::new(store.clone());
    let session_store = SessionStore::new(store, Arc::new(UuidGenerator), Arc::new(SystemClock));
    let transmitter = MemoryTransmitter::shared();
    let env = StaticEnvironment::shared(snapshot);

    let sessions = SessionManager::new(
        config.clone(),
        session_store.clone(),
        env.clone(),
        Arc::new(SystemClock),
        transmitter.clone(),
    );
    let recorder = EventRecorder::new(
        config.clone(),
        session_store.clone(),
        Arc::new(UuidGenerator),
        Arc::new(SystemClock),
        env,
        transmitter.clone(),
    );
    let identity = IdentityBinder::new(config.clone(), session_store, transmitter.clone());

    Client {
        config,
        sessions,
        recorder,
        identity,
        transmitter,
    }
}

fn map(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_full_visit_flow() {
    let c = client(EnvironmentSnapshot {
        hostname: "shop.example".to_string(),
        language: "de-DE".to_string(),
        screen_width: 1440,
        screen_height: 900,
        url_path: "/cart".to_string(),
        url_query: "".to_string(),
        page_title: "Cart".to_string(),
        referrer: Some("https://search.example/results?q=shoes".to_string()),
    });

    c.config
        .init(ProjectConfig {
            project_id: Some("p-shop".to_string()),
            project_version_id: Some("v-12".to_string()),
            endpoint: Some("https://collector.example/ingest".to_string()),
        })
        .await
        .unwrap();

    let session = c
        .sessions
        .start(None, Some(map(json!({"id": "u-42"}))))
        .await
        .unwrap();
    c.identity
        .identify(map(json!({"id": "u-42", "plan": "pro"})))
        .await
        .unwrap();
    let event = c
        .recorder
        .track("added-to-cart", Some(map(json!({"sku": "A-1"}))), None)
        .await
        .unwrap();
    c.sessions.end().await.unwrap();

    let sent = c.transmitter.sent().await;
    let ops: Vec<Op> = sent.iter().map(|e| e.metadata.op).collect();
    assert_eq!(
        ops,
        vec![Op::SessionStarted, Op::Identify, Op::Events, Op::SessionEnded]
    );

    // Every emission carries the same session id.
    let started = sent[0].data.as_object().unwrap();
    assert_eq!(started["session-id"], json!(session.id));
    assert_eq!(started["project-id"], json!("p-shop"));
    assert_eq!(started["project-version-id"], json!("v-12"));
    assert_eq!(started["user-id"], json!("u-42"));

    let identified = sent[1].data.as_object().unwrap();
    assert_eq!(identified["session-id"], json!(session.id));
    assert_eq!(identified["user"]["project-id"], json!("p-shop"));

    assert_eq!(event.session_id, Some(session.id.clone()));
    let batch = sent[2].data.as_array().unwrap();
    assert_eq!(batch[0]["session-id"], json!(session.id));
    assert_eq!(batch[0]["data"]["sku"], json!("A-1"));
    assert_eq!(batch[0]["data"]["referrer/hostname"], json!("search.example"));
    assert_eq!(batch[0]["data"]["referrer/query"], json!("?q=shoes"));
    assert_eq!(batch[0]["data"]["url/path"], json!("/cart"));

    let ended = sent[3].data.as_object().unwrap();
    assert_eq!(ended["session-id"], json!(session.id));
    assert_eq!(sent[3].metadata.project_id, Some("p-shop".to_string()));

    // The session is gone; later events are uncorrelated.
    let orphan = c.recorder.track("viewed", None, None).await.unwrap();
    assert_eq!(orphan.session_id, None);
}

#[tokio::test]
async fn test_track_before_any_session_or_config() {
    let c = client(EnvironmentSnapshot::default());

    let event = c
        .recorder
        .track("clicked", Some(map(json!({"foo": 1}))), None)
        .await
        .unwrap();

    assert_eq!(event.session_id, None);
    assert_eq!(event.project_id, None);
    assert_eq!(event.data["foo"], json!(1));
}

#[tokio::test]
async fn test_session_rotation_in_place() {
    let c = client(EnvironmentSnapshot::default());

    let first = c.sessions.start(None, None).await.unwrap();
    let second = c.sessions.start(None, None).await.unwrap();
    assert_ne!(first.id, second.id);

    // Events after rotation correlate to the new session only.
    let event = c.recorder.track("clicked", None, None).await.unwrap();
    assert_eq!(event.session_id, Some(second.id));
}

#[tokio::test]
async fn test_failed_track_has_no_side_effects() {
    let c = client(EnvironmentSnapshot::default());
    c.sessions.start(None, None).await.unwrap();
    let before = c.transmitter.sent().await.len();

    assert!(c.recorder.track("", None, None).await.is_err());

    assert_eq!(c.transmitter.sent().await.len(), before);
    // The session record is untouched.
    assert!(c.sessions.store().id().await.is_some());
}

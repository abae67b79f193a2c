//! Page/navigation environment snapshot
//!
//! Everything the pipeline reads from the embedding page (current URL,
//! referrer, document title, screen dimensions, locale) is captured in a
//! single read-only value object. Components take a provider at
//! construction time and snapshot it per call, so context is fully
//! mockable and never read from ambient globals.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Read-only snapshot of the page/navigation context at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentSnapshot {
    /// Hostname the page is served from
    pub hostname: String,
    /// User locale (e.g. `"en-US"`)
    pub language: String,
    /// Screen width in pixels
    pub screen_width: u32,
    /// Screen height in pixels
    pub screen_height: u32,
    /// Path component of the current URL
    pub url_path: String,
    /// Query string of the current URL, including the leading `?` when present
    pub url_query: String,
    /// Document title
    pub page_title: String,
    /// Raw referrer URL, when the navigation had one
    pub referrer: Option<String>,
}

impl EnvironmentSnapshot {
    /// Page-context layer of an event record: current URL and title.
    pub fn page_context(&self) -> Map<String, Value> {
        let mut context = Map::new();
        context.insert("url/path".to_string(), Value::String(self.url_path.clone()));
        context.insert(
            "url/query".to_string(),
            Value::String(self.url_query.clone()),
        );
        context.insert(
            "page/title".to_string(),
            Value::String(self.page_title.clone()),
        );
        context
    }

    /// Referrer-context layer of an event record.
    ///
    /// Empty unless the snapshot carries a non-empty, parseable referrer
    /// URL. `referrer/query` is present only when the referrer's query
    /// string is non-empty, and keeps the leading `?`.
    pub fn referrer_context(&self) -> Map<String, Value> {
        let mut context = Map::new();

        let Some(raw) = self.referrer.as_deref().filter(|r| !r.is_empty()) else {
            return context;
        };

        let parsed = match Url::parse(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Ignoring unparseable referrer {:?}: {}", raw, e);
                return context;
            }
        };

        context.insert(
            "referrer/path".to_string(),
            Value::String(parsed.path().to_string()),
        );
        if let Some(host) = parsed.host_str() {
            context.insert(
                "referrer/hostname".to_string(),
                Value::String(host.to_string()),
            );
        }
        if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
            context.insert(
                "referrer/query".to_string(),
                Value::String(format!("?{}", query)),
            );
        }

        context
    }

    /// Environment defaults of a session-started record.
    pub fn session_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert(
            "location/hostname".to_string(),
            Value::String(self.hostname.clone()),
        );
        defaults.insert("language".to_string(), Value::String(self.language.clone()));
        defaults.insert("screen/height".to_string(), Value::from(self.screen_height));
        defaults.insert("screen/width".to_string(), Value::from(self.screen_width));
        defaults
    }
}

/// Source of environment snapshots
pub trait EnvironmentProvider: Send + Sync {
    /// Snapshot the page/navigation context as of now
    fn snapshot(&self) -> EnvironmentSnapshot;
}

/// Provider returning a fixed snapshot supplied by the embedding application
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    snapshot: EnvironmentSnapshot,
}

impl StaticEnvironment {
    /// Create a provider around the given snapshot
    pub fn new(snapshot: EnvironmentSnapshot) -> Self {
        Self { snapshot }
    }

    /// Shared handle, ready to hand to component constructors
    pub fn shared(snapshot: EnvironmentSnapshot) -> Arc<dyn EnvironmentProvider> {
        Arc::new(Self::new(snapshot))
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_with_referrer(referrer: Option<&str>) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            hostname: "app.example".to_string(),
            language: "en-US".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            url_path: "/checkout".to_string(),
            url_query: "?step=2".to_string(),
            page_title: "Checkout".to_string(),
            referrer: referrer.map(String::from),
        }
    }

    #[test]
    fn test_page_context_keys() {
        let context = snapshot_with_referrer(None).page_context();

        assert_eq!(context["url/path"], json!("/checkout"));
        assert_eq!(context["url/query"], json!("?step=2"));
        assert_eq!(context["page/title"], json!("Checkout"));
    }

    #[test]
    fn test_referrer_context_full() {
        let context =
            snapshot_with_referrer(Some("https://ref.example/path?q=1")).referrer_context();

        assert_eq!(context["referrer/path"], json!("/path"));
        assert_eq!(context["referrer/hostname"], json!("ref.example"));
        assert_eq!(context["referrer/query"], json!("?q=1"));
    }

    #[test]
    fn test_referrer_context_absent_without_referrer() {
        assert!(snapshot_with_referrer(None).referrer_context().is_empty());
        assert!(snapshot_with_referrer(Some("")).referrer_context().is_empty());
    }

    #[test]
    fn test_referrer_query_omitted_when_empty() {
        let context = snapshot_with_referrer(Some("https://ref.example/path")).referrer_context();

        assert_eq!(context["referrer/hostname"], json!("ref.example"));
        assert!(!context.contains_key("referrer/query"));
    }

    #[test]
    fn test_unparseable_referrer_is_ignored() {
        let context = snapshot_with_referrer(Some("not a url")).referrer_context();
        assert!(context.is_empty());
    }

    #[test]
    fn test_session_defaults() {
        let defaults = snapshot_with_referrer(None).session_defaults();

        assert_eq!(defaults["location/hostname"], json!("app.example"));
        assert_eq!(defaults["language"], json!("en-US"));
        assert_eq!(defaults["screen/height"], json!(1080));
        assert_eq!(defaults["screen/width"], json!(1920));
    }

    #[test]
    fn test_static_environment_returns_same_snapshot() {
        let snapshot = snapshot_with_referrer(Some("https://ref.example/"));
        let provider = StaticEnvironment::new(snapshot.clone());

        assert_eq!(provider.snapshot(), snapshot);
    }
}

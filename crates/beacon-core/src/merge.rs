//! Record composition
//!
//! Every outgoing record is assembled from several overlapping sources
//! (generated defaults, environment context, caller data). `merge` defines
//! the single precedence rule used everywhere: later sources win.

use serde_json::{Map, Value};

/// Shallow union of the given sources into one mapping.
///
/// For any key present in more than one source, the value from the later
/// source wins. Values are not merged recursively and arrays are not
/// concatenated; a colliding value replaces the earlier one wholesale.
pub fn merge(sources: &[Map<String, Value>]) -> Map<String, Value> {
    let mut merged = Map::new();
    for source in sources {
        for (key, value) in source {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

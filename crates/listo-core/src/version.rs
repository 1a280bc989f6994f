//! Schema version detection and migration of previously stored data.
//!
//! Known stored formats:
//!
//! | marker   | backend | `todoList` shape                              |
//! |----------|---------|-----------------------------------------------|
//! | (none)   | cookies | `[[index, {description, labels?, status?}]]`  |
//! | `0.1.0`  | cookies | `[{key, description, status, labels}]`        |
//! | `0.2.0`  | store   | `[{key, description, status, labels}]`        |
//!
//! [`Migrator::migrate`] runs once at startup, before anything reads the
//! item list. It never fails: anything it cannot make sense of is skipped
//! and the version marker is still brought up to date.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{Item, Label};
use crate::storage::{CONSENT_KEY, KeyValueStore, LegacyStore, TODO_KEY, VERSION_KEY};

/// Schema version written by this build.
pub const VERSION: &str = "0.2.0";

/// Assumed when no marker is stored anywhere.
pub const UNKNOWN_VERSION: &str = "0.0.0";

/// Last cookie-backed version; same item shape as today.
const COOKIE_VERSION: &str = "0.1.0";

/// Versions whose stored data already matches the current schema.
const CURRENT_SCHEMA_VERSIONS: &[&str] = &[VERSION];

/// Which transform a migration applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationKind {
    /// The stored marker already matched; nothing was touched.
    UpToDate,
    /// Cookie entries were copied into the store unchanged.
    CookieToStore,
    /// The oldest `[index, object]` list was rebuilt into items.
    PairList,
    /// No usable legacy data was found; only the marker was written.
    Nothing,
}

/// What [`Migrator::migrate`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    pub from_version: String,
    pub to_version: String,
    pub kind: MigrationKind,
    /// Keys written into the store, in write order (excluding the marker).
    pub migrated: Vec<String>,
    /// Keys that could not be written or cleared.
    pub skipped: Vec<String>,
}

impl MigrationOutcome {
    fn up_to_date(version: &str) -> Self {
        Self {
            from_version: version.to_string(),
            to_version: VERSION.to_string(),
            kind: MigrationKind::UpToDate,
            migrated: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn changed_anything(&self) -> bool {
        self.kind != MigrationKind::UpToDate
    }
}

/// Shape of the first element of an unversioned cookie `todoList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyShape {
    /// `[number, object]`: the first public release.
    PairList,
    /// An object payload without the pair wrapper; a release that stored
    /// current-shape items but never wrote its version marker.
    BareObjects,
    Unrecognized,
}

fn classify(first: &Value) -> LegacyShape {
    match first {
        Value::Array(pair) if pair.len() == 2 && pair[0].is_number() && pair[1].is_object() => {
            LegacyShape::PairList
        }
        Value::Array(pair) if pair.get(1).is_some_and(Value::is_object) => LegacyShape::BareObjects,
        Value::Object(_) => LegacyShape::BareObjects,
        _ => LegacyShape::Unrecognized,
    }
}

/// Rebuild one `[index, object]` entry as an item. `None` when the entry is
/// not such a pair.
///
/// Item keys are integers, so an object `key` that is not a non-negative
/// integer (`"5"`, `-2`, `1.5`) is ignored and the pair's index becomes the
/// key instead.
fn item_from_pair(entry: &Value) -> Option<Item> {
    let Value::Array(pair) = entry else {
        return None;
    };
    let [index, Value::Object(object)] = pair.as_slice() else {
        return None;
    };
    let key = object
        .get("key")
        .and_then(Value::as_u64)
        .or_else(|| index.as_u64())?;
    Some(Item {
        key,
        description: string_field(object, "description").unwrap_or_default(),
        status: object.get("status").and_then(Value::as_bool).unwrap_or(false),
        labels: labels_field(object),
    })
}

fn string_field(object: &Map<String, Value>, name: &str) -> Option<String> {
    object.get(name).and_then(Value::as_str).map(str::to_string)
}

fn labels_field(object: &Map<String, Value>) -> Vec<Label> {
    object
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(|raw| Label::from(raw.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Upgrades persisted data from `legacy` (cookie era) and older layouts of
/// `store` to the current schema.
#[derive(Debug)]
pub struct Migrator<S, L> {
    store: S,
    legacy: L,
    session_version: Option<String>,
}

impl<S: KeyValueStore, L: LegacyStore> Migrator<S, L> {
    pub const fn new(store: S, legacy: L) -> Self {
        Self {
            store,
            legacy,
            session_version: None,
        }
    }

    /// The marker found in the store, else in the legacy backend, else
    /// [`UNKNOWN_VERSION`]. Non-string markers count as absent.
    #[must_use]
    pub fn stored_version(&self) -> String {
        let as_string = |value: Value| value.as_str().map(str::to_string);
        self.store
            .get(VERSION_KEY)
            .and_then(as_string)
            .or_else(|| self.legacy.read(VERSION_KEY).and_then(as_string))
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }

    /// Bring stored data up to [`VERSION`]. Runs at most once per migrator;
    /// later calls report [`MigrationKind::UpToDate`].
    pub fn migrate(&mut self) -> MigrationOutcome {
        if let Some(version) = &self.session_version {
            return MigrationOutcome::up_to_date(version);
        }

        let from = self.stored_version();
        if CURRENT_SCHEMA_VERSIONS.contains(&from.as_str()) {
            self.session_version = Some(VERSION.to_string());
            return MigrationOutcome::up_to_date(&from);
        }

        let mut skipped = Vec::new();
        let (kind, data) = self.transform(&from, &mut skipped);

        let mut migrated = Vec::with_capacity(data.len());
        for (key, value) in data {
            match self.store.set(&key, value) {
                Ok(()) => migrated.push(key),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "failed to write migrated value");
                    skipped.push(key);
                }
            }
        }

        if let Err(err) = self.store.set(VERSION_KEY, Value::String(VERSION.to_string())) {
            tracing::warn!(error = %err, "failed to write version marker");
            skipped.push(VERSION_KEY.to_string());
        }
        self.session_version = Some(VERSION.to_string());

        tracing::info!(
            from = %from,
            to = VERSION,
            ?kind,
            migrated = migrated.len(),
            skipped = skipped.len(),
            "migrated stored data"
        );

        MigrationOutcome {
            from_version: from,
            to_version: VERSION.to_string(),
            kind,
            migrated,
            skipped,
        }
    }

    pub fn into_inner(self) -> (S, L) {
        (self.store, self.legacy)
    }

    fn transform(
        &mut self,
        version: &str,
        skipped: &mut Vec<String>,
    ) -> (MigrationKind, Vec<(String, Value)>) {
        match version {
            COOKIE_VERSION => self.from_cookies(skipped),
            _ => self.from_unversioned(skipped),
        }
    }

    /// Copy every cookie except the consent flag and old marker, then drop
    /// the cookies.
    fn from_cookies(&mut self, skipped: &mut Vec<String>) -> (MigrationKind, Vec<(String, Value)>) {
        let data: Vec<(String, Value)> = self
            .legacy
            .entries()
            .into_iter()
            .filter(|(key, _)| key != CONSENT_KEY && key != VERSION_KEY)
            .collect();
        self.clear_legacy(skipped);
        (MigrationKind::CookieToStore, data)
    }

    /// Unversioned data: sniff the cookie `todoList` to find out what wrote it.
    fn from_unversioned(
        &mut self,
        skipped: &mut Vec<String>,
    ) -> (MigrationKind, Vec<(String, Value)>) {
        let Some(Value::Array(list)) = self.legacy.read(TODO_KEY) else {
            tracing::debug!("no legacy item list to migrate");
            return (MigrationKind::Nothing, Vec::new());
        };
        let Some(first) = list.first() else {
            self.clear_legacy(skipped);
            return (MigrationKind::Nothing, Vec::new());
        };

        match classify(first) {
            LegacyShape::PairList => {
                let items: Vec<Item> = list
                    .iter()
                    .filter_map(|entry| {
                        let item = item_from_pair(entry);
                        if item.is_none() {
                            tracing::debug!(entry = %entry, "skipping malformed legacy entry");
                        }
                        item
                    })
                    .collect();
                self.clear_legacy(skipped);
                match serde_json::to_value(items) {
                    Ok(value) => (MigrationKind::PairList, vec![(TODO_KEY.to_string(), value)]),
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to encode migrated items");
                        skipped.push(TODO_KEY.to_string());
                        (MigrationKind::PairList, Vec::new())
                    }
                }
            }
            LegacyShape::BareObjects => {
                tracing::info!("unversioned cookies hold current-shape items; copying as {COOKIE_VERSION}");
                self.transform(COOKIE_VERSION, skipped)
            }
            LegacyShape::Unrecognized => {
                tracing::warn!("legacy item list has an unrecognized shape; discarding it");
                self.clear_legacy(skipped);
                (MigrationKind::Nothing, Vec::new())
            }
        }
    }

    fn clear_legacy(&mut self, skipped: &mut Vec<String>) {
        if let Err(err) = self.legacy.clear() {
            tracing::warn!(error = %err, "failed to clear legacy cookies");
            skipped.push("cookies".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn classify_detects_pairs() {
        assert_eq!(classify(&json!([0, {"description": "x"}])), LegacyShape::PairList);
        assert_eq!(classify(&json!({"key": 1})), LegacyShape::BareObjects);
        assert_eq!(classify(&json!(["0", {"key": 1}])), LegacyShape::BareObjects);
        assert_eq!(classify(&json!([0, {"key": 1}, 2])), LegacyShape::BareObjects);
        assert_eq!(classify(&json!("text")), LegacyShape::Unrecognized);
        assert_eq!(classify(&json!([1, 2])), LegacyShape::Unrecognized);
    }

    #[test]
    fn pair_prefers_object_key_over_index() {
        let item = item_from_pair(&json!([0, {"key": 5, "description": "x"}])).unwrap();
        assert_eq!(item.key, 5);
        let item = item_from_pair(&json!([3, {"description": "x"}])).unwrap();
        assert_eq!(item.key, 3);
    }

    #[test]
    fn pair_with_non_integer_key_uses_index() {
        for key in [json!("5"), json!(-2), json!(1.5), json!(null)] {
            let item = item_from_pair(&json!([4, {"key": key, "description": "x"}])).unwrap();
            assert_eq!(item.key, 4, "key {key}");
        }
    }

    #[test]
    fn pair_defaults_missing_fields() {
        let item = item_from_pair(&json!([2, {}])).unwrap();
        assert_eq!(item, Item::new(2, "", vec![]));
    }

    #[test]
    fn pair_copies_labels() {
        let item =
            item_from_pair(&json!([0, {"description": "x", "labels": ["red", "teal", 4]}]))
                .unwrap();
        assert_eq!(item.labels, vec![Label::Red, Label::Other("teal".into())]);
    }

    #[test]
    fn non_pairs_are_rejected() {
        assert_eq!(item_from_pair(&json!({"key": 1})), None);
        assert_eq!(item_from_pair(&json!([1, "x"])), None);
        assert_eq!(item_from_pair(&json!([-1, {}])), None);
    }

    #[test]
    fn fresh_install_only_writes_marker() {
        let mut migrator = Migrator::new(MemoryStore::new(), MemoryStore::new());
        let outcome = migrator.migrate();
        assert_eq!(outcome.from_version, UNKNOWN_VERSION);
        assert_eq!(outcome.kind, MigrationKind::Nothing);
        let (store, _) = migrator.into_inner();
        assert_eq!(store.get(VERSION_KEY), Some(json!(VERSION)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn migrate_runs_once_per_migrator() {
        let legacy = MemoryStore::new().with(VERSION_KEY, json!("0.1.0"));
        let mut migrator = Migrator::new(MemoryStore::new(), legacy);
        assert_eq!(migrator.migrate().kind, MigrationKind::CookieToStore);
        let again = migrator.migrate();
        assert_eq!(again.kind, MigrationKind::UpToDate);
        assert!(!again.changed_anything());
    }

    #[test]
    fn non_string_marker_counts_as_unknown() {
        let store = MemoryStore::new().with(VERSION_KEY, json!(2));
        let migrator = Migrator::new(store, MemoryStore::new());
        assert_eq!(migrator.stored_version(), UNKNOWN_VERSION);
    }

    #[test]
    fn store_marker_wins_over_cookie_marker() {
        let store = MemoryStore::new().with(VERSION_KEY, json!("0.2.0"));
        let legacy = MemoryStore::new().with(VERSION_KEY, json!("0.1.0"));
        let migrator = Migrator::new(store, legacy);
        assert_eq!(migrator.stored_version(), "0.2.0");
    }
}

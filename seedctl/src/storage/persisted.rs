//! Versioned on-disk envelope for client state
//!
//! Every store is written as `{ "version", "saved_at", "data" }`. Reading
//! never fails: anything that cannot be turned into the current schema
//! falls back to the type's default, and the outcome says why.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::SeedError;
use crate::filesys::file::File;

/// A value that can be stored in a versioned envelope
pub trait Persisted: Serialize + DeserializeOwned + Default {
    /// Current schema version, starting at 1
    const SCHEMA_VERSION: u32;

    /// Human-readable name used in logs
    const NAME: &'static str;

    /// Upgrade data written with an older schema.
    ///
    /// Version 0 is a bare document written without an envelope; the
    /// default tries to read it as the current schema.
    fn migrate(from_version: u32, data: Value) -> Option<Self> {
        if from_version == 0 {
            serde_json::from_value(data).ok()
        } else {
            None
        }
    }
}

/// On-disk representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub data: T,
}

/// Why persisted data was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// Not JSON, or not the expected shape. The file was moved aside.
    Corrupt,
    /// Written by a newer client. The file was left untouched.
    NewerVersion(u32),
    /// An older schema with no migration path
    NoMigration(u32),
    /// The file exists but could not be read
    Unreadable,
}

/// How a load went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Missing,
    Loaded,
    Migrated { from: u32 },
    Discarded(DiscardReason),
}

/// Load `T` from `file`, falling back to `T::default()`
pub async fn load<T: Persisted>(file: &File) -> (T, LoadOutcome) {
    if !file.exists().await {
        debug!("No persisted {} at {}", T::NAME, file.path().display());
        return (T::default(), LoadOutcome::Missing);
    }

    let contents = match file.read_string().await {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Unable to read persisted {}: {}", T::NAME, e);
            return (T::default(), LoadOutcome::Discarded(DiscardReason::Unreadable));
        }
    };

    let raw: Value = match serde_json::from_str(&contents) {
        Ok(raw) => raw,
        Err(e) => return discard_corrupt(file, &e.to_string()).await,
    };

    match split_envelope(raw) {
        (Some(version), data) if version == T::SCHEMA_VERSION => {
            match serde_json::from_value(data) {
                Ok(value) => (value, LoadOutcome::Loaded),
                Err(e) => discard_corrupt(file, &e.to_string()).await,
            }
        }
        (Some(version), _) if version > T::SCHEMA_VERSION => {
            warn!(
                "Persisted {} has schema v{} but this client understands v{}; ignoring it",
                T::NAME,
                version,
                T::SCHEMA_VERSION
            );
            (
                T::default(),
                LoadOutcome::Discarded(DiscardReason::NewerVersion(version)),
            )
        }
        (Some(version), data) => match T::migrate(version, data) {
            Some(value) => {
                debug!("Migrated persisted {} from v{}", T::NAME, version);
                (value, LoadOutcome::Migrated { from: version })
            }
            None => {
                warn!("No migration for persisted {} v{}; starting fresh", T::NAME, version);
                (
                    T::default(),
                    LoadOutcome::Discarded(DiscardReason::NoMigration(version)),
                )
            }
        },
        (None, data) => match T::migrate(0, data) {
            Some(value) => (value, LoadOutcome::Migrated { from: 0 }),
            None => discard_corrupt(file, "unrecognised document").await,
        },
    }
}

/// Write `value` in the current envelope
pub async fn save<T: Persisted>(file: &File, value: &T) -> Result<(), SeedError> {
    let envelope = Envelope {
        version: T::SCHEMA_VERSION,
        saved_at: Utc::now(),
        data: value,
    };
    file.write_json(&envelope).await
}

/// Returns the envelope version when `raw` looks like an envelope, with its
/// data; otherwise the whole document.
fn split_envelope(raw: Value) -> (Option<u32>, Value) {
    match raw {
        Value::Object(mut map) if map.contains_key("data") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok());
            match version {
                Some(version) => {
                    let data = map.remove("data").unwrap_or(Value::Null);
                    (Some(version), data)
                }
                None => (None, Value::Object(map)),
            }
        }
        other => (None, other),
    }
}

async fn discard_corrupt<T: Persisted>(file: &File, reason: &str) -> (T, LoadOutcome) {
    warn!(
        "Persisted {} at {} is corrupt ({}); moving it aside",
        T::NAME,
        file.path().display(),
        reason
    );
    if let Err(e) = file.quarantine().await {
        warn!("Unable to move corrupt {} aside: {}", T::NAME, e);
    }
    (T::default(), LoadOutcome::Discarded(DiscardReason::Corrupt))
}

//! On-disk persistence for the two JSON blobs this crate reads and writes:
//! the registered `{username, clientkey}` pair, and a fast-path cache of
//! the last-seen bridge descriptor. No locking is used; both files are only
//! touched during onboarding and discovery, never on the streaming hot path.

use crate::error::HueError;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

/// Credentials returned by a successful `POST /api` registration.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, Serialize)]
pub struct AuthRecord {
    pub username: String,
    pub clientkey: String,
}

/// Cached bridge descriptor, the full set of fields gathered during
/// onboarding (see [`crate::service::bridge::BridgeData`] for the live,
/// in-memory equivalent).
#[derive(Clone, Debug, PartialEq, serde::Deserialize, Serialize)]
pub struct BridgeRecord {
    pub id: String,
    pub rid: String,
    pub ip_address: String,
    pub swversion: u64,
    pub username: String,
    pub hue_application_id: String,
    pub client_key: String,
    pub name: String,
}

/// Reads and deserializes a JSON file. A missing file is reported as
/// [`crate::error::PersistenceError::NotFound`] rather than a generic I/O
/// error, so callers can treat "no cached credentials" as a normal path.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, HueError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HueError::Persistence(crate::error::PersistenceError::NotFound(
                path.display().to_string(),
            ))
        } else {
            HueError::from(e)
        }
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Serializes and writes a JSON file, creating parent directories as
/// needed.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), HueError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("hue_entertain_test_{nanos}_{name}"))
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = scratch_path("missing.json");
        let err = read_json::<AuthRecord>(&path).unwrap_err();
        assert!(matches!(
            err,
            HueError::Persistence(crate::error::PersistenceError::NotFound(_))
        ));
    }

    #[test]
    fn write_then_read_roundtrips() {
        let path = scratch_path("auth.json");
        let record = AuthRecord {
            username: "U".into(),
            clientkey: "B42753E1E1605A1AB90E1B6A0ECF9C51".into(),
        };
        write_json(&path, &record).unwrap();
        let read_back: AuthRecord = read_json(&path).unwrap();
        assert_eq!(read_back, record);
        let _ = fs::remove_file(&path);
    }
}

//! Versioned JSON envelopes for stored records.
//!
//! Values are written as `{"version": 1, "data": ...}`. A value without an
//! envelope is an unversioned record from an older client and is decoded as
//! is; the next write upgrades it.

use super::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Envelope version written by this build.
pub const RECORD_VERSION: u64 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u64,
    data: &'a T,
}

/// A decoded value and whether it came without an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub legacy: bool,
}

/// Wrap `value` in the current envelope.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    let envelope = Envelope {
        version: RECORD_VERSION,
        data: value,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode the value stored under `key`.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Decoded<T>> {
    let value: Value = serde_json::from_str(raw)?;
    match envelope_version(&value) {
        Some(RECORD_VERSION) => {
            let data = match value {
                Value::Object(mut object) => object.remove("data").unwrap_or(Value::Null),
                _ => Value::Null,
            };
            Ok(Decoded {
                value: serde_json::from_value(data)?,
                legacy: false,
            })
        }
        Some(version) => Err(StoreError::UnsupportedVersion {
            key: key.to_string(),
            version,
        }),
        None => Ok(Decoded {
            value: serde_json::from_value(value)?,
            legacy: true,
        }),
    }
}

// An envelope is an object with exactly `version` (an integer) and `data`.
fn envelope_version(value: &Value) -> Option<u64> {
    let object = value.as_object()?;
    if object.len() != 2 || !object.contains_key("data") {
        return None;
    }
    object.get("version")?.as_u64()
}

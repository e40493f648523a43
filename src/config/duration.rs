//! Humantime-backed serde support for duration fields.
//!
//! Configuration durations are written as humantime strings (`50ms`, `1s`,
//! `1500ms`); use with `#[serde(with = "crate::config::duration")]`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serializes a duration as a humantime string.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

/// Deserializes a duration from a humantime string.
///
/// # Errors
///
/// Fails if the string is not a valid humantime duration.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

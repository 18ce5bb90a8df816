//! Build event records
//!
//! A build's live output arrives as a sequence of events, each wrapping a
//! `data` object. Log events carry `payload` and `origin`, status events
//! carry `status`, and error events carry `message`.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One decoded event from a build's event stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildEvent {
    pub data: BuildEventData,
    /// Event type, e.g. `log`, `status`, `error`
    pub event: String,
    /// Version of the event schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildEventData {
    pub payload: String,
    /// Unix seconds
    pub time: i64,
    /// Step that produced the event, kept as raw JSON
    pub origin: Value,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Coarse classification of a build event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEventKind {
    Log,
    Status,
    Error,
    Other(String),
}

impl BuildEvent {
    /// Decode one event payload as sent on the stream.
    ///
    /// Only JSON objects are accepted, both for the event and for its
    /// `data`. A `null` `data` reads as empty.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is not JSON or does not have the shape
    /// of an event
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        let mut value: Value = serde_json::from_str(payload)?;
        let Some(fields) = value.as_object_mut() else {
            return Err(serde_json::Error::custom("build event is not a JSON object"));
        };

        if fields.get("data").is_some_and(Value::is_null) {
            fields.remove("data");
        } else if fields.get("data").is_some_and(|data| !data.is_object()) {
            return Err(serde_json::Error::custom("build event data is not a JSON object"));
        }

        serde_json::from_value(value)
    }

    #[must_use]
    pub fn kind(&self) -> BuildEventKind {
        match self.event.as_str() {
            "log" => BuildEventKind::Log,
            "status" => BuildEventKind::Status,
            "error" => BuildEventKind::Error,
            other => BuildEventKind::Other(other.to_string()),
        }
    }
}

impl BuildEventData {
    /// `time` as a UTC timestamp; `None` when absent or out of range.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if self.time == 0 {
            return None;
        }
        DateTime::from_timestamp(self.time, 0)
    }

    /// `origin.id`, when the origin names a step.
    #[must_use]
    pub fn origin_id(&self) -> Option<&str> {
        self.origin.get("id").and_then(Value::as_str)
    }
}

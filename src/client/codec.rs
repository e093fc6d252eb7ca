//! Wire codec — request URIs and batched task envelopes.
//!
//! Single-task exchanges are plain query-string GETs:
//!
//! ```text
//! {base}read?token={t}&topic={p}&parse=state
//! {base}write?token={t}&topic={p}&state={v}
//! ```
//!
//! Batched mode POSTs one JSON array to `{base}multi?token={t}&parse=response`,
//! one task object per channel, in registry order:
//!
//! ```text
//! [{"type":"read","topic":"a/b","parse":"state"}, …]
//! ```
//!
//! The response is a JSON array with one object per request, each carrying a
//! `data` field with the resulting value. Correlation is purely positional —
//! the response's own `topic`/`type` fields are never consulted — so the
//! decoder enforces a strict length check and rejects the whole batch on any
//! mismatch rather than silently misattributing states.

use core::fmt;

use serde::Serialize;
use serde_json::Value;

/// One entry of the batched request array.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Task<'a> {
    /// State-only read of a topic.
    Read { topic: &'a str, parse: &'a str },
    /// Write `state` to a topic. Not used by the batched poll path, but part
    /// of the server's task vocabulary.
    Write { topic: &'a str, state: &'a str },
}

impl<'a> Task<'a> {
    /// Read task requesting state-only parsing.
    pub fn read(topic: &'a str) -> Self {
        Self::Read {
            topic,
            parse: "state",
        }
    }

    /// Write task carrying the value to set.
    pub fn write(topic: &'a str, state: &'a str) -> Self {
        Self::Write { topic, state }
    }
}

/// Why a batch body could not be built or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The request array could not be serialized.
    Encode,
    /// The response body is not a JSON array.
    Malformed,
    /// The response array length does not match the request array length.
    LengthMismatch { expected: usize, actual: usize },
    /// A response entry has no `data` field.
    MissingData { index: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "failed to encode task array"),
            Self::Malformed => write!(f, "response body is not a JSON array"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} response entries, got {actual}")
            }
            Self::MissingData { index } => {
                write!(f, "response entry {index} has no data field")
            }
        }
    }
}

// ── URI builders ──────────────────────────────────────────────

// `base` is `ClientConfig::base_url()` and always ends with `/`.

/// GET URI for a single-topic state read.
pub fn read_uri(base: &str, token: &str, topic: &str) -> String {
    format!("{base}read?token={token}&topic={topic}&parse=state")
}

/// GET URI for a single-topic write.
pub fn write_uri(base: &str, token: &str, topic: &str, state: &str) -> String {
    format!("{base}write?token={token}&topic={topic}&state={state}")
}

/// POST URI for a batched task array.
pub fn multi_uri(base: &str, token: &str) -> String {
    format!("{base}multi?token={token}&parse=response")
}

// ── Batch encode / decode ─────────────────────────────────────

/// Encode an ordered batch of read tasks, one per topic.
pub fn encode_read_batch(topics: &[&str]) -> Result<String, CodecError> {
    let tasks: Vec<Task<'_>> = topics.iter().map(|t| Task::read(t)).collect();
    serde_json::to_string(&tasks).map_err(|_| CodecError::Encode)
}

/// Decode a batched response into per-channel states, in request order.
///
/// `expected` is the number of tasks submitted; any other array length is a
/// hard failure (no partial decode). Only the `data` field of each entry is
/// consumed. Non-string `data` values are carried through as their JSON
/// rendering.
pub fn decode_batch_response(body: &str, expected: usize) -> Result<Vec<String>, CodecError> {
    let parsed: Value = serde_json::from_str(body).map_err(|_| CodecError::Malformed)?;
    let entries = parsed.as_array().ok_or(CodecError::Malformed)?;

    if entries.len() != expected {
        return Err(CodecError::LengthMismatch {
            expected,
            actual: entries.len(),
        });
    }

    let mut states = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let state = match entry.get("data") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(CodecError::MissingData { index }),
        };
        states.push(state);
    }
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_uri_matches_wire_contract() {
        assert_eq!(
            read_uri("http://h:80/", "tok", "iot/dev/led"),
            "http://h:80/read?token=tok&topic=iot/dev/led&parse=state"
        );
    }

    #[test]
    fn write_uri_matches_wire_contract() {
        assert_eq!(
            write_uri("http://h:80/", "tok", "devices/d/state", "connected"),
            "http://h:80/write?token=tok&topic=devices/d/state&state=connected"
        );
    }

    #[test]
    fn multi_uri_matches_wire_contract() {
        assert_eq!(
            multi_uri("https://h:443/floker/", "tok"),
            "https://h:443/floker/multi?token=tok&parse=response"
        );
    }

    #[test]
    fn read_task_envelope_shape() {
        let json = serde_json::to_string(&Task::read("a/b")).unwrap();
        assert_eq!(json, r#"{"type":"read","topic":"a/b","parse":"state"}"#);
    }

    #[test]
    fn write_task_envelope_shape() {
        let json = serde_json::to_string(&Task::write("a/b", "on")).unwrap();
        assert_eq!(json, r#"{"type":"write","topic":"a/b","state":"on"}"#);
    }

    #[test]
    fn batch_preserves_topic_order() {
        let body = encode_read_batch(&["x", "y", "z"]).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        let topics: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["topic"].as_str().unwrap())
            .collect();
        assert_eq!(topics, ["x", "y", "z"]);
    }

    #[test]
    fn decode_extracts_data_in_order() {
        let body = r#"[{"data":"a1","topic":"x"},{"data":"b1"},{"data":42}]"#;
        let states = decode_batch_response(body, 3).unwrap();
        assert_eq!(states, ["a1", "b1", "42"]);
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let body = r#"[{"data":"a1"},{"data":"b1"}]"#;
        assert_eq!(
            decode_batch_response(body, 3),
            Err(CodecError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn decode_rejects_non_array() {
        assert_eq!(
            decode_batch_response(r#"{"data":"a1"}"#, 1),
            Err(CodecError::Malformed)
        );
        assert_eq!(decode_batch_response("not json", 1), Err(CodecError::Malformed));
    }

    #[test]
    fn decode_rejects_missing_data() {
        let body = r#"[{"data":"a1"},{"topic":"y"}]"#;
        assert_eq!(
            decode_batch_response(body, 2),
            Err(CodecError::MissingData { index: 1 })
        );
    }
}

//! Host Messages
//!
//! Typed contract with the embedding host. Messages travel as
//! `{"type": ..., "data": {...}}` with camelCase payloads. Inbound messages
//! may additionally be wrapped in the host's envelope:
//! `{"type": "devvit-message", "data": {"message": <message>}}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::course::CourseTemplate;
use crate::game::error::BridgeError;
use crate::game::player::AnimationState;

const ENVELOPE_TYPE: &str = "devvit-message";

const INBOUND_TYPES: [&str; 6] = [
    "loadCourse",
    "startGame",
    "startBuilder",
    "resetPlayer",
    "requestFailed",
    "requestCompleted",
];

const PAYLOAD_FREE_TYPES: [&str; 2] = ["startGame", "resetPlayer"];

const OPTIONAL_PAYLOAD_TYPES: [&str; 1] = ["startBuilder"];

/// Outbound messages that expect an answer from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    CourseComplete,
    CourseCreated,
}

impl RequestKind {
    pub fn name(self) -> &'static str {
        match self {
            RequestKind::CourseComplete => "courseComplete",
            RequestKind::CourseCreated => "courseCreated",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host → game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum InboundMessage {
    /// `courseJson` is either the document itself or a string holding it
    #[serde(rename_all = "camelCase")]
    LoadCourse {
        course_json: Value,
        #[serde(default)]
        course_id: Option<String>,
    },
    StartGame,
    StartBuilder {
        #[serde(default)]
        template: Option<CourseTemplate>,
    },
    ResetPlayer,
    RequestFailed {
        request: RequestKind,
        #[serde(default)]
        message: String,
    },
    RequestCompleted {
        request: RequestKind,
    },
}

impl InboundMessage {
    /// Parse a raw host message, unwrapping the envelope if present.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| BridgeError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        let mut value = unwrap_envelope(value)?;
        let Some(kind) = value.get("type").and_then(Value::as_str).map(str::to_owned) else {
            return Err(BridgeError::Malformed("missing message type".into()));
        };
        if !INBOUND_TYPES.contains(&kind.as_str()) {
            return Err(BridgeError::UnknownType(kind));
        }
        normalize_payload(&kind, &mut value);
        serde_json::from_value(value).map_err(|e| BridgeError::Malformed(e.to_string()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::LoadCourse { .. } => "loadCourse",
            InboundMessage::StartGame => "startGame",
            InboundMessage::StartBuilder { .. } => "startBuilder",
            InboundMessage::ResetPlayer => "resetPlayer",
            InboundMessage::RequestFailed { .. } => "requestFailed",
            InboundMessage::RequestCompleted { .. } => "requestCompleted",
        }
    }
}

/// Payload-free messages drop whatever `data` they carry. Messages whose
/// fields are all optional get an empty `data` when it is missing.
fn normalize_payload(kind: &str, value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };
    if PAYLOAD_FREE_TYPES.contains(&kind) {
        map.remove("data");
    } else if OPTIONAL_PAYLOAD_TYPES.contains(&kind) && map.get("data").is_none_or(Value::is_null) {
        map.insert("data".into(), Value::Object(Default::default()));
    }
}

fn unwrap_envelope(value: Value) -> Result<Value, BridgeError> {
    if value.get("type").and_then(Value::as_str) != Some(ENVELOPE_TYPE) {
        return Ok(value);
    }
    value
        .get("data")
        .and_then(|data| data.get("message"))
        .cloned()
        .ok_or_else(|| BridgeError::Malformed("envelope without data.message".into()))
}

/// Game → host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum OutboundMessage {
    WebViewReady,
    #[serde(rename_all = "camelCase")]
    PositionUpdate {
        x: f32,
        y: f32,
        z: f32,
        on_ground: bool,
        animation: AnimationState,
    },
    LevelComplete,
    /// Completion time in seconds
    #[serde(rename_all = "camelCase")]
    CourseComplete { course_id: String, time: f32 },
    #[serde(rename_all = "camelCase")]
    CourseCreated {
        name: String,
        template: CourseTemplate,
        course_json: String,
    },
}

impl OutboundMessage {
    /// Request kind, for messages that expect an answer.
    pub fn request_kind(&self) -> Option<RequestKind> {
        match self {
            OutboundMessage::CourseComplete { .. } => Some(RequestKind::CourseComplete),
            OutboundMessage::CourseCreated { .. } => Some(RequestKind::CourseCreated),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Malformed(e.to_string()))
    }
}

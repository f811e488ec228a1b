//! Remote protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};

/// Commands sent by a remote client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum RemoteCommand {
    /// Health check
    Ping,
    /// Make an object the edit target
    Select { id: String },
    /// Clear the edit target
    Deselect,
    /// Turn editing on or off
    SetEnabled { enabled: bool },
    /// Transform mode: position, rotation or scale
    SetMode { mode: String },
    /// Step multiplier (1-9)
    SetMultiplier { value: u8 },
    /// Shift the target by a longitude/latitude delta
    Translate { dlng: f64, dlat: f64 },
    /// Turn the target around its vertical axis
    Rotate { degrees: f64 },
    /// Add to every scale axis of the target
    Scale { delta: f64 },
    /// Remove the target
    Remove,
    /// Place a new object from a record. A missing `id` is generated.
    Create { record: serde_json::Value },
    /// Press a key, e.g. `{"code": "z", "ctrl": true}`
    Key {
        code: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    Undo,
    Redo,
    /// Reconcile and upload the session
    Save,
    /// Dashboard snapshot
    GetStatus,
    /// History dump with the cursor marked
    GetHistory,
    /// Ids and names of every object in the scene
    ListObjects,
}

/// Responses sent back to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RemoteResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    Pong { message: String },
    Updated { description: String },
    History { lines: Vec<String> },
    Objects { objects: Vec<ObjectSummary> },
    /// Anything the application serializes itself
    Value(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: String,
    pub name: String,
    pub visible: bool,
}

impl RemoteResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }

    pub fn updated(description: impl Into<String>) -> Self {
        Self::ok(ResponseData::Updated {
            description: description.into(),
        })
    }

    /// Serialize `value` into the response, or report why it could not be.
    pub fn value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Self::ok(ResponseData::Value(v)),
            Err(e) => Self::error(format!("Serialize error: {}", e)),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

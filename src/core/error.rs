//! Error types for the placement editor

use thiserror::Error;

use crate::history::ActionKind;
use crate::scene::ObjectId;

/// Main error type for the editor
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("{0} not configured")]
    MissingCollaborator(&'static str),

    #[error("got no contents")]
    EmptyBaseline,

    #[error("offset shape does not match {kind:?} action")]
    OffsetShape { kind: ActionKind },

    #[error("object {0} already exists")]
    DuplicateId(ObjectId),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Remote error: {0}")]
    Remote(#[from] mapedit_remote::RemoteError),
}

//! Remote control of the editor

use mapedit_remote::{ObjectSummary, RemoteCommand, RemoteHandler, RemoteResponse, ResponseData};

use crate::diff::SaveOutcome;
use crate::scene::{ObjectId, ObjectRecord};

use super::command::TransformMode;
use super::controller::Editor;
use super::keymap::KeyChord;

const NO_TARGET: &str = "no target selected";
const DISABLED: &str = "editing is disabled";

impl RemoteHandler for Editor {
    async fn handle_remote(&mut self, cmd: RemoteCommand) -> RemoteResponse {
        match cmd {
            RemoteCommand::Ping => RemoteResponse::pong(),

            RemoteCommand::Select { id } => {
                if self.select(&ObjectId::new(id.as_str())) {
                    RemoteResponse::updated(format!("selected {}", id))
                } else {
                    RemoteResponse::error(format!("no object with id {}", id))
                }
            }

            RemoteCommand::Deselect => {
                self.deselect();
                RemoteResponse::none()
            }

            RemoteCommand::SetEnabled { enabled } => {
                self.set_enabled(enabled);
                RemoteResponse::updated(format!("enabled: {}", enabled))
            }

            RemoteCommand::SetMode { mode } => match TransformMode::parse(&mode) {
                Some(mode) => {
                    self.set_mode(mode);
                    RemoteResponse::updated(format!("mode: {}", mode))
                }
                None => RemoteResponse::error(format!(
                    "unknown mode '{}' (expected position, rotation or scale)",
                    mode
                )),
            },

            RemoteCommand::SetMultiplier { value } => {
                if self.set_multiplier(value) {
                    RemoteResponse::updated(format!("multiplier: {}", value))
                } else {
                    RemoteResponse::error(format!("multiplier must be 1-9, got {}", value))
                }
            }

            RemoteCommand::Translate { .. } | RemoteCommand::Rotate { .. } | RemoteCommand::Scale { .. } | RemoteCommand::Remove
                if !self.is_enabled() =>
            {
                RemoteResponse::error(DISABLED)
            }
            RemoteCommand::Translate { dlng, dlat } => edited(self.translate(dlng, dlat)),
            RemoteCommand::Rotate { degrees } => edited(self.rotate(degrees)),
            RemoteCommand::Scale { delta } => edited(self.scale(delta)),
            RemoteCommand::Remove => edited(self.remove()),

            RemoteCommand::Create { mut record } => {
                if let Some(fields) = record.as_object_mut() {
                    if !fields.contains_key("id") {
                        fields.insert("id".into(), ObjectId::generate().to_string().into());
                    }
                }
                match serde_json::from_value::<ObjectRecord>(record) {
                    Ok(record) => match self.create(record) {
                        Ok(id) => RemoteResponse::updated(format!("created {}", id)),
                        Err(e) => RemoteResponse::error(e.to_string()),
                    },
                    Err(e) => RemoteResponse::error(format!("Invalid record: {}", e)),
                }
            }

            RemoteCommand::Key { code, ctrl, shift } => match KeyChord::parse(&code, ctrl, shift) {
                Some(chord) => match self.handle_key(chord).await {
                    Some(cmd) => RemoteResponse::updated(format!("{:?}", cmd)),
                    None => RemoteResponse::error(format!("key '{}' is not bound right now", code)),
                },
                None => RemoteResponse::error(format!("unknown key '{}'", code)),
            },

            RemoteCommand::Undo => {
                let undone = self.undo();
                RemoteResponse::updated(if undone { "undone" } else { "nothing to undo" })
            }

            RemoteCommand::Redo => {
                let redone = self.redo();
                RemoteResponse::updated(if redone { "redone" } else { "nothing to redo" })
            }

            RemoteCommand::Save => match self.save().await {
                SaveOutcome::Uploaded { records } => RemoteResponse::updated(format!("uploaded {} records", records)),
                SaveOutcome::Failed(e) => RemoteResponse::error(e.to_string()),
            },

            RemoteCommand::GetStatus => RemoteResponse::value(&self.status()),

            RemoteCommand::GetHistory => RemoteResponse::ok(ResponseData::History {
                lines: self.history().describe().lines().map(str::to_string).collect(),
            }),

            RemoteCommand::ListObjects => RemoteResponse::ok(ResponseData::Objects {
                objects: self
                    .scene()
                    .iter()
                    .map(|object| ObjectSummary {
                        id: object.id().to_string(),
                        name: object.name().to_string(),
                        visible: object.visible,
                    })
                    .collect(),
            }),
        }
    }
}

fn edited(applied: bool) -> RemoteResponse {
    if applied {
        RemoteResponse::none()
    } else {
        RemoteResponse::error(NO_TARGET)
    }
}

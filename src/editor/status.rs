//! Dashboard snapshot of the editor

use std::fmt;

use serde::Serialize;

use crate::scene::{ObjectId, PlacedObject, Scale, Xyz};

use super::command::TransformMode;

/// Key legend printed under the target block
pub const HELP: &str = "\
rotation (R <->)  position (T arrows)  scale (Y up/down)
step multiplier (1-9)
save (Ctrl+S)  deselect (Q)
remove (Ctrl+M)
undo (Ctrl+Z)  redo (Ctrl+Shift+Z)
";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditorStatus {
    pub enabled: bool,
    pub mode: TransformMode,
    pub multiplier: u8,
    /// Step times multiplier
    pub step: f64,
    pub target: Option<TargetStatus>,
    pub can_undo: bool,
    pub can_redo: bool,
    /// History dump, cursor marked with `>`
    pub history: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TargetStatus {
    pub id: ObjectId,
    pub name: String,
    pub heading_degrees: f64,
    /// Longitude, latitude
    pub coordinates: [f64; 2],
    pub scale: Scale,
}

impl TargetStatus {
    pub fn from_object(object: &PlacedObject) -> Self {
        let scale = match object.uniform_scale() {
            Some(s) => Scale::Uniform(s),
            None => Scale::PerAxis(Xyz::new(object.scale.x, object.scale.y, object.scale.z)),
        };
        Self {
            id: object.id().clone(),
            name: object.name().to_string(),
            heading_degrees: object.heading_degrees(),
            coordinates: [object.coordinates.x, object.coordinates.y],
            scale,
        }
    }
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |mode: TransformMode| if self.mode == mode { "*" } else { " " };

        match &self.target {
            None => writeln!(f, "no target")?,
            Some(t) => {
                writeln!(f, "target: {}", t.name)?;
                writeln!(f, "{} rotation (R): {}°", mark(TransformMode::Rotation), t.heading_degrees)?;
                writeln!(
                    f,
                    "{} position (T): {:.4},{:.4}",
                    mark(TransformMode::Position),
                    t.coordinates[0],
                    t.coordinates[1]
                )?;
                match t.scale {
                    Scale::Uniform(s) => writeln!(f, "{} scale (Y): {}", mark(TransformMode::Scale), s)?,
                    Scale::PerAxis(s) => {
                        writeln!(f, "{} scale (Y): {},{},{}", mark(TransformMode::Scale), s.x, s.y, s.z)?
                    }
                }
                writeln!(f, "step (1-9): {:.3}", self.step)?;
            }
        }
        write!(f, "{}", HELP)?;
        write!(f, "{}", self.history)
    }
}

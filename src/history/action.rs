//! Recorded edit actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::scene::ObjectId;

/// Kind of edit an action records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Position,
    Rotation,
    Scale,
    Remove,
    Create,
}

impl ActionKind {
    /// Continuous transforms merge when repeated quickly on the same target.
    pub fn is_continuous(self) -> bool {
        matches!(self, ActionKind::Position | ActionKind::Rotation | ActionKind::Scale)
    }

    /// Position offsets are (longitude, latitude) pairs; everything else is scalar.
    pub fn takes_pair(self) -> bool {
        self == ActionKind::Position
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Position => "position",
            ActionKind::Rotation => "rotation",
            ActionKind::Scale => "scale",
            ActionKind::Remove => "remove",
            ActionKind::Create => "create",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Amount an action changes its target by.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    Scalar(f64),
    /// Longitude delta, latitude delta
    Pair(f64, f64),
}

impl Offset {
    pub fn is_pair(self) -> bool {
        matches!(self, Offset::Pair(..))
    }

    /// Component-wise negation.
    pub fn negated(self) -> Self {
        match self {
            Offset::Scalar(v) => Offset::Scalar(-v),
            Offset::Pair(lng, lat) => Offset::Pair(-lng, -lat),
        }
    }

    /// Add `other` component-wise. Mismatched shapes leave `self` untouched.
    pub fn accumulate(&mut self, other: Offset) {
        match (self, other) {
            (Offset::Scalar(v), Offset::Scalar(d)) => *v += d,
            (Offset::Pair(lng, lat), Offset::Pair(dlng, dlat)) => {
                *lng += dlng;
                *lat += dlat;
            }
            _ => {}
        }
    }

    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Offset::Scalar(v) => Some(v),
            Offset::Pair(..) => None,
        }
    }

    pub fn as_pair(self) -> Option<(f64, f64)> {
        match self {
            Offset::Pair(lng, lat) => Some((lng, lat)),
            Offset::Scalar(_) => None,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Scalar(v) => write!(f, "{}", v),
            Offset::Pair(lng, lat) => write!(f, "{},{}", lng, lat),
        }
    }
}

/// A single recorded edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub target: ObjectId,
    pub offset: Offset,
    /// Milliseconds
    pub timestamp: u64,
}

impl Action {
    /// Build an action, rejecting offsets whose shape does not fit the kind.
    pub fn new(kind: ActionKind, target: ObjectId, offset: Offset, timestamp: u64) -> Result<Self> {
        if kind.takes_pair() != offset.is_pair() {
            return Err(Error::OffsetShape { kind });
        }
        Ok(Self {
            kind,
            target,
            offset,
            timestamp,
        })
    }

    pub fn position(target: ObjectId, dlng: f64, dlat: f64, timestamp: u64) -> Self {
        Self {
            kind: ActionKind::Position,
            target,
            offset: Offset::Pair(dlng, dlat),
            timestamp,
        }
    }

    pub fn rotation(target: ObjectId, degrees: f64, timestamp: u64) -> Self {
        Self::scalar(ActionKind::Rotation, target, degrees, timestamp)
    }

    pub fn scale(target: ObjectId, delta: f64, timestamp: u64) -> Self {
        Self::scalar(ActionKind::Scale, target, delta, timestamp)
    }

    /// Remove (`1`) or restore (`-1`).
    pub fn remove(target: ObjectId, timestamp: u64) -> Self {
        Self::scalar(ActionKind::Remove, target, 1.0, timestamp)
    }

    pub fn create(target: ObjectId, timestamp: u64) -> Self {
        Self::scalar(ActionKind::Create, target, 1.0, timestamp)
    }

    fn scalar(kind: ActionKind, target: ObjectId, value: f64, timestamp: u64) -> Self {
        Self {
            kind,
            target,
            offset: Offset::Scalar(value),
            timestamp,
        }
    }

    /// Same kind, target and timestamp with the offset negated.
    pub fn inverse(&self) -> Self {
        Self {
            kind: self.kind,
            target: self.target.clone(),
            offset: self.offset.negated(),
            timestamp: self.timestamp,
        }
    }
}

/// Receiver of replayed actions. Replays must not be recorded again.
pub trait ApplyAction {
    fn apply_action(&mut self, action: &Action);
}

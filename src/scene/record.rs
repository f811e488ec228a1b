//! Persisted object records
//!
//! The wire shape of a placed object as stored in the remote collection.
//! Fields the editor does not understand are kept in `extra` so a record
//! survives a load/save cycle unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::types::DVec3;

/// Application-level identifier of a placed object (the record `id`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for newly created objects.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Three-component value used for rotations (degrees) and per-axis scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// Record scale: a single uniform factor or one factor per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f64),
    PerAxis(Xyz),
}

impl Scale {
    pub fn to_dvec3(self) -> DVec3 {
        match self {
            Scale::Uniform(s) => DVec3::splat(s),
            Scale::PerAxis(xyz) => xyz.to_dvec3(),
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Uniform(1.0)
    }
}

/// Behaviour flags of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectClass {
    pub transformable: bool,
}

/// One entry of the persisted collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model asset reference
    pub obj: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Longitude, latitude
    pub origin: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
    /// Degrees
    pub rotation: Xyz,
    pub scale: Scale,
    pub cast_shadow: bool,
    pub units: String,
    pub anchor: String,
    pub class: ObjectClass,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectRecord {
    /// Record with neutral transform and common defaults.
    pub fn new(id: impl Into<ObjectId>, obj: impl Into<String>, kind: impl Into<String>, origin: [f64; 2]) -> Self {
        Self {
            id: id.into(),
            name: None,
            obj: obj.into(),
            kind: kind.into(),
            origin,
            alt: None,
            rotation: Xyz::default(),
            scale: Scale::default(),
            cast_shadow: true,
            units: "meters".into(),
            anchor: "center".into(),
            class: ObjectClass { transformable: true },
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Xyz) -> Self {
        self.rotation = rotation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wire_record() {
        let value = json!({
            "id": "lamp-1",
            "name": "Lamp",
            "obj": "models/lamp.glb",
            "type": "gltf",
            "origin": [127.0, 37.5],
            "alt": 2.5,
            "rotation": { "x": 90.0, "y": 45.0, "z": 0.0 },
            "scale": 1.5,
            "castShadow": true,
            "units": "meters",
            "anchor": "center",
            "class": { "transformable": true }
        });

        let record: ObjectRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.id, ObjectId::new("lamp-1"));
        assert_eq!(record.kind, "gltf");
        assert_eq!(record.alt, Some(2.5));
        assert_eq!(record.scale, Scale::Uniform(1.5));
        assert!(record.cast_shadow);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_per_axis_scale() {
        let scale: Scale = serde_json::from_value(json!({ "x": 1.0, "y": 2.0, "z": 3.0 })).unwrap();
        assert_eq!(scale, Scale::PerAxis(Xyz::new(1.0, 2.0, 3.0)));
        assert_eq!(scale.to_dvec3(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unknown_fields_survive() {
        let value = json!({
            "id": "a",
            "obj": "a.glb",
            "type": "gltf",
            "origin": [0.0, 0.0],
            "rotation": { "x": 0.0, "y": 0.0, "z": 0.0 },
            "scale": 1.0,
            "castShadow": false,
            "units": "meters",
            "anchor": "bottom",
            "class": { "transformable": false },
            "handler": "openPopup",
            "tags": ["street"]
        });

        let record: ObjectRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(record.extra.get("handler"), Some(&json!("openPopup")));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let record = ObjectRecord::new("b", "b.glb", "gltf", [1.0, 2.0]);
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("name").is_none());
        assert!(value.get("alt").is_none());
        assert_eq!(value["castShadow"], json!(true));
        assert_eq!(value["type"], json!("gltf"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ObjectId::generate(), ObjectId::generate());
    }
}

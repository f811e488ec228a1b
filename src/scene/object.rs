//! Live state of a placed object

use std::f64::consts::PI;

use crate::core::types::DVec3;

use super::record::{ObjectId, ObjectRecord, Scale, Xyz};

/// An object placed on the map, as the editor mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    /// User data the object was loaded with.
    pub record: ObjectRecord,
    /// Longitude, latitude, altitude.
    pub coordinates: DVec3,
    /// Model rotation in radians.
    pub rotation: DVec3,
    /// Model scale per axis.
    pub scale: DVec3,
    pub visible: bool,
    /// Whether picking rays hit this object.
    pub pickable: bool,
    pub selected: bool,
}

impl PlacedObject {
    pub fn from_record(record: ObjectRecord) -> Self {
        let coordinates = DVec3::new(record.origin[0], record.origin[1], record.alt.unwrap_or(0.0));
        let rotation = DVec3::new(
            record.rotation.x * PI / 180.0,
            record.rotation.y * PI / 180.0,
            record.rotation.z * PI / 180.0,
        );
        let scale = record.scale.to_dvec3();

        Self {
            record,
            coordinates,
            rotation,
            scale,
            visible: true,
            pickable: true,
            selected: false,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.record.id
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        self.record.name.as_deref().unwrap_or(self.record.id.as_str())
    }

    /// Heading in whole degrees, in (-360, 360).
    pub fn heading_degrees(&self) -> f64 {
        heading_degrees(self.rotation.y)
    }

    /// The scale factor when all three axes agree.
    pub fn uniform_scale(&self) -> Option<f64> {
        (self.scale.x == self.scale.y && self.scale.y == self.scale.z).then_some(self.scale.z)
    }

    /// Owned record reflecting the current live state.
    ///
    /// Only the heading is taken from the live rotation; the x and z angles
    /// pass through from the stored record. Scale is written as the uniform
    /// z factor.
    pub fn snapshot(&self) -> ObjectRecord {
        let mut record = self.record.clone();
        record.origin = [self.coordinates.x, self.coordinates.y];
        record.rotation = Xyz {
            x: self.record.rotation.x,
            y: self.heading_degrees(),
            z: self.record.rotation.z,
        };
        record.scale = Scale::Uniform(self.scale.z);
        record
    }
}

/// Radians to floored degrees, residue taken with the sign of the input.
///
/// Degrees are snapped to 1e-9 before flooring so a whole-degree heading
/// survives the trip through radians.
pub fn heading_degrees(radians: f64) -> f64 {
    let degrees = radians * 180.0 / PI;
    let snapped = (degrees * HEADING_SNAP).round() / HEADING_SNAP;
    snapped.floor() % 360.0
}

const HEADING_SNAP: f64 = 1e9;

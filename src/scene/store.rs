//! Scene store: arena of placed objects keyed by application id.
//!
//! Edits address objects by `ObjectId`, never by reference, so two handles
//! to the same id always mean the same object.

use indexmap::IndexMap;

use super::object::PlacedObject;
use super::record::{ObjectId, ObjectRecord};

/// Live objects of the scene, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct SceneStore {
    objects: IndexMap<ObjectId, PlacedObject>,
}

impl SceneStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted records. Later duplicates replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = ObjectRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(PlacedObject::from_record(record));
        }
        store
    }

    /// Insert an object, replacing any object with the same id.
    pub fn insert(&mut self, object: PlacedObject) -> Option<PlacedObject> {
        self.objects.insert(object.id().clone(), object)
    }

    /// Drop an object from the arena entirely.
    pub fn remove(&mut self, id: &ObjectId) -> Option<PlacedObject> {
        self.objects.shift_remove(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&PlacedObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut PlacedObject> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> + '_ {
        self.objects.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> + '_ {
        self.objects.keys()
    }

    /// Shift longitude/latitude.
    pub fn translate(&mut self, id: &ObjectId, dlng: f64, dlat: f64) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.coordinates.x += dlng;
                object.coordinates.y += dlat;
                true
            }
            None => false,
        }
    }

    /// Turn around the vertical axis by `degrees`.
    pub fn rotate_y(&mut self, id: &ObjectId, degrees: f64) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.rotation.y += degrees * std::f64::consts::PI / 180.0;
                true
            }
            None => false,
        }
    }

    /// Add `delta` to every scale axis.
    pub fn scale_by(&mut self, id: &ObjectId, delta: f64) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.scale.x += delta;
                object.scale.y += delta;
                object.scale.z += delta;
                true
            }
            None => false,
        }
    }

    /// Show or hide an object. Hidden objects are not pickable.
    pub fn set_visible(&mut self, id: &ObjectId, visible: bool) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.visible = visible;
                object.pickable = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_selected(&mut self, id: &ObjectId, selected: bool) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Snapshot every object, visible or not.
    pub fn to_records(&self) -> Vec<ObjectRecord> {
        self.objects.values().map(PlacedObject::snapshot).collect()
    }
}

//! Placed objects: persisted records and the live scene arena

pub mod object;
pub mod record;
pub mod store;

pub use object::{PlacedObject, heading_degrees};
pub use record::{ObjectClass, ObjectId, ObjectRecord, Scale, Xyz};
pub use store::SceneStore;

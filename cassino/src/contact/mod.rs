//! Contact resolution: mapping a drag-release point to a table object.
//!
//! The layout collaborator reports each object's on-screen bounds into a
//! [`PositionRegistry`]; the resolver answers "what did the finger land
//! on" with a deterministic nearest-within-threshold query.

pub mod registry;
pub mod resolver;

pub use registry::{ContactData, ContactKind, ContactPosition, PositionRegistry};
pub use resolver::{Contact, DEFAULT_CONTACT_THRESHOLD, find_contact_at_point};

//! The declarative architecture model: boundaries, elements, flows, and the
//! frozen registry they are assembled into.

mod identifiers;
mod registry;
mod types;

pub use identifiers::{BoundaryId, ElementId, FlowId};
pub use registry::{ModelBuilder, Registry};
pub use types::{
    Boundary, Dataflow, DatastoreAttributes, Element, ElementKind, ElementVariant,
    ProcessAttributes, TrustLevel,
};

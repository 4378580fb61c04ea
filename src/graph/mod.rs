//! Core graph data structures

mod association;
mod document;
mod node;
mod tag;

pub use association::{Association, AssociationId, Role};
pub use document::ContentDocument;
pub use node::{NodeId, NodeKind};
pub use tag::{Tag, TagCounts};

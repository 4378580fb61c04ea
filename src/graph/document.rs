//! Content documents carrying embedded tag markers

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// A piece of content whose body may embed tag references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub id: NodeId,
    pub body: String,
}

impl ContentDocument {
    pub fn new(id: impl Into<NodeId>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }

    /// True when nothing but whitespace is left in the body
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

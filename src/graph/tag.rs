//! Tags and their aggregate counters

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// Aggregate counters kept on every tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCounts {
    /// Documents tagged with this tag
    pub post: u64,
    /// Tags/accounts this tag follows
    pub following: u64,
    /// Accounts following this tag
    pub followers: u64,
    /// Times the tag was applied
    pub tagged: u64,
}

impl TagCounts {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A topic node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub counts: TagCounts,
}

impl Tag {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            counts: TagCounts::default(),
        }
    }

    pub fn with_counts(mut self, counts: TagCounts) -> Self {
        self.counts = counts;
        self
    }

    /// Zero every counter
    pub fn reset_counts(&mut self) {
        self.counts = TagCounts::default();
    }
}

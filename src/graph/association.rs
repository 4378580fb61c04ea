//! Directed associations and the mirrored-pair invariant
//!
//! A document tagged with a tag is stored twice: a `tag` record
//! (document → tag) and a `post` record (tag → document) sharing one
//! timestamp. Both halves are derived from one [`Association`] value via
//! [`Association::mirror`], so pair creation and removal never drift apart.

use super::node::{NodeId, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an association record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationId(Uuid);

impl AssociationId {
    /// Create a new random AssociationId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for AssociationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssociationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role label of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// document → tag: the document is tagged by the tag
    Tag,
    /// tag → document: mirror of `Tag`
    Post,
    /// tag → account: the account follows the tag
    Follower,
    /// tag → tag: the source should be merged into the target
    SynonymOf,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tag => "tag",
            Role::Post => "post",
            Role::Follower => "follower",
            Role::SynonymOf => "synonym_of",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tag" => Some(Role::Tag),
            "post" => Some(Role::Post),
            "follower" => Some(Role::Follower),
            "synonym_of" => Some(Role::SynonymOf),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Source,
    Target,
}

/// A directed, typed relation: `source` has `role` toward `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub id: AssociationId,
    pub role: Role,
    pub source_id: NodeId,
    pub source_kind: NodeKind,
    pub target_id: NodeId,
    pub target_kind: NodeKind,
    pub timestamp: DateTime<Utc>,
}

impl Association {
    /// Create a new association stamped with the current time
    pub fn new(
        source_id: NodeId,
        source_kind: NodeKind,
        role: Role,
        target_id: NodeId,
        target_kind: NodeKind,
    ) -> Self {
        Self {
            id: AssociationId::new(),
            role,
            source_id,
            source_kind,
            target_id,
            target_kind,
            timestamp: Utc::now(),
        }
    }

    /// The `tag` edge for a document and its `post` mirror
    pub fn tagging_pair(document: NodeId, tag: NodeId) -> (Self, Self) {
        let tag_edge = Self::new(document, NodeKind::Document, Role::Tag, tag, NodeKind::Tag);
        let post_edge = tag_edge.mirror(Role::Post);
        (tag_edge, post_edge)
    }

    /// An account following a tag (stored in this direction only)
    pub fn follower(tag: NodeId, account: NodeId) -> Self {
        Self::new(tag, NodeKind::Tag, Role::Follower, account, NodeKind::Account)
    }

    /// A synonym link: `tag` should be merged into `synonym`
    pub fn synonym_of(tag: NodeId, synonym: NodeId) -> Self {
        Self::new(tag, NodeKind::Tag, Role::SynonymOf, synonym, NodeKind::Tag)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Swap source and target, relabel with `role`, keep the timestamp.
    ///
    /// The result carries a fresh record id; stored counterparts are
    /// matched by [`Association::same_link`], not by id.
    pub fn mirror(&self, role: Role) -> Self {
        Self {
            id: AssociationId::new(),
            role,
            source_id: self.target_id.clone(),
            source_kind: self.target_kind,
            target_id: self.source_id.clone(),
            target_kind: self.source_kind,
            timestamp: self.timestamp,
        }
    }

    /// Which end carries the tag, target side first
    fn tag_endpoint(&self) -> Option<Endpoint> {
        if self.target_kind == NodeKind::Tag {
            Some(Endpoint::Target)
        } else if self.source_kind == NodeKind::Tag {
            Some(Endpoint::Source)
        } else {
            None
        }
    }

    /// The endpoint whose kind is `tag`, target side first
    pub fn tag_side(&self) -> Option<&NodeId> {
        match self.tag_endpoint()? {
            Endpoint::Target => Some(&self.target_id),
            Endpoint::Source => Some(&self.source_id),
        }
    }

    /// Copy with the tag-side endpoint replaced by `tag` and a fresh id.
    /// An association with no tag endpoint keeps both ends.
    pub fn reanchored(&self, tag: &NodeId) -> Self {
        let mut moved = self.clone();
        moved.id = AssociationId::new();
        match self.tag_endpoint() {
            Some(Endpoint::Target) => moved.target_id = tag.clone(),
            Some(Endpoint::Source) => moved.source_id = tag.clone(),
            None => {}
        }
        moved
    }

    /// Same logical key: role plus both endpoints (ids and kinds)
    pub fn same_link(&self, other: &Association) -> bool {
        self.role == other.role
            && self.source_id == other.source_id
            && self.source_kind == other.source_kind
            && self.target_id == other.target_id
            && self.target_kind == other.target_kind
    }

    /// True if either endpoint is the given node
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source_id == id || &self.target_id == id
    }
}

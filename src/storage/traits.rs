//! Storage trait definitions

use crate::graph::{Association, ContentDocument, NodeId, NodeKind, Role, Tag};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filter criteria for querying associations
///
/// Every `Some` slot must match; `None` slots match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationFilter {
    pub role: Option<Role>,
    pub source_id: Option<NodeId>,
    pub source_kind: Option<NodeKind>,
    pub target_id: Option<NodeId>,
    pub target_kind: Option<NodeKind>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl AssociationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_source(mut self, id: NodeId, kind: NodeKind) -> Self {
        self.source_id = Some(id);
        self.source_kind = Some(kind);
        self
    }

    pub fn with_source_id(mut self, id: NodeId) -> Self {
        self.source_id = Some(id);
        self
    }

    pub fn with_target(mut self, id: NodeId, kind: NodeKind) -> Self {
        self.target_id = Some(id);
        self.target_kind = Some(kind);
        self
    }

    pub fn with_target_kind(mut self, kind: NodeKind) -> Self {
        self.target_kind = Some(kind);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Role-`tag` edges pointing at `tag` (one per referencing document)
    pub fn tagged_with(tag: &NodeId) -> Self {
        Self::new()
            .with_role(Role::Tag)
            .with_target(tag.clone(), NodeKind::Tag)
    }

    /// Follower edges from `tag` to accounts
    pub fn followers_of(tag: &NodeId) -> Self {
        Self::new()
            .with_role(Role::Follower)
            .with_source_id(tag.clone())
            .with_target_kind(NodeKind::Account)
    }

    /// Check one association against the filter (limit is not considered)
    pub fn matches(&self, association: &Association) -> bool {
        self.role.map_or(true, |r| r == association.role)
            && self
                .source_id
                .as_ref()
                .map_or(true, |id| id == &association.source_id)
            && self
                .source_kind
                .map_or(true, |k| k == association.source_kind)
            && self
                .target_id
                .as_ref()
                .map_or(true, |id| id == &association.target_id)
            && self
                .target_kind
                .map_or(true, |k| k == association.target_kind)
    }
}

/// Trait for graph storage backends
///
/// Implementations must be thread-safe (Send + Sync) so a single store can
/// back concurrent invocations on different tags.
pub trait GraphStore: Send + Sync {
    // === Tag Operations ===

    /// Load a tag by ID
    fn get_tag(&self, id: &NodeId) -> StorageResult<Option<Tag>>;

    /// Save a tag (insert or update)
    fn save_tag(&self, tag: &Tag) -> StorageResult<()>;

    // === Document Operations ===

    /// Load a document by ID
    fn get_document(&self, id: &NodeId) -> StorageResult<Option<ContentDocument>>;

    /// Save a document (insert or update)
    fn save_document(&self, document: &ContentDocument) -> StorageResult<()>;

    /// Delete a document record; associations are left alone
    fn delete_document(&self, id: &NodeId) -> StorageResult<bool>;

    // === Association Operations ===

    /// Find associations matching filter criteria, in no particular order
    fn find_associations(&self, filter: &AssociationFilter) -> StorageResult<Vec<Association>>;

    /// Existence probe: any one association matching the filter
    fn find_one_association(&self, filter: &AssociationFilter) -> StorageResult<Option<Association>> {
        let mut found = self.find_associations(&filter.clone().with_limit(1))?;
        Ok(found.pop())
    }

    /// Store a new association record
    fn create_association(&self, association: &Association) -> StorageResult<()>;

    /// Remove every record with the same logical key as `association`
    ///
    /// Returns false when nothing matched; that is not an error.
    fn remove_association(&self, association: &Association) -> StorageResult<bool>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

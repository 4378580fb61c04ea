//! topicmod: tag consolidation for a tagged-content graph
//!
//! Deletes a tag, or merges it into its synonym, while keeping every
//! document body, association and counter that refers to it consistent.
//!
//! # Core Concepts
//!
//! - **Tags**: topic nodes with aggregate counters
//! - **Documents**: content whose body embeds `|#:JTag:<id>|` markers
//! - **Associations**: directed, role-labelled edges; document/tag links are
//!   stored as mirrored `tag`/`post` pairs
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use topicmod::{Association, ContentDocument, GraphStore, MemoryStore, Tag, TagModifier};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.save_tag(&Tag::new("t1", "rust")).unwrap();
//! store.save_document(&ContentDocument::new("d1", "hello |#:JTag:t1|")).unwrap();
//! let (tag_edge, post_edge) = Association::tagging_pair("d1".into(), "t1".into());
//! store.create_association(&tag_edge).unwrap();
//! store.create_association(&post_edge).unwrap();
//!
//! let modifier = TagModifier::new(store.clone());
//! modifier.delete_tag(&"t1".into()).unwrap();
//!
//! assert_eq!(store.get_document(&"d1".into()).unwrap().unwrap().body, "hello ");
//! ```

pub mod config;
pub mod consolidate;
mod graph;
pub mod storage;
pub mod synonym;
pub mod worker;

pub use config::{ConfigError, ModifierConfig};
pub use consolidate::{
    ConsolidationReport, ModifierError, ModifierResult, Operation, SkipReason, SkippedDocument,
    Stage, TagModifier,
};
pub use graph::{Association, AssociationId, ContentDocument, NodeId, NodeKind, Role, Tag, TagCounts};
pub use storage::{
    AssociationFilter, GraphStore, MemoryStore, OpenStore, SqliteStore, StorageError, StorageResult,
};
pub use synonym::{SynonymOfResolver, SynonymResolver};
pub use worker::{ModificationKind, TagModification, Worker, WorkerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

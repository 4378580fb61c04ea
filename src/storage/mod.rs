//! Storage backends for topicmod
//!
//! The consolidation engine talks to storage only through the `GraphStore`
//! trait. `SqliteStore` is the persistent implementation; `MemoryStore`
//! keeps everything in process.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{AssociationFilter, GraphStore, OpenStore, StorageError, StorageResult};

//! Tag consolidation: deleting a tag or merging it into its synonym
//!
//! Both operations rewrite every document that embeds the tag's marker,
//! re-point or drop every association anchored on the tag (keeping
//! `tag`/`post` mirror pairs in step), and leave the tag with zeroed
//! counters. A merge additionally moves followers onto the synonym and
//! folds the tag's counters into it.
//!
//! Failures on a single document are logged and skipped; failures while
//! reconciling edges or persisting counters abort the invocation with no
//! rollback. Re-running an invocation is safe.

mod delete;
mod documents;
pub mod marker;
mod merge;
pub mod reconcile;
mod report;

pub use report::{ConsolidationReport, Operation, SkipReason, SkippedDocument, Stage};

use crate::graph::NodeId;
use crate::storage::{GraphStore, StorageError};
use crate::synonym::{SynonymOfResolver, SynonymResolver};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors that abort a delete or merge
#[derive(Debug, Error)]
pub enum ModifierError {
    #[error("Tag not found: {0}")]
    TagNotFound(NodeId),

    #[error("Synonym not found for tag: {0}")]
    SynonymNotFound(NodeId),

    #[error("Tag {0} is its own synonym")]
    SelfMerge(NodeId),

    #[error("Storage failure after stage {stage}: {source}")]
    Storage {
        stage: Stage,
        #[source]
        source: StorageError,
    },
}

impl ModifierError {
    /// Stage reached before a storage failure
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ModifierError::Storage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for consolidation operations
pub type ModifierResult<T> = Result<T, ModifierError>;

/// Tags a storage error with the stage the invocation had reached
trait AtStage<T> {
    fn at(self, stage: Stage) -> ModifierResult<T>;
}

impl<T> AtStage<T> for Result<T, StorageError> {
    fn at(self, stage: Stage) -> ModifierResult<T> {
        self.map_err(|source| ModifierError::Storage { stage, source })
    }
}

/// Entry point for tag deletion and merging
///
/// Invocations on the same tag are serialized through a per-tag lock; a
/// merge also holds its synonym's lock. Different tags proceed in parallel
/// when the modifier is shared across threads.
pub struct TagModifier {
    store: Arc<dyn GraphStore>,
    synonyms: Arc<dyn SynonymResolver>,
    locks: DashMap<NodeId, Arc<Mutex<()>>>,
}

impl TagModifier {
    /// Create a modifier resolving synonyms from `synonym_of` links
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            synonyms: Arc::new(SynonymOfResolver),
            locks: DashMap::new(),
        }
    }

    /// Replace the synonym resolution policy
    pub fn with_resolver(mut self, resolver: Arc<dyn SynonymResolver>) -> Self {
        self.synonyms = resolver;
        self
    }

    pub fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    /// Strip the tag from every document, drop its associations and zero
    /// its counters.
    pub fn delete_tag(&self, tag_id: &NodeId) -> ModifierResult<ConsolidationReport> {
        let lock = self.lock_for(tag_id);
        let result = {
            let _guard = acquire(&lock);
            self.delete_locked(tag_id)
        };
        drop(lock);
        self.release(tag_id);
        result
    }

    /// Move the tag's documents, associations, followers and counters onto
    /// its synonym, leaving the tag itself empty.
    pub fn merge_tag(&self, tag_id: &NodeId) -> ModifierResult<ConsolidationReport> {
        if self.store.get_tag(tag_id).at(Stage::Start)?.is_none() {
            return Err(ModifierError::TagNotFound(tag_id.clone()));
        }
        let synonym = self
            .synonyms
            .resolve(self.store(), tag_id)
            .at(Stage::Start)?
            .ok_or_else(|| ModifierError::SynonymNotFound(tag_id.clone()))?;
        if &synonym.id == tag_id {
            return Err(ModifierError::SelfMerge(tag_id.clone()));
        }

        // Fixed acquisition order so opposite merges cannot deadlock
        let (first, second) = if tag_id < &synonym.id {
            (tag_id, &synonym.id)
        } else {
            (&synonym.id, tag_id)
        };
        let first_lock = self.lock_for(first);
        let second_lock = self.lock_for(second);
        let result = {
            let _first = acquire(&first_lock);
            let _second = acquire(&second_lock);
            self.merge_locked(tag_id, &synonym.id)
        };
        drop((first_lock, second_lock));
        self.release(first);
        self.release(second);
        result
    }

    fn lock_for(&self, id: &NodeId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop a tag's lock entry once no invocation holds or awaits it.
    ///
    /// Counting and removal happen under the map's shard lock, so a caller
    /// in `lock_for` either sees the entry gone or keeps it alive.
    fn release(&self, id: &NodeId) {
        self.locks
            .remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// The lock guards no data, so a poisoned lock is still usable
fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

//! In-process storage backend

use super::traits::{AssociationFilter, GraphStore, StorageError, StorageResult};
use crate::graph::{Association, ContentDocument, NodeId, Tag};
use dashmap::DashMap;
use std::sync::{Mutex, MutexGuard};

/// Graph store held entirely in memory
///
/// Tags and documents live in `DashMap`s keyed by id. Associations are a
/// flat list scanned per query, which is fine for the graph sizes this
/// backend is meant for (tests and embedding callers).
#[derive(Debug, Default)]
pub struct MemoryStore {
    tags: DashMap<NodeId, Tag>,
    documents: DashMap<NodeId, ContentDocument>,
    associations: Mutex<Vec<Association>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn associations(&self) -> StorageResult<MutexGuard<'_, Vec<Association>>> {
        self.associations
            .lock()
            .map_err(|_| StorageError::LockPoisoned)
    }

    /// Number of association records currently stored
    pub fn association_count(&self) -> StorageResult<usize> {
        Ok(self.associations()?.len())
    }

    /// Snapshot of every stored association
    pub fn all_associations(&self) -> StorageResult<Vec<Association>> {
        Ok(self.associations()?.clone())
    }
}

impl GraphStore for MemoryStore {
    fn get_tag(&self, id: &NodeId) -> StorageResult<Option<Tag>> {
        Ok(self.tags.get(id).map(|r| r.clone()))
    }

    fn save_tag(&self, tag: &Tag) -> StorageResult<()> {
        self.tags.insert(tag.id.clone(), tag.clone());
        Ok(())
    }

    fn get_document(&self, id: &NodeId) -> StorageResult<Option<ContentDocument>> {
        Ok(self.documents.get(id).map(|r| r.clone()))
    }

    fn save_document(&self, document: &ContentDocument) -> StorageResult<()> {
        self.documents.insert(document.id.clone(), document.clone());
        Ok(())
    }

    fn delete_document(&self, id: &NodeId) -> StorageResult<bool> {
        Ok(self.documents.remove(id).is_some())
    }

    fn find_associations(&self, filter: &AssociationFilter) -> StorageResult<Vec<Association>> {
        let associations = self.associations()?;
        let matching = associations.iter().filter(|a| filter.matches(a)).cloned();
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn create_association(&self, association: &Association) -> StorageResult<()> {
        self.associations()?.push(association.clone());
        Ok(())
    }

    fn remove_association(&self, association: &Association) -> StorageResult<bool> {
        let mut associations = self.associations()?;
        let before = associations.len();
        associations.retain(|a| !a.same_link(association));
        Ok(associations.len() < before)
    }
}

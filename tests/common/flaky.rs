//! Store wrapper that fails selected operations on demand

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use topicmod::{
    Association, AssociationFilter, ContentDocument, GraphStore, MemoryStore, NodeId,
    Role, StorageError, StorageResult, Tag,
};

/// Delegates to a `MemoryStore`, failing where configured
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing_loads: Mutex<HashSet<NodeId>>,
    failing_saves: Mutex<HashSet<NodeId>>,
    failing_tag_saves: Mutex<HashSet<NodeId>>,
    failing_find_roles: Mutex<HashSet<Role>>,
    /// Creates allowed before every further create fails
    create_budget: Mutex<Option<usize>>,
    creates: AtomicUsize,
    /// Removals allowed before every further removal fails
    remove_budget: Mutex<Option<usize>>,
    removes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_load_of(&self, document: &str) {
        self.failing_loads.lock().unwrap().insert(document.into());
    }

    pub fn fail_save_of(&self, document: &str) {
        self.failing_saves.lock().unwrap().insert(document.into());
    }

    pub fn fail_creates_after(&self, allowed: usize) {
        *self.create_budget.lock().unwrap() = Some(allowed);
    }

    pub fn fail_save_tag_of(&self, tag: &str) {
        self.failing_tag_saves.lock().unwrap().insert(tag.into());
    }

    /// Fail every lookup filtered on `role`
    pub fn fail_finds(&self, role: Role) {
        self.failing_find_roles.lock().unwrap().insert(role);
    }

    pub fn fail_removes_after(&self, allowed: usize) {
        self.removes.store(0, Ordering::SeqCst);
        *self.remove_budget.lock().unwrap() = Some(allowed);
    }

    pub fn heal(&self) {
        self.failing_loads.lock().unwrap().clear();
        self.failing_saves.lock().unwrap().clear();
        self.failing_tag_saves.lock().unwrap().clear();
        self.failing_find_roles.lock().unwrap().clear();
        *self.create_budget.lock().unwrap() = None;
        *self.remove_budget.lock().unwrap() = None;
    }

    fn unavailable(what: impl std::fmt::Display) -> StorageError {
        StorageError::Unavailable(what.to_string())
    }
}

impl GraphStore for FlakyStore {
    fn get_tag(&self, id: &NodeId) -> StorageResult<Option<Tag>> {
        self.inner.get_tag(id)
    }

    fn save_tag(&self, tag: &Tag) -> StorageResult<()> {
        if self.failing_tag_saves.lock().unwrap().contains(&tag.id) {
            return Err(Self::unavailable(format!("save tag {}", tag.id)));
        }
        self.inner.save_tag(tag)
    }

    fn get_document(&self, id: &NodeId) -> StorageResult<Option<ContentDocument>> {
        if self.failing_loads.lock().unwrap().contains(id) {
            return Err(Self::unavailable(format!("load {}", id)));
        }
        self.inner.get_document(id)
    }

    fn save_document(&self, document: &ContentDocument) -> StorageResult<()> {
        if self.failing_saves.lock().unwrap().contains(&document.id) {
            return Err(Self::unavailable(format!("save {}", document.id)));
        }
        self.inner.save_document(document)
    }

    fn delete_document(&self, id: &NodeId) -> StorageResult<bool> {
        self.inner.delete_document(id)
    }

    fn find_associations(&self, filter: &AssociationFilter) -> StorageResult<Vec<Association>> {
        if let Some(role) = filter.role {
            if self.failing_find_roles.lock().unwrap().contains(&role) {
                return Err(Self::unavailable(format!("find {} associations", role)));
            }
        }
        self.inner.find_associations(filter)
    }

    fn create_association(&self, association: &Association) -> StorageResult<()> {
        if let Some(allowed) = *self.create_budget.lock().unwrap() {
            if self.creates.load(Ordering::SeqCst) >= allowed {
                return Err(Self::unavailable("create association"));
            }
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_association(association)
    }

    fn remove_association(&self, association: &Association) -> StorageResult<bool> {
        if let Some(allowed) = *self.remove_budget.lock().unwrap() {
            if self.removes.load(Ordering::SeqCst) >= allowed {
                return Err(Self::unavailable("remove association"));
            }
        }
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_association(association)
    }
}

//! Synonym resolution: which tag a given tag merges into

use crate::graph::{NodeId, NodeKind, Role, Tag};
use crate::storage::{AssociationFilter, GraphStore, StorageResult};

/// Looks up the synonym of a tag
///
/// The policy is opaque to the consolidation engine; it only needs the
/// resolved tag record, or `None` when the tag has no synonym.
pub trait SynonymResolver: Send + Sync {
    fn resolve(&self, store: &dyn GraphStore, tag_id: &NodeId) -> StorageResult<Option<Tag>>;
}

/// Resolves synonyms from `synonym_of` associations (tag → tag)
#[derive(Debug, Clone, Copy, Default)]
pub struct SynonymOfResolver;

impl SynonymResolver for SynonymOfResolver {
    fn resolve(&self, store: &dyn GraphStore, tag_id: &NodeId) -> StorageResult<Option<Tag>> {
        let filter = AssociationFilter::new()
            .with_role(Role::SynonymOf)
            .with_source(tag_id.clone(), NodeKind::Tag)
            .with_target_kind(NodeKind::Tag);

        match store.find_one_association(&filter)? {
            Some(link) => store.get_tag(&link.target_id),
            None => Ok(None),
        }
    }
}

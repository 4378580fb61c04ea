//! Edge reconciliation: remove edges anchored on a tag, optionally
//! recreating them on a replacement tag

use crate::graph::{Association, NodeId, Role};
use crate::storage::{GraphStore, StorageResult};

/// Remove each edge; with a replacement, recreate it anchored there.
///
/// The tag-side endpoint of each recreated edge is replaced and a fresh id
/// assigned. An edge whose stored record is already gone is still
/// recreated. Stops at the first store failure; edges already handled stay
/// handled. Returns the number of stored records actually removed.
pub fn reanchor(
    store: &dyn GraphStore,
    edges: &[Association],
    replacement: Option<&NodeId>,
) -> StorageResult<usize> {
    let mut removed = 0;
    for edge in edges {
        if store.remove_association(edge)? {
            removed += 1;
        }
        if let Some(tag) = replacement {
            let moved = edge.reanchored(tag);
            tracing::debug!(
                "re-anchored {} edge {} -> {} from {} onto {}",
                edge.role,
                edge.source_id,
                edge.target_id,
                edge.tag_side().map_or("-", |old| old.as_str()),
                tag
            );
            store.create_association(&moved)?;
        }
    }
    Ok(removed)
}

/// Remove a `tag` edge together with its `post` mirror, returning how many
/// stored records went
pub fn remove_pair(store: &dyn GraphStore, tag_edge: &Association) -> StorageResult<usize> {
    let mut removed = 0;
    if store.remove_association(tag_edge)? {
        removed += 1;
    }
    if store.remove_association(&tag_edge.mirror(Role::Post))? {
        removed += 1;
    }
    Ok(removed)
}

/// Derive the `post` mirror of every `tag` edge
pub fn post_mirrors(tag_edges: &[Association]) -> Vec<Association> {
    tag_edges.iter().map(|edge| edge.mirror(Role::Post)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use crate::storage::{AssociationFilter, MemoryStore};

    fn seed_pair(store: &MemoryStore, doc: &str, tag: &str) -> Association {
        let (tag_edge, post_edge) = Association::tagging_pair(doc.into(), tag.into());
        store.create_association(&tag_edge).unwrap();
        store.create_association(&post_edge).unwrap();
        tag_edge
    }

    #[test]
    fn pure_removal_without_replacement() {
        let store = MemoryStore::new();
        let edge = seed_pair(&store, "d1", "t1");

        let processed = reanchor(&store, &[edge.clone()], None).unwrap();
        assert_eq!(processed, 1);

        let remaining = store.all_associations().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].role, Role::Post);
    }

    #[test]
    fn reanchor_moves_tag_and_post_sides() {
        let store = MemoryStore::new();
        let edge = seed_pair(&store, "d1", "t1");
        let synonym = NodeId::from("s1");

        reanchor(&store, &[edge.clone()], Some(&synonym)).unwrap();
        reanchor(&store, &post_mirrors(&[edge]), Some(&synonym)).unwrap();

        let all = store.all_associations().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|a| !a.touches(&"t1".into())));

        let tagged = store
            .find_associations(&AssociationFilter::tagged_with(&synonym))
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].source_kind, NodeKind::Document);

        let posts = store
            .find_associations(&AssociationFilter::new().with_role(Role::Post))
            .unwrap();
        assert_eq!(posts[0].source_id, synonym);
        assert_eq!(posts[0].timestamp, tagged[0].timestamp);
    }

    #[test]
    fn remove_pair_clears_both_halves() {
        let store = MemoryStore::new();
        let edge = seed_pair(&store, "d1", "t1");
        seed_pair(&store, "d2", "t1");

        assert_eq!(remove_pair(&store, &edge).unwrap(), 2);

        let all = store.all_associations().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|a| a.touches(&"d2".into())));
    }

    #[test]
    fn counts_only_records_actually_removed() {
        let store = MemoryStore::new();
        let edge = seed_pair(&store, "d1", "t1");
        store.remove_association(&edge.mirror(Role::Post)).unwrap();

        assert_eq!(remove_pair(&store, &edge).unwrap(), 1);
        assert_eq!(remove_pair(&store, &edge).unwrap(), 0);
        assert_eq!(reanchor(&store, &[edge], None).unwrap(), 0);
    }

    #[test]
    fn missing_record_is_still_recreated_on_replacement() {
        let store = MemoryStore::new();
        let (tag_edge, _) = Association::tagging_pair("d1".into(), "t1".into());

        let removed = reanchor(&store, &[tag_edge], Some(&"s1".into())).unwrap();
        assert_eq!(removed, 0);
        let moved = store
            .find_associations(&AssociationFilter::tagged_with(&"s1".into()))
            .unwrap();
        assert_eq!(moved.len(), 1);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let store = MemoryStore::new();
        assert_eq!(reanchor(&store, &[], Some(&"s1".into())).unwrap(), 0);
        assert_eq!(store.association_count().unwrap(), 0);
    }
}

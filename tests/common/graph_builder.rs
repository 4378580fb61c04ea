//! Builds small tag/document graphs on any `GraphStore`

use topicmod::{
    Association, AssociationFilter, ContentDocument, GraphStore, NodeId, Role, Tag, TagCounts,
};

/// Fluent fixture builder writing straight into a store
pub struct GraphBuilder<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    pub fn tag(self, id: &str, title: &str) -> Self {
        self.store.save_tag(&Tag::new(id, title)).unwrap();
        self
    }

    pub fn tag_with_counts(self, id: &str, title: &str, counts: TagCounts) -> Self {
        self.store
            .save_tag(&Tag::new(id, title).with_counts(counts))
            .unwrap();
        self
    }

    /// Link `tag` to its synonym
    pub fn synonym(self, tag: &str, synonym: &str) -> Self {
        self.store
            .create_association(&Association::synonym_of(tag.into(), synonym.into()))
            .unwrap();
        self
    }

    /// Save a document and tag it with each listed tag (mirrored pairs)
    pub fn document(self, id: &str, body: &str, tags: &[&str]) -> Self {
        self.store
            .save_document(&ContentDocument::new(id, body))
            .unwrap();
        for tag in tags {
            let (tag_edge, post_edge) = Association::tagging_pair(id.into(), (*tag).into());
            self.store.create_association(&tag_edge).unwrap();
            self.store.create_association(&post_edge).unwrap();
        }
        self
    }

    pub fn follower(self, tag: &str, account: &str) -> Self {
        self.store
            .create_association(&Association::follower(tag.into(), account.into()))
            .unwrap();
        self
    }
}

/// All associations with `id` on either end, optionally of one role
pub fn associations_touching(store: &dyn GraphStore, id: &str, role: Option<Role>) -> Vec<Association> {
    let id = NodeId::from(id);
    store
        .find_associations(&AssociationFilter::new())
        .unwrap()
        .into_iter()
        .filter(|a| a.touches(&id) && role.map_or(true, |r| a.role == r))
        .collect()
}

/// Every `tag` edge has a `post` mirror and vice versa
pub fn assert_mirrored(store: &dyn GraphStore) {
    let all = store.find_associations(&AssociationFilter::new()).unwrap();
    for edge in &all {
        let expected = match edge.role {
            Role::Tag => edge.mirror(Role::Post),
            Role::Post => edge.mirror(Role::Tag),
            _ => continue,
        };
        assert!(
            all.iter().any(|other| other.same_link(&expected)),
            "{} edge {} -> {} has no mirror",
            edge.role,
            edge.source_id,
            edge.target_id
        );
    }
}

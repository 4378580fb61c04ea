//! Merging a tag into its synonym

use super::documents::DocumentOutcome;
use super::report::{ConsolidationReport, Operation, Stage};
use super::{reconcile, AtStage, ModifierError, ModifierResult, TagModifier};
use crate::graph::{Association, NodeId, NodeKind, Role, Tag};
use crate::storage::{AssociationFilter, GraphStore, StorageResult};

impl TagModifier {
    pub(super) fn merge_locked(
        &self,
        tag_id: &NodeId,
        synonym_id: &NodeId,
    ) -> ModifierResult<ConsolidationReport> {
        let store = self.store();
        let mut report = ConsolidationReport::new(Operation::Merge, tag_id.clone());
        report.synonym_id = Some(synonym_id.clone());

        // Re-read both under the locks
        let mut tag = store
            .get_tag(tag_id)
            .at(report.stage)?
            .ok_or_else(|| ModifierError::TagNotFound(tag_id.clone()))?;
        let mut synonym = store
            .get_tag(synonym_id)
            .at(report.stage)?
            .ok_or_else(|| ModifierError::SynonymNotFound(tag_id.clone()))?;
        tracing::info!("Merging topic {} into {}", tag.title, synonym.title);

        let edges = store
            .find_associations(&AssociationFilter::tagged_with(tag_id))
            .at(report.stage)?;
        tracing::info!("{} tagged documents found", edges.len());

        let outcomes = self.rewrite_documents(&edges, Some(synonym_id), &mut report);
        report.advance(Stage::DocumentsRewritten);

        let mut to_move = Vec::new();
        for (edge, outcome) in outcomes {
            match outcome {
                DocumentOutcome::Rewritten => to_move.push(edge),
                // The synonym pair already exists, or no document is left
                DocumentOutcome::AlreadyTagged | DocumentOutcome::Removed => {
                    report.edges_removed +=
                        reconcile::remove_pair(store, &edge).at(report.stage)?;
                }
                // Left anchored on the tag so a re-run can retry it
                DocumentOutcome::Skipped => {}
            }
        }

        report.edges_reanchored +=
            reconcile::reanchor(store, &to_move, Some(synonym_id)).at(report.stage)?;
        report.edges_reanchored +=
            reconcile::reanchor(store, &reconcile::post_mirrors(&to_move), Some(synonym_id))
                .at(report.stage)?;
        synonym.counts.post += to_move.len() as u64;
        tracing::info!("Merged post count {}", to_move.len());

        // Carried over as stored, without recounting live associations
        synonym.counts.following += tag.counts.following;
        synonym.counts.tagged += tag.counts.tagged;

        let (already_following, new_followers) =
            partition_followers(store, &tag, synonym_id).at(report.stage)?;
        tracing::info!(
            "{} users are already following the synonym, {} followers moved",
            already_following.len(),
            new_followers.len()
        );
        report.followers_dropped +=
            reconcile::reanchor(store, &already_following, None).at(report.stage)?;
        report.followers_moved +=
            reconcile::reanchor(store, &new_followers, Some(synonym_id)).at(report.stage)?;
        synonym.counts.followers += new_followers.len() as u64;
        report.advance(Stage::EdgesReconciled);

        store.save_tag(&synonym).at(report.stage)?;
        tag.reset_counts();
        store.save_tag(&tag).at(report.stage)?;
        report.advance(Stage::CountersUpdated);

        report.advance(Stage::Done);
        tracing::info!("{}", report);
        Ok(report)
    }
}

/// Split the tag's followers into those already following the synonym and
/// those that still need to move, probing per account.
fn partition_followers(
    store: &dyn GraphStore,
    tag: &Tag,
    synonym_id: &NodeId,
) -> StorageResult<(Vec<Association>, Vec<Association>)> {
    let mut already_following = Vec::new();
    let mut new_followers = Vec::new();

    for follow in store.find_associations(&AssociationFilter::followers_of(&tag.id))? {
        let probe = AssociationFilter::new()
            .with_role(Role::Follower)
            .with_source_id(synonym_id.clone())
            .with_target(follow.target_id.clone(), NodeKind::Account);

        if store.find_one_association(&probe)?.is_some() {
            already_following.push(follow);
        } else {
            new_followers.push(follow);
        }
    }

    Ok((already_following, new_followers))
}

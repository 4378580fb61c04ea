//! Tag deletion

use super::report::{ConsolidationReport, Operation, Stage};
use super::{reconcile, AtStage, ModifierError, ModifierResult, TagModifier};
use crate::graph::{NodeId, NodeKind, Role};
use crate::storage::AssociationFilter;

impl TagModifier {
    pub(super) fn delete_locked(&self, tag_id: &NodeId) -> ModifierResult<ConsolidationReport> {
        let store = self.store();
        let mut report = ConsolidationReport::new(Operation::Delete, tag_id.clone());

        let mut tag = store
            .get_tag(tag_id)
            .at(report.stage)?
            .ok_or_else(|| ModifierError::TagNotFound(tag_id.clone()))?;
        tracing::info!("Deleting topic {} ({})", tag.title, tag.id);

        let edges = store
            .find_associations(&AssociationFilter::tagged_with(tag_id))
            .at(report.stage)?;
        tracing::info!("{} tagged documents found", edges.len());

        self.rewrite_documents(&edges, None, &mut report);
        report.advance(Stage::DocumentsRewritten);

        // Every edge goes, including those whose document was skipped:
        // the tag is being severed regardless.
        report.edges_removed += reconcile::reanchor(store, &edges, None).at(report.stage)?;
        report.edges_removed +=
            reconcile::reanchor(store, &reconcile::post_mirrors(&edges), None).at(report.stage)?;

        // Post edges whose tag half went in an earlier, aborted run
        let stray = store
            .find_associations(
                &AssociationFilter::new()
                    .with_role(Role::Post)
                    .with_source(tag_id.clone(), NodeKind::Tag),
            )
            .at(report.stage)?;
        if !stray.is_empty() {
            tracing::info!("{} orphaned post edges found", stray.len());
            report.edges_removed += reconcile::reanchor(store, &stray, None).at(report.stage)?;
        }
        report.advance(Stage::EdgesReconciled);

        tag.reset_counts();
        store.save_tag(&tag).at(report.stage)?;
        report.advance(Stage::CountersUpdated);

        report.advance(Stage::Done);
        tracing::info!("{}", report);
        Ok(report)
    }
}

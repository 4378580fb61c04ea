//! Document rewrite phase shared by delete and merge

use super::marker;
use super::report::{ConsolidationReport, SkipReason};
use super::TagModifier;
use crate::graph::{Association, NodeId};

/// What happened to the document behind one `tag` edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DocumentOutcome {
    /// Marker replaced (or stripped) and the document saved
    Rewritten,
    /// Body was blank afterwards; the document was deleted
    Removed,
    /// Body already referenced the replacement; old marker stripped
    AlreadyTagged,
    /// Load or persist failed; document and edge left as they were
    Skipped,
}

impl TagModifier {
    /// Rewrite the document behind every edge, continuing past failures.
    ///
    /// Each edge is paired with its outcome; skipped documents are also
    /// recorded in the report.
    pub(super) fn rewrite_documents(
        &self,
        edges: &[Association],
        replacement: Option<&NodeId>,
        report: &mut ConsolidationReport,
    ) -> Vec<(Association, DocumentOutcome)> {
        let mut outcomes = Vec::with_capacity(edges.len());

        for edge in edges {
            let outcome = match self.rewrite_document(edge, replacement) {
                Ok(outcome) => outcome,
                Err(reason) => {
                    tracing::warn!(
                        "Skipping document {} referencing tag {}: {}",
                        edge.source_id,
                        edge.target_id,
                        reason
                    );
                    report.skip(edge.source_id.clone(), reason);
                    DocumentOutcome::Skipped
                }
            };

            match outcome {
                DocumentOutcome::Rewritten => report.documents_rewritten += 1,
                DocumentOutcome::Removed => report.documents_removed += 1,
                DocumentOutcome::AlreadyTagged => report.documents_already_tagged += 1,
                DocumentOutcome::Skipped => {}
            }
            outcomes.push((edge.clone(), outcome));
        }

        outcomes
    }

    fn rewrite_document(
        &self,
        edge: &Association,
        replacement: Option<&NodeId>,
    ) -> Result<DocumentOutcome, SkipReason> {
        let store = self.store();
        let storage = |e: crate::storage::StorageError| SkipReason::Storage(e.to_string());

        let mut document = store
            .get_document(&edge.source_id)
            .map_err(storage)?
            .ok_or(SkipReason::NotFound)?;

        let already_tagged = marker::rewrite(&mut document, &edge.target_id, replacement);

        if document.is_blank() {
            store.delete_document(&document.id).map_err(storage)?;
            tracing::debug!("Removed document {} left blank", document.id);
            return Ok(DocumentOutcome::Removed);
        }

        store.save_document(&document).map_err(storage)?;
        Ok(if already_tagged {
            DocumentOutcome::AlreadyTagged
        } else {
            DocumentOutcome::Rewritten
        })
    }
}

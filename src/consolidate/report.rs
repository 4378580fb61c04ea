//! Per-invocation accounting

use crate::graph::NodeId;
use serde::Serialize;

/// Progress of one invocation
///
/// `Start → DocumentsRewritten → EdgesReconciled → CountersUpdated → Done`.
/// There is no retry across stages; a failure leaves whatever the completed
/// stages produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    DocumentsRewritten,
    EdgesReconciled,
    CountersUpdated,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::DocumentsRewritten => "documents-rewritten",
            Stage::EdgesReconciled => "edges-reconciled",
            Stage::CountersUpdated => "counters-updated",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Delete,
    Merge,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Delete => f.write_str("delete"),
            Operation::Merge => f.write_str("merge"),
        }
    }
}

/// Why a document was left alone during the rewrite phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The edge points at a document the store does not have
    NotFound,
    /// Loading, saving or deleting the document failed
    Storage(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotFound => f.write_str("document not found"),
            SkipReason::Storage(msg) => write!(f, "storage failure: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub document_id: NodeId,
    pub reason: SkipReason,
}

/// Aggregate outcome of a delete or merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidationReport {
    pub operation: Operation,
    pub tag_id: NodeId,
    /// Merge target; `None` for deletions
    pub synonym_id: Option<NodeId>,
    /// Last stage reached
    pub stage: Stage,
    pub documents_rewritten: usize,
    pub documents_removed: usize,
    /// Documents that already referenced the synonym
    pub documents_already_tagged: usize,
    pub skipped: Vec<SkippedDocument>,
    /// Association records removed without replacement
    pub edges_removed: usize,
    /// Association records moved onto the synonym (tag and post halves)
    pub edges_reanchored: usize,
    pub followers_moved: usize,
    pub followers_dropped: usize,
}

impl ConsolidationReport {
    pub fn new(operation: Operation, tag_id: NodeId) -> Self {
        Self {
            operation,
            tag_id,
            synonym_id: None,
            stage: Stage::Start,
            documents_rewritten: 0,
            documents_removed: 0,
            documents_already_tagged: 0,
            skipped: Vec::new(),
            edges_removed: 0,
            edges_reanchored: 0,
            followers_moved: 0,
            followers_dropped: 0,
        }
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        debug_assert!(stage >= self.stage, "stages only move forward");
        self.stage = stage;
    }

    pub(crate) fn skip(&mut self, document_id: NodeId, reason: SkipReason) {
        self.skipped.push(SkippedDocument { document_id, reason });
    }

    /// True when every document was handled
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Done && self.skipped.is_empty()
    }
}

impl std::fmt::Display for ConsolidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.operation, self.tag_id)?;
        if let Some(ref synonym) = self.synonym_id {
            write!(f, " into {}", synonym)?;
        }
        write!(
            f,
            ": {} rewritten, {} removed, {} already tagged, {} skipped; \
             edges {} removed, {} re-anchored; followers {} moved, {} dropped",
            self.documents_rewritten,
            self.documents_removed,
            self.documents_already_tagged,
            self.skipped.len(),
            self.edges_removed,
            self.edges_reanchored,
            self.followers_moved,
            self.followers_dropped,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Start < Stage::DocumentsRewritten);
        assert!(Stage::EdgesReconciled < Stage::CountersUpdated);
        assert!(Stage::CountersUpdated < Stage::Done);
    }

    #[test]
    fn complete_requires_done_and_no_skips() {
        let mut report = ConsolidationReport::new(Operation::Delete, "t1".into());
        assert!(!report.is_complete());

        report.advance(Stage::Done);
        assert!(report.is_complete());

        report.skip("d1".into(), SkipReason::NotFound);
        assert!(!report.is_complete());
    }

    #[test]
    fn summary_mentions_synonym() {
        let mut report = ConsolidationReport::new(Operation::Merge, "t1".into());
        report.synonym_id = Some("s1".into());
        let text = report.to_string();
        assert!(text.starts_with("merge t1 into s1:"), "{}", text);
    }

    #[test]
    fn skip_reason_serializes_tagged() {
        let json = serde_json::to_value(SkipReason::Storage("disk".into())).unwrap();
        assert_eq!(json["kind"], "storage");
        assert_eq!(json["detail"], "disk");
    }
}

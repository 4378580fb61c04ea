//! Message dispatch for queue-delivered tag modifications
//!
//! A modification arrives as JSON: `{"tagId": "<id>", "status": "delete"}`
//! or `"merge"`. The transport is left to the caller; `Worker::handle`
//! takes the raw payload.

use crate::consolidate::{ConsolidationReport, ModifierError, TagModifier};
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationKind {
    Delete,
    Merge,
}

/// One requested change to a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagModification {
    pub tag_id: NodeId,
    pub status: ModificationKind,
}

impl TagModification {
    pub fn delete(tag_id: impl Into<NodeId>) -> Self {
        Self {
            tag_id: tag_id.into(),
            status: ModificationKind::Delete,
        }
    }

    pub fn merge(tag_id: impl Into<NodeId>) -> Self {
        Self {
            tag_id: tag_id.into(),
            status: ModificationKind::Merge,
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Malformed modification message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

/// Decodes modification messages and runs them against a `TagModifier`
#[derive(Clone)]
pub struct Worker {
    modifier: Arc<TagModifier>,
}

impl Worker {
    pub fn new(modifier: Arc<TagModifier>) -> Self {
        Self { modifier }
    }

    pub fn modifier(&self) -> &TagModifier {
        &self.modifier
    }

    /// Decode a raw payload and apply it
    pub fn handle(&self, payload: &[u8]) -> Result<ConsolidationReport, WorkerError> {
        let message: TagModification = serde_json::from_slice(payload)?;
        Ok(self.apply(&message)?)
    }

    pub fn apply(&self, message: &TagModification) -> Result<ConsolidationReport, ModifierError> {
        let result = match message.status {
            ModificationKind::Delete => self.modifier.delete_tag(&message.tag_id),
            ModificationKind::Merge => self.modifier.merge_tag(&message.tag_id),
        };
        match &result {
            Ok(report) if !report.skipped.is_empty() => tracing::warn!(
                "{:?} of {} finished with {} skipped documents",
                message.status,
                message.tag_id,
                report.skipped.len()
            ),
            Ok(_) => {}
            Err(e) => tracing::error!("{:?} of {} failed: {}", message.status, message.tag_id, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::Operation;
    use crate::graph::Tag;
    use crate::storage::{GraphStore, MemoryStore};

    fn worker_with_tag(id: &str) -> Worker {
        let store = Arc::new(MemoryStore::new());
        store.save_tag(&Tag::new(id, "topic")).unwrap();
        Worker::new(Arc::new(TagModifier::new(store)))
    }

    #[test]
    fn message_uses_camel_case_fields() {
        let json = serde_json::to_string(&TagModification::merge("t1")).unwrap();
        assert_eq!(json, r#"{"tagId":"t1","status":"merge"}"#);
    }

    #[test]
    fn handle_dispatches_delete() {
        let worker = worker_with_tag("t1");
        let report = worker.handle(br#"{"tagId":"t1","status":"delete"}"#).unwrap();
        assert_eq!(report.operation, Operation::Delete);
    }

    #[test]
    fn handle_dispatches_merge() {
        let worker = worker_with_tag("t1");
        // No synonym link: the merge path runs and reports it
        let err = worker.handle(br#"{"tagId":"t1","status":"merge"}"#).unwrap_err();
        assert!(matches!(err, WorkerError::Modifier(ModifierError::SynonymNotFound(_))));
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let worker = worker_with_tag("t1");
        let err = worker.handle(br#"{"tagId":"t1","status":"rename"}"#).unwrap_err();
        assert!(matches!(err, WorkerError::Decode(_)));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let worker = worker_with_tag("t1");
        assert!(matches!(worker.handle(b"not json"), Err(WorkerError::Decode(_))));
    }

    #[test]
    fn modifier_errors_pass_through() {
        let worker = worker_with_tag("t1");
        let err = worker.apply(&TagModification::delete("other")).unwrap_err();
        assert!(matches!(err, ModifierError::TagNotFound(_)));
    }
}

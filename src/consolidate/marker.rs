//! Embedded tag markers inside document bodies
//!
//! A reference is the literal `|#:JTag:<tagId>|`; it is matched and
//! replaced verbatim, never parsed.

use crate::graph::{ContentDocument, NodeId};

/// Marker text embedding a reference to `tag`
pub fn marker(tag: &NodeId) -> String {
    format!("|#:JTag:{}|", tag)
}

/// Point the body's `old` markers at `new`.
///
/// Every `old` marker is removed; the first is replaced by the `new` marker.
/// With `new = None`, or when the body already references `new`, all old
/// markers are simply deleted. Returns true in the second case: the
/// document was already tagged with the replacement. The document is not
/// persisted.
pub fn rewrite(document: &mut ContentDocument, old: &NodeId, new: Option<&NodeId>) -> bool {
    let (replacement, was_duplicate) = match new {
        Some(new) => {
            let new_marker = marker(new);
            if document.body.contains(&new_marker) {
                (String::new(), true)
            } else {
                (new_marker, false)
            }
        }
        None => (String::new(), false),
    };

    // First occurrence takes the replacement, the rest are dropped, so a
    // body never ends up holding the new marker twice.
    let old_marker = marker(old);
    if document.body.contains(&old_marker) {
        document.body = document
            .body
            .replacen(&old_marker, &replacement, 1)
            .replace(&old_marker, "");
    }
    was_duplicate
}

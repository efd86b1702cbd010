//! Working-list entries: an editable copy paired with its store original.

use serde::{Deserialize, Serialize};

use crate::models::WritingSystemDefinition;

/// One entry in a role's working list.
///
/// `original` is a construction-time snapshot of the store's definition and
/// anchors the item's identity for diffing at commit; `working` is the copy
/// the user edits. `original` is `None` exactly when the writing system has
/// never been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Whether the item belongs to the role's current (in-use) subset
    pub in_current_list: bool,
    /// Snapshot of the store definition this item was built from, if any
    pub original: Option<WritingSystemDefinition>,
    /// The editable working copy
    pub working: WritingSystemDefinition,
}

impl ListItem {
    /// Creates an entry for a definition already in the store.
    #[must_use]
    pub fn existing(in_current_list: bool, original: WritingSystemDefinition) -> Self {
        let working = original.clone();
        Self {
            in_current_list,
            original: Some(original),
            working,
        }
    }

    /// Creates an entry for a not-yet-created writing system.
    #[must_use]
    pub const fn added(working: WritingSystemDefinition) -> Self {
        Self {
            in_current_list: true,
            original: None,
            working,
        }
    }

    /// True when the writing system has never been committed to the store.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.original.is_none()
    }
}

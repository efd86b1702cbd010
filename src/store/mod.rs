//! Project-store access ports.
//!
//! The store owns the live writing-system definitions, the per-role ordered
//! "all" and "current" collections, and the homograph pointer. This crate
//! never reaches into the store's internals: collections are read and written
//! wholesale as ordered vectors, and every commit runs inside a transaction
//! scope obtained from the adapter.

pub mod memory;

use anyhow::Result;
use std::ops::{Deref, DerefMut};

use crate::models::{ListRole, WritingSystemDefinition};

pub use memory::MemoryStore;

/// Capabilities the project store exposes to the curation core.
pub trait StoreAdapter {
    /// Looks up a registered definition by language tag.
    fn try_get_by_tag(&self, tag: &str) -> Option<WritingSystemDefinition>;

    /// Registers a definition, minting a store id when it has none, and
    /// overwrites any definition already registered under the same id.
    /// Returns the definition with its id filled in.
    fn register_or_replace(&mut self, ws: WritingSystemDefinition)
        -> Result<WritingSystemDefinition>;

    /// Persists all registered definitions. This is the only operation that
    /// may fail for I/O reasons.
    fn save(&mut self) -> Result<()>;

    /// Merges the source definition's data into the target and removes the
    /// source. Cascading data cleanup is the store's responsibility.
    fn merge_into(&mut self, source_id: &str, target_id: &str) -> Result<()>;

    /// Deletes a definition and its data from the store.
    fn delete(&mut self, id: &str) -> Result<()>;

    /// The ordered "all known" collection for a role.
    fn all_list(&self, role: ListRole) -> Vec<WritingSystemDefinition>;

    /// Replaces the ordered "all known" collection for a role.
    fn set_all_list(&mut self, role: ListRole, list: Vec<WritingSystemDefinition>);

    /// The ordered "currently in use" subset for a role.
    fn current_list(&self, role: ListRole) -> Vec<WritingSystemDefinition>;

    /// Replaces the ordered "currently in use" subset for a role.
    fn set_current_list(&mut self, role: ListRole, list: Vec<WritingSystemDefinition>);

    /// The language tag of the writing system used for homograph numbering.
    fn homograph_ws(&self) -> Option<String>;

    /// Repoints the homograph writing system.
    fn set_homograph_ws(&mut self, tag: &str);

    /// Opens a transaction scope. Calls do not nest.
    fn begin(&mut self);

    /// Makes all changes since [`Self::begin`] permanent.
    fn commit(&mut self) -> Result<()>;

    /// Discards all changes since [`Self::begin`].
    fn rollback(&mut self);
}

/// Scoped store transaction that rolls back on drop unless committed.
pub struct Transaction<'a> {
    store: &'a mut dyn StoreAdapter,
    committed: bool,
}

impl<'a> Transaction<'a> {
    /// Opens a transaction on the adapter.
    pub fn begin(store: &'a mut dyn StoreAdapter) -> Self {
        store.begin();
        Self {
            store,
            committed: false,
        }
    }

    /// Commits the transaction. On error the guard still rolls back on drop.
    pub fn commit(mut self) -> Result<()> {
        self.store.commit()?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.store.rollback();
        }
    }
}

impl<'a> Deref for Transaction<'a> {
    type Target = dyn StoreAdapter + 'a;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.store
    }
}

//! Commit-time reconciliation between a working list and the store.
//!
//! The engine translates the net effect of all working-list edits into an
//! ordered set of store operations: homograph-pointer adjustment first, then
//! deletions, then the create/update pass in list order, then merges, then a
//! single save. Everything runs inside one store transaction; any failure
//! rolls the store back and leaves the model's edits in place for a retry.

use anyhow::Result;
use std::rc::Rc;
use tracing::{debug, info};

use crate::models::{ListRole, WritingSystemDefinition};
use crate::services::working_list::WorkingListModel;
use crate::store::{StoreAdapter, Transaction};
use crate::tags::TagService;

/// Applies a working list's accumulated edits to the store.
pub struct Reconciler;

impl Reconciler {
    /// Commits the model's edits in one transaction.
    ///
    /// The caller is responsible for gating on
    /// [`WorkingListModel::is_list_valid`]; committing an invalid list is
    /// not blocked here.
    ///
    /// # Errors
    ///
    /// Any store failure rolls the transaction back and propagates. The
    /// model keeps its edits so the commit can be retried.
    pub fn commit(model: &mut WorkingListModel, store: &mut dyn StoreAdapter) -> Result<()> {
        let list_changed = model.current_list_changed();
        {
            let mut tx = Transaction::begin(store);
            Self::run(model, &mut *tx)?;
            tx.commit()?;
        }
        // Observers reload only after the transaction is closed.
        if list_changed {
            model.hooks_mut().list_updated();
        }
        model.finish_commit(store);
        Ok(())
    }

    fn run(model: &mut WorkingListModel, store: &mut dyn StoreAdapter) -> Result<()> {
        let role = model.role();
        let tags = model.tags_rc();

        if role == ListRole::Vernacular {
            if let Some(homograph) = store.homograph_ws() {
                Self::adjust_homograph(model, store, &homograph);
            }
        }

        let mut all = store.all_list(role);
        let mut current = store.current_list(role);
        let other_tags: Vec<String> = store
            .all_list(role.other())
            .iter()
            .map(|ws| ws.language_tag(tags.as_ref()))
            .collect();

        let deleted = Self::resolve_deletions(model, store, &tags, &mut all, &mut current, &other_tags)?;
        let new_defs = Self::create_and_update(model, store, &tags, &mut all, &mut current)?;

        for merge in model.merges().to_vec() {
            let target_present = model
                .items()
                .iter()
                .any(|item| item.working.id.as_deref() == Some(merge.target_id.as_str()));
            if !target_present {
                anyhow::bail!(
                    "merge target '{}' is no longer in the working list",
                    merge.target_tag
                );
            }
            debug!(source = %merge.source_tag, target = %merge.target_tag, "merging");
            store.merge_into(&merge.source_id, &merge.target_id)?;
        }

        store.set_all_list(role, all);
        store.set_current_list(role, current);
        store.save()?;

        for ws in &new_defs {
            let tag = ws.language_tag(tags.as_ref());
            model.hooks_mut().import_starter_list(&tag);
        }

        info!(
            %role,
            created = new_defs.len(),
            deleted,
            merged = model.merges().len(),
            "committed writing system list"
        );
        Ok(())
    }

    /// Step 1: keep the homograph pointer resolving to a current vernacular
    /// item, consulting the user when the top item changed out from under it.
    fn adjust_homograph(model: &mut WorkingListModel, store: &mut dyn StoreAdapter, homograph: &str) {
        let tags = model.tags_rc();
        let original_tag = |ws: &WritingSystemDefinition| ws.language_tag(tags.as_ref());

        let Some(top) = model.items().iter().find(|item| item.in_current_list) else {
            return;
        };
        let top_tag = top.working.language_tag(tags.as_ref());
        let top_label = top.working.display_label(tags.as_ref());
        let top_is_homograph = top
            .original
            .as_ref()
            .is_some_and(|orig| tags.equivalent(&original_tag(orig), homograph));

        let resolves = model.items().iter().any(|item| {
            item.original
                .as_ref()
                .is_some_and(|orig| tags.equivalent(&original_tag(orig), homograph))
        });
        if !resolves {
            // The referenced writing system is gone; repoint unconditionally.
            debug!(%top_tag, "homograph writing system removed, repointing");
            store.set_homograph_ws(&top_tag);
            return;
        }

        let homograph_still_current = model.items().iter().any(|item| {
            item.in_current_list
                && item
                    .original
                    .as_ref()
                    .is_some_and(|orig| tags.equivalent(&original_tag(orig), homograph))
        });

        let wants_change = if model.homograph_was_top() {
            !top_is_homograph && model.hooks_mut().confirm_homograph_change(&top_label)
        } else {
            model.homograph_was_in_current()
                && !homograph_still_current
                && model.hooks_mut().confirm_homograph_change(&top_label)
        };
        if wants_change {
            store.set_homograph_ws(&top_tag);
        }
    }

    /// Step 2: store items absent from the working sequence are deletion
    /// candidates; shared and merge-source items are spared. Returns the
    /// number of store-level deletions.
    fn resolve_deletions(
        model: &WorkingListModel,
        store: &mut dyn StoreAdapter,
        tags: &Rc<dyn TagService>,
        all: &mut Vec<WritingSystemDefinition>,
        current: &mut Vec<WritingSystemDefinition>,
        other_tags: &[String],
    ) -> Result<usize> {
        let mut candidates = Vec::new();
        all.retain(|def| {
            let kept = model
                .items()
                .iter()
                .any(|item| Self::same_identity(tags, &item.working, def));
            if !kept {
                candidates.push(def.clone());
            }
            kept
        });

        let mut deleted = 0;
        for def in candidates {
            current.retain(|c| c.id != def.id);
            let tag = def.language_tag(tags.as_ref());
            let shared = other_tags.iter().any(|other| tags.equivalent(other, &tag));
            let merge_source = model
                .merges()
                .iter()
                .any(|merge| Some(&merge.source_id) == def.id.as_ref());
            if shared || merge_source {
                debug!(%tag, shared, merge_source, "removed from role without deleting");
                continue;
            }
            let Some(id) = &def.id else { continue };
            debug!(%tag, "deleting writing system");
            store.delete(id)?;
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Step 3: walk the working sequence in order, registering new items,
    /// folding edits into originals, and rebuilding both collections with
    /// running cursors.
    fn create_and_update(
        model: &mut WorkingListModel,
        store: &mut dyn StoreAdapter,
        tags: &Rc<dyn TagService>,
        all: &mut Vec<WritingSystemDefinition>,
        current: &mut Vec<WritingSystemDefinition>,
    ) -> Result<Vec<WritingSystemDefinition>> {
        let mut new_defs = Vec::new();
        let mut current_cursor = 0;
        for index in 0..model.items().len() {
            let item = model.items()[index].clone();
            let in_current = item.in_current_list;
            let was_committed = !item.is_new();
            let canonical = match item.original {
                None => {
                    let registered = store.register_or_replace(item.working.clone())?;
                    if let Some(id) = registered.id.clone() {
                        model.set_working_id(index, id);
                    }
                    new_defs.push(registered.clone());
                    registered
                }
                Some(orig) if !orig.same_content(&item.working) => {
                    let old_tag = orig.language_tag(tags.as_ref());
                    let new_tag = item.working.language_tag(tags.as_ref());
                    let abbreviation_changed = orig.abbreviation != item.working.abbreviation;
                    let mut updated = item.working.clone();
                    updated.id = orig.id.clone();
                    let registered = store.register_or_replace(updated)?;
                    let renamed = !tags.equivalent(&old_tag, &new_tag);
                    if renamed {
                        // The homograph pointer follows the rename; otherwise
                        // it would name a tag that no longer exists.
                        let points_here = store
                            .homograph_ws()
                            .is_some_and(|h| tags.equivalent(&h, &old_tag));
                        if points_here {
                            store.set_homograph_ws(&new_tag);
                        }
                        model.hooks_mut().identity_updated(&old_tag, &new_tag);
                    }
                    if renamed || abbreviation_changed {
                        let id = registered.id.clone().unwrap_or_default();
                        model.hooks_mut().definition_updated(&id);
                    }
                    registered
                }
                Some(orig) => orig,
            };

            // Created or not, the item's list position may have changed.
            Self::place(tags, all, index, canonical.clone());
            if in_current {
                Self::place(tags, current, current_cursor, canonical);
                current_cursor += 1;
            } else if was_committed {
                current.retain(|c| c.id != canonical.id);
            }
        }
        Ok(new_defs)
    }

    fn same_identity(
        tags: &Rc<dyn TagService>,
        a: &WritingSystemDefinition,
        b: &WritingSystemDefinition,
    ) -> bool {
        a.same_identity(b, tags.as_ref())
    }

    /// Inserts `ws` into `list` at `index`, first removing any entry with the
    /// same identity so an existing entry moves rather than duplicates.
    fn place(
        tags: &Rc<dyn TagService>,
        list: &mut Vec<WritingSystemDefinition>,
        index: usize,
        ws: WritingSystemDefinition,
    ) {
        list.retain(|known| !Self::same_identity(tags, known, &ws));
        if index >= list.len() {
            list.push(ws);
        } else {
            list.insert(index, ws);
        }
    }
}

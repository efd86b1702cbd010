//! In-memory reference implementation of the store adapter.
//!
//! Used by the integration tests and by embedders without a real project
//! store (e.g., a new-project wizard that has not created a store yet).
//! Transactions are whole-state snapshots: `begin` clones the state,
//! `rollback` restores it.

use anyhow::Result;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

use crate::models::{ListRole, WritingSystemDefinition};
use crate::store::StoreAdapter;
use crate::tags::TagService;

#[derive(Debug, Clone, Default)]
struct RoleLists {
    all: Vec<String>,
    current: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct State {
    definitions: HashMap<String, WritingSystemDefinition>,
    lists: HashMap<ListRole, RoleLists>,
    homograph: Option<String>,
}

/// Writing-system store held entirely in memory.
pub struct MemoryStore {
    tags: Rc<dyn TagService>,
    state: State,
    snapshot: Option<State>,
    /// Every `merge_into(source, target)` call, in order. Diagnostic record;
    /// not rolled back with the state.
    pub merge_log: Vec<(String, String)>,
    /// Every `delete(id)` call, in order. Diagnostic record; not rolled back
    /// with the state.
    pub delete_log: Vec<String>,
    /// Number of successful `save` calls.
    pub save_count: usize,
    /// Makes the next `save` call fail once. Mirrors the original model's
    /// internal mock points; lets tests exercise rollback.
    pub fail_next_save: bool,
}

impl MemoryStore {
    /// Creates an empty store deriving tags through `tags`.
    #[must_use]
    pub fn new(tags: Rc<dyn TagService>) -> Self {
        Self {
            tags,
            state: State::default(),
            snapshot: None,
            merge_log: Vec::new(),
            delete_log: Vec::new(),
            save_count: 0,
            fail_next_save: false,
        }
    }

    /// Registers a definition and appends it to a role's "all" list (and the
    /// current subset when `in_current`). Returns the minted store id.
    pub fn seed(
        &mut self,
        role: ListRole,
        ws: WritingSystemDefinition,
        in_current: bool,
    ) -> Result<String> {
        let registered = self.register_or_replace(ws)?;
        let id = registered.id.clone().unwrap_or_default();
        let lists = self.state.lists.entry(role).or_default();
        if !lists.all.contains(&id) {
            lists.all.push(id.clone());
        }
        if in_current && !lists.current.contains(&id) {
            lists.current.push(id.clone());
        }
        Ok(id)
    }

    fn tag_of(&self, ws: &WritingSystemDefinition) -> String {
        ws.language_tag(self.tags.as_ref())
    }

    fn resolve(&self, ids: &[String]) -> Vec<WritingSystemDefinition> {
        ids.iter()
            .filter_map(|id| self.state.definitions.get(id).cloned())
            .collect()
    }

    fn ids_of(&mut self, list: Vec<WritingSystemDefinition>) -> Vec<String> {
        list.into_iter()
            .map(|ws| match &ws.id {
                Some(id) => id.clone(),
                // Definitions reach lists through register_or_replace, so an
                // id-less entry is registered on the way in.
                None => self
                    .register_or_replace(ws)
                    .ok()
                    .and_then(|ws| ws.id)
                    .unwrap_or_default(),
            })
            .collect()
    }
}

impl StoreAdapter for MemoryStore {
    fn try_get_by_tag(&self, tag: &str) -> Option<WritingSystemDefinition> {
        self.state
            .definitions
            .values()
            .find(|ws| self.tags.equivalent(&self.tag_of(ws), tag))
            .cloned()
    }

    fn register_or_replace(
        &mut self,
        mut ws: WritingSystemDefinition,
    ) -> Result<WritingSystemDefinition> {
        let id = match ws.id.clone() {
            Some(id) => id,
            None => {
                let tag = self.tag_of(&ws);
                // Reuse the id of a definition already registered under an
                // equivalent tag so "create over existing" overwrites it.
                self.state
                    .definitions
                    .values()
                    .find(|known| self.tags.equivalent(&self.tag_of(known), &tag))
                    .and_then(|known| known.id.clone())
                    .unwrap_or_else(|| Uuid::new_v4().to_string())
            }
        };
        ws.id = Some(id.clone());
        self.state.definitions.insert(id, ws.clone());
        Ok(ws)
    }

    fn save(&mut self) -> Result<()> {
        if self.fail_next_save {
            self.fail_next_save = false;
            anyhow::bail!("writing system repository is not writable");
        }
        self.save_count += 1;
        Ok(())
    }

    fn merge_into(&mut self, source_id: &str, target_id: &str) -> Result<()> {
        if !self.state.definitions.contains_key(target_id) {
            anyhow::bail!("merge target '{target_id}' is not registered");
        }
        self.merge_log
            .push((source_id.to_string(), target_id.to_string()));
        self.state.definitions.remove(source_id);
        for lists in self.state.lists.values_mut() {
            lists.all.retain(|id| id != source_id);
            lists.current.retain(|id| id != source_id);
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        if self.state.definitions.remove(id).is_none() {
            anyhow::bail!("writing system '{id}' is not registered");
        }
        for lists in self.state.lists.values_mut() {
            lists.all.retain(|known| known != id);
            lists.current.retain(|known| known != id);
        }
        self.delete_log.push(id.to_string());
        Ok(())
    }

    fn all_list(&self, role: ListRole) -> Vec<WritingSystemDefinition> {
        self.state
            .lists
            .get(&role)
            .map(|lists| self.resolve(&lists.all))
            .unwrap_or_default()
    }

    fn set_all_list(&mut self, role: ListRole, list: Vec<WritingSystemDefinition>) {
        let ids = self.ids_of(list);
        self.state.lists.entry(role).or_default().all = ids;
    }

    fn current_list(&self, role: ListRole) -> Vec<WritingSystemDefinition> {
        self.state
            .lists
            .get(&role)
            .map(|lists| self.resolve(&lists.current))
            .unwrap_or_default()
    }

    fn set_current_list(&mut self, role: ListRole, list: Vec<WritingSystemDefinition>) {
        let ids = self.ids_of(list);
        self.state.lists.entry(role).or_default().current = ids;
    }

    fn homograph_ws(&self) -> Option<String> {
        self.state.homograph.clone()
    }

    fn set_homograph_ws(&mut self, tag: &str) {
        self.state.homograph = Some(tag.to_string());
    }

    fn begin(&mut self) {
        self.snapshot = Some(self.state.clone());
    }

    fn commit(&mut self) -> Result<()> {
        self.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.state = snapshot;
        }
    }
}

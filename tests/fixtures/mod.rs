//! Shared test fixtures for the working-list integration tests.
#![allow(dead_code)] // Not every fixture is used by every test binary

use std::cell::RefCell;
use std::rc::Rc;

use wscurate::hooks::SetupHooks;
use wscurate::models::{ListRole, WritingSystemDefinition};
use wscurate::store::MemoryStore;
use wscurate::tags::{BasicTags, TagService};

/// The shared tag service used by every test.
pub fn tags() -> Rc<dyn TagService> {
    Rc::new(BasicTags)
}

/// An empty in-memory store wired to [`tags`].
pub fn store() -> MemoryStore {
    MemoryStore::new(tags())
}

/// A minimal definition for `code`, without a store id.
pub fn ws(code: &str, name: &str) -> WritingSystemDefinition {
    WritingSystemDefinition::new(code, name)
}

/// Seeds a store with the given vernacular tags, all of them current, and
/// returns their minted ids in order.
pub fn seed_vernacular(store: &mut MemoryStore, codes: &[(&str, &str, bool)]) -> Vec<String> {
    codes
        .iter()
        .map(|(code, name, in_current)| {
            store
                .seed(ListRole::Vernacular, ws(code, name), *in_current)
                .unwrap()
        })
        .collect()
}

/// Everything the scripted hooks observed, for assertions after the model
/// has consumed the hooks box.
#[derive(Debug, Default)]
pub struct HookLog {
    pub delete_prompts: Vec<String>,
    pub homograph_prompts: Vec<String>,
    pub shared_change_prompts: Vec<String>,
    pub identity_rejections: Vec<String>,
    pub duplicate_rejections: Vec<String>,
    pub identity_updates: Vec<(String, String)>,
    pub definition_updates: Vec<String>,
    pub imports: Vec<String>,
    pub list_updated_count: usize,
    pub selection_changes: usize,
}

/// Hooks with scripted answers that record every interaction.
pub struct ScriptedHooks {
    pub log: Rc<RefCell<HookLog>>,
    pub accept_delete: bool,
    pub accept_homograph: bool,
    pub accept_shared_change: bool,
    pub accept_new_vernacular: bool,
    pub merge_target: Option<String>,
    pub ipa_keyboard: Option<String>,
}

impl ScriptedHooks {
    /// Accept-everything hooks plus a handle to their log.
    pub fn accepting() -> (Self, Rc<RefCell<HookLog>>) {
        let log = Rc::new(RefCell::new(HookLog::default()));
        let hooks = Self {
            log: Rc::clone(&log),
            accept_delete: true,
            accept_homograph: true,
            accept_shared_change: true,
            accept_new_vernacular: true,
            merge_target: None,
            ipa_keyboard: None,
        };
        (hooks, log)
    }
}

impl SetupHooks for ScriptedHooks {
    fn confirm_delete(&mut self, label: &str) -> bool {
        self.log.borrow_mut().delete_prompts.push(label.to_string());
        self.accept_delete
    }

    fn confirm_merge_target(&mut self, _label: &str, _candidate_tags: &[String]) -> Option<String> {
        self.merge_target.clone()
    }

    fn confirm_homograph_change(&mut self, new_label: &str) -> bool {
        self.log
            .borrow_mut()
            .homograph_prompts
            .push(new_label.to_string());
        self.accept_homograph
    }

    fn confirm_shared_ws_change(&mut self, language_name: &str) -> bool {
        self.log
            .borrow_mut()
            .shared_change_prompts
            .push(language_name.to_string());
        self.accept_shared_change
    }

    fn confirm_add_new_vernacular(&mut self) -> bool {
        self.accept_new_vernacular
    }

    fn duplicate_tag_rejected(&mut self, tag: &str) {
        self.log
            .borrow_mut()
            .duplicate_rejections
            .push(tag.to_string());
    }

    fn identity_change_rejected(&mut self, label: &str) {
        self.log
            .borrow_mut()
            .identity_rejections
            .push(label.to_string());
    }

    fn selection_changed(&mut self) {
        self.log.borrow_mut().selection_changes += 1;
    }

    fn list_updated(&mut self) {
        self.log.borrow_mut().list_updated_count += 1;
    }

    fn identity_updated(&mut self, old_tag: &str, new_tag: &str) {
        self.log
            .borrow_mut()
            .identity_updates
            .push((old_tag.to_string(), new_tag.to_string()));
    }

    fn definition_updated(&mut self, id: &str) {
        self.log
            .borrow_mut()
            .definition_updates
            .push(id.to_string());
    }

    fn import_starter_list(&mut self, tag: &str) {
        self.log.borrow_mut().imports.push(tag.to_string());
    }

    fn available_ipa_keyboard(&mut self) -> Option<String> {
        self.ipa_keyboard.clone()
    }
}

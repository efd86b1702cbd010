//! Working list for one role's writing systems.
//!
//! The model holds an ordered sequence of [`ListItem`]s built from the
//! store's "all" and "current" collections, plus selection state. All edits
//! happen here, against working copies; nothing touches the store until the
//! reconciliation engine commits.

use anyhow::Result;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::hooks::SetupHooks;
use crate::models::{ListItem, ListRole, WritingSystemDefinition, AUDIO_SCRIPT, AUDIO_VARIANT, IPA_VARIANT};
use crate::store::StoreAdapter;
use crate::tags::TagService;

/// Tag of the protected built-in default writing system.
///
/// The original plain English definition is required by the Analysis role:
/// its identity cannot be edited and it cannot be deleted from that role,
/// though it may be excluded from the current subset.
pub const DEFAULT_WS_TAG: &str = "en";

/// A writing system slated to be merged into another on commit.
///
/// Both ends are keyed by store id so the request survives later edits to
/// the target (merge participants are always committed systems). The tags
/// are snapshots from mark time, kept for display and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Store id of the merge source (always an existing writing system)
    pub source_id: String,
    /// Tag of the source at the time the merge was requested
    pub source_tag: String,
    /// Store id of the working-list item the source merges into
    pub target_id: String,
    /// Tag of the target at the time the merge was requested
    pub target_tag: String,
}

/// Ordered, editable writing-system list for one role.
pub struct WorkingListModel {
    role: ListRole,
    items: Vec<ListItem>,
    selected: usize,
    current_list_changed: bool,
    advanced_view: bool,
    merges: Vec<MergeRequest>,
    /// Store "all" collection at construction time; deletion candidates are
    /// found against this snapshot.
    original_all: Vec<WritingSystemDefinition>,
    /// Tags in the peer role's "all" collection at construction time.
    shared_tags: Vec<String>,
    homograph_was_top: bool,
    homograph_was_in_current: bool,
    tags: Rc<dyn TagService>,
    hooks: Box<dyn SetupHooks>,
}

impl WorkingListModel {
    /// Builds the working list for `role` from the store's collections.
    ///
    /// # Errors
    ///
    /// Fails when the role has no writing systems at all; the list must be
    /// non-empty for the lifetime of the model.
    pub fn from_store(
        store: &dyn StoreAdapter,
        role: ListRole,
        tags: Rc<dyn TagService>,
        hooks: Box<dyn SetupHooks>,
    ) -> Result<Self> {
        Self::new(
            role,
            store.all_list(role),
            store.current_list(role),
            store
                .all_list(role.other())
                .iter()
                .map(|ws| ws.language_tag(tags.as_ref()))
                .collect(),
            store.homograph_ws(),
            tags,
            hooks,
        )
    }

    /// Builds a working list from explicit collections.
    ///
    /// Current items come first in their stored order, then the remaining
    /// "all" items in theirs. Other subsystems order lexical data the same
    /// way, and the two collections have been seen to drift apart, so the
    /// current list wins.
    pub fn new(
        role: ListRole,
        all: Vec<WritingSystemDefinition>,
        current: Vec<WritingSystemDefinition>,
        shared_tags: Vec<String>,
        homograph: Option<String>,
        tags: Rc<dyn TagService>,
        hooks: Box<dyn SetupHooks>,
    ) -> Result<Self> {
        let mut items: Vec<ListItem> = current
            .iter()
            .map(|ws| ListItem::existing(true, ws.clone()))
            .collect();
        for ws in &all {
            // Membership is by identity, not by tag: a distinct definition
            // whose tag collides with a current one must still be listed so
            // the duplicate can be reported and resolved.
            let in_current = current.iter().any(|cur| cur.same_identity(ws, tags.as_ref()));
            if !in_current {
                items.push(ListItem::existing(false, ws.clone()));
            }
        }
        if items.is_empty() {
            anyhow::bail!("cannot edit an empty {role} writing system list");
        }

        let homograph_was_top = match (&homograph, items.iter().find(|i| i.in_current_list)) {
            (Some(h), Some(top)) => tags.equivalent(&top.working.language_tag(tags.as_ref()), h),
            _ => false,
        };
        let homograph_was_in_current = homograph.as_ref().is_some_and(|h| {
            items.iter().any(|item| {
                item.in_current_list
                    && item.original.as_ref().is_some_and(|orig| {
                        tags.equivalent(&orig.language_tag(tags.as_ref()), h)
                    })
            })
        });

        Ok(Self {
            role,
            items,
            selected: 0,
            current_list_changed: false,
            advanced_view: false,
            merges: Vec::new(),
            original_all: all,
            shared_tags,
            homograph_was_top,
            homograph_was_in_current,
            tags,
            hooks,
        })
    }

    // --- accessors ---

    /// The role this list is curated for.
    #[must_use]
    pub const fn role(&self) -> ListRole {
        self.role
    }

    /// The working sequence in display order.
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Index of the selected item.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected item.
    #[must_use]
    pub fn selected_item(&self) -> &ListItem {
        &self.items[self.selected]
    }

    /// Whether any structural change to the current subset happened since
    /// construction (or since the last successful commit).
    #[must_use]
    pub const fn current_list_changed(&self) -> bool {
        self.current_list_changed
    }

    /// Writing systems slated for merge on commit.
    #[must_use]
    pub fn merges(&self) -> &[MergeRequest] {
        &self.merges
    }

    /// Derived language tag of a definition, via the session's tag service.
    #[must_use]
    pub fn tag_of(&self, ws: &WritingSystemDefinition) -> String {
        ws.language_tag(self.tags.as_ref())
    }

    /// User-facing label of a definition.
    #[must_use]
    pub fn label_of(&self, ws: &WritingSystemDefinition) -> String {
        ws.display_label(self.tags.as_ref())
    }

    pub(crate) fn tags_rc(&self) -> Rc<dyn TagService> {
        Rc::clone(&self.tags)
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut dyn SetupHooks {
        self.hooks.as_mut()
    }

    pub(crate) fn original_all(&self) -> &[WritingSystemDefinition] {
        &self.original_all
    }

    pub(crate) const fn homograph_was_top(&self) -> bool {
        self.homograph_was_top
    }

    pub(crate) const fn homograph_was_in_current(&self) -> bool {
        self.homograph_was_in_current
    }

    pub(crate) fn set_working_id(&mut self, index: usize, id: String) {
        self.items[index].working.id = Some(id);
    }

    fn equivalent(&self, a: &str, b: &str) -> bool {
        self.tags.equivalent(a, b)
    }

    // --- selection ---

    /// Selects the item whose working tag matches. Silently keeps the
    /// selection when the tag is already selected or does not resolve.
    pub fn select_by_tag(&mut self, tag: &str) {
        let selected_tag = self.tag_of(&self.selected_item().working);
        if self.equivalent(&selected_tag, tag) {
            return;
        }
        let found = self
            .items
            .iter()
            .position(|item| self.equivalent(&self.tag_of(&item.working), tag));
        if let Some(index) = found {
            self.selected = index;
            self.hooks.selection_changed();
        }
    }

    /// Selects by index. Silently keeps the selection when `index` is the
    /// current selection or out of range.
    pub fn select_index(&mut self, index: usize) {
        if index == self.selected || index >= self.items.len() {
            return;
        }
        self.selected = index;
        self.hooks.selection_changed();
    }

    // --- structural edits ---

    /// Flips the selected item's membership in the current subset, keeping
    /// its position.
    pub fn toggle_membership(&mut self) {
        let item = &mut self.items[self.selected];
        item.in_current_list = !item.in_current_list;
        self.current_list_changed = true;
    }

    /// Whether the selection can move toward the front.
    #[must_use]
    pub const fn can_move_up(&self) -> bool {
        self.selected > 0
    }

    /// Whether the selection can move toward the back.
    #[must_use]
    pub fn can_move_down(&self) -> bool {
        self.selected + 1 < self.items.len()
    }

    /// Swaps the selected item with its predecessor.
    ///
    /// # Panics
    ///
    /// Moving the first item up is a programming error.
    pub fn move_up(&mut self) {
        assert!(self.can_move_up(), "invalid state for move_up");
        self.items.swap(self.selected - 1, self.selected);
        self.selected -= 1;
        if self.items[self.selected].in_current_list {
            self.current_list_changed = true;
        }
    }

    /// Swaps the selected item with its successor.
    ///
    /// # Panics
    ///
    /// Moving the last item down is a programming error.
    pub fn move_down(&mut self) {
        assert!(self.can_move_down(), "invalid state for move_down");
        self.items.swap(self.selected, self.selected + 1);
        self.selected += 1;
        if self.items[self.selected].in_current_list {
            self.current_list_changed = true;
        }
    }

    // --- predicates ---

    /// Whether the selected writing system may be merged into another.
    #[must_use]
    pub fn can_merge(&self) -> bool {
        self.items.len() > 1
            && !self.selected_item().is_new()
            && !self.selected_is_default_tagged()
    }

    /// Whether the selected writing system may be removed from the list.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        // The only remaining item cannot be deleted. The protected default is
        // a required Analysis writing system but removable elsewhere.
        self.items.len() > 1
            && (self.role != ListRole::Analysis || !self.selected_is_original_default())
    }

    fn selected_is_default_tagged(&self) -> bool {
        let tag = self.tag_of(&self.selected_item().working);
        self.equivalent(&tag, DEFAULT_WS_TAG)
    }

    fn selected_is_original_default(&self) -> bool {
        self.item_is_original_default(self.selected)
    }

    fn item_is_original_default(&self, index: usize) -> bool {
        self.items[index]
            .original
            .as_ref()
            .is_some_and(|orig| self.equivalent(&self.tag_of(orig), DEFAULT_WS_TAG))
    }

    /// True when at least one item is current and no two items share a tag.
    /// The caller gates commit on this; transient duplicates are allowed
    /// while editing.
    #[must_use]
    pub fn is_list_valid(&self) -> bool {
        self.items.iter().any(|item| item.in_current_list) && self.first_duplicate().is_none()
    }

    /// Display label of the first item whose tag repeats an earlier item's,
    /// in sequence order.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in &self.items {
            let tag = self.tag_of(&item.working);
            if seen.iter().any(|known| self.equivalent(known, &tag)) {
                return Some(self.label_of(&item.working));
            }
            seen.push(tag);
        }
        None
    }

    // --- identity edits (guarded for the protected default) ---

    /// Sets the selected item's script subtag.
    pub fn set_selected_script(&mut self, script: Option<String>) {
        self.edit_identity(|ws| ws.script = script);
    }

    /// Sets the selected item's region subtag.
    pub fn set_selected_region(&mut self, region: Option<String>) {
        self.edit_identity(|ws| ws.region = region);
    }

    /// Replaces the selected item's variant subtags.
    pub fn set_selected_variants(&mut self, variants: Vec<String>) {
        self.edit_identity(|ws| ws.variants = variants);
    }

    /// Changes the selected item's language subtag.
    ///
    /// When the writing system is shared with the peer role's list the
    /// change is gated on [`SetupHooks::confirm_shared_ws_change`].
    pub fn set_selected_language(&mut self, code: String, name: String) {
        let shared = self.items[self.selected].original.as_ref().is_some_and(|orig| {
            let tag = self.tag_of(orig);
            self.shared_tags.iter().any(|s| self.equivalent(s, &tag))
        });
        if shared {
            let language_name = self.selected_item().working.language.name.clone();
            if !self.hooks.confirm_shared_ws_change(&language_name) {
                return;
            }
        }
        self.edit_identity(move |ws| {
            ws.language.code = code;
            ws.language.name = name;
        });
    }

    /// Renames the selected writing system without touching its identity.
    pub fn set_selected_language_name(&mut self, name: String) {
        self.items[self.selected].working.language.name = name;
    }

    fn edit_identity(&mut self, edit: impl FnOnce(&mut WritingSystemDefinition)) {
        let before = self.items[self.selected].working.clone();
        edit(&mut self.items[self.selected].working);
        if self.item_is_original_default(self.selected) {
            let tag = self.tag_of(&self.items[self.selected].working);
            if !self.equivalent(&tag, DEFAULT_WS_TAG) {
                let label = self.label_of(&before);
                warn!(%tag, "rejected identity change of the default writing system");
                self.items[self.selected].working = before;
                self.hooks.identity_change_rejected(&label);
            }
        }
    }

    // --- settings edits (never guarded) ---

    /// Replaces the selected item's font list.
    pub fn set_selected_fonts(&mut self, fonts: Vec<String>) {
        self.items[self.selected].working.fonts = fonts;
    }

    /// Sets the selected item's default font.
    pub fn set_selected_default_font(&mut self, font: Option<String>) {
        let working = &mut self.items[self.selected].working;
        if let Some(font) = &font {
            if !working.fonts.contains(font) {
                working.fonts.push(font.clone());
            }
        }
        working.default_font = font;
    }

    /// Sets the selected item's keyboard id.
    pub fn set_selected_keyboard(&mut self, keyboard: Option<String>) {
        self.items[self.selected].working.keyboard = keyboard;
    }

    /// Sets the selected item's spell-check dictionary id.
    pub fn set_selected_spell_check(&mut self, id: Option<String>) {
        self.items[self.selected].working.spell_check_id = id;
    }

    /// Sets the selected item's legacy encoding converter id.
    pub fn set_selected_legacy_converter(&mut self, id: Option<String>) {
        self.items[self.selected].working.legacy_converter = id;
    }

    /// Enables or disables Graphite rendering for the selected item.
    pub fn set_selected_graphite(&mut self, enabled: bool) {
        self.items[self.selected].working.is_graphite_enabled = enabled;
    }

    /// Sets the selected item's display abbreviation.
    pub fn set_selected_abbreviation(&mut self, abbreviation: String) {
        self.items[self.selected].working.abbreviation = abbreviation;
    }

    // --- advanced identity view ---

    /// Whether the advanced script/region/variant view applies to the
    /// selected item: either requested, or forced by private-use subtags.
    #[must_use]
    pub fn advanced_view(&self) -> bool {
        self.advanced_view || Self::needs_advanced(&self.selected_item().working)
    }

    /// Turns the advanced view on or off. Turning it off discards
    /// private-use details after [`SetupHooks::confirm_clear_advanced`].
    pub fn set_advanced_view(&mut self, on: bool) {
        if on {
            self.advanced_view = true;
            return;
        }
        if !self.advanced_view() {
            return;
        }
        if self.hooks.confirm_clear_advanced() {
            let working = &mut self.items[self.selected].working;
            if working.script.as_deref().is_some_and(is_private_script) {
                working.script = None;
            }
            if working.region.as_deref().is_some_and(is_private_region) {
                working.region = None;
            }
            working.variants.truncate(1);
            self.advanced_view = false;
        }
    }

    fn needs_advanced(ws: &WritingSystemDefinition) -> bool {
        ws.variants.len() > 1
            || ws.script.as_deref().is_some_and(is_private_script)
            || ws.region.as_deref().is_some_and(is_private_region)
    }

    // --- add operations ---

    /// Whether the list already holds an IPA counterpart of the selected
    /// item's language.
    #[must_use]
    pub fn has_ipa_for_selected(&self) -> bool {
        let code = self.selected_item().working.language.code.to_ascii_lowercase();
        self.items.iter().any(|item| {
            let tag = self.tag_of(&item.working).to_ascii_lowercase();
            tag.starts_with(&code)
                && tag[code.len()..].starts_with('-')
                && tag.contains(IPA_VARIANT)
        })
    }

    /// Whether the list already holds an audio counterpart of the selected
    /// item's language.
    #[must_use]
    pub fn has_audio_for_selected(&self) -> bool {
        let code = &self.selected_item().working.language.code;
        let audio_tag = format!("{code}-{AUDIO_SCRIPT}-{AUDIO_VARIANT}");
        self.items
            .iter()
            .any(|item| self.equivalent(&self.tag_of(&item.working), &audio_tag))
    }

    /// Adds a dialect of the selected writing system right after it.
    pub fn add_dialect(&mut self, store: &dyn StoreAdapter) {
        let ws = WritingSystemDefinition::dialect_of(&self.selected_item().working);
        self.insert_derived(store, ws);
    }

    /// Adds an audio counterpart of the selected writing system.
    pub fn add_audio(&mut self, store: &dyn StoreAdapter) {
        let ws = WritingSystemDefinition::audio_of(&self.selected_item().working);
        self.insert_derived(store, ws);
    }

    /// Adds an IPA transcription counterpart of the selected writing system.
    pub fn add_ipa(&mut self, store: &dyn StoreAdapter) {
        let mut ws = WritingSystemDefinition::ipa_of(&self.selected_item().working);
        if let Some(keyboard) = self.hooks.available_ipa_keyboard() {
            ws.keyboard = Some(keyboard);
        }
        self.insert_derived(store, ws);
    }

    /// Adds a brand-new language by tag, returning whether an item was
    /// inserted.
    ///
    /// On the Vernacular role the host is first asked to confirm. When the
    /// tag already names an item in the working list backed by the store,
    /// the operation degrades to adding a dialect of it; a tag that is in
    /// the list but unknown to the store is a conflict and is rejected
    /// through [`SetupHooks::duplicate_tag_rejected`].
    ///
    /// # Errors
    ///
    /// Fails when the tag cannot be parsed.
    pub fn add_new_language(
        &mut self,
        store: &dyn StoreAdapter,
        tag: &str,
        desired_name: Option<&str>,
    ) -> Result<bool> {
        if self.role == ListRole::Vernacular && !self.hooks.confirm_add_new_vernacular() {
            return Ok(false);
        }
        let mut ws = WritingSystemDefinition::from_tag(tag, self.tags.as_ref())?;
        if let Some(name) = desired_name {
            ws.language.name = name.to_string();
        }

        let in_list = self
            .items
            .iter()
            .any(|item| self.equivalent(&self.tag_of(&item.working), tag));
        if in_list {
            if store.try_get_by_tag(tag).is_some() {
                // The writing system exists and is already listed; what the
                // user can meaningfully add is a dialect of it.
                self.select_by_tag(tag);
                self.add_dialect(store);
                return Ok(true);
            }
            debug!(%tag, "rejected duplicate new language");
            self.hooks.duplicate_tag_rejected(tag);
            return Ok(false);
        }

        self.insert_derived(store, ws);
        Ok(true)
    }

    /// Inserts a derived or fresh definition after the selection, reusing a
    /// store definition of the same tag as the item's original when the tag
    /// is not yet in the list.
    fn insert_derived(&mut self, store: &dyn StoreAdapter, ws: WritingSystemDefinition) {
        let tag = self.tag_of(&ws);
        let in_list = self
            .items
            .iter()
            .any(|item| self.equivalent(&self.tag_of(&item.working), &tag));
        let item = match store.try_get_by_tag(&tag) {
            Some(existing) if !in_list => {
                // Reuse the live definition with its settings intact; only
                // the display name follows the caller's request.
                let mut working = existing.clone();
                working.language.name = ws.language.name.clone();
                ListItem {
                    in_current_list: true,
                    original: Some(existing),
                    working,
                }
            }
            _ => ListItem::added(ws),
        };
        debug!(%tag, new = item.is_new(), "inserting writing system");
        self.items.insert(self.selected + 1, item);
        self.selected += 1;
        self.current_list_changed = true;
        self.hooks.selection_changed();
    }

    // --- merge and delete marking ---

    /// Tags of the items the selection could merge into.
    #[must_use]
    pub fn merge_targets(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .filter(|(index, item)| *index != self.selected && !item.is_new())
            .map(|(_, item)| self.tag_of(&item.working))
            .collect()
    }

    /// Marks the selected writing system to be merged into a target chosen
    /// through [`SetupHooks::confirm_merge_target`]. Returns whether a merge
    /// was recorded.
    ///
    /// # Panics
    ///
    /// Calling this when [`Self::can_merge`] is false is a programming error.
    pub fn mark_for_merge(&mut self) -> bool {
        assert!(self.can_merge(), "invalid state for mark_for_merge");
        let label = self.label_of(&self.selected_item().working);
        let candidates = self.merge_targets();
        let Some(target_tag) = self.hooks.confirm_merge_target(&label, &candidates) else {
            return false;
        };
        if !candidates.iter().any(|tag| self.equivalent(tag, &target_tag)) {
            return false;
        }
        let target_id = self
            .items
            .iter()
            .enumerate()
            .find(|(index, item)| {
                *index != self.selected
                    && !item.is_new()
                    && self.equivalent(&self.tag_of(&item.working), &target_tag)
            })
            .and_then(|(_, item)| item.working.id.clone());
        let Some(target_id) = target_id else {
            return false;
        };
        let source = self.items.remove(self.selected);
        let original = source.original.expect("merge source is always existing");
        let source_tag = self.tag_of(&original);
        debug!(source = %source_tag, target = %target_tag, "marked for merge");
        self.merges.push(MergeRequest {
            source_id: original.id.clone().unwrap_or_default(),
            source_tag,
            target_id,
            target_tag,
        });
        self.current_list_changed = true;
        self.selected = 0;
        self.hooks.selection_changed();
        true
    }

    /// Removes the selected writing system from the list. Items shared with
    /// the peer role are hidden without confirmation, never-committed items
    /// are discarded silently, and anything else requires
    /// [`SetupHooks::confirm_delete`]. Returns whether the item was removed.
    ///
    /// # Panics
    ///
    /// Calling this when [`Self::can_delete`] is false is a programming
    /// error.
    pub fn mark_for_deletion(&mut self) -> bool {
        assert!(self.can_delete(), "invalid state for mark_for_deletion");
        let item = self.selected_item();
        let tag = self.tag_of(&item.working);
        let shared = self.shared_tags.iter().any(|s| self.equivalent(s, &tag));
        let confirmed = if shared || item.is_new() {
            true
        } else {
            let label = self.label_of(&self.items[self.selected].working);
            self.hooks.confirm_delete(&label)
        };
        if !confirmed {
            return false;
        }
        let removed = self.items.remove(self.selected);
        debug!(%tag, shared, "removed writing system from working list");
        if removed.in_current_list {
            self.current_list_changed = true;
        }
        self.selected = 0;
        self.hooks.selection_changed();
        true
    }

    // --- post-commit sync ---

    /// Folds a successful commit back into the model: working copies become
    /// the new originals and the construction-time snapshots are refreshed,
    /// so editing can continue against the saved state.
    pub(crate) fn finish_commit(&mut self, store: &dyn StoreAdapter) {
        for item in &mut self.items {
            item.original = Some(item.working.clone());
        }
        self.original_all = store.all_list(self.role);
        self.shared_tags = store
            .all_list(self.role.other())
            .iter()
            .map(|ws| ws.language_tag(self.tags.as_ref()))
            .collect();
        let homograph = store.homograph_ws();
        self.homograph_was_top = match (&homograph, self.items.iter().find(|i| i.in_current_list)) {
            (Some(h), Some(top)) => self.equivalent(&self.tag_of(&top.working), h),
            _ => false,
        };
        self.homograph_was_in_current = homograph.as_ref().is_some_and(|h| {
            self.items
                .iter()
                .any(|item| item.in_current_list && self.equivalent(&self.tag_of(&item.working), h))
        });
        self.merges.clear();
        self.current_list_changed = false;
    }
}

fn is_private_script(script: &str) -> bool {
    // Qaaa..Qabx is the private-use script range
    script.len() == 4 && script[..2].eq_ignore_ascii_case("Qa")
}

fn is_private_region(region: &str) -> bool {
    // QM..QZ and XA..XZ are the private-use region ranges
    region.len() == 2
        && (region[..1].eq_ignore_ascii_case("X")
            || (region[..1].eq_ignore_ascii_case("Q")
                && region[1..].to_ascii_uppercase().as_str() >= "M"))
}

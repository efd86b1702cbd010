//! Injectable confirmation and notification hooks.
//!
//! The editing model and the reconciliation engine never talk to a user
//! directly. Every point where the original workflow would ask a question or
//! announce a change goes through [`SetupHooks`], one method per hook, so a
//! host application wires its dialogs in and tests supply fakes.
//!
//! Confirmations are synchronous: the caller blocks on the answer before
//! proceeding. Default implementations answer every confirmation
//! affirmatively and ignore every notification, which is what a
//! non-interactive embedding wants; [`NullHooks`] is that default as a type.

/// Host-supplied confirmations and notifications for a curation session.
pub trait SetupHooks {
    /// Asks whether the writing system named by `label` (and its data) may be
    /// deleted from the store.
    fn confirm_delete(&mut self, label: &str) -> bool {
        let _ = label;
        true
    }

    /// Asks which of `candidate_tags` the writing system named by `label`
    /// should be merged into. `None` cancels the merge.
    fn confirm_merge_target(&mut self, label: &str, candidate_tags: &[String]) -> Option<String> {
        let _ = (label, candidate_tags);
        None
    }

    /// Asks whether the homograph writing system should be repointed to the
    /// writing system named by `new_label`.
    fn confirm_homograph_change(&mut self, new_label: &str) -> bool {
        let _ = new_label;
        true
    }

    /// Asks whether private-use script/region/variant details may be
    /// discarded when leaving the advanced identity view.
    fn confirm_clear_advanced(&mut self) -> bool {
        true
    }

    /// Warns that editing `language_name` affects a writing system shared
    /// with the peer role's list.
    fn confirm_shared_ws_change(&mut self, language_name: &str) -> bool {
        let _ = language_name;
        true
    }

    /// Warns before adding a brand-new vernacular language to the project.
    fn confirm_add_new_vernacular(&mut self) -> bool {
        true
    }

    /// A brand-new language could not be added because `tag` is already in
    /// the working list.
    fn duplicate_tag_rejected(&mut self, tag: &str) {
        let _ = tag;
    }

    /// An identity edit on the protected default writing system was reverted.
    fn identity_change_rejected(&mut self, label: &str) {
        let _ = label;
    }

    /// The working list's selection moved to a different item.
    fn selection_changed(&mut self) {}

    /// The current subset changed and was committed; observers should reload.
    fn list_updated(&mut self) {}

    /// A committed writing system was re-registered under a new tag.
    fn identity_updated(&mut self, old_tag: &str, new_tag: &str) {
        let _ = (old_tag, new_tag);
    }

    /// A committed writing system changed its abbreviation or identity.
    fn definition_updated(&mut self, id: &str) {
        let _ = id;
    }

    /// A newly created writing system was saved; starter content keyed by
    /// `tag` should be imported.
    fn import_starter_list(&mut self, tag: &str) {
        let _ = tag;
    }

    /// The keyboard id to preselect for a new IPA writing system, if the
    /// host knows one.
    fn available_ipa_keyboard(&mut self) -> Option<String> {
        None
    }
}

/// Accept-all, notify-nobody hooks for non-interactive embeddings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl SetupHooks for NullHooks {}

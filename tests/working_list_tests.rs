//! Integration tests for the working-list editing surface.
//!
//! Covers construction ordering, selection semantics, membership and move
//! operations, validity queries, the protected default writing system, and
//! the add/merge/delete marking operations against an in-memory store.

mod fixtures;

use fixtures::{seed_vernacular, store, tags, ws, ScriptedHooks};
use wscurate::hooks::NullHooks;
use wscurate::models::ListRole;
use wscurate::services::WorkingListModel;
use wscurate::store::StoreAdapter;

#[test]
fn construction_lists_current_before_all_only() {
    let mut store = store();
    seed_vernacular(
        &mut store,
        &[("fr", "French", false), ("de", "German", true), ("seh", "Sena", true)],
    );

    let model = WorkingListModel::from_store(
        &store,
        ListRole::Vernacular,
        tags(),
        Box::new(NullHooks),
    )
    .unwrap();

    let order: Vec<String> = model
        .items()
        .iter()
        .map(|item| model.tag_of(&item.working))
        .collect();
    // current items first in stored order, then the rest of "all"
    assert_eq!(order, vec!["de", "seh", "fr"]);
    assert!(model.items()[0].in_current_list);
    assert!(model.items()[1].in_current_list);
    assert!(!model.items()[2].in_current_list);
}

#[test]
fn selecting_the_selected_item_is_a_noop() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true), ("de", "German", true)]);
    let (hooks, log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    model.select_by_tag("fr");
    model.select_index(0);
    assert_eq!(log.borrow().selection_changes, 0);
    assert!(!model.current_list_changed());

    model.select_by_tag("de");
    assert_eq!(log.borrow().selection_changes, 1);
    assert_eq!(model.selected_index(), 1);
}

#[test]
fn duplicate_reporting_names_the_second_entry() {
    let mut store = store();
    seed_vernacular(&mut store, &[("en", "English", true), ("fr", "French", true)]);
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(NullHooks))
            .unwrap();

    // retag French to collide with English
    model.select_by_tag("fr");
    model.set_selected_language("en".to_string(), "English Two".to_string());
    assert!(!model.is_list_valid());
    assert_eq!(model.first_duplicate(), Some("English Two (en)".to_string()));
}

#[test]
fn distinct_systems_with_equivalent_tags_both_enter_the_list() {
    let mut store = store();
    seed_vernacular(&mut store, &[("en", "English", true), ("fr", "French", true)]);
    // a second definition already tagged "en", registered under its own id
    let mut second = ws("en", "English II");
    second.id = Some("en-two".to_string());
    store.seed(ListRole::Vernacular, second, false).unwrap();

    let model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(NullHooks))
            .unwrap();

    assert_eq!(model.items().len(), 3);
    assert!(!model.is_list_valid());
    assert_eq!(model.first_duplicate(), Some("English II (en)".to_string()));
}

#[test]
fn boundary_moves_are_predicated() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true), ("de", "German", true)]);
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(NullHooks))
            .unwrap();

    assert!(!model.can_move_up());
    assert!(model.can_move_down());
    model.move_down();
    assert!(model.can_move_up());
    assert!(!model.can_move_down());
    assert!(model.current_list_changed());
}

#[test]
fn protected_default_reverts_identity_edits_with_notification() {
    let mut store = store();
    store
        .seed(ListRole::Analysis, ws("en", "English"), true)
        .unwrap();
    store
        .seed(ListRole::Analysis, ws("fr", "French"), true)
        .unwrap();
    let (hooks, log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Analysis, tags(), Box::new(hooks)).unwrap();

    model.select_by_tag("en");
    model.set_selected_script(Some("Cyrl".to_string()));
    model.set_selected_variants(vec!["fonipa".to_string()]);
    assert_eq!(model.tag_of(&model.selected_item().working), "en");
    assert_eq!(log.borrow().identity_rejections, vec!["English (en)", "English (en)"]);

    // the default cannot leave the Analysis role, but French can
    assert!(!model.can_delete());
    model.select_by_tag("fr");
    assert!(model.can_delete());
}

#[test]
fn add_dialect_inserts_new_item_after_selection() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true), ("de", "German", true)]);
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(NullHooks))
            .unwrap();

    model.add_dialect(&store);
    assert_eq!(model.items().len(), 3);
    assert_eq!(model.selected_index(), 1);
    let added = model.selected_item();
    assert!(added.is_new());
    assert!(added.in_current_list);
    assert_eq!(model.tag_of(&added.working), "fr");
    assert!(model.current_list_changed());
}

#[test]
fn audio_and_ipa_availability_track_the_list() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    let (hooks, _log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    assert!(!model.has_audio_for_selected());
    assert!(!model.has_ipa_for_selected());

    model.add_audio(&store);
    assert_eq!(model.tag_of(&model.selected_item().working), "fr-Zxxx-x-audio");
    assert!(model.selected_item().working.is_voice);

    model.select_by_tag("fr");
    assert!(model.has_audio_for_selected());

    model.add_ipa(&store);
    assert_eq!(model.tag_of(&model.selected_item().working), "fr-fonipa");
    assert_eq!(model.selected_item().working.abbreviation, "ipa");

    model.select_by_tag("fr");
    assert!(model.has_ipa_for_selected());
}

#[test]
fn ipa_item_gets_the_host_supplied_keyboard() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    let (mut hooks, _log) = ScriptedHooks::accepting();
    hooks.ipa_keyboard = Some("ipa-unicode".to_string());
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    model.add_ipa(&store);
    assert_eq!(
        model.selected_item().working.keyboard.as_deref(),
        Some("ipa-unicode")
    );
}

#[test]
fn new_language_conflicts_are_rejected_with_a_signal() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    let (hooks, log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    // a dialect of fr is in the list but unknown to the store; adding "fr"
    // again as a brand-new language is a conflict
    model.add_dialect(&store);
    let before = model.items().len();
    // remove the store's own fr so the tag resolves nowhere
    let fr = store.try_get_by_tag("fr").unwrap();
    store.delete(fr.id.as_deref().unwrap()).unwrap();

    let added = model.add_new_language(&store, "fr", None).unwrap();
    assert!(!added);
    assert_eq!(model.items().len(), before);
    assert_eq!(log.borrow().duplicate_rejections, vec!["fr"]);
}

#[test]
fn new_language_reuses_a_store_definition() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    // German exists in the project but only on the analysis side
    store
        .seed(ListRole::Analysis, ws("de", "German"), true)
        .unwrap();
    let (hooks, _log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    let added = model.add_new_language(&store, "de", Some("Deutsch")).unwrap();
    assert!(added);
    let item = model.selected_item();
    assert!(!item.is_new());
    assert_eq!(item.working.language.name, "Deutsch");
    assert_eq!(item.working.id, item.original.as_ref().unwrap().id);
}

#[test]
fn new_language_in_list_and_store_degrades_to_dialect() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true), ("de", "German", true)]);
    let (hooks, _log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    let added = model.add_new_language(&store, "de", None).unwrap();
    assert!(added);
    assert_eq!(model.items().len(), 3);
    let item = model.selected_item();
    assert!(item.is_new());
    assert_eq!(model.tag_of(&item.working), "de");
}

#[test]
fn declined_vernacular_warning_aborts_the_add() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    let (mut hooks, _log) = ScriptedHooks::accepting();
    hooks.accept_new_vernacular = false;
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    let added = model.add_new_language(&store, "seh", None).unwrap();
    assert!(!added);
    assert_eq!(model.items().len(), 1);
}

#[test]
fn never_committed_items_are_discarded_without_confirmation() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    let (hooks, log) = ScriptedHooks::accepting();
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    model.add_dialect(&store);
    assert!(model.mark_for_deletion());
    assert_eq!(model.items().len(), 1);
    assert!(log.borrow().delete_prompts.is_empty());
}

#[test]
fn declined_delete_keeps_the_item() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true), ("de", "German", true)]);
    let (mut hooks, log) = ScriptedHooks::accepting();
    hooks.accept_delete = false;
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    model.select_by_tag("de");
    assert!(!model.mark_for_deletion());
    assert_eq!(model.items().len(), 2);
    assert_eq!(log.borrow().delete_prompts, vec!["German (de)"]);
}

#[test]
fn merge_marking_removes_the_source_and_records_the_request() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true), ("de", "German", true)]);
    let (mut hooks, _log) = ScriptedHooks::accepting();
    hooks.merge_target = Some("fr".to_string());
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    model.select_by_tag("de");
    assert!(model.can_merge());
    assert_eq!(model.merge_targets(), vec!["fr".to_string()]);
    assert!(model.mark_for_merge());
    assert_eq!(model.items().len(), 1);
    assert_eq!(model.merges().len(), 1);
    assert_eq!(model.merges()[0].source_tag, "de");
    assert_eq!(model.merges()[0].target_tag, "fr");
    assert_eq!(model.selected_index(), 0);
}

#[test]
fn new_items_cannot_be_merge_sources() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(NullHooks))
            .unwrap();

    model.add_dialect(&store);
    assert!(!model.can_merge());
}

#[test]
fn shared_language_change_asks_first() {
    let mut store = store();
    seed_vernacular(&mut store, &[("fr", "French", true)]);
    store
        .seed(ListRole::Analysis, ws("fr", "French"), true)
        .unwrap();
    let (mut hooks, log) = ScriptedHooks::accepting();
    hooks.accept_shared_change = false;
    let mut model =
        WorkingListModel::from_store(&store, ListRole::Vernacular, tags(), Box::new(hooks))
            .unwrap();

    model.set_selected_language("seh".to_string(), "Sena".to_string());
    // declined: the identity is untouched
    assert_eq!(model.tag_of(&model.selected_item().working), "fr");
    assert_eq!(log.borrow().shared_change_prompts, vec!["French"]);
}

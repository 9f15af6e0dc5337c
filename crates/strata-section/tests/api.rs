//! End-to-end behaviour of sections driven through a store.

mod common;

use common::TestStore;
use serde_json::json;
use strata_section::{make_section, Section};
use strata_types::{Node, Patch, PatchEntry};

fn section1_defaults() -> Node {
    Node::from(json!({
        "a1": "x",
        "a2": {"a21": 1, "a22": 2},
        "a3": [1, 2],
    }))
}

fn change() -> Patch {
    Patch::new()
        .with_absent("a1")
        .with("a2", Patch::new().with("a21", Node::from(789)))
}

#[test]
fn update_actions_have_correct_type() {
    let section = make_section("section1", section1_defaults()).unwrap();

    assert_eq!(section.update.create(change()).action_type, "section1 ~> [ a1,a2 ]");
    assert_eq!(
        section.update.titled(change(), "some name").action_type,
        "section1 ~> some name [ a1,a2 ]"
    );
}

#[test]
fn update_actions_carry_change_verbatim() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let action = section.update.create(change());
    assert_eq!(action.payload, change());
    assert!(action.payload.get("a1").unwrap().is_absent());
}

#[test]
fn replace_actions_have_correct_type() {
    let section = Section::new("section1").unwrap().bundle();
    let change = Patch::new().with("a", Node::array(Vec::<Node>::new()));

    assert_eq!(section.replace.create(change.clone()).action_type, "section1 => [ a ]");
    assert_eq!(
        section.replace.titled(change, "some name").action_type,
        "section1 => some name [ a ]"
    );
}

#[test]
fn replace_actions_resolve_absent_to_defaults() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let action = section.replace.create(change());

    let expected = Patch::new()
        .with("a1", Node::from("x"))
        .with("a2", Patch::new().with("a21", Node::from(789)));
    assert_eq!(action.payload, expected);
}

#[test]
fn replace_payload_only_mentions_changed_keys() {
    let section = make_section("section1", Node::from(json!({"a": 1, "b": 2}))).unwrap();
    let action = section.replace.create(Patch::new().with_absent("a"));
    assert_eq!(action.payload, Patch::new().with("a", Node::from(1)));
}

#[test]
fn selector_returns_the_section_slice() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let store = TestStore::new(&[&section]);

    let selected = section.select.select(store.state()).unwrap();
    assert!(selected.ptr_eq(store.state().get("section1").unwrap()));
    assert_eq!(selected, &section1_defaults());
}

#[test]
fn reducer_applies_update_actions() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let mut store = TestStore::new(&[&section]);
    let old = section.select.select(store.state()).unwrap().clone();

    store.dispatch(&section.update.create(change()));
    let new = section.select.select(store.state()).unwrap();

    // a1 was explicitly removed
    assert!(!new.contains_key("a1"));
    // a2 is on the changed path
    assert!(!new.get("a2").unwrap().ptr_eq(old.get("a2").unwrap()));
    assert_eq!(new.at(&["a2", "a21"]).and_then(Node::as_f64), Some(789.0));
    assert!(new.at(&["a2", "a22"]).unwrap().ptr_eq(old.at(&["a2", "a22"]).unwrap()));
    // untouched top-level fields are shared
    assert!(new.get("a3").unwrap().ptr_eq(old.get("a3").unwrap()));
}

#[test]
fn reducer_update_matches_expected_state() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let mut store = TestStore::new(&[&section]);
    let old = section.select.select(store.state()).unwrap().clone();

    store.dispatch(
        &section
            .update
            .create(Patch::new().with("a2", Patch::new().with("a21", Node::from(666)))),
    );
    let new = section.select.select(store.state()).unwrap();

    assert_eq!(
        new.to_json(),
        json!({"a1": "x", "a2": {"a21": 666, "a22": 2}, "a3": [1, 2]})
    );
    assert!(new.get("a1").unwrap().ptr_eq(old.get("a1").unwrap()));
    assert!(new.get("a3").unwrap().ptr_eq(old.get("a3").unwrap()));
    assert!(!new.get("a2").unwrap().ptr_eq(old.get("a2").unwrap()));
}

#[test]
fn reducer_applies_replace_actions() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let mut store = TestStore::new(&[&section]);

    // move a1 away from its default first
    store.dispatch(&section.update.create(Patch::new().with("a1", Node::from("changed"))));
    let old = section.select.select(store.state()).unwrap().clone();
    assert_eq!(old.get("a1").and_then(Node::as_str), Some("changed"));

    store.dispatch(&section.replace.create(change()));
    let new = section.select.select(store.state()).unwrap();

    // a1 was restored from defaults
    assert_eq!(new.get("a1").and_then(Node::as_str), Some("x"));
    // a2 was replaced wholesale
    assert_eq!(new.get("a2").unwrap().to_json(), json!({"a21": 789}));
    assert!(!new.get("a2").unwrap().contains_key("a22"));
    // untouched fields are shared
    assert!(new.get("a3").unwrap().ptr_eq(old.get("a3").unwrap()));
}

#[test]
fn sections_ignore_each_others_actions() {
    let first = make_section("section1", section1_defaults()).unwrap();
    let second = make_section("section10", Node::from(json!({"n": 0}))).unwrap();
    let mut store = TestStore::new(&[&first, &second]);
    let first_before = first.select.select(store.state()).unwrap().clone();

    store.dispatch(&second.update.create(Patch::new().with("n", Node::from(1))));

    assert!(first
        .select
        .select(store.state())
        .unwrap()
        .ptr_eq(&first_before));
    assert_eq!(
        second.select.select(store.state()).unwrap().to_json(),
        json!({"n": 1})
    );
}

#[test]
fn unknown_actions_leave_the_root_untouched() {
    let section = make_section("section1", section1_defaults()).unwrap();
    let mut store = TestStore::new(&[&section]);
    let root = store.state().clone();

    store.dispatch(&strata_section::Action::new("something/else", Patch::new()));
    assert!(store.state().ptr_eq(&root));
}

#[test]
fn duplicate_sections_cannot_be_merged() {
    let a = make_section("dup", Node::empty_mapping()).unwrap();
    let b = make_section("dup", Node::empty_mapping()).unwrap();
    assert!(a.reducer.clone().merge(b.reducer.clone()).is_err());
}

#[test]
fn replace_of_nested_patch_materialises_without_absent_keys() {
    let section = make_section("s", Node::from(json!({"obj": {"k": 1}}))).unwrap();
    let mut store = TestStore::new(&[&section]);

    store.dispatch(&section.replace.create(
        Patch::new().with("obj", Patch::new().with("k2", Node::from(2)).with_absent("k")),
    ));

    assert_eq!(
        section.select.select(store.state()).unwrap().to_json(),
        json!({"obj": {"k2": 2}})
    );
    assert!(matches!(
        section.replace.create(Patch::new().with_absent("obj")).payload.get("obj"),
        Some(PatchEntry::Value(_))
    ));
}

use form_designer::designer::store::{DesignStore, SharedDesignStore};
use form_designer::element::element_model::{Attributes, ElementId};
use form_designer::error::DesignerError;
use serde_json::json;

use crate::common::fixtures::{order, store_with, text_field};

mod common;

// =========================================================================
// insert
// =========================================================================

#[test]
fn insert_clamps_index_to_length() {
    let mut store = store_with(&["A", "B"]);
    let doc = store.insert(99, text_field("C")).unwrap();
    assert_eq!(order(&doc), ["A", "B", "C"], "Index past the end appends");

    let doc = store.insert(0, text_field("Z")).unwrap();
    assert_eq!(order(&doc), ["Z", "A", "B", "C"], "Index 0 prepends");

    let doc = store.insert(2, text_field("M")).unwrap();
    assert_eq!(order(&doc), ["Z", "A", "M", "B", "C"], "Later elements shift right");
}

#[test]
fn insert_rejects_duplicate_id_and_leaves_document_alone() {
    let mut store = store_with(&["A", "B"]);
    let before = store.snapshot();
    let version = store.version();

    let err = store.insert(0, text_field("B")).unwrap_err();
    assert!(matches!(err, DesignerError::DuplicateId(ref id) if id.as_str() == "B"));
    assert_eq!(*store.snapshot(), *before, "Failed insert must not change the document");
    assert_eq!(store.version(), version, "Failed insert must not bump the version");
}

// =========================================================================
// remove
// =========================================================================

#[test]
fn remove_is_idempotent() {
    let mut once = store_with(&["A", "B", "C"]);
    once.remove(&"B".into()).unwrap();

    let mut twice = store_with(&["A", "B", "C"]);
    twice.remove(&"B".into()).unwrap();
    twice.remove(&"B".into()).unwrap();

    assert_eq!(*once.snapshot(), *twice.snapshot());
    assert_eq!(order(&twice.snapshot()), ["A", "C"]);
}

#[test]
fn remove_absent_id_is_noop() {
    let mut store = store_with(&["A"]);
    let version = store.version();
    let doc = store.remove(&"missing".into()).unwrap();
    assert_eq!(order(&doc), ["A"]);
    assert_eq!(store.version(), version, "No-op removal publishes nothing");
}

#[test]
fn removing_selected_element_clears_selection() {
    let mut store = store_with(&["A", "B"]);
    store.select(Some("B".into())).unwrap();
    let doc = store.remove(&"B".into()).unwrap();
    assert_eq!(doc.selected, None);

    store.select(Some("A".into())).unwrap();
    let doc = store.remove(&"missing".into()).unwrap();
    assert_eq!(doc.selected, Some(ElementId::new("A")), "Unrelated removal keeps selection");
}

// =========================================================================
// move
// =========================================================================

#[test]
fn move_first_to_end() {
    let mut store = store_with(&["A", "B", "C"]);
    let doc = store.move_element(&"A".into(), 2).unwrap();
    assert_eq!(order(&doc), ["B", "C", "A"]);
}

#[test]
fn move_last_to_front() {
    let mut store = store_with(&["A", "B", "C"]);
    let doc = store.move_element(&"C".into(), 0).unwrap();
    assert_eq!(order(&doc), ["C", "A", "B"]);
}

#[test]
fn move_onto_own_gap_keeps_order() {
    let mut store = store_with(&["A", "B", "C"]);
    let doc = store.move_element(&"B".into(), 1).unwrap();
    assert_eq!(order(&doc), ["A", "B", "C"]);

    let doc = store.move_element(&"A".into(), 0).unwrap();
    assert_eq!(order(&doc), ["A", "B", "C"], "Element 0 to index 0 is stable");
}

#[test]
fn move_clamps_against_post_removal_length() {
    let mut store = store_with(&["A", "B", "C"]);
    let doc = store.move_element(&"A".into(), 3).unwrap();
    assert_eq!(order(&doc), ["B", "C", "A"], "Bottom half of the last element lands last");

    let doc = store.move_element(&"B".into(), 100).unwrap();
    assert_eq!(order(&doc), ["C", "A", "B"]);
}

#[test]
fn move_missing_element_is_not_found() {
    let mut store = store_with(&["A", "B"]);
    let err = store.move_element(&"X".into(), 0).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(order(&store.snapshot()), ["A", "B"]);
}

#[test]
fn move_keeps_selection() {
    let mut store = store_with(&["A", "B", "C"]);
    store.select(Some("A".into())).unwrap();
    let doc = store.move_element(&"A".into(), 2).unwrap();
    assert_eq!(doc.selected, Some(ElementId::new("A")));
}

// =========================================================================
// update_attributes / select
// =========================================================================

#[test]
fn update_attributes_touches_only_the_target() {
    let mut store = store_with(&["A", "B", "C"]);
    let before = store.snapshot();

    let mut attrs = Attributes::new();
    attrs.insert("label".into(), json!("Email"));
    let doc = store.update_attributes(&"B".into(), attrs.clone()).unwrap();

    assert_eq!(order(&doc), ["A", "B", "C"]);
    assert_eq!(doc.elements[1].attributes, attrs);
    assert_eq!(doc.elements[0], before.elements[0]);
    assert_eq!(doc.elements[2], before.elements[2]);
}

#[test]
fn update_attributes_missing_is_not_found() {
    let mut store = store_with(&["A"]);
    let err = store.update_attributes(&"X".into(), Attributes::new()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn select_validates_and_none_always_works() {
    let mut store = store_with(&["A"]);
    assert!(store.select(Some("X".into())).unwrap_err().is_not_found());
    assert_eq!(store.snapshot().selected, None);

    store.select(Some("A".into())).unwrap();
    assert_eq!(store.snapshot().selected_element().map(|e| e.id.as_str()), Some("A"));

    let doc = store.select(None).unwrap();
    assert_eq!(doc.selected, None);
}

// =========================================================================
// Snapshots and loading
// =========================================================================

#[test]
fn snapshots_are_not_affected_by_later_mutations() {
    let mut store = store_with(&["A", "B"]);
    let old = store.snapshot();

    store.insert(0, text_field("C")).unwrap();
    let mut attrs = Attributes::new();
    attrs.insert("label".into(), json!("Changed"));
    store.update_attributes(&"A".into(), attrs).unwrap();

    assert_eq!(order(&old), ["A", "B"], "Old snapshot keeps its sequence");
    assert_eq!(
        old.elements[0].str_attribute("label"),
        Some("Text field"),
        "Old snapshot keeps its attributes"
    );
}

#[test]
fn with_elements_rejects_duplicates() {
    let err = DesignStore::with_elements(vec![text_field("A"), text_field("A")]).unwrap_err();
    assert!(matches!(err, DesignerError::DuplicateId(_)));
}

#[test]
fn replace_elements_clears_selection() {
    let mut store = store_with(&["A"]);
    store.select(Some("A".into())).unwrap();
    let doc = store.replace_elements(vec![text_field("A"), text_field("B")]).unwrap();
    assert_eq!(doc.selected, None);
    assert_eq!(order(&doc), ["A", "B"]);
}

// =========================================================================
// Invariants under arbitrary operation sequences
// =========================================================================

/// Small deterministic generator so the sequence is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn invariants_hold_across_random_operation_sequences() {
    let ids = ["A", "B", "C", "D", "E", "F"];

    for seed in 0..50 {
        let mut rng = Lcg(seed);
        let mut store = DesignStore::new();

        for _ in 0..200 {
            let id: ElementId = ids[rng.next(ids.len())].into();
            let index = rng.next(8);
            let _ = match rng.next(5) {
                0 => store.insert(index, text_field(id.as_str())),
                1 => store.remove(&id),
                2 => store.move_element(&id, index),
                3 => store.select(Some(id)),
                _ => store.select(None),
            };

            let doc = store.snapshot();
            assert!(doc.is_consistent(), "seed {}: inconsistent document {:?}", seed, doc);
        }
    }
}

// =========================================================================
// Shared wrapper
// =========================================================================

#[test]
fn shared_store_serialises_mutations_across_threads() {
    let shared = SharedDesignStore::new(DesignStore::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    let id = format!("t{}-{}", t, i);
                    shared.update(|store| store.insert(usize::MAX, text_field(&id))).unwrap();
                    assert!(shared.snapshot().is_consistent());
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let doc = shared.snapshot();
    assert_eq!(doc.len(), 100);
    assert!(doc.is_consistent());
}

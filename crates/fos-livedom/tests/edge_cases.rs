//! Edge case and stress tests for fos-livedom
//!
//! Boundary conditions, invalid input and failure atomicity.

use std::cell::RefCell;
use std::rc::Rc;

use fos_livedom::{
    Config, Document, DomErrorKind, DomTree, LiveCollection, MutationObserver,
    MutationObserverInit, MutationRecord, NodeId, NodeOperations, NodeType, OptionsBefore,
    OptionsCollection,
};

// ============================================================================
// INVALID IDS
// ============================================================================

#[test]
fn test_unknown_ids_are_errors() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");

    let err = tree.append_child(div, NodeId::NONE).unwrap_err();
    assert_eq!(err.kind(), DomErrorKind::InvalidNode);
    assert_eq!(err.operation(), "appendChild");

    let err = tree.remove_child(NodeId::NONE, div).unwrap_err();
    assert_eq!(err.kind(), DomErrorKind::InvalidNode);

    assert!(tree.set_data(NodeId::NONE, "x").is_err());
    assert_eq!(tree.node_value(NodeId::NONE), None);
    assert_eq!(tree.text_content(NodeId::NONE), None);
    assert!(tree.children(NodeId::NONE).is_empty());
}

#[test]
fn test_collection_over_unknown_root_is_empty() {
    let tree = DomTree::new();
    let collection = LiveCollection::descendants(NodeId::NONE);
    assert_eq!(collection.length(&tree), 0);
    assert_eq!(collection.item(&tree, 0), None);
}

// ============================================================================
// FAILURE ATOMICITY
// ============================================================================

#[test]
fn test_failed_insert_keeps_node_in_old_parent() {
    let mut tree = DomTree::new();
    let a = tree.create_element("div");
    let b = tree.create_element("div");
    let child = tree.create_element("span");
    let unrelated = tree.create_element("span");
    tree.append_child(a, child).unwrap();

    let err = tree.insert_before(b, child, Some(unrelated)).unwrap_err();
    assert_eq!(err.kind(), DomErrorKind::NotFound);
    assert_eq!(tree.parent(child), Some(a));
    assert_eq!(tree.children(a), &[child]);
    assert!(tree.children(b).is_empty());
}

#[test]
fn test_failed_insert_emits_no_records() {
    let mut tree = DomTree::new();
    let a = tree.create_element("div");
    let child = tree.create_element("span");
    tree.append_child(a, child).unwrap();

    let records = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&records);
    let mut observer = MutationObserver::new(move |_records: &[MutationRecord]| {
        *counter.borrow_mut() += 1;
    });
    observer
        .observe(&mut tree, a, MutationObserverInit::child_list())
        .unwrap();

    let err = tree.append_child(child, a).unwrap_err();
    assert_eq!(err.kind(), DomErrorKind::HierarchyRequest);
    assert_eq!(*records.borrow(), 0);
}

#[test]
fn test_nested_guards_restore_outer_state() {
    let mut tree = DomTree::new();
    {
        let mut outer = tree.suppress_insert_validation();
        {
            let inner = outer.suppress_insert_validation();
            assert!(inner.is_insert_validation_suppressed());
        }
        assert!(outer.is_insert_validation_suppressed());
    }
    assert!(!tree.is_insert_validation_suppressed());
}

#[test]
fn test_unsuppressed_insert_still_validates_after_add() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let group = tree.create_element("optgroup");
    let grouped = tree.create_element("option");
    tree.append_child(select, group).unwrap();
    tree.append_child(group, grouped).unwrap();
    let options = OptionsCollection::new(&tree, select).unwrap();

    let first = tree.create_element("option");
    options.add(&mut tree, first, Some(grouped.into())).unwrap();

    let second = tree.create_element("option");
    let err = tree.insert_before(select, second, Some(grouped)).unwrap_err();
    assert_eq!(err.kind(), DomErrorKind::NotFound);
}

// ============================================================================
// OPTIONS COLLECTION BOUNDARIES
// ============================================================================

#[test]
fn test_add_on_empty_collection() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let options = OptionsCollection::new(&tree, select).unwrap();

    let opt = tree.create_element("option");
    options.add(&mut tree, opt, Some(OptionsBefore::Index(0))).unwrap();
    assert_eq!(options.length(&tree), 1);
    assert_eq!(options.item(&tree, 0), Some(opt));
}

#[test]
fn test_add_moves_existing_option() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let a = tree.create_element("option");
    let b = tree.create_element("option");
    tree.append_child(select, a).unwrap();
    tree.append_child(select, b).unwrap();
    let options = OptionsCollection::new(&tree, select).unwrap();

    options.add(&mut tree, b, Some(OptionsBefore::Index(0))).unwrap();
    assert_eq!(options.as_collection().to_vec(&tree), vec![b, a]);
    assert_eq!(options.length(&tree), 2);
}

#[test]
fn test_add_select_into_itself_fails() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let options = OptionsCollection::new(&tree, select).unwrap();

    let err = options.add(&mut tree, select, None).unwrap_err();
    assert_eq!(err.kind(), DomErrorKind::HierarchyRequest);
    assert!(!tree.is_insert_validation_suppressed());
}

#[test]
fn test_remove_extreme_indices() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let opt = tree.create_element("option");
    tree.append_child(select, opt).unwrap();
    let options = OptionsCollection::new(&tree, select).unwrap();

    options.remove(&mut tree, i32::MIN).unwrap();
    options.remove(&mut tree, i32::MAX).unwrap();
    assert_eq!(options.length(&tree), 1);
}

#[test]
fn test_remove_option_inside_optgroup() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let group = tree.create_element("optgroup");
    let grouped = tree.create_element("option");
    tree.append_child(select, group).unwrap();
    tree.append_child(group, grouped).unwrap();
    let options = OptionsCollection::new(&tree, select).unwrap();

    options.remove(&mut tree, 0).unwrap();
    assert_eq!(options.length(&tree), 0);
    assert_eq!(tree.children(select), &[group]);
}

#[test]
fn test_selected_index_out_of_range_values() {
    let mut tree = DomTree::new();
    let select = tree.create_element("select");
    let opt = tree.create_element("option");
    tree.append_child(select, opt).unwrap();
    let options = OptionsCollection::new(&tree, select).unwrap();

    options.set_selected_index(&mut tree, 0).unwrap();
    options.set_selected_index(&mut tree, -5).unwrap();
    assert_eq!(options.selected_index(&tree).unwrap(), -1);
}

// ============================================================================
// CHARACTER DATA
// ============================================================================

#[test]
fn test_empty_and_unicode_data() {
    let mut tree = DomTree::new();
    let comment = tree.create_comment("");
    assert_eq!(tree.node_to_string(comment).unwrap(), "<!---->");
    assert_eq!(tree.length(comment).unwrap(), 0);

    tree.set_data(comment, "世界 🚀").unwrap();
    assert_eq!(tree.node_to_string(comment).unwrap(), "<!--世界 🚀-->");
    assert_eq!(tree.length(comment).unwrap(), 5);
}

#[test]
fn test_setting_same_value_still_notifies() {
    let mut tree = DomTree::new();
    let text = tree.create_text("same");
    let count = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&count);
    let mut observer = MutationObserver::new(move |_records: &[MutationRecord]| {
        *counter.borrow_mut() += 1;
    });
    observer
        .observe(&mut tree, text, MutationObserverInit::character_data_with_old_value())
        .unwrap();

    tree.set_data(text, "same").unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_very_long_data() {
    let mut tree = DomTree::new();
    let text = tree.create_text("");
    let long = "a".repeat(100_000);
    tree.set_data(text, long.clone()).unwrap();
    assert_eq!(tree.data(text).unwrap().len(), 100_000);
    assert_eq!(tree.text_content(text).unwrap(), long);
}

#[test]
fn test_node_types() {
    let mut tree = DomTree::new();
    let comment = tree.create_comment("c");
    let text = tree.create_text("t");
    assert_eq!(tree.node_type(comment).map(NodeType::to_u32), Some(8));
    assert_eq!(tree.node_type(text).map(NodeType::to_u32), Some(3));
    assert_eq!(tree.node_type(tree.root()).map(NodeType::to_u32), Some(9));
}

// ============================================================================
// STRESS
// ============================================================================

#[test]
fn test_many_options() {
    let mut tree = DomTree::with_config(Config {
        node_capacity: 2048,
        ..Config::default()
    });
    let select = tree.create_element("select");
    let options = OptionsCollection::new(&tree, select).unwrap();

    for _ in 0..1000 {
        let opt = tree.create_element("option");
        options.add(&mut tree, opt, Some(OptionsBefore::Index(0))).unwrap();
    }
    assert_eq!(options.length(&tree), 1000);

    for _ in 0..500 {
        options.remove(&mut tree, 0).unwrap();
    }
    assert_eq!(options.length(&tree), 500);
}

#[test]
fn test_document_collections_across_depth() {
    let mut doc = Document::new("about:blank").unwrap();
    let mut parent = doc.body().unwrap();
    for _ in 0..100 {
        let div = doc.tree_mut().create_element("div");
        doc.tree_mut().append_child(parent, div).unwrap();
        parent = div;
    }
    let divs = doc.get_elements_by_tag_name("div");
    assert_eq!(divs.length(doc.tree()), 100);
    assert_eq!(doc.get_elements_by_tag_name("*").length(doc.tree()), 103);
}

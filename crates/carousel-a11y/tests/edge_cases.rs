//! Edge case tests for carousel-a11y
//!
//! Tests visibility corners, walker behaviour under mutation and long
//! mount/restore sequences.

use carousel_a11y::{
    AttributeStore, FocusOptions, FocusableTreeWalker, IntlCache, LOCALES, for_each_focusable,
    is_element_visible,
};
use carousel_dom::{Document, Dom, DisplayValue, NodeId, Style, StyleRule};
use std::rc::Rc;

fn walk(doc: &Document, root: NodeId, options: FocusOptions) -> Vec<NodeId> {
    FocusableTreeWalker::new(root, options, None).iter(doc).collect()
}

// ============================================================================
// VISIBILITY
// ============================================================================

#[test]
fn test_details_gates_walk_until_open() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let details = doc.append_element(body, "details", &[]).unwrap();
    let summary = doc.append_element(details, "summary", &[]).unwrap();
    let content = doc.append_element(details, "div", &[]).unwrap();
    let button = doc.append_element(content, "button", &[]).unwrap();

    assert!(is_element_visible(&doc, summary, None));
    assert!(!is_element_visible(&doc, button, None));
    assert_eq!(walk(&doc, body, FocusOptions::new()), vec![summary]);

    doc.set_attribute(details, "open", "");
    assert!(is_element_visible(&doc, button, None));
    assert_eq!(walk(&doc, body, FocusOptions::new()), vec![summary, button]);
}

#[test]
fn test_stylesheet_hides_subtree() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    doc.add_style_rule(StyleRule::parse(".offscreen", Style::new().with_display(DisplayValue::None)).unwrap());
    let hidden = doc.append_element(body, "div", &[("class", "offscreen")]).unwrap();
    doc.append_element(hidden, "button", &[]).unwrap();
    let shown = doc.append_element(body, "button", &[]).unwrap();

    assert_eq!(walk(&doc, body, FocusOptions::new()), vec![shown]);
}

#[test]
fn test_hidden_ancestor_wins_over_child_visibility() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let parent = doc.append_element(body, "div", &[("style", "visibility: hidden")]).unwrap();
    let child = doc
        .append_element(parent, "button", &[("style", "visibility: visible")])
        .unwrap();

    // The ancestor's own inline style still hides it
    assert!(!is_element_visible(&doc, child, None));
}

#[test]
fn test_detached_subtree_is_vacuously_visible() {
    let mut doc = Document::new();
    let orphan = doc.create_element("div");
    let button = doc.create_element("button");
    doc.append_child(orphan, button).unwrap();

    assert!(is_element_visible(&doc, button, None));
    assert_eq!(walk(&doc, orphan, FocusOptions::new()), vec![button]);
}

#[test]
fn test_comment_and_text_never_visible() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let comment = doc.create_comment("x");
    let text = doc.create_text("y");
    doc.append_child(body, comment).unwrap();
    doc.append_child(body, text).unwrap();

    assert!(!is_element_visible(&doc, comment, None));
    assert!(!is_element_visible(&doc, text, None));
    assert!(walk(&doc, body, FocusOptions::new()).is_empty());
}

// ============================================================================
// WALKER
// ============================================================================

#[test]
fn test_empty_root() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let empty = doc.append_element(body, "div", &[]).unwrap();

    assert!(walk(&doc, empty, FocusOptions::new()).is_empty());
    assert!(walk(&doc, empty, FocusOptions::new().from_node(empty).wrap(true)).is_empty());
}

#[test]
fn test_root_itself_is_never_yielded() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let button = doc.append_element(body, "button", &[]).unwrap();

    assert!(walk(&doc, button, FocusOptions::new()).is_empty());
}

#[test]
fn test_empty_scope_yields_nothing() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    doc.append_element(body, "button", &[]).unwrap();

    let found: Vec<_> = FocusableTreeWalker::new(body, FocusOptions::new(), Some(Vec::new()))
        .iter(&doc)
        .collect();
    assert!(found.is_empty());
}

#[test]
fn test_walk_continues_after_subtree_removal() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let a = doc.append_element(body, "button", &[]).unwrap();
    let gone = doc.append_element(body, "div", &[]).unwrap();
    doc.append_element(gone, "button", &[]).unwrap();
    let c = doc.append_element(body, "button", &[]).unwrap();

    let mut walker = FocusableTreeWalker::new(body, FocusOptions::new(), None);
    assert_eq!(walker.next_node(&doc), Some(a));
    doc.remove_child(body, gone).unwrap();
    assert_eq!(walker.next_node(&doc), Some(c));
    assert_eq!(walker.next_node(&doc), None);
    assert_eq!(walker.next_node(&doc), None);
}

#[test]
fn test_tabbable_skips_disabled_tabindex() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    doc.append_element(body, "div", &[("tabindex", "0"), ("disabled", "")]).unwrap();
    doc.append_element(body, "button", &[("hidden", "")]).unwrap();
    let ok = doc.append_element(body, "div", &[("tabindex", "2")]).unwrap();

    assert_eq!(walk(&doc, body, FocusOptions::tabbable()), vec![ok]);
}

// ============================================================================
// ATTRIBUTE STORE
// ============================================================================

#[test]
fn test_long_mount_sequence_unmounts_to_original() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let node = doc.append_element(body, "div", &[("tabindex", "0")]).unwrap();
    let store = AttributeStore::new();

    for value in ["-1", "5", "-1"] {
        store.mount(&mut doc, node, "tabindex", Some(value));
        store.restore(&mut doc, node, "tabindex");
        store.mount(&mut doc, node, "tabindex", Some(value));
    }
    store.mount(&mut doc, node, "aria-hidden", Some("true"));

    store.unmount(&mut doc, node, "tabindex");
    store.unmount(&mut doc, node, "aria-hidden");
    assert_eq!(doc.get_attribute(node, "tabindex"), Some("0"));
    assert_eq!(doc.get_attribute(node, "aria-hidden"), None);
    assert_eq!(doc.element(node).unwrap().attrs.length(), 1);
}

#[test]
fn test_store_on_focus_walk_with_mutation() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let slide = doc.append_element(body, "div", &[]).unwrap();
    let buttons: Vec<_> = (0..3)
        .map(|_| doc.append_element(slide, "button", &[]).unwrap())
        .collect();
    let store = AttributeStore::new();

    for_each_focusable(&mut doc, slide, FocusOptions::new(), |dom, node| {
        store.mount(dom, node, "tabindex", Some("-1"));
    });
    assert!(buttons.iter().all(|&b| doc.get_attribute(b, "tabindex") == Some("-1")));

    // Out of the tab order but still focusable
    assert_eq!(walk(&doc, slide, FocusOptions::new()), buttons);
    assert!(walk(&doc, slide, FocusOptions::tabbable()).is_empty());

    store.unmount_subtree(&mut doc, slide, "tabindex");
    assert_eq!(walk(&doc, slide, FocusOptions::tabbable()), buttons);
}

// ============================================================================
// LOCALIZATION
// ============================================================================

#[test]
fn test_every_bundled_locale_formats_labels() {
    let cache = Rc::new(IntlCache::new());
    for locale in LOCALES {
        let intl = cache.get(locale);
        let label = intl.format_with("slide.label", &[("i", 4), ("n", 12)]).unwrap();
        assert!(label.contains('4') && label.contains("12"), "{locale}: {label}");
        assert!(!intl.format("roledescription").unwrap().is_empty());
    }
}

#[test]
fn test_broken_dictionary_reports_parse_error() {
    let cache = Rc::new(IntlCache::from_json([("en-US".to_string(), "{".to_string())]));
    let err = cache.get("en-US").format("roledescription").unwrap_err();
    assert!(err.to_string().contains("en-US"));
}

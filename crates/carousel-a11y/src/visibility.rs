//! Element Visibility
//!
//! Whether an element can be perceived, and therefore focused: it and every
//! ancestor element must be neither styled away, `hidden`, nor inside a
//! collapsed `<details>`.

use carousel_dom::{Dom, NodeId, NodeType};

/// Style check: inline declarations first, computed style only when the
/// inline style does not already hide the element.
pub fn is_style_visible<D: Dom + ?Sized>(dom: &D, element: NodeId) -> bool {
    if !dom.is_element(element) {
        return false;
    }
    if dom.inline_style(element).hides() {
        return false;
    }
    !dom.computed_style(element).hides()
}

/// Attribute check. `child` is the element on whose behalf `element` is
/// evaluated; a closed `<details>` only hides children other than its
/// `<summary>`.
pub fn is_attribute_visible<D: Dom + ?Sized>(
    dom: &D,
    element: NodeId,
    child: Option<NodeId>,
) -> bool {
    if dom.has_attribute(element, "hidden") {
        return false;
    }

    let collapsed_details = dom.tag_name(element) == Some("details")
        && child.is_some_and(|c| dom.tag_name(c) != Some("summary"));

    !collapsed_details || dom.has_attribute(element, "open")
}

/// Whether `element` and all of its ancestor elements are visible.
///
/// The walk stops at the first node without a parent element (the document
/// root or the top of a detached subtree), which counts as visible.
pub fn is_element_visible<D: Dom + ?Sized>(
    dom: &D,
    element: NodeId,
    child: Option<NodeId>,
) -> bool {
    if dom.node_type(element) == Some(NodeType::Comment) {
        return false;
    }

    let mut node = element;
    let mut child = child;
    loop {
        if !is_style_visible(dom, node) || !is_attribute_visible(dom, node, child) {
            return false;
        }
        match dom.parent_element(node) {
            Some(parent) => {
                child = Some(node);
                node = parent;
            }
            None => return true,
        }
    }
}

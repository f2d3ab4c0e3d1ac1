//! Focus Traversal
//!
//! A filtered tree walker over focusable or tabbable elements.
//!
//! The walker keeps only node ids; the document is handed to every
//! [`FocusableTreeWalker::next_node`] call, so callers may mutate the tree
//! between steps and the walk continues from the live structure.

use std::fmt;

use carousel_dom::{Dom, NodeId};

use crate::visibility::is_element_visible;

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Yield the node
    Accept,
    /// Skip the node and its whole subtree
    Reject,
    /// Skip the node but visit its children
    Skip,
}

/// One `tag[attr]:not(...)` entry of the focusable element list
struct FocusRule {
    tag: Option<&'static str>,
    has: Option<&'static str>,
    without: &'static [&'static str],
    not_equal: Option<(&'static str, &'static str)>,
}

impl FocusRule {
    const fn tag(tag: &'static str) -> Self {
        Self { tag: Some(tag), has: None, without: &[], not_equal: None }
    }

    const fn enabled(tag: &'static str) -> Self {
        Self { tag: Some(tag), has: None, without: &["disabled"], not_equal: None }
    }

    const fn with_attr(tag: Option<&'static str>, attr: &'static str) -> Self {
        Self { tag, has: Some(attr), without: &[], not_equal: None }
    }

    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId, tag: &str) -> bool {
        if self.tag.is_some_and(|t| t != tag) {
            return false;
        }
        if self.has.is_some_and(|a| !dom.has_attribute(node, a)) {
            return false;
        }
        if self.without.iter().any(|a| dom.has_attribute(node, a)) {
            return false;
        }
        match self.not_equal {
            Some((attr, value)) => dom
                .get_attribute(node, attr)
                .is_none_or(|v| !v.eq_ignore_ascii_case(value)),
            None => true,
        }
    }
}

/// Elements that take focus by their nature
const FOCUSABLE_ELEMENTS: &[FocusRule] = &[
    FocusRule {
        tag: Some("input"),
        has: None,
        without: &["disabled"],
        not_equal: Some(("type", "hidden")),
    },
    FocusRule::enabled("select"),
    FocusRule::enabled("textarea"),
    FocusRule::enabled("button"),
    FocusRule::with_attr(Some("a"), "href"),
    FocusRule::with_attr(Some("area"), "href"),
    FocusRule::tag("summary"),
    FocusRule::tag("iframe"),
    FocusRule::tag("object"),
    FocusRule::tag("embed"),
    FocusRule::with_attr(Some("audio"), "controls"),
    FocusRule::with_attr(Some("video"), "controls"),
    FocusRule::with_attr(None, "contenteditable"),
];

/// Which selector the walker matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorSet {
    /// Anything focusable, including `tabindex="-1"`
    #[default]
    Focusable,
    /// Reachable by sequential keyboard navigation
    Tabbable,
}

impl SelectorSet {
    /// Whether `node` matches this selector set
    pub fn matches<D: Dom + ?Sized>(self, dom: &D, node: NodeId) -> bool {
        let Some(tag) = dom.tag_name(node) else {
            return false;
        };

        let hidden = dom.has_attribute(node, "hidden");
        let disabled = dom.has_attribute(node, "disabled");
        let tabindex = dom.get_attribute(node, "tabindex");
        let negative_tabindex = tabindex == Some("-1");
        let native = FOCUSABLE_ELEMENTS.iter().any(|r| r.matches(dom, node, tag));

        match self {
            Self::Focusable => !hidden && (native || (tabindex.is_some() && !disabled)),
            Self::Tabbable => {
                (native && !hidden && !negative_tabindex)
                    || (tabindex.is_some() && !negative_tabindex && !disabled)
            }
        }
    }
}

/// Walker options
#[derive(Default)]
pub struct FocusOptions {
    /// Start after this node; its whole subtree is never yielded
    pub from: Option<NodeId>,
    /// Only tabbable elements instead of all focusable ones
    pub tabbable: bool,
    /// With `from` set, continue from the start of the root after the end
    /// and stop on reaching `from` again
    pub wrap: bool,
    /// Extra acceptance predicate
    pub accept: Option<Box<dyn Fn(NodeId) -> bool>>,
}

impl FocusOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabbable() -> Self {
        Self { tabbable: true, ..Self::default() }
    }

    pub fn from_node(mut self, node: NodeId) -> Self {
        self.from = Some(node);
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn accept(mut self, predicate: impl Fn(NodeId) -> bool + 'static) -> Self {
        self.accept = Some(Box::new(predicate));
        self
    }

    fn selector(&self) -> SelectorSet {
        if self.tabbable {
            SelectorSet::Tabbable
        } else {
            SelectorSet::Focusable
        }
    }
}

impl fmt::Debug for FocusOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusOptions")
            .field("from", &self.from)
            .field("tabbable", &self.tabbable)
            .field("wrap", &self.wrap)
            .field("accept", &self.accept.is_some())
            .finish()
    }
}

/// Whether `element` lies inside any of the `scope` elements
pub fn is_element_in_scope<D: Dom + ?Sized>(dom: &D, element: NodeId, scope: &[NodeId]) -> bool {
    scope.iter().any(|&root| dom.contains(root, element))
}

/// Pre-order walker over the focusable descendants of a root
#[derive(Debug)]
pub struct FocusableTreeWalker {
    root: NodeId,
    current: NodeId,
    options: FocusOptions,
    scope: Option<Vec<NodeId>>,
    wrapped: bool,
}

impl FocusableTreeWalker {
    /// Create a walker under `root`. With `options.from` set, the cursor
    /// starts on that node.
    pub fn new(root: NodeId, options: FocusOptions, scope: Option<Vec<NodeId>>) -> Self {
        Self {
            root,
            current: options.from.unwrap_or(root),
            options,
            scope,
            wrapped: false,
        }
    }

    fn filter<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> FilterResult {
        if !dom.is_element(node) {
            return FilterResult::Skip;
        }
        if self.options.from.is_some_and(|from| dom.contains(from, node)) {
            return FilterResult::Reject;
        }

        let accepted = self.options.selector().matches(dom, node)
            && is_element_visible(dom, node, None)
            && self
                .scope
                .as_deref()
                .is_none_or(|scope| is_element_in_scope(dom, node, scope))
            && self.options.accept.as_ref().is_none_or(|accept| accept(node));

        if accepted {
            FilterResult::Accept
        } else {
            FilterResult::Skip
        }
    }

    /// Advance to the next qualifying node in document order
    pub fn next_node<D: Dom + ?Sized>(&mut self, dom: &D) -> Option<NodeId> {
        let mut node = self.current;
        let mut result = FilterResult::Accept;

        loop {
            // Descend while the subtree is not rejected
            while result != FilterResult::Reject {
                let Some(child) = dom.first_child(node) else {
                    break;
                };
                node = child;
                if self.reached_start(node) {
                    return None;
                }
                result = self.filter(dom, node);
                if result == FilterResult::Accept {
                    self.current = node;
                    return Some(node);
                }
            }

            // Climb to the next following sibling, stopping at the root
            let mut temporary = node;
            let mut restarted = false;
            loop {
                if temporary == self.root {
                    if !self.can_wrap() {
                        return None;
                    }
                    self.wrapped = true;
                    restarted = true;
                    break;
                }
                if let Some(sibling) = dom.next_sibling(temporary) {
                    node = sibling;
                    break;
                }
                temporary = dom.parent(temporary)?;
            }

            if restarted {
                node = self.root;
                result = FilterResult::Skip;
                continue;
            }

            if self.reached_start(node) {
                return None;
            }
            result = self.filter(dom, node);
            if result == FilterResult::Accept {
                self.current = node;
                return Some(node);
            }
        }
    }

    fn can_wrap(&self) -> bool {
        self.options.wrap && self.options.from.is_some() && !self.wrapped
    }

    /// After wrapping, coming back to `from` ends the walk
    fn reached_start(&self, node: NodeId) -> bool {
        self.wrapped && self.options.from == Some(node)
    }

    /// Borrowing iterator over the remaining nodes
    pub fn iter<'a, D: Dom + ?Sized>(&'a mut self, dom: &'a D) -> FocusableIter<'a, D> {
        FocusableIter { walker: self, dom }
    }
}

/// Iterator adapter returned by [`FocusableTreeWalker::iter`]
pub struct FocusableIter<'a, D: ?Sized> {
    walker: &'a mut FocusableTreeWalker,
    dom: &'a D,
}

impl<D: Dom + ?Sized> Iterator for FocusableIter<'_, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.walker.next_node(self.dom)
    }
}

/// Run `f` for every focusable descendant of `root`, handing it the document
/// mutably between walker steps.
pub fn for_each_focusable<D, F>(dom: &mut D, root: NodeId, options: FocusOptions, mut f: F)
where
    D: Dom + ?Sized,
    F: FnMut(&mut D, NodeId),
{
    let mut walker = FocusableTreeWalker::new(root, options, None);
    while let Some(node) = walker.next_node(&*dom) {
        f(dom, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_dom::Document;

    fn collect(doc: &Document, root: NodeId, options: FocusOptions) -> Vec<NodeId> {
        FocusableTreeWalker::new(root, options, None).iter(doc).collect()
    }

    #[test]
    fn test_selector_sets() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let button = doc.append_element(body, "button", &[]).unwrap();
        let disabled = doc.append_element(body, "button", &[("disabled", "")]).unwrap();
        let hidden_input = doc.append_element(body, "input", &[("type", "HIDDEN")]).unwrap();
        let anchor = doc.append_element(body, "a", &[]).unwrap();
        let link = doc.append_element(body, "a", &[("href", "/")]).unwrap();
        let span = doc.append_element(body, "span", &[("tabindex", "-1")]).unwrap();
        let div = doc.append_element(body, "div", &[("tabindex", "0")]).unwrap();
        let editable = doc.append_element(body, "p", &[("contenteditable", "")]).unwrap();

        let focusable = SelectorSet::Focusable;
        let tabbable = SelectorSet::Tabbable;
        assert!(focusable.matches(&doc, button));
        assert!(!focusable.matches(&doc, disabled));
        assert!(!focusable.matches(&doc, hidden_input));
        assert!(!focusable.matches(&doc, anchor));
        assert!(focusable.matches(&doc, link));
        assert!(focusable.matches(&doc, span));
        assert!(!tabbable.matches(&doc, span));
        assert!(tabbable.matches(&doc, div));
        assert!(tabbable.matches(&doc, editable));
    }

    #[test]
    fn test_negative_tabindex_on_native_control() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let button = doc.append_element(body, "button", &[("tabindex", "-1")]).unwrap();
        assert!(SelectorSet::Focusable.matches(&doc, button));
        assert!(!SelectorSet::Tabbable.matches(&doc, button));
    }

    #[test]
    fn test_walk_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let first = doc.append_element(body, "button", &[]).unwrap();
        let section = doc.append_element(body, "section", &[]).unwrap();
        let nested = doc.append_element(section, "a", &[("href", "#")]).unwrap();
        let last = doc.append_element(body, "textarea", &[]).unwrap();

        assert_eq!(collect(&doc, body, FocusOptions::new()), vec![first, nested, last]);
    }

    #[test]
    fn test_walk_skips_invisible() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let shown = doc.append_element(body, "button", &[]).unwrap();
        let hidden_box = doc.append_element(body, "div", &[("style", "display:none")]).unwrap();
        doc.append_element(hidden_box, "button", &[]).unwrap();

        assert_eq!(collect(&doc, body, FocusOptions::new()), vec![shown]);
    }

    #[test]
    fn test_walk_does_not_escape_root() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let container = doc.append_element(body, "div", &[]).unwrap();
        let inside = doc.append_element(container, "button", &[]).unwrap();
        doc.append_element(body, "button", &[]).unwrap();

        assert_eq!(collect(&doc, container, FocusOptions::new()), vec![inside]);
    }

    #[test]
    fn test_from_rejects_subtree() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let before = doc.append_element(body, "button", &[]).unwrap();
        let slide = doc.append_element(body, "div", &[("tabindex", "0")]).unwrap();
        doc.append_element(slide, "button", &[]).unwrap();
        let after = doc.append_element(body, "button", &[]).unwrap();

        let found = collect(&doc, body, FocusOptions::new().from_node(slide));
        assert_eq!(found, vec![after]);
        assert!(!found.contains(&before));
    }

    #[test]
    fn test_wrap_returns_to_start() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let before = doc.append_element(body, "button", &[]).unwrap();
        let slide = doc.append_element(body, "div", &[("tabindex", "0")]).unwrap();
        doc.append_element(slide, "button", &[]).unwrap();
        let after = doc.append_element(body, "button", &[]).unwrap();

        let options = FocusOptions::tabbable().from_node(slide).wrap(true);
        assert_eq!(collect(&doc, body, options), vec![after, before]);

        // Without `from` there is nothing to wrap around
        let plain = collect(&doc, body, FocusOptions::tabbable().wrap(true));
        assert_eq!(plain.len(), 4);
    }

    #[test]
    fn test_scope_and_accept() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let left = doc.append_element(body, "div", &[]).unwrap();
        let right = doc.append_element(body, "div", &[]).unwrap();
        let a = doc.append_element(left, "button", &[("id", "a")]).unwrap();
        let b = doc.append_element(right, "button", &[("id", "b")]).unwrap();
        let c = doc.append_element(right, "button", &[("id", "c")]).unwrap();

        let scoped: Vec<_> = FocusableTreeWalker::new(body, FocusOptions::new(), Some(vec![right]))
            .iter(&doc)
            .collect();
        assert_eq!(scoped, vec![b, c]);

        let accepted = collect(&doc, body, FocusOptions::new().accept(move |n| n != b));
        assert_eq!(accepted, vec![a, c]);
    }

    #[test]
    fn test_mutation_between_steps() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let a = doc.append_element(body, "button", &[]).unwrap();
        let b = doc.append_element(body, "button", &[]).unwrap();

        let mut seen = Vec::new();
        for_each_focusable(&mut doc, body, FocusOptions::new(), |dom, node| {
            dom.set_attribute(node, "tabindex", "-1");
            seen.push(node);
        });
        assert_eq!(seen, vec![a, b]);
        assert_eq!(doc.get_attribute(b, "tabindex"), Some("-1"));
    }
}

//! Document - High-level document API

use crate::{
    ComputedStyle, Dom, DomError, DomTree, ElementData, NodeId, NodeType, Style, StyleRule,
    VisibilityValue,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Document-level style rules, in cascade order
    rules: Vec<StyleRule>,
    /// Focused element
    active_element: NodeId,
    /// Whether the window holding the document is focused
    has_focus: bool,
}

impl Document {
    /// Create a new document with `<html><head/><body/></html>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under the document node cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            body_element: body,
            rules: Vec::new(),
            active_element: NodeId::NONE,
            has_focus: true,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty() -> Self {
        Self {
            tree: DomTree::new(),
            html_element: NodeId::NONE,
            body_element: NodeId::NONE,
            rules: Vec::new(),
            active_element: NodeId::NONE,
            has_focus: true,
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(tag_name)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.tree.create_comment(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)
    }

    /// Create an element with attributes and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId, DomError> {
        let id = self.tree.create_element(tag_name);
        if let Some(elem) = self.tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            for (name, value) in attrs {
                elem.set_attr(name, value);
            }
        }
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Remove `child` from `parent`, dropping focus if it was inside
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.remove_child(parent, child)?;
        if self.active_element.is_valid() && self.tree.contains(child, self.active_element) {
            tracing::debug!("Focused node {} removed with {}", self.active_element, child);
            self.active_element = NodeId::NONE;
        }
        Ok(())
    }

    /// Element data of `id`
    pub fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.tree
            .get(id)
            .ok_or(DomError::UnknownNode(id))?
            .as_element()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> crate::Children<'_> {
        self.tree.children(id)
    }

    /// Whether `node` is reachable from the document node
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.contains(self.tree.root(), node)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.element(node).is_ok_and(|e| e.id() == Some(id)))
    }

    /// Append a document style rule
    pub fn add_style_rule(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    /// Set the window focus flag
    pub fn set_has_focus(&mut self, focused: bool) {
        self.has_focus = focused;
    }

    /// Drop element focus
    pub fn blur(&mut self) {
        self.active_element = NodeId::NONE;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for Document {
    fn node_type(&self, node: NodeId) -> Option<NodeType> {
        self.tree.get(node).map(|n| n.node_type())
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(|e| e.tag_name.as_str())
    }

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok()?.get_attr(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.tree.get_mut(node).and_then(|n| n.as_element_mut()) {
            elem.set_attr(name, value);
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(elem) = self.tree.get_mut(node).and_then(|n| n.as_element_mut()) {
            elem.remove_attr(name);
        }
    }

    fn inline_style(&self, node: NodeId) -> Style {
        self.get_attribute(node, "style")
            .map(Style::parse_inline)
            .unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        let Ok(elem) = self.element(node) else {
            return ComputedStyle::default();
        };

        let mut declared = Style::new();
        for rule in &self.rules {
            if rule.selector.matches(elem) {
                declared.cascade(&rule.style);
            }
        }
        declared.cascade(&self.inline_style(node));

        // visibility inherits, display does not
        let visibility = match declared.visibility {
            Some(v) => v,
            None => self
                .parent_element(node)
                .map_or(VisibilityValue::Visible, |p| self.computed_style(p).visibility),
        };

        ComputedStyle {
            display: declared.display.unwrap_or_default(),
            visibility,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.parent.to_option()
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.first_child.to_option()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.next_sibling.to_option()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.contains(ancestor, node)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active_element.to_option()
    }

    fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_element(node) || !self.is_connected(node) {
            return false;
        }
        if self.active_element != node {
            tracing::trace!("Focus {} -> {}", self.active_element, node);
            self.active_element = node;
        }
        true
    }
}

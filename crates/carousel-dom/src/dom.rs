//! DOM access trait
//!
//! The capabilities focus management needs from a document. [`Document`]
//! implements it for the in-memory tree; a browser binding would implement
//! it over live nodes.
//!
//! [`Document`]: crate::Document

use crate::{ComputedStyle, NodeId, Style};

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Document,
}

/// Read/write access to a document tree.
///
/// Attribute mutators are silent no-ops on nodes that are not elements.
pub trait Dom {
    /// Type of `node`, `None` for unknown ids
    fn node_type(&self, node: NodeId) -> Option<NodeType>;

    /// Lowercased tag name of an element
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Declarations from the element's `style` attribute
    fn inline_style(&self, node: NodeId) -> Style;

    /// Resolved style after rules, inline style and inheritance
    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn is_element(&self, node: NodeId) -> bool {
        self.node_type(node) == Some(NodeType::Element)
    }

    /// Parent node if it is an element
    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&p| self.is_element(p))
    }

    /// Inclusive descendant check
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// The focused element, if any
    fn active_element(&self) -> Option<NodeId>;

    /// Whether the document itself has focus
    fn has_focus(&self) -> bool;

    /// Move focus to `node`. Returns whether focus moved.
    fn focus(&mut self, node: NodeId) -> bool;
}

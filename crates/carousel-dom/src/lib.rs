//! Carousel DOM - Document Object Model
//!
//! Arena-backed DOM tree with the small surface the accessibility layer
//! works against: attributes, inline and computed style, and document focus.
//! Consumers program against the [`Dom`] trait so a real browser binding can
//! stand in for [`Document`].

mod attributes;
mod document;
mod dom;
mod element;
mod node;
mod style;
mod tree;

use std::fmt;

pub use attributes::{Attr, NamedNodeMap};
pub use document::Document;
pub use dom::{Dom, NodeType};
pub use element::SimpleSelector;
pub use node::{ElementData, Node, NodeData};
pub use style::{ComputedStyle, DisplayValue, Style, StyleRule, VisibilityValue};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" in the arena links
    pub(crate) const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub(crate) fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child} into {parent}: {reason}")]
    Hierarchy {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

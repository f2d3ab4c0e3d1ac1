//! Attribute Backup Store
//!
//! Reversible attribute mutation. Before an attribute is first changed its
//! original state is written to a shadow `data-aria-backup-<name>` attribute
//! on the same element. Later mounts never touch that backup, so any number
//! of mount/restore cycles still unmount back to the author's markup.

use carousel_dom::{Dom, NodeId};

/// Prefix of the shadow attributes
pub const BACKUP_PREFIX: &str = "data-aria-backup-";

const ABSENT_MARKER: &str = "-";
const VALUE_MARKER: char = '=';

/// Recorded original state of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backup {
    /// The attribute did not exist
    Absent,
    /// The attribute held this value
    Value(String),
}

impl Backup {
    fn encode(&self) -> String {
        match self {
            Self::Absent => ABSENT_MARKER.to_string(),
            Self::Value(v) => format!("{VALUE_MARKER}{v}"),
        }
    }

    fn decode(raw: &str) -> Self {
        if raw == ABSENT_MARKER {
            return Self::Absent;
        }
        // Anything without the marker was written by someone else verbatim
        Self::Value(raw.strip_prefix(VALUE_MARKER).unwrap_or(raw).to_string())
    }
}

impl From<Option<&str>> for Backup {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |v| Self::Value(v.to_string()))
    }
}

/// Mount/restore/unmount over (node, attribute) pairs.
///
/// All operations are no-ops on nodes that are not elements.
#[derive(Debug, Clone, Copy)]
pub struct AttributeStore {
    prefix: &'static str,
}

impl AttributeStore {
    pub const fn new() -> Self {
        Self { prefix: BACKUP_PREFIX }
    }

    /// Store using a custom shadow prefix
    pub const fn with_prefix(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// Name of the shadow attribute for `attr`
    pub fn backup_name(&self, attr: &str) -> String {
        format!("{}{}", self.prefix, attr)
    }

    /// The recorded original state, `None` if `attr` was never mounted
    pub fn backup<D: Dom + ?Sized>(&self, dom: &D, node: NodeId, attr: &str) -> Option<Backup> {
        dom.get_attribute(node, &self.backup_name(attr))
            .map(Backup::decode)
    }

    /// Record the original value of `attr` once, then set `value` if given
    /// and different from the current value.
    pub fn mount<D: Dom + ?Sized>(&self, dom: &mut D, node: NodeId, attr: &str, value: Option<&str>) {
        if !dom.is_element(node) {
            return;
        }

        let key = self.backup_name(attr);
        let current = dom.get_attribute(node, attr).map(str::to_owned);

        if !dom.has_attribute(node, &key) {
            let backup = Backup::from(current.as_deref());
            dom.set_attribute(node, &key, &backup.encode());
        }

        if let Some(value) = value {
            if current.as_deref() != Some(value) {
                dom.set_attribute(node, attr, value);
            }
        }
    }

    /// Put `attr` back to its recorded original. The backup is kept.
    /// Without a backup the attribute was never ours and is left alone.
    pub fn restore<D: Dom + ?Sized>(&self, dom: &mut D, node: NodeId, attr: &str) {
        if !dom.is_element(node) {
            return;
        }

        match self.backup(dom, node, attr) {
            Some(Backup::Value(original)) => dom.set_attribute(node, attr, &original),
            Some(Backup::Absent) => dom.remove_attribute(node, attr),
            None => {}
        }
    }

    /// Restore `attr` and forget the backup
    pub fn unmount<D: Dom + ?Sized>(&self, dom: &mut D, node: NodeId, attr: &str) {
        if !dom.is_element(node) {
            return;
        }

        self.restore(dom, node, attr);
        dom.remove_attribute(node, &self.backup_name(attr));
    }

    /// Unmount `attr` on every descendant of `root` that carries a backup
    /// for it, whatever its current visibility.
    pub fn unmount_subtree<D: Dom + ?Sized>(&self, dom: &mut D, root: NodeId, attr: &str) {
        let key = self.backup_name(attr);
        let mut marked = Vec::new();
        let mut stack: Vec<NodeId> = dom.first_child(root).into_iter().collect();

        while let Some(node) = stack.pop() {
            if dom.has_attribute(node, &key) {
                marked.push(node);
            }
            stack.extend(dom.next_sibling(node));
            stack.extend(dom.first_child(node));
        }

        for node in marked {
            self.unmount(dom, node, attr);
        }
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

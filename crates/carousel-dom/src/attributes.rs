//! Element Attributes
//!
//! Attribute collection: get, set, remove, has. Keeps insertion order so
//! serialized attribute lists are stable.

use std::collections::HashMap;

/// Named node map (attribute collection)
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn length(&self) -> usize {
        self.attributes.len()
    }

    /// Get attribute by index
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attributes.get(index)
    }

    /// Get attribute by name
    pub fn get_named_item(&self, name: &str) -> Option<&Attr> {
        self.by_name.get(name).and_then(|&i| self.attributes.get(i))
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get_named_item(name).map(|a| a.value.as_str())
    }

    /// Set attribute, returning the replaced one
    pub fn set_named_item(&mut self, attr: Attr) -> Option<Attr> {
        match self.by_name.get(&attr.name) {
            Some(&index) => Some(std::mem::replace(&mut self.attributes[index], attr)),
            None => {
                self.by_name.insert(attr.name.clone(), self.attributes.len());
                self.attributes.push(attr);
                None
            }
        }
    }

    /// Set attribute by name/value
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(&index) = self.by_name.get(name) {
            let attr = &mut self.attributes[index];
            if attr.value != value {
                attr.value = value.to_string();
            }
            return;
        }
        self.set_named_item(Attr::new(name, value));
    }

    /// Remove attribute by name
    pub fn remove_named_item(&mut self, name: &str) -> Option<Attr> {
        let index = self.by_name.remove(name)?;
        // Shift indices of everything after the removed slot
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate over attributes
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("role", "tab");
        attrs.set_attribute("tabindex", "0");

        assert_eq!(attrs.length(), 2);
        assert_eq!(attrs.get_attribute("role"), Some("tab"));
        assert_eq!(attrs.get_attribute("tabindex"), Some("0"));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("role", "tab");
        attrs.set_attribute("aria-hidden", "true");
        attrs.set_attribute("role", "tabpanel");

        let names: Vec<_> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["role", "aria-hidden"]);
        assert_eq!(attrs.get_attribute("role"), Some("tabpanel"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("a", "1");
        attrs.set_attribute("b", "2");
        attrs.set_attribute("c", "3");

        assert_eq!(attrs.remove_named_item("a").map(|a| a.value), Some("1".into()));
        assert!(!attrs.has_attribute("a"));
        assert_eq!(attrs.get_attribute("c"), Some("3"));
        assert!(attrs.remove_named_item("a").is_none());
    }
}

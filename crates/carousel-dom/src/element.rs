//! Simple Selectors
//!
//! Tag, class, id and universal selectors used by document style rules.

use crate::ElementData;

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_ascii_lowercase()))
        }
    }

    /// Check if an element matches this selector
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag_name.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.classes().any(|c| c == class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_selector_parse() {
        assert!(matches!(SimpleSelector::parse("div"), Some(SimpleSelector::Tag(_))));
        assert!(matches!(SimpleSelector::parse(".class"), Some(SimpleSelector::Class(_))));
        assert!(matches!(SimpleSelector::parse("#id"), Some(SimpleSelector::Id(_))));
        assert!(matches!(SimpleSelector::parse("*"), Some(SimpleSelector::Universal)));
        assert!(SimpleSelector::parse("  ").is_none());
    }

    #[test]
    fn test_element_matches() {
        let mut elem = ElementData::new("div");
        elem.set_attr("id", "main");
        elem.set_attr("class", "container active");

        assert!(SimpleSelector::Tag("DIV".into()).matches(&elem));
        assert!(SimpleSelector::Id("main".into()).matches(&elem));
        assert!(SimpleSelector::Class("container".into()).matches(&elem));
        assert!(!SimpleSelector::Class("contain".into()).matches(&elem));
        assert!(SimpleSelector::Universal.matches(&elem));
    }
}

//! Style
//!
//! The two properties that decide whether an element can take focus:
//! `display` and `visibility`. Inline declarations come from the `style`
//! attribute; computed values layer document rules, inline style and
//! inheritance.

use crate::SimpleSelector;

/// Simplified CSS display values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayValue {
    #[default]
    Block,
    Inline,
    Flex,
    Grid,
    None,
    Contents,
}

impl DisplayValue {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim().to_ascii_lowercase().as_str() {
            "block" => Self::Block,
            "inline" | "inline-block" => Self::Inline,
            "flex" | "inline-flex" => Self::Flex,
            "grid" | "inline-grid" => Self::Grid,
            "none" => Self::None,
            "contents" => Self::Contents,
            _ => return None,
        })
    }
}

/// CSS visibility values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityValue {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl VisibilityValue {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Self::Visible,
            "hidden" => Self::Hidden,
            "collapse" => Self::Collapse,
            _ => return None,
        })
    }

    /// `hidden` and `collapse` both suppress the box
    #[inline]
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden | Self::Collapse)
    }
}

/// Declared style: only the properties actually set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub display: Option<DisplayValue>,
    pub visibility: Option<VisibilityValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(mut self, display: DisplayValue) -> Self {
        self.display = Some(display);
        self
    }

    pub fn with_visibility(mut self, visibility: VisibilityValue) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Parse a `style` attribute. Unknown properties and values are ignored.
    pub fn parse_inline(text: &str) -> Self {
        let mut style = Self::default();
        for decl in text.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let value = value.trim().trim_end_matches("!important").trim();
            match prop.trim().to_ascii_lowercase().as_str() {
                "display" => {
                    if let Some(display) = DisplayValue::parse(value) {
                        style.display = Some(display);
                    }
                }
                "visibility" => {
                    if let Some(visibility) = VisibilityValue::parse(value) {
                        style.visibility = Some(visibility);
                    }
                }
                _ => {}
            }
        }
        style
    }

    /// Overlay `other` on top of this style
    pub fn cascade(&mut self, other: &Style) {
        if other.display.is_some() {
            self.display = other.display;
        }
        if other.visibility.is_some() {
            self.visibility = other.visibility;
        }
    }

    /// Whether the declared values alone hide the element
    pub fn hides(&self) -> bool {
        self.display == Some(DisplayValue::None)
            || self.visibility.is_some_and(VisibilityValue::is_hidden)
    }
}

/// Resolved style of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedStyle {
    pub display: DisplayValue,
    pub visibility: VisibilityValue,
}

impl ComputedStyle {
    /// Whether the resolved values hide the element
    pub fn hides(&self) -> bool {
        self.display == DisplayValue::None || self.visibility.is_hidden()
    }
}

/// A document style rule: simple selector plus declarations
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub selector: SimpleSelector,
    pub style: Style,
}

impl StyleRule {
    pub fn new(selector: SimpleSelector, style: Style) -> Self {
        Self { selector, style }
    }

    /// Build from a selector string, `None` if it does not parse
    pub fn parse(selector: &str, style: Style) -> Option<Self> {
        SimpleSelector::parse(selector).map(|selector| Self { selector, style })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline() {
        let style = Style::parse_inline("color: red; display:none ; visibility: collapse");
        assert_eq!(style.display, Some(DisplayValue::None));
        assert_eq!(style.visibility, Some(VisibilityValue::Collapse));
        assert!(style.hides());
    }

    #[test]
    fn test_parse_inline_ignores_garbage() {
        let style = Style::parse_inline("display; visibility: sideways; display: flex !important");
        assert_eq!(style.display, Some(DisplayValue::Flex));
        assert_eq!(style.visibility, None);
        assert!(!style.hides());
    }

    #[test]
    fn test_cascade() {
        let mut base = Style::new().with_display(DisplayValue::None);
        base.cascade(&Style::new().with_visibility(VisibilityValue::Visible));
        assert_eq!(base.display, Some(DisplayValue::None));

        base.cascade(&Style::new().with_display(DisplayValue::Block));
        assert!(!base.hides());
    }
}

//! Carousel Accessibility
//!
//! Accessibility building blocks for the carousel ARIA plugin.
//!
//! Features:
//! - ARIA roles, live-region modes and the attributes the plugin manages
//! - Element visibility (inline style, computed style, `hidden`, `<details>`)
//! - Focusable / tabbable tree walking with subtree, scope and custom filters
//! - Reversible attribute mutation backed by shadow `data-` attributes
//! - Localized labels from bundled JSON dictionaries

pub mod aria;
pub mod attr_store;
pub mod focus;
pub mod intl;
pub mod visibility;

pub use aria::{AriaAttr, AriaRole, LiveRegionMode, Orientation};
pub use attr_store::{AttributeStore, Backup, BACKUP_PREFIX};
pub use focus::{
    FilterResult, FocusOptions, FocusableIter, FocusableTreeWalker, SelectorSet,
    for_each_focusable, is_element_in_scope,
};
pub use intl::{Intl, IntlCache, IntlError, LOCALES};
pub use visibility::{is_attribute_visible, is_element_visible, is_style_visible};

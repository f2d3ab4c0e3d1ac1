//! ARIA Support
//!
//! The slice of the ARIA vocabulary a tabbed carousel speaks: roles, live
//! region politeness, orientation and the attribute names the plugin owns.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Tab,
    TabList,
}

impl AriaRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::TabList => "tablist",
        }
    }
}

/// Live region mode, as written to `aria-live`.
///
/// `Disabled` renders as the literal `false` the plugin has always emitted
/// when live announcements are switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveRegionMode {
    #[default]
    Disabled,
    Off,
    Polite,
    Assertive,
}

impl LiveRegionMode {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "false" => Self::Disabled,
            "off" => Self::Off,
            "polite" => Self::Polite,
            "assertive" => Self::Assertive,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "false",
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

impl fmt::Display for LiveRegionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LiveRegionMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for LiveRegionMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Mode(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Self::Disabled),
            Raw::Flag(true) => Ok(Self::Polite),
            Raw::Mode(mode) => Self::parse(&mode).ok_or_else(|| {
                serde::de::Error::unknown_variant(&mode, &["false", "off", "polite", "assertive"])
            }),
        }
    }
}

/// `aria-orientation` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Attributes the carousel plugin mounts and later restores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaAttr {
    Role,
    TabIndex,
    Label,
    Live,
    Orientation,
    RoleDescription,
    Multiselectable,
    Hidden,
    Selected,
}

impl AriaAttr {
    /// Attributes mounted on the carousel root
    pub const ROOT: [AriaAttr; 5] = [
        Self::Role,
        Self::Live,
        Self::Orientation,
        Self::RoleDescription,
        Self::Multiselectable,
    ];

    /// Attributes mounted on each slide
    pub const SLIDE: [AriaAttr; 6] = [
        Self::Role,
        Self::TabIndex,
        Self::Label,
        Self::RoleDescription,
        Self::Hidden,
        Self::Selected,
    ];

    /// HTML attribute name
    pub fn name(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::TabIndex => "tabindex",
            Self::Label => "aria-label",
            Self::Live => "aria-live",
            Self::Orientation => "aria-orientation",
            Self::RoleDescription => "aria-roledescription",
            Self::Multiselectable => "aria-multiselectable",
            Self::Hidden => "aria-hidden",
            Self::Selected => "aria-selected",
        }
    }
}

impl AsRef<str> for AriaAttr {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

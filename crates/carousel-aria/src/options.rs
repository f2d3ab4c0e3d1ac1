//! Plugin Options
//!
//! Options resolve once at init, from lowest to highest priority:
//! defaults, global overrides, user options, then every breakpoint whose
//! media query matches (in key order).

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use carousel_a11y::LiveRegionMode;
use carousel_dom::NodeId;
use serde::Deserialize;
use thiserror::Error;

/// Called with (previously focused node, newly focused node)
pub type FocusChangeCallback = Rc<dyn Fn(NodeId, NodeId)>;

/// Options errors
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid plugin options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fully resolved plugin options
#[derive(Clone)]
pub struct AriaOptions {
    /// Whether the plugin initializes at all
    pub active: bool,
    /// Media query → overrides
    pub breakpoints: BTreeMap<String, AriaOptionsPartial>,
    /// Localization locale
    pub locale: String,
    /// Value of `aria-live` on the root
    pub live: LiveRegionMode,
    /// Debounce window for event handlers (ms)
    pub debounce: u64,
    pub on_focus_change: Option<FocusChangeCallback>,
}

impl Default for AriaOptions {
    fn default() -> Self {
        Self {
            active: true,
            breakpoints: BTreeMap::new(),
            locale: "en-US".to_string(),
            live: LiveRegionMode::Disabled,
            debounce: 300,
            on_focus_change: None,
        }
    }
}

impl AriaOptions {
    /// Overwrite every field `partial` sets
    pub fn apply(&mut self, partial: &AriaOptionsPartial) {
        if let Some(active) = partial.active {
            self.active = active;
        }
        if let Some(breakpoints) = &partial.breakpoints {
            merge_breakpoints(&mut self.breakpoints, breakpoints);
        }
        if let Some(locale) = &partial.locale {
            self.locale.clone_from(locale);
        }
        if let Some(live) = partial.live {
            self.live = live;
        }
        if let Some(debounce) = partial.debounce {
            self.debounce = debounce;
        }
        if let Some(callback) = &partial.on_focus_change {
            self.on_focus_change = Some(Rc::clone(callback));
        }
    }
}

impl fmt::Debug for AriaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AriaOptions")
            .field("active", &self.active)
            .field("breakpoints", &self.breakpoints)
            .field("locale", &self.locale)
            .field("live", &self.live)
            .field("debounce", &self.debounce)
            .field("on_focus_change", &self.on_focus_change.is_some())
            .finish()
    }
}

/// Options with every field optional, as supplied by users and
/// configuration files
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AriaOptionsPartial {
    pub active: Option<bool>,
    pub breakpoints: Option<BTreeMap<String, AriaOptionsPartial>>,
    pub locale: Option<String>,
    pub live: Option<LiveRegionMode>,
    pub debounce: Option<u64>,
    #[serde(skip)]
    pub on_focus_change: Option<FocusChangeCallback>,
}

impl AriaOptionsPartial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a JSON object such as `{"locale": "de-DE", "live": "polite"}`
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn live(mut self, live: LiveRegionMode) -> Self {
        self.live = Some(live);
        self
    }

    pub fn debounce(mut self, ms: u64) -> Self {
        self.debounce = Some(ms);
        self
    }

    pub fn breakpoint(mut self, query: impl Into<String>, overrides: AriaOptionsPartial) -> Self {
        self.breakpoints
            .get_or_insert_with(BTreeMap::new)
            .insert(query.into(), overrides);
        self
    }

    pub fn on_focus_change(mut self, callback: impl Fn(NodeId, NodeId) + 'static) -> Self {
        self.on_focus_change = Some(Rc::new(callback));
        self
    }

    /// `self` overridden field by field by `other`
    pub fn merged(&self, other: &AriaOptionsPartial) -> AriaOptionsPartial {
        let breakpoints = match (&self.breakpoints, &other.breakpoints) {
            (Some(base), Some(over)) => {
                let mut merged = base.clone();
                merge_breakpoints(&mut merged, over);
                Some(merged)
            }
            (base, over) => over.clone().or_else(|| base.clone()),
        };

        AriaOptionsPartial {
            active: other.active.or(self.active),
            breakpoints,
            locale: other.locale.clone().or_else(|| self.locale.clone()),
            live: other.live.or(self.live),
            debounce: other.debounce.or(self.debounce),
            on_focus_change: other
                .on_focus_change
                .clone()
                .or_else(|| self.on_focus_change.clone()),
        }
    }
}

impl fmt::Debug for AriaOptionsPartial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AriaOptionsPartial")
            .field("active", &self.active)
            .field("breakpoints", &self.breakpoints)
            .field("locale", &self.locale)
            .field("live", &self.live)
            .field("debounce", &self.debounce)
            .field("on_focus_change", &self.on_focus_change.is_some())
            .finish()
    }
}

fn merge_breakpoints(
    target: &mut BTreeMap<String, AriaOptionsPartial>,
    overrides: &BTreeMap<String, AriaOptionsPartial>,
) {
    for (query, partial) in overrides {
        let merged = match target.get(query) {
            Some(existing) => existing.merged(partial),
            None => partial.clone(),
        };
        target.insert(query.clone(), merged);
    }
}

/// Overrides shared by every plugin instance built with them
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions(AriaOptionsPartial);

impl GlobalOptions {
    pub fn new(options: AriaOptionsPartial) -> Self {
        Self(options)
    }

    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        AriaOptionsPartial::from_json(json).map(Self)
    }

    pub fn options(&self) -> &AriaOptionsPartial {
        &self.0
    }
}

/// Media query evaluation
pub trait MediaMatcher {
    fn matches(&self, query: &str) -> bool;
}

impl<F: Fn(&str) -> bool> MediaMatcher for F {
    fn matches(&self, query: &str) -> bool {
        self(query)
    }
}

/// Matches nothing; breakpoints never apply
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMedia;

impl MediaMatcher for NoMedia {
    fn matches(&self, _query: &str) -> bool {
        false
    }
}

/// Viewport-width media: `(min-width: Npx)`, `(max-width: Npx)` and their
/// `and` conjunctions
#[derive(Debug, Clone, Copy)]
pub struct ViewportMedia {
    pub width: u32,
}

impl ViewportMedia {
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

impl MediaMatcher for ViewportMedia {
    fn matches(&self, query: &str) -> bool {
        let mut matched = false;

        for condition in query.split(" and ") {
            let condition = condition.trim();
            if matches!(condition, "all" | "screen") {
                continue;
            }
            let Some(limit) = parse_width(condition) else {
                return false;
            };
            let ok = match limit {
                WidthLimit::Min(px) => self.width >= px,
                WidthLimit::Max(px) => self.width <= px,
            };
            if !ok {
                return false;
            }
            matched = true;
        }

        matched
    }
}

enum WidthLimit {
    Min(u32),
    Max(u32),
}

fn parse_width(condition: &str) -> Option<WidthLimit> {
    let inner = condition.strip_prefix('(')?.strip_suffix(')')?;
    let (feature, value) = inner.split_once(':')?;
    let px = value.trim().strip_suffix("px")?.trim().parse().ok()?;

    match feature.trim() {
        "min-width" => Some(WidthLimit::Min(px)),
        "max-width" => Some(WidthLimit::Max(px)),
        _ => None,
    }
}

/// Merges option layers and applies matching breakpoints
pub struct OptionsHandler {
    media: Box<dyn MediaMatcher>,
}

impl OptionsHandler {
    pub fn new(media: impl MediaMatcher + 'static) -> Self {
        Self { media: Box::new(media) }
    }

    /// `base` with every field `overrides` sets replaced
    pub fn merge_options(&self, base: &AriaOptions, overrides: &AriaOptionsPartial) -> AriaOptions {
        let mut merged = base.clone();
        merged.apply(overrides);
        merged
    }

    /// `options` with every matching breakpoint applied in key order
    pub fn options_at_media(&self, options: &AriaOptions) -> AriaOptions {
        let mut resolved = options.clone();
        for (query, overrides) in &options.breakpoints {
            if self.media.matches(query) {
                tracing::debug!("Applying breakpoint {query}");
                resolved.apply(overrides);
            }
        }
        resolved
    }
}

impl Default for OptionsHandler {
    fn default() -> Self {
        Self::new(NoMedia)
    }
}

impl fmt::Debug for OptionsHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AriaOptions::default();
        assert!(options.active);
        assert_eq!(options.locale, "en-US");
        assert_eq!(options.live, LiveRegionMode::Disabled);
        assert_eq!(options.debounce, 300);
        assert!(options.breakpoints.is_empty());
    }

    #[test]
    fn test_merge_favours_override() {
        let handler = OptionsHandler::default();
        let base = AriaOptions::default();
        let merged = handler.merge_options(&base, &AriaOptionsPartial::new().locale("de-DE").debounce(0));

        assert_eq!(merged.locale, "de-DE");
        assert_eq!(merged.debounce, 0);
        assert!(merged.active);
    }

    #[test]
    fn test_from_json() {
        let partial = AriaOptionsPartial::from_json(
            r#"{"active": true, "locale": "fr-FR", "live": "polite", "debounce": 50,
                "breakpoints": {"(min-width: 768px)": {"live": false}}}"#,
        )
        .unwrap();

        assert_eq!(partial.locale.as_deref(), Some("fr-FR"));
        assert_eq!(partial.live, Some(LiveRegionMode::Polite));
        assert_eq!(partial.debounce, Some(50));
        let breakpoints = partial.breakpoints.unwrap();
        assert_eq!(breakpoints["(min-width: 768px)"].live, Some(LiveRegionMode::Disabled));
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(AriaOptionsPartial::from_json(r#"{"debounce": "soon"}"#).is_err());
        assert!(GlobalOptions::from_json("not json").is_err());
    }

    #[test]
    fn test_breakpoints_merge_keywise() {
        let base = AriaOptionsPartial::new()
            .breakpoint("(min-width: 100px)", AriaOptionsPartial::new().locale("de-DE"));
        let over = AriaOptionsPartial::new()
            .breakpoint("(min-width: 100px)", AriaOptionsPartial::new().debounce(5))
            .breakpoint("(max-width: 50px)", AriaOptionsPartial::new().active(false));

        let merged = base.merged(&over);
        let breakpoints = merged.breakpoints.unwrap();
        assert_eq!(breakpoints.len(), 2);
        let wide = &breakpoints["(min-width: 100px)"];
        assert_eq!(wide.locale.as_deref(), Some("de-DE"));
        assert_eq!(wide.debounce, Some(5));
    }

    #[test]
    fn test_viewport_media() {
        let media = ViewportMedia::new(800);
        assert!(media.matches("(min-width: 768px)"));
        assert!(!media.matches("(max-width: 767px)"));
        assert!(media.matches("(min-width: 600px) and (max-width: 900px)"));
        assert!(!media.matches("(min-width: 600px) and (max-width: 700px)"));
        assert!(media.matches("screen and (max-width: 800px)"));
        assert!(!media.matches("(orientation: landscape)"));
        assert!(!media.matches(""));
    }

    #[test]
    fn test_options_at_media_in_key_order() {
        let handler = OptionsHandler::new(ViewportMedia::new(1200));
        let mut options = AriaOptions::default();
        options.apply(
            &AriaOptionsPartial::new()
                .breakpoint("(min-width: 1000px)", AriaOptionsPartial::new().locale("sv-SE"))
                .breakpoint("(min-width: 600px)", AriaOptionsPartial::new().locale("da-DK").debounce(10))
                .breakpoint("(max-width: 500px)", AriaOptionsPartial::new().active(false)),
        );

        let resolved = handler.options_at_media(&options);
        // "(min-width: 1000px)" sorts before "(min-width: 600px)"
        assert_eq!(resolved.locale, "da-DK");
        assert_eq!(resolved.debounce, 10);
        assert!(resolved.active);
    }

    #[test]
    fn test_closure_media_matcher() {
        let handler = OptionsHandler::new(|query: &str| query == "print");
        let mut options = AriaOptions::default();
        options.apply(&AriaOptionsPartial::new().breakpoint("print", AriaOptionsPartial::new().active(false)));

        assert!(!handler.options_at_media(&options).active);
    }
}

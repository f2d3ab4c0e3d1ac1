//! Carousel ARIA
//!
//! An accessibility plugin for carousels. It tags the carousel root and its
//! slides with ARIA attributes, keeps focus out of slides that are not in
//! view, and restores the original markup when destroyed.
//!
//! # Example
//! ```rust,ignore
//! use carousel_aria::{AriaOptionsPartial, AriaPlugin, CarouselPlugin, OptionsHandler, PluginEnv};
//!
//! let mut plugin = AriaPlugin::new(AriaOptionsPartial::new().locale("de-DE"), PluginEnv::new(timers));
//! plugin.init(carousel, &OptionsHandler::default())?;
//! // ... carousel events, timers.advance(..) ...
//! plugin.destroy();
//! ```

pub mod carousel;
pub mod debounce;
pub mod options;
pub mod plugin;
pub mod timers;

pub use carousel::{CarouselApi, CarouselEvent, EventBus, EventHandler, ScrollAxis, StaticCarousel};
pub use debounce::{Debounced, debounce};
pub use options::{
    AriaOptions, AriaOptionsPartial, FocusChangeCallback, GlobalOptions, MediaMatcher, NoMedia,
    OptionsError, OptionsHandler, ViewportMedia,
};
pub use plugin::{AriaError, AriaPlugin, CarouselPlugin, PluginEnv, PluginStatus};
pub use timers::{TimerId, TimerQueue};

// Re-export sub-crates for advanced usage
pub use carousel_a11y as a11y;
pub use carousel_dom as dom;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

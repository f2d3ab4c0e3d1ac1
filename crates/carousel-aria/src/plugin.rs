//! ARIA Plugin
//!
//! Tags a carousel's root and slides with ARIA attributes and keeps keyboard
//! focus out of slides that are not in view. Every attribute goes through an
//! [`AttributeStore`], so destroying the plugin leaves the author's markup
//! exactly as it was found.
//!
//! Lifecycle: `Uninitialized → Active → Destroyed`. An instance is single
//! use; `init` after `destroy` is ignored.

use std::cell::{BorrowMutError, Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use carousel_a11y::{
    AriaAttr, AriaRole, AttributeStore, FocusOptions, FocusableTreeWalker, Intl, IntlCache,
    IntlError, Orientation, for_each_focusable,
};
use carousel_dom::{Dom, NodeId};
use thiserror::Error;

use crate::carousel::{CarouselApi, CarouselEvent, EventHandler, ScrollAxis};
use crate::debounce::{Debounced, debounce};
use crate::options::{AriaOptions, AriaOptionsPartial, GlobalOptions, OptionsError, OptionsHandler};
use crate::timers::TimerQueue;

/// Plugin errors
#[derive(Debug, Error)]
pub enum AriaError {
    #[error(transparent)]
    Intl(#[from] IntlError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("Carousel document is already borrowed")]
    DomBorrowed(#[from] BorrowMutError),
}

/// A carousel plugin
pub trait CarouselPlugin<C: CarouselApi> {
    type Options;

    fn name(&self) -> &'static str;

    /// Options as given by the user, before resolution
    fn options(&self) -> &Self::Options;

    fn init(&mut self, carousel: Rc<C>, handler: &OptionsHandler) -> Result<(), AriaError>;

    /// Undo everything `init` did. When the document is borrowed the
    /// plugin is left untouched and active, so `destroy` can be retried.
    fn destroy(&mut self);
}

/// Where a plugin is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    Uninitialized,
    Active,
    Destroyed,
}

/// Host services a plugin is built with
#[derive(Debug, Clone)]
pub struct PluginEnv {
    pub global_options: GlobalOptions,
    pub intl: Rc<IntlCache>,
    pub timers: Rc<TimerQueue>,
}

impl PluginEnv {
    /// Bundled dictionaries, no global overrides
    pub fn new(timers: Rc<TimerQueue>) -> Self {
        Self {
            global_options: GlobalOptions::default(),
            intl: Rc::new(IntlCache::new()),
            timers,
        }
    }

    pub fn with_global_options(mut self, global_options: GlobalOptions) -> Self {
        self.global_options = global_options;
        self
    }

    pub fn with_intl(mut self, intl: Rc<IntlCache>) -> Self {
        self.intl = intl;
        self
    }
}

/// Handler bodies run behind the debounce
#[derive(Debug, Clone, Copy)]
enum Task {
    TagSlides,
    ToggleFocus,
}

struct Subscription {
    event: CarouselEvent,
    handler: EventHandler,
    debounced: Debounced<()>,
}

/// State owned between `init` and `destroy`
struct ActivePlugin<C: CarouselApi> {
    carousel: Rc<C>,
    options: AriaOptions,
    intl: Intl,
    store: AttributeStore,
    live: Cell<bool>,
    subscriptions: RefCell<Vec<Subscription>>,
}

enum PluginState<C: CarouselApi> {
    Uninitialized,
    Active(Rc<ActivePlugin<C>>),
    Destroyed,
}

/// ARIA plugin
pub struct AriaPlugin<C: CarouselApi + 'static> {
    options: AriaOptionsPartial,
    env: PluginEnv,
    state: PluginState<C>,
}

impl<C: CarouselApi + 'static> AriaPlugin<C> {
    pub fn new(options: AriaOptionsPartial, env: PluginEnv) -> Self {
        Self { options, env, state: PluginState::Uninitialized }
    }

    pub fn status(&self) -> PluginStatus {
        match self.state {
            PluginState::Uninitialized => PluginStatus::Uninitialized,
            PluginState::Active(_) => PluginStatus::Active,
            PluginState::Destroyed => PluginStatus::Destroyed,
        }
    }

    /// Options in effect while active
    pub fn resolved_options(&self) -> Option<&AriaOptions> {
        match &self.state {
            PluginState::Active(active) => Some(&active.options),
            _ => None,
        }
    }

    fn resolve_options(&self, handler: &OptionsHandler) -> AriaOptions {
        let global = handler.merge_options(&AriaOptions::default(), self.env.global_options.options());
        let user = handler.merge_options(&global, &self.options);
        let resolved = handler.options_at_media(&user);
        tracing::debug!("Resolved aria options: {resolved:?}");
        resolved
    }
}

impl<C: CarouselApi + 'static> CarouselPlugin<C> for AriaPlugin<C> {
    type Options = AriaOptionsPartial;

    fn name(&self) -> &'static str {
        "aria"
    }

    fn options(&self) -> &AriaOptionsPartial {
        &self.options
    }

    fn init(&mut self, carousel: Rc<C>, handler: &OptionsHandler) -> Result<(), AriaError> {
        match self.state {
            PluginState::Uninitialized => {}
            PluginState::Active(_) => {
                tracing::warn!("Aria plugin is already initialized");
                return Ok(());
            }
            PluginState::Destroyed => {
                tracing::warn!("Aria plugin was destroyed and cannot be initialized again");
                return Ok(());
            }
        }

        let options = self.resolve_options(handler);
        if !options.active {
            tracing::info!("Aria plugin inactive for the current media");
            return Ok(());
        }

        // Every message is looked up before the document is touched
        let intl = self.env.intl.get(&options.locale);
        let role_description = intl.format("roledescription")?;
        intl.format("slide.roledescription")?;
        intl.format("slide.label")?;

        let orientation = match carousel.scroll_axis() {
            ScrollAxis::X => Orientation::Horizontal,
            ScrollAxis::Y => Orientation::Vertical,
        };
        let multiselectable = carousel.slides_in_view().len() > 1;
        let store = AttributeStore::new();

        {
            let mut dom = carousel.dom().try_borrow_mut()?;
            let dom = &mut *dom;
            let root = carousel.root_node();
            let values = [
                (AriaAttr::Role, AriaRole::TabList.as_str()),
                (AriaAttr::Live, options.live.as_str()),
                (AriaAttr::Orientation, orientation.as_str()),
                (AriaAttr::RoleDescription, role_description.as_str()),
                (AriaAttr::Multiselectable, bool_str(multiselectable)),
            ];
            for (attr, value) in values {
                store.mount(dom, root, attr.name(), Some(value));
            }
        }

        let slide_count = carousel.slide_nodes().len();
        let active = Rc::new(ActivePlugin {
            carousel,
            options,
            intl,
            store,
            live: Cell::new(true),
            subscriptions: RefCell::new(Vec::new()),
        });
        active.subscribe(&self.env.timers);
        self.state = PluginState::Active(Rc::clone(&active));
        tracing::info!("Aria plugin initialized with {slide_count} slides");

        active.toggle_aria_slide_attrs()?;
        active.toggle_focusable_slide_nodes()?;
        Ok(())
    }

    fn destroy(&mut self) {
        match std::mem::replace(&mut self.state, PluginState::Destroyed) {
            PluginState::Active(active) => match active.teardown() {
                Ok(()) => tracing::info!("Aria plugin destroyed"),
                Err(err) => {
                    tracing::error!("Aria plugin teardown failed, still active: {err}");
                    self.state = PluginState::Active(active);
                }
            },
            PluginState::Uninitialized => {
                tracing::debug!("Ignoring destroy of an uninitialized aria plugin");
                self.state = PluginState::Uninitialized;
            }
            PluginState::Destroyed => {
                tracing::debug!("Aria plugin already destroyed");
            }
        }
    }
}

impl<C: CarouselApi + 'static> fmt::Debug for AriaPlugin<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AriaPlugin")
            .field("status", &self.status())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C: CarouselApi + 'static> ActivePlugin<C> {
    fn subscribe(self: &Rc<Self>, timers: &Rc<TimerQueue>) {
        let mut subscriptions = self.subscriptions.borrow_mut();

        for task in [Task::TagSlides, Task::ToggleFocus] {
            let plugin = Rc::downgrade(self);
            let debounced = debounce(
                move |()| {
                    if let Some(plugin) = plugin.upgrade() {
                        plugin.run(task);
                    }
                },
                self.options.debounce,
                Rc::clone(timers),
            );

            let trigger = debounced.clone();
            let handler: EventHandler = Rc::new(move |_| trigger.call(()));
            self.carousel.on(CarouselEvent::SlidesInView, Rc::clone(&handler));
            subscriptions.push(Subscription {
                event: CarouselEvent::SlidesInView,
                handler,
                debounced,
            });
        }
    }

    /// Timer entry point. Errors stop here since nothing can receive them.
    fn run(&self, task: Task) {
        if !self.live.get() {
            tracing::debug!("Skipping {task:?}: plugin destroyed");
            return;
        }

        let result = match task {
            Task::TagSlides => self.toggle_aria_slide_attrs(),
            Task::ToggleFocus => self.toggle_focusable_slide_nodes(),
        };
        if let Err(err) = result {
            tracing::error!("Aria {task:?} failed: {err}");
        }
    }

    fn toggle_aria_slide_attrs(&self) -> Result<(), AriaError> {
        let slides = self.carousel.slide_nodes();
        let in_view = self.carousel.slides_in_view();
        let count = slides.len();

        let role_description = self.intl.format("slide.roledescription")?;
        let labels = (1..=count)
            .map(|i| self.intl.format_with("slide.label", &[("i", i), ("n", count)]))
            .collect::<Result<Vec<_>, _>>()?;

        let mut dom = self.carousel.dom().try_borrow_mut()?;
        let dom = &mut *dom;

        for (index, (&slide, label)) in slides.iter().zip(&labels).enumerate() {
            let visible = in_view.contains(&index);
            let values = [
                (AriaAttr::Role, AriaRole::Tab.as_str()),
                (AriaAttr::Label, label.as_str()),
                (AriaAttr::RoleDescription, role_description.as_str()),
                (AriaAttr::Hidden, bool_str(!visible)),
                (AriaAttr::Selected, bool_str(visible)),
            ];
            for (attr, value) in values {
                self.store.mount(dom, slide, attr.name(), Some(value));
            }
        }

        tracing::debug!("Tagged {count} slides, {} in view", in_view.len());
        Ok(())
    }

    fn toggle_focusable_slide_nodes(&self) -> Result<(), AriaError> {
        let tabindex = AriaAttr::TabIndex.name();
        let in_view = self.carousel.slides_in_view();
        let (visible, hidden): (Vec<_>, Vec<_>) = self
            .carousel
            .slide_nodes()
            .into_iter()
            .enumerate()
            .partition(|(index, _)| in_view.contains(index));

        let moved = {
            let mut dom = self.carousel.dom().try_borrow_mut()?;
            let dom = &mut *dom;

            for (_, slide) in visible {
                self.reenable_focus(dom, slide, tabindex);
                for_each_focusable(dom, slide, FocusOptions::new(), |dom, child| {
                    self.reenable_focus(dom, child, tabindex);
                });
            }

            let mut disabled = Vec::new();
            for (_, slide) in hidden {
                disabled.push(slide);
                let mut walker = FocusableTreeWalker::new(slide, FocusOptions::new(), None);
                disabled.extend(walker.iter(&*dom));
            }
            for &node in &disabled {
                self.store.mount(dom, node, tabindex, Some("-1"));
            }

            // Every leaving node is out of the tab order before focus moves
            match dom.active_element() {
                Some(node) if dom.has_focus() && disabled.contains(&node) => {
                    self.relocate_focus(dom, node)
                }
                _ => None,
            }
        };

        // Callbacks run with the document released
        if let (Some(callback), Some((from, to))) = (&self.options.on_focus_change, moved) {
            callback(from, to);
        }
        Ok(())
    }

    fn reenable_focus(&self, dom: &mut C::Dom, node: NodeId, tabindex: &str) {
        self.store.mount(dom, node, tabindex, None);
        self.store.restore(dom, node, tabindex);
    }

    /// Move focus off `node` to the next tabbable node in the container,
    /// wrapping around, or to the carousel root when there is none
    fn relocate_focus(&self, dom: &mut C::Dom, node: NodeId) -> Option<(NodeId, NodeId)> {
        let options = FocusOptions::tabbable().from_node(node).wrap(true);
        let mut walker = FocusableTreeWalker::new(self.carousel.container_node(), options, None);
        let target = walker
            .next_node(&*dom)
            .unwrap_or_else(|| self.carousel.root_node());

        if dom.focus(target) {
            tracing::debug!("Moved focus {node} -> {target}");
            Some((node, target))
        } else {
            tracing::warn!("Could not move focus off {node}");
            None
        }
    }

    /// Fails without side effects when the document is borrowed
    fn teardown(&self) -> Result<(), AriaError> {
        let mut dom = self.carousel.dom().try_borrow_mut()?;
        let dom = &mut *dom;

        self.live.set(false);
        for subscription in self.subscriptions.borrow_mut().drain(..) {
            self.carousel.off(subscription.event, &subscription.handler);
            subscription.debounced.cancel();
        }

        let root = self.carousel.root_node();
        for attr in AriaAttr::ROOT {
            self.store.unmount(dom, root, attr.name());
        }

        for slide in self.carousel.slide_nodes() {
            for attr in AriaAttr::SLIDE {
                self.store.unmount(dom, slide, attr.name());
            }
            // Sweeps every descendant we touched, visible now or not
            self.store.unmount_subtree(dom, slide, AriaAttr::TabIndex.name());
        }
        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

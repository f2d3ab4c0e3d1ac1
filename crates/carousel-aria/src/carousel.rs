//! Carousel Interface
//!
//! What the plugin needs from a carousel, plus a small in-memory carousel
//! that drives it without any scroll engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use carousel_dom::{Dom, NodeId};

/// Carousel event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselEvent {
    /// The set of slides in view changed
    SlidesInView,
}

impl CarouselEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SlidesInView => "slidesInView",
        }
    }
}

/// Scroll axis of the carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAxis {
    #[default]
    X,
    Y,
}

/// Event listener. Unsubscribing compares `Rc` identity.
pub type EventHandler = Rc<dyn Fn(CarouselEvent)>;

/// The carousel surface the plugin consumes
pub trait CarouselApi {
    type Dom: Dom;

    /// The document the carousel lives in
    fn dom(&self) -> &RefCell<Self::Dom>;
    fn root_node(&self) -> NodeId;
    fn container_node(&self) -> NodeId;
    fn slide_nodes(&self) -> Vec<NodeId>;
    /// Indexes into [`CarouselApi::slide_nodes`]
    fn slides_in_view(&self) -> Vec<usize>;
    fn scroll_axis(&self) -> ScrollAxis;
    fn on(&self, event: CarouselEvent, handler: EventHandler);
    fn off(&self, event: CarouselEvent, handler: &EventHandler);
}

/// Publish/subscribe over [`CarouselEvent`]s
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<CarouselEvent, Vec<EventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: CarouselEvent, handler: EventHandler) {
        self.listeners.borrow_mut().entry(event).or_default().push(handler);
    }

    /// Remove the first subscription of exactly this handler
    pub fn off(&self, event: CarouselEvent, handler: &EventHandler) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(handlers) = listeners.get_mut(&event) else {
            return false;
        };
        match handlers.iter().position(|h| Rc::ptr_eq(h, handler)) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Call every handler subscribed at the time of the call
    pub fn emit(&self, event: CarouselEvent) {
        let snapshot = self
            .listeners
            .borrow()
            .get(&event)
            .cloned()
            .unwrap_or_default();

        tracing::trace!("Emitting {} to {} handlers", event.as_str(), snapshot.len());
        for handler in snapshot {
            handler(event);
        }
    }

    pub fn listener_count(&self, event: CarouselEvent) -> usize {
        self.listeners.borrow().get(&event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let counts: HashMap<_, _> = listeners.iter().map(|(event, h)| (*event, h.len())).collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

/// In-memory carousel with a settable in-view set
pub struct StaticCarousel<D> {
    dom: Rc<RefCell<D>>,
    root: NodeId,
    container: NodeId,
    slides: Vec<NodeId>,
    axis: ScrollAxis,
    in_view: RefCell<Vec<usize>>,
    events: EventBus,
}

impl<D: Dom> StaticCarousel<D> {
    /// A carousel over existing nodes, with the first slide in view
    pub fn new(dom: Rc<RefCell<D>>, root: NodeId, container: NodeId, slides: Vec<NodeId>) -> Self {
        let in_view = if slides.is_empty() { Vec::new() } else { vec![0] };
        Self {
            dom,
            root,
            container,
            slides,
            axis: ScrollAxis::X,
            in_view: RefCell::new(in_view),
            events: EventBus::new(),
        }
    }

    pub fn with_axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Set the initial in-view set without emitting
    pub fn with_slides_in_view(self, in_view: impl IntoIterator<Item = usize>) -> Self {
        *self.in_view.borrow_mut() = self.normalize(in_view);
        self
    }

    /// Replace the in-view set, emitting [`CarouselEvent::SlidesInView`] when
    /// it changed. Out-of-range indexes are dropped.
    pub fn set_slides_in_view(&self, in_view: impl IntoIterator<Item = usize>) {
        let next = self.normalize(in_view);
        let changed = *self.in_view.borrow() != next;
        if changed {
            *self.in_view.borrow_mut() = next;
            self.events.emit(CarouselEvent::SlidesInView);
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn shared_dom(&self) -> Rc<RefCell<D>> {
        Rc::clone(&self.dom)
    }

    fn normalize(&self, in_view: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut indexes: Vec<usize> = in_view.into_iter().filter(|&i| i < self.slides.len()).collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes
    }
}

impl<D: Dom> CarouselApi for StaticCarousel<D> {
    type Dom = D;

    fn dom(&self) -> &RefCell<D> {
        &self.dom
    }

    fn root_node(&self) -> NodeId {
        self.root
    }

    fn container_node(&self) -> NodeId {
        self.container
    }

    fn slide_nodes(&self) -> Vec<NodeId> {
        self.slides.clone()
    }

    fn slides_in_view(&self) -> Vec<usize> {
        self.in_view.borrow().clone()
    }

    fn scroll_axis(&self) -> ScrollAxis {
        self.axis
    }

    fn on(&self, event: CarouselEvent, handler: EventHandler) {
        self.events.on(event, handler);
    }

    fn off(&self, event: CarouselEvent, handler: &EventHandler) {
        self.events.off(event, handler);
    }
}

impl<D> fmt::Debug for StaticCarousel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCarousel")
            .field("root", &self.root)
            .field("container", &self.container)
            .field("slides", &self.slides)
            .field("axis", &self.axis)
            .field("in_view", &self.in_view.borrow())
            .finish_non_exhaustive()
    }
}

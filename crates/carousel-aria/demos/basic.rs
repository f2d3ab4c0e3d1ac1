//! Example: an accessible three-slide carousel
//!
//! Run with `RUST_LOG=debug` to watch the plugin work.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use carousel_aria::dom::{Document, Dom, NodeId};
use carousel_aria::{
    AriaOptionsPartial, AriaPlugin, CarouselApi, CarouselPlugin, GlobalOptions, OptionsHandler,
    PluginEnv, StaticCarousel, TimerQueue, ViewportMedia,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let body = doc.body().context("document has no body")?;
    let root = doc.append_element(body, "section", &[("class", "embla")])?;
    let container = doc.append_element(root, "div", &[("class", "embla__container")])?;
    let mut slides = Vec::new();
    for i in 1..=3 {
        let slide = doc.append_element(container, "div", &[("class", "embla__slide")])?;
        let href = format!("/slide/{i}");
        doc.append_element(slide, "a", &[("href", href.as_str())])?;
        slides.push(slide);
    }

    let timers = Rc::new(TimerQueue::new());
    let carousel = Rc::new(StaticCarousel::new(
        Rc::new(RefCell::new(doc)),
        root,
        container,
        slides.clone(),
    ));

    let global = GlobalOptions::from_json(r#"{"live": "polite"}"#)?;
    let options = AriaOptionsPartial::from_json(
        r#"{"debounce": 100, "breakpoints": {"(min-width: 1024px)": {"locale": "de-DE"}}}"#,
    )?
    .on_focus_change(|from, to| println!("focus moved {from} -> {to}"));

    let env = PluginEnv::new(Rc::clone(&timers)).with_global_options(global);
    let mut plugin = AriaPlugin::new(options, env);
    plugin.init(Rc::clone(&carousel), &OptionsHandler::new(ViewportMedia::new(1280)))?;

    println!("carousel-aria v{}", carousel_aria::VERSION);
    dump(&carousel, root, &slides);

    // Focus a link in the first slide, then scroll it out of view
    let link = carousel.dom().borrow().first_child(slides[0]).context("slide without link")?;
    carousel.dom().borrow_mut().focus(link);
    carousel.set_slides_in_view([1]);
    timers.advance(100);
    dump(&carousel, root, &slides);

    plugin.destroy();
    dump(&carousel, root, &slides);
    Ok(())
}

fn dump(carousel: &StaticCarousel<Document>, root: NodeId, slides: &[NodeId]) {
    let dom = carousel.dom().borrow();
    let attrs = |node: NodeId, names: &[&str]| {
        names
            .iter()
            .map(|name| format!("{name}={}", dom.get_attribute(node, name).unwrap_or("-")))
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!("root: {}", attrs(root, &["role", "aria-live", "aria-roledescription"]));
    for slide in slides {
        println!("  slide {slide}: {}", attrs(*slide, &["aria-label", "aria-hidden", "tabindex"]));
    }
}

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures_signals::map_ref;
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, EventTarget, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollToOptions,
};
use yew::prelude::*;

use super::signals::use_rerender_on;
use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerTarget {
    Window,
    /// First element matching the selector.
    Element(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Behavior {
    #[default]
    Smooth,
    Auto,
    Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Block {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: Behavior,
    pub block: Block,
}

/// The slice of `window`/`document` the helpers need, so they can run against
/// a fake outside the browser.
pub trait DomEnv {
    /// `getBoundingClientRect().top` of the first element matching `selector`.
    fn element_top(&self, selector: &str) -> Option<f64>;
    fn viewport_height(&self) -> f64;
    fn scroll_y(&self) -> f64;
    /// Returns false when nothing matched `selector`.
    fn scroll_into_view(&self, selector: &str, options: ScrollOptions) -> bool;
    fn scroll_window_to(&self, top: f64, behavior: Behavior);
    fn add_listener(
        &self,
        target: &ListenerTarget,
        event: &str,
        callback: Rc<dyn Fn()>,
    ) -> Option<ListenerId>;
    fn remove_listener(&self, id: ListenerId);
    /// Appends a `<style>` holding `css` to the document head.
    fn inject_style(&self, css: &str) -> Option<StyleId>;
    /// Detaches a style added by `inject_style`; false if it was already gone.
    fn remove_style(&self, id: StyleId) -> bool;
}

struct RegisteredListener {
    target: EventTarget,
    event: String,
    closure: Closure<dyn Fn()>,
}

#[derive(Default)]
pub struct BrowserDom {
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, RegisteredListener>>,
    styles: RefCell<HashMap<StyleId, Element>>,
}

impl BrowserDom {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn query(selector: &str) -> Option<Element> {
        web_sys::window()?
            .document()?
            .query_selector(selector)
            .ok()
            .flatten()
    }
}

impl DomEnv for BrowserDom {
    fn element_top(&self, selector: &str) -> Option<f64> {
        Self::query(selector).map(|element| element.get_bounding_client_rect().top())
    }

    fn viewport_height(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.inner_height().ok())
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn scroll_into_view(&self, selector: &str, options: ScrollOptions) -> bool {
        let Some(element) = Self::query(selector) else {
            return false;
        };
        let js_options = ScrollIntoViewOptions::new();
        js_options.set_behavior(scroll_behavior(options.behavior));
        js_options.set_block(match options.block {
            Block::Start => ScrollLogicalPosition::Start,
            Block::Center => ScrollLogicalPosition::Center,
            Block::End => ScrollLogicalPosition::End,
            Block::Nearest => ScrollLogicalPosition::Nearest,
        });
        element.scroll_into_view_with_scroll_into_view_options(&js_options);
        true
    }

    fn scroll_window_to(&self, top: f64, behavior: Behavior) {
        if let Some(window) = web_sys::window() {
            let options = ScrollToOptions::new();
            options.set_top(top);
            options.set_behavior(scroll_behavior(behavior));
            window.scroll_to_with_scroll_to_options(&options);
        }
    }

    fn add_listener(
        &self,
        target: &ListenerTarget,
        event: &str,
        callback: Rc<dyn Fn()>,
    ) -> Option<ListenerId> {
        let target: EventTarget = match target {
            ListenerTarget::Window => web_sys::window()?.into(),
            ListenerTarget::Element(selector) => Self::query(selector)?.into(),
        };
        let closure = Closure::wrap(Box::new(move || callback()) as Box<dyn Fn()>);
        if target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_err()
        {
            gloo_console::error!("Failed to add listener for", event);
            return None;
        }

        let id = ListenerId(self.next_id());
        self.listeners.borrow_mut().insert(
            id,
            RegisteredListener {
                target,
                event: event.to_string(),
                closure,
            },
        );
        Some(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(listener) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        if listener
            .target
            .remove_event_listener_with_callback(
                &listener.event,
                listener.closure.as_ref().unchecked_ref(),
            )
            .is_err()
        {
            log::warn!("Failed to remove '{}' listener", listener.event);
        }
    }

    fn inject_style(&self, css: &str) -> Option<StyleId> {
        let document = web_sys::window()?.document()?;
        let style = document.create_element("style").ok()?;
        style.set_text_content(Some(css));
        document.head()?.append_child(&style).ok()?;

        let id = StyleId(self.next_id());
        self.styles.borrow_mut().insert(id, style);
        Some(id)
    }

    fn remove_style(&self, id: StyleId) -> bool {
        let Some(style) = self.styles.borrow_mut().remove(&id) else {
            return false;
        };
        match style.parent_node() {
            Some(parent) => parent.remove_child(&style).is_ok(),
            None => false,
        }
    }
}

fn scroll_behavior(behavior: Behavior) -> ScrollBehavior {
    match behavior {
        Behavior::Smooth => ScrollBehavior::Smooth,
        Behavior::Auto => ScrollBehavior::Auto,
        Behavior::Instant => ScrollBehavior::Instant,
    }
}

/// Scroll and visibility bookkeeping for one section of the page.
#[derive(Clone)]
pub struct Dom {
    env: Rc<dyn DomEnv>,
    is_visible: Mutable<bool>,
    has_seen: Mutable<bool>,
}

impl Dom {
    pub fn new(env: Rc<dyn DomEnv>) -> Self {
        Self {
            env,
            is_visible: Mutable::new(false),
            has_seen: Mutable::new(false),
        }
    }

    pub fn changed(&self) -> impl Signal<Item = ()> {
        map_ref! {
            let _visible = self.is_visible.signal(),
            let _seen = self.has_seen.signal() =>
            ()
        }
    }

    pub fn env(&self) -> Rc<dyn DomEnv> {
        self.env.clone()
    }

    /// Whether the floating stand-in for the element should be shown: true
    /// until the element has scrolled into view once.
    pub fn is_visible(&self) -> bool {
        self.is_visible.get()
    }

    pub fn has_seen(&self) -> bool {
        self.has_seen.get()
    }

    /// True when the element's top is within the viewport (plus `threshold`).
    /// A missing element reports false and leaves the flags untouched.
    pub fn check_scroll_position(&self, selector: &str, threshold: f64) -> bool {
        let Some(top) = self.env.element_top(selector) else {
            return false;
        };
        let additional_offset = if selector == config::FLOATING_VIDEO_SELECTOR {
            config::FLOATING_VIDEO_OFFSET
        } else {
            0.0
        };
        let in_view = top <= self.env.viewport_height() + threshold - additional_offset;

        if in_view {
            self.is_visible.set_neq(false);
            self.has_seen.set_neq(true);
        } else if !self.has_seen.get() {
            self.is_visible.set_neq(true);
        }
        in_view
    }

    pub fn scroll_to_element(&self, selector: &str, options: ScrollOptions) {
        if !self.env.scroll_into_view(selector, options) {
            log::warn!("Nothing to scroll to for '{}'", selector);
        }
    }

    pub fn add_scroll_listener(&self, callback: Rc<dyn Fn()>) -> Option<ListenerId> {
        self.env.add_listener(&ListenerTarget::Window, "scroll", callback)
    }

    pub fn remove_scroll_listener(&self, id: ListenerId) {
        self.env.remove_listener(id);
    }

    pub fn add_resize_listener(&self, callback: Rc<dyn Fn()>) -> Option<ListenerId> {
        self.env.add_listener(&ListenerTarget::Window, "resize", callback)
    }

    pub fn remove_resize_listener(&self, id: ListenerId) {
        self.env.remove_listener(id);
    }

    pub fn add_pointer_listener(
        &self,
        element: Option<&str>,
        event: &str,
        callback: Rc<dyn Fn()>,
    ) -> Option<ListenerId> {
        let selector = element?;
        self.env
            .add_listener(&ListenerTarget::Element(selector.to_string()), event, callback)
    }

    pub fn remove_pointer_listener(&self, id: Option<ListenerId>) {
        if let Some(id) = id {
            self.env.remove_listener(id);
        }
    }
}

/// Navigation scrolling: a hash lands its target just below the fixed header,
/// anything else goes back to the top.
pub fn scroll_for_location(env: &dyn DomEnv, hash: &str) {
    let anchor = hash.trim_start_matches('#');
    if anchor.is_empty() {
        env.scroll_window_to(0.0, Behavior::Smooth);
        return;
    }
    match env.element_top(&format!("#{}", anchor)) {
        Some(top) => env.scroll_window_to(
            env.scroll_y() + top - config::ANCHOR_SCROLL_OFFSET,
            Behavior::Smooth,
        ),
        None => log::debug!("No element for anchor '{}'", anchor),
    }
}

#[hook]
pub fn use_dom() -> Dom {
    let dom = use_memo(|_| Dom::new(Rc::new(BrowserDom::new())), ());
    {
        let dom = dom.clone();
        use_rerender_on(move || dom.changed());
    }
    (*dom).clone()
}


#[cfg(test)]
mod tests {
    use super::testing::FakeDom;
    use super::*;
    use crate::composables::signals::testing::Changes;

    fn dom(fake: &Rc<FakeDom>) -> Dom {
        Dom::new(fake.clone())
    }

    #[test]
    fn element_below_the_fold_shows_floating_copy_until_seen() {
        let fake = FakeDom::new(800.0);
        fake.place(".features", 1200.0);
        let dom = dom(&fake);

        assert!(!dom.check_scroll_position(".features", 0.0));
        assert!(dom.is_visible());
        assert!(!dom.has_seen());

        fake.place(".features", 700.0);
        assert!(dom.check_scroll_position(".features", 0.0));
        assert!(!dom.is_visible());
        assert!(dom.has_seen());

        // Scrolling back up does not bring the floating copy back.
        fake.place(".features", 1200.0);
        assert!(!dom.check_scroll_position(".features", 0.0));
        assert!(!dom.is_visible());
    }

    #[test]
    fn visibility_changes_are_signalled_once() {
        let fake = FakeDom::new(800.0);
        fake.place(".video", 1500.0);
        let dom = dom(&fake);
        let mut changes = Changes::new(dom.changed());

        dom.check_scroll_position(".video", 0.0);
        assert_eq!(changes.drain(), 1);
        dom.check_scroll_position(".video", 0.0);
        assert_eq!(changes.drain(), 0);

        fake.place(".video", 100.0);
        dom.check_scroll_position(".video", 0.0);
        assert_eq!(changes.drain(), 1);
    }

    #[test]
    fn threshold_extends_the_viewport() {
        let fake = FakeDom::new(800.0);
        fake.place(".cta", 900.0);
        let dom = dom(&fake);

        assert!(!dom.check_scroll_position(".cta", 50.0));
        assert!(dom.check_scroll_position(".cta", 100.0));
    }

    #[test]
    fn floating_video_needs_extra_room() {
        let fake = FakeDom::new(800.0);
        fake.place(".video", 760.0);
        fake.place(".other", 760.0);
        let dom = dom(&fake);

        assert!(!dom.check_scroll_position(".video", 0.0));
        assert!(dom.check_scroll_position(".other", 0.0));

        fake.place(".video", 740.0);
        assert!(dom.check_scroll_position(".video", 0.0));
    }

    #[test]
    fn missing_element_changes_nothing() {
        let fake = FakeDom::new(800.0);
        let dom = dom(&fake);

        assert!(!dom.check_scroll_position(".absent", 0.0));
        assert!(!dom.is_visible());
        assert!(!dom.has_seen());
    }

    #[test]
    fn scroll_to_element_defaults_to_smooth_start() {
        let fake = FakeDom::new(800.0);
        fake.place("#signup", 2000.0);
        let dom = dom(&fake);

        dom.scroll_to_element("#signup", ScrollOptions::default());
        dom.scroll_to_element(
            "#signup",
            ScrollOptions {
                block: Block::Center,
                ..ScrollOptions::default()
            },
        );
        dom.scroll_to_element("#missing", ScrollOptions::default());

        let calls = fake.scrolled_into_view.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.behavior, Behavior::Smooth);
        assert_eq!(calls[0].1.block, Block::Start);
        assert_eq!(calls[1].1.block, Block::Center);
    }

    #[test]
    fn listeners_fire_until_removed() {
        let fake = FakeDom::new(800.0);
        fake.place(".video", 0.0);
        let dom = dom(&fake);
        let hits = Rc::new(Cell::new(0));
        let callback: Rc<dyn Fn()> = {
            let hits = hits.clone();
            Rc::new(move || hits.set(hits.get() + 1))
        };

        let scroll = dom.add_scroll_listener(callback.clone()).unwrap();
        let resize = dom.add_resize_listener(callback.clone()).unwrap();
        let pointer = dom.add_pointer_listener(Some(".video"), "pointerenter", callback.clone());
        assert!(pointer.is_some());
        assert!(dom.add_pointer_listener(None, "pointerenter", callback.clone()).is_none());

        fake.dispatch(&ListenerTarget::Window, "scroll");
        fake.dispatch(&ListenerTarget::Window, "resize");
        fake.dispatch(&ListenerTarget::Element(".video".into()), "pointerenter");
        assert_eq!(hits.get(), 3);

        dom.remove_scroll_listener(scroll);
        dom.remove_resize_listener(resize);
        dom.remove_pointer_listener(pointer);
        dom.remove_pointer_listener(None);
        assert_eq!(fake.listener_count(), 0);

        fake.dispatch(&ListenerTarget::Window, "scroll");
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn navigation_scrolls_to_anchor_or_top() {
        let fake = FakeDom::new(800.0);
        fake.scroll_y.set(100.0);
        fake.place("#video", 500.0);

        scroll_for_location(&*fake, "#video");
        scroll_for_location(&*fake, "");
        scroll_for_location(&*fake, "#missing");

        let scrolls = fake.window_scrolls.borrow();
        assert_eq!(
            *scrolls,
            vec![(520.0, Behavior::Smooth), (0.0, Behavior::Smooth)]
        );
    }
}

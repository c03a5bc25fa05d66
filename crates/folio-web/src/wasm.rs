#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use folio_core::{Document, Page};
use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions, Window};
use web_time::Instant;

use crate::parse_options;

// ---------------------------------------------------------------------------
// Document over web-sys
// ---------------------------------------------------------------------------

/// [`Document`] backed by the live DOM.
pub(crate) struct DomDocument {
    window: Window,
    document: web_sys::Document,
}

impl Document for DomDocument {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&mut self, node: &Element, class: &str, on: bool) {
        let _ = node.class_list().toggle_with_force(class, on);
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    fn content_width(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_width()))
    }

    fn scroll_to_top(&mut self) {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&opts);
    }
}

// ---------------------------------------------------------------------------
// Third-party widgets
// ---------------------------------------------------------------------------

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// Look up a global widget factory; `None` when the library is not loaded.
fn global_fn(name: &str) -> Option<Function> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

fn construct(name: &str, args: &[JsValue]) -> Result<Option<JsValue>, JsValue> {
    let Some(ctor) = global_fn(name) else {
        tracing::debug!(widget = name, "library not loaded; skipped");
        return Ok(None);
    };
    let args: Array = args.iter().collect();
    Reflect::construct(&ctor, &args).map(Some)
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

struct Runtime {
    page: Page<DomDocument>,
    window: Window,
    epoch: Instant,
    /// Deadline and handle of the armed `setTimeout`, if any.
    armed: Option<(Duration, i32)>,
    pump: Option<Closure<dyn FnMut()>>,
    masonry: Option<JsValue>,
}

impl Runtime {
    fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Make sure a native timeout is pending for the page's next deadline.
    fn rearm(&mut self) {
        let Some(next) = self.page.next_deadline() else {
            return;
        };
        if let Some((due, handle)) = self.armed {
            if due <= next {
                return;
            }
            self.window.clear_timeout_with_handle(handle);
            self.armed = None;
        }
        let Some(pump) = &self.pump else {
            return;
        };
        let wait = next.saturating_sub(self.elapsed());
        let wait_ms = i32::try_from(wait.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                pump.as_ref().unchecked_ref(),
                wait_ms,
            ) {
            Ok(handle) => self.armed = Some((next, handle)),
            Err(err) => tracing::warn!(?err, "setTimeout failed"),
        }
    }

    fn pump(&mut self) {
        self.armed = None;
        let now = self.elapsed();
        self.page.advance_to(now);
        self.rearm();
    }

    fn on_load(&mut self) {
        let hash = self.window.location().hash().unwrap_or_default();
        let fragment = (!hash.is_empty()).then_some(hash.as_str());
        let now = self.elapsed();
        self.page.on_load(now, fragment);
        self.init_masonry();
        self.rearm();
    }

    fn init_masonry(&mut self) {
        let sel = &self.page.config().selectors;
        let Some(container) = self.page.document().query(&sel.portfolio_container) else {
            return;
        };
        let result = to_js(&self.page.config().widgets.masonry)
            .and_then(|opts| construct("Isotope", &[container.into(), opts]));
        match result {
            Ok(masonry) => self.masonry = masonry,
            Err(err) => tracing::warn!(?err, "masonry init failed"),
        }
    }

    fn arrange(&self, filter: &str) {
        let Some(masonry) = &self.masonry else {
            return;
        };
        let Some(arrange) = Reflect::get(masonry, &JsValue::from_str("arrange"))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
        else {
            return;
        };
        let opts = js_sys::Object::new();
        let _ = Reflect::set(&opts, &JsValue::from_str("filter"), &JsValue::from_str(filter));
        if let Err(err) = arrange.call1(masonry, &opts) {
            tracing::warn!(?err, "masonry arrange failed");
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // The pump closure dies with us; a pending timeout must not call it.
        if let Some((_, handle)) = self.armed.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

fn listen(target: &web_sys::EventTarget, kind: &str, f: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(f);
    if let Err(err) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
    {
        tracing::warn!(?err, kind, "addEventListener failed");
    }
    // Listeners live as long as the page.
    closure.forget();
}

/// Run `f` against the runtime if it is still alive and not already borrowed.
fn with_runtime(weak: &Weak<RefCell<Runtime>>, f: impl FnOnce(&mut Runtime)) {
    if let Some(runtime) = weak.upgrade()
        && let Ok(mut rt) = runtime.try_borrow_mut()
    {
        f(&mut rt);
    }
}

/// The portfolio page's behavior layer, mounted on the current document.
#[wasm_bindgen]
pub struct FolioPage {
    runtime: Rc<RefCell<Runtime>>,
}

#[wasm_bindgen]
impl FolioPage {
    /// Mount on `window.document`, wire every listener, construct the
    /// widgets and start both cyclers.
    ///
    /// `options` is an optional plain object overriding any part of the
    /// site configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<FolioPage, JsValue> {
        #[cfg(feature = "console-log")]
        crate::console::init();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let json = match options.filter(|o| !o.is_undefined() && !o.is_null()) {
            Some(o) => js_sys::JSON::stringify(&o)?.as_string(),
            None => None,
        };
        let (config, errors) = parse_options(json.as_deref());
        for err in &errors {
            tracing::warn!(%err, "invalid option");
        }

        let dom = DomDocument {
            window: window.clone(),
            document: document.clone(),
        };
        let page = Page::new(dom, config);
        let runtime = Rc::new(RefCell::new(Runtime {
            page,
            window: window.clone(),
            epoch: Instant::now(),
            armed: None,
            pump: None,
            masonry: None,
        }));

        let weak = Rc::downgrade(&runtime);
        let pump = Closure::<dyn FnMut()>::new(move || with_runtime(&weak, Runtime::pump));
        runtime.borrow_mut().pump = Some(pump);

        let this = FolioPage { runtime };
        this.wire(&window, &document);
        this.init_widgets();

        {
            let mut rt = this.runtime.borrow_mut();
            let now = rt.elapsed();
            rt.page.start(now);
            rt.rearm();
        }

        if document.ready_state() == "complete" {
            this.runtime.borrow_mut().on_load();
        }
        Ok(this)
    }

    /// Milliseconds until the next scheduled animation step, if any.
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        let rt = self.runtime.borrow();
        rt.page
            .next_deadline()
            .map(|d| d.saturating_sub(rt.elapsed()).as_secs_f64() * 1000.0)
    }

    /// Navigate to `fragment` as if its navigation link had been clicked.
    /// Returns `false` when no link targets it.
    pub fn navigate(&self, fragment: &str) -> bool {
        let mut rt = self.runtime.borrow_mut();
        let index = rt
            .page
            .nav()
            .state()
            .links
            .iter()
            .position(|l| l.fragment() == Some(fragment));
        let now = rt.elapsed();
        let handled = index.is_some_and(|i| rt.page.on_nav_click(now, i));
        rt.rearm();
        handled
    }
}

impl FolioPage {
    fn wire(&self, window: &Window, document: &web_sys::Document) {
        let weak = Rc::downgrade(&self.runtime);
        let rt = self.runtime.borrow();
        let page = &rt.page;
        let sel = &page.config().selectors;

        {
            let weak = weak.clone();
            listen(window, "load", move |_| with_runtime(&weak, Runtime::on_load));
        }

        for (index, link) in page.document().query_all(&sel.nav_links).into_iter().enumerate() {
            let weak = weak.clone();
            listen(&link, "click", move |event| {
                with_runtime(&weak, |rt| {
                    let now = rt.elapsed();
                    if rt.page.on_nav_click(now, index) {
                        event.prevent_default();
                    }
                    rt.rearm();
                });
            });
        }

        if let Some(toggle) = page.document().query(&sel.mobile_toggle) {
            let weak = weak.clone();
            listen(&toggle, "click", move |_| {
                with_runtime(&weak, |rt| rt.page.on_mobile_toggle());
            });
        }

        for (index, item) in page
            .document()
            .query_all(&sel.portfolio_filters)
            .into_iter()
            .enumerate()
        {
            let weak = weak.clone();
            listen(&item, "click", move |event| {
                event.prevent_default();
                with_runtime(&weak, |rt| {
                    if let Some(filter) = rt.page.on_filter_click(index) {
                        rt.arrange(&filter);
                    }
                });
            });
        }

        if let Some(skills) = document.query_selector(&sel.skills).ok().flatten() {
            let weak = weak.clone();
            let handler = Closure::<dyn FnMut()>::new(move || {
                with_runtime(&weak, |rt| rt.page.on_skills_reached());
            });
            let result = to_js(&page.config().widgets.skills_reveal).and_then(|opts| {
                Reflect::set(&opts, &JsValue::from_str("element"), &skills)?;
                Reflect::set(&opts, &JsValue::from_str("handler"), handler.as_ref())?;
                construct("Waypoint", &[opts])
            });
            if let Err(err) = result {
                tracing::warn!(?err, "scroll reveal init failed");
            }
            handler.forget();
        }
    }

    fn init_widgets(&self) {
        let rt = self.runtime.borrow();
        let widgets = &rt.page.config().widgets;

        for slider in [&widgets.testimonials, &widgets.portfolio_details] {
            let result = to_js(slider).and_then(|opts| {
                construct("Swiper", &[JsValue::from_str(&slider.selector), opts])
            });
            if let Err(err) = result {
                tracing::warn!(?err, selector = %slider.selector, "slider init failed");
            }
        }

        if let Some(lightbox) = global_fn("GLightbox") {
            for opts in [&widgets.gallery_lightbox, &widgets.details_lightbox] {
                let result = to_js(opts).and_then(|o| lightbox.call1(&JsValue::NULL, &o));
                if let Err(err) = result {
                    tracing::warn!(?err, selector = %opts.selector, "lightbox init failed");
                }
            }
        }

        if widgets.counters
            && let Err(err) = construct("PureCounter", &[])
        {
            tracing::warn!(?err, "counter init failed");
        }
    }
}

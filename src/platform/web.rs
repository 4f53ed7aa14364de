//! Browser binding
//!
//! `WebRadar` is what a page constructs. It drives a `Radar` drawing into an
//! `<svg>` inside the container element, fetches the data document, feeds
//! mouse input and animation frames into the radar, and forwards emitted
//! events to JavaScript listeners once the radar is no longer borrowed, so
//! a listener may call back into the radar.

use glam::DVec2;
use js_sys::{Array, Function};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Document, Element, MouseEvent, Response};

use crate::config::RadarOptions;
use crate::error::{RadarError, Result};
use crate::events::{Channel, RadarEvent};
use crate::radar::Radar;
use crate::surface::{Animation, Shape, ShapeId, Style, Surface};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Live DOM node of a shape and the presentation last written to it
struct Node {
    element: Element,
    style: Style,
    translate: DVec2,
    transition: Option<String>,
}

impl Node {
    fn write(&self) {
        let mut css = self.style.css();
        css.push_str(&format!(
            "transform:translate({}px,{}px);",
            self.translate.x, self.translate.y
        ));
        if let Some(transition) = &self.transition {
            css.push_str(&format!("transition:{transition};"));
        }
        if let Err(e) = self.element.set_attribute("style", &css) {
            log::warn!("Failed to style shape: {e:?}");
        }
    }
}

/// Draws shapes as `<path>` elements of an `<svg>` and animates them with
/// CSS transitions
pub struct SvgSurface {
    document: Document,
    container: Element,
    svg: Option<Element>,
    nodes: HashMap<ShapeId, Node>,
}

impl SvgSurface {
    /// Surface drawing into the first element matching `selector`
    pub fn new(selector: &str) -> std::result::Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .query_selector(selector)?
            .ok_or_else(|| JsValue::from_str(&format!("no element matches {selector:?}")))?;
        Ok(Self {
            document,
            container,
            svg: None,
            nodes: HashMap::new(),
        })
    }

    /// The mounted `<svg>`
    pub fn svg(&self) -> Option<&Element> {
        self.svg.as_ref()
    }

    fn create(&self, tag: &str) -> Option<Element> {
        match self.document.create_element_ns(Some(SVG_NS), tag) {
            Ok(element) => Some(element),
            Err(e) => {
                log::error!("Failed to create <{tag}>: {e:?}");
                None
            }
        }
    }
}

impl Surface for SvgSurface {
    fn mount(&mut self, width: f64, height: f64) {
        let Some(svg) = self.create("svg") else {
            return;
        };
        for (name, value) in [("width", width), ("height", height)] {
            if let Err(e) = svg.set_attribute(name, &value.to_string()) {
                log::warn!("Failed to size radar: {e:?}");
            }
        }
        if let Err(e) = self.container.append_child(&svg) {
            log::error!("Failed to mount radar: {e:?}");
            return;
        }
        self.svg = Some(svg);
    }

    fn append(&mut self, id: ShapeId, shape: &Shape) {
        let Some(svg) = &self.svg else {
            log::warn!("Shape {id:?} drawn before mount");
            return;
        };
        let Some(element) = self.create("path") else {
            return;
        };
        if let Err(e) = element.set_attribute("d", &shape.geometry.path_data()) {
            log::warn!("Failed to outline shape {id:?}: {e:?}");
        }
        if let Err(e) = svg.append_child(&element) {
            log::error!("Failed to append shape {id:?}: {e:?}");
            return;
        }

        let node = Node {
            element,
            style: shape.style.clone(),
            translate: shape.translate,
            transition: None,
        };
        node.write();
        self.nodes.insert(id, node);
    }

    fn set_style(&mut self, id: ShapeId, style: &Style) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.style.merge(style);
            node.transition = None;
            node.write();
        }
    }

    fn animate(&mut self, id: ShapeId, animation: &Animation) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let timing = format!("{}ms ease {}ms", animation.duration_ms, animation.delay_ms);
        node.transition = Some(format!("opacity {timing},transform {timing}"));
        node.write();
        // Commit the start state so the browser transitions from it
        node.element.get_bounding_client_rect();

        if let Some(opacity) = animation.opacity {
            node.style.opacity = Some(opacity);
        }
        if let Some(translate) = animation.translate {
            node.translate = translate;
        }
        node.write();
    }

    fn remove(&mut self, id: ShapeId) {
        if let Some(node) = self.nodes.remove(&id) {
            node.element.remove();
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn js_error(error: RadarError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// GET `url` and return the body text
pub async fn fetch_text(url: &str) -> Result<String> {
    let load_error = |reason: String| RadarError::Load {
        url: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| load_error("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| load_error(describe(&e)))?
        .dyn_into()
        .map_err(|e| load_error(describe(&e)))?;
    if !response.ok() {
        return Err(load_error(format!("HTTP {}", response.status())));
    }

    let body = response.text().map_err(|e| load_error(describe(&e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| load_error(describe(&e)))?
        .as_string()
        .ok_or_else(|| load_error("body is not text".into()))
}

/// State shared between the façade, DOM listeners and the frame loop
struct Shared {
    radar: RefCell<Radar<SvgSurface>>,
    queue: Rc<RefCell<VecDeque<RadarEvent>>>,
    listeners: RefCell<Vec<(Channel, Function)>>,
}

impl Shared {
    /// Hand queued events to JS listeners. The radar must not be borrowed.
    fn deliver(&self) -> std::result::Result<(), JsValue> {
        loop {
            let Some(event) = self.queue.borrow_mut().pop_front() else {
                return Ok(());
            };
            let channel = event.channel();
            let targets: Vec<Function> = self
                .listeners
                .borrow()
                .iter()
                .filter(|(c, _)| *c == channel)
                .map(|(_, f)| f.clone())
                .collect();
            let args: Array = event.args().into_iter().map(JsValue::from_str).collect();
            for listener in targets {
                listener.apply(&JsValue::NULL, &args)?;
            }
        }
    }

    fn deliver_logged(&self) {
        if let Err(e) = self.deliver() {
            log::error!("Radar listener threw: {}", describe(&e));
        }
    }
}

/// Technology radar bound to a page element
#[wasm_bindgen]
pub struct WebRadar {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WebRadar {
    /// `new WebRadar("#radar", "radar.json", { controlSize: 600 })`
    #[wasm_bindgen(constructor)]
    pub fn new(
        selector: &str,
        data_url: &str,
        configuration: JsValue,
    ) -> std::result::Result<WebRadar, JsValue> {
        super::init_logging();

        let json: String = js_sys::JSON::stringify(&configuration)?.into();
        let options = RadarOptions::from_json(&json).map_err(js_error)?;
        let surface = SvgSurface::new(selector)?;
        let mut radar = Radar::with_options(data_url, options, surface).map_err(js_error)?;

        let queue = Rc::new(RefCell::new(VecDeque::new()));
        for channel in Channel::ALL {
            let queue = queue.clone();
            radar.on(channel.as_str(), move |event| {
                queue.borrow_mut().push_back(event.clone())
            });
        }

        Ok(WebRadar {
            shared: Rc::new(Shared {
                radar: RefCell::new(radar),
                queue,
                listeners: RefCell::new(Vec::new()),
            }),
        })
    }

    /// Fetch the data, draw the overview and start listening for input.
    /// The returned promise rejects if the data cannot be loaded.
    pub fn render(&self) -> std::result::Result<js_sys::Promise, JsValue> {
        let url = self
            .shared
            .radar
            .borrow_mut()
            .begin_render()
            .map_err(js_error)?
            .to_string();

        let shared = self.shared.clone();
        Ok(future_to_promise(async move {
            let document = fetch_text(&url).await;
            shared
                .radar
                .borrow_mut()
                .complete_render(document)
                .map_err(js_error)?;
            attach_pointer_listeners(&shared);
            request_animation_frame(shared);
            Ok(JsValue::UNDEFINED)
        }))
    }

    /// Register `listener` for a named event; unknown names are ignored
    pub fn on(&self, event_name: &str, listener: Function) {
        match Channel::parse(event_name) {
            Some(channel) => self.shared.listeners.borrow_mut().push((channel, listener)),
            None => log::debug!("Ignoring listener for unknown event {event_name:?}"),
        }
    }

    #[wasm_bindgen(js_name = returnToOverview)]
    pub fn return_to_overview(&self) -> std::result::Result<(), JsValue> {
        self.shared
            .radar
            .borrow_mut()
            .return_to_overview()
            .map_err(js_error)?;
        self.shared.deliver()
    }
}

fn attach_pointer_listeners(shared: &Rc<Shared>) {
    let Some(svg) = shared.radar.borrow().surface().svg().cloned() else {
        log::warn!("Radar has no <svg> to listen on");
        return;
    };

    for name in ["mousemove", "click"] {
        let shared = shared.clone();
        let target = svg.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let x = f64::from(event.client_x()) - rect.left();
            let y = f64::from(event.client_y()) - rect.top();
            let mut radar = shared.radar.borrow_mut();
            let result = if event.type_() == "click" {
                radar.pointer_click(x, y)
            } else {
                radar.pointer_move(x, y)
            };
            if let Err(e) = result {
                log::warn!("Pointer input rejected: {e}");
            }
        });
        if let Err(e) = svg.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
            log::error!("Failed to listen for {name}: {e:?}");
        }
        closure.forget();
    }

    let shared = shared.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
        if let Err(e) = shared.radar.borrow_mut().pointer_leave() {
            log::warn!("Pointer input rejected: {e}");
        }
    });
    if let Err(e) = svg.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref()) {
        log::error!("Failed to listen for mouseleave: {e:?}");
    }
    closure.forget();
}

fn request_animation_frame(shared: Rc<Shared>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| frame(shared, time));
    if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        log::error!("Animation frame request failed: {e:?}");
    }
    closure.forget();
}

fn frame(shared: Rc<Shared>, time: f64) {
    shared.radar.borrow_mut().advance(time);
    shared.deliver_logged();
    request_animation_frame(shared);
}

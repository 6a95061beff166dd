use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, NodeList, Window};

use super::js_error_message;
use crate::dom::{Element, Page};

#[derive(Clone)]
pub struct BrowserPage {
    window: Window,
    document: Document,
}

impl BrowserPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }
}

/// Event listener attached to a fixed set of elements; removed on drop.
pub struct DomListener {
    targets: Vec<web_sys::Element>,
    event: String,
    callback: Closure<dyn Fn()>,
}

impl Drop for DomListener {
    fn drop(&mut self) {
        for target in &self.targets {
            let _ = target.remove_event_listener_with_callback(
                &self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Vec<web_sys::Element> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect(),
        Err(e) => {
            warn!("Bad selector '{}': {}", selector, js_error_message(&e));
            Vec::new()
        }
    }
}

impl Page for BrowserPage {
    type Element = web_sys::Element;
    type Listener = DomListener;

    fn query_selector_all(&self, selector: &str) -> Vec<web_sys::Element> {
        elements(self.document.query_selector_all(selector), selector)
    }

    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn listen(&self, selector: &str, event: &str, handler: Rc<dyn Fn()>) -> DomListener {
        let callback = Closure::<dyn Fn()>::new(move || handler());
        let targets = self.query_selector_all(selector);
        for target in &targets {
            let _ = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
        DomListener {
            targets,
            event: event.to_string(),
            callback,
        }
    }

    fn dispatch_window_event(&self, event: &str) {
        match web_sys::Event::new(event) {
            Ok(ev) => {
                let _ = self.window.dispatch_event(&ev);
            }
            Err(e) => warn!("Could not create '{}' event: {}", event, js_error_message(&e)),
        }
    }
}

impl Element for web_sys::Element {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        web_sys::Element::has_attribute(self, name)
    }

    fn set_inner_html(&self, html: &str) {
        web_sys::Element::set_inner_html(self, html);
    }

    fn first_element_child(&self) -> Option<Self> {
        web_sys::Element::first_element_child(self)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        elements(web_sys::Element::query_selector_all(self, selector), selector)
    }

    fn set_style_property(&self, property: &str, value: &str) {
        // SVG and other non-HTML elements have no inline style object here
        if let Some(html) = self.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.class_list().remove_1(class);
    }
}

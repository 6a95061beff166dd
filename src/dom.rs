//! Host seams the loader is written against.
//!
//! The browser implementations live in [`crate::web`]; tests provide an
//! in-memory document.

use std::rc::Rc;

use crate::error::LoaderError;

/// The handful of element operations the loader and the reconciliation hook use.
pub trait Element: Clone + 'static {
    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn set_inner_html(&self, html: &str);

    fn first_element_child(&self) -> Option<Self>;

    /// Descendants (not `self`) matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self>;

    fn set_style_property(&self, property: &str, value: &str);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);
}

/// Document-level operations.
pub trait Page: Clone + 'static {
    type Element: Element;
    /// Attached listener. Dropping it detaches the handler from every target.
    type Listener: 'static;

    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Path component of the current location.
    fn pathname(&self) -> String;

    /// Attach `handler` for `event` to every element currently matching `selector`.
    fn listen(&self, selector: &str, event: &str, handler: Rc<dyn Fn()>) -> Self::Listener;

    /// Dispatch a synthetic event on the window.
    fn dispatch_window_event(&self, event: &str);
}

/// Retrieves fragment markup.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, LoaderError>;
}

//! Browser bindings: `web-sys` implementations of the host traits and the
//! page entry point.

mod console;
mod fetch;
mod page;
mod plugins;

use std::rc::Rc;

use tracing::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::config::{LoaderConfig, CONFIG_ELEMENT_ID};
use crate::loader::FragmentLoader;
use crate::logging;

pub use console::BrowserConsole;
pub use fetch::WindowFetcher;
pub use page::{BrowserPage, DomListener};
pub use plugins::GlobalPlugins;

pub type BrowserLoader = FragmentLoader<BrowserPage, WindowFetcher, GlobalPlugins>;

/// Set up logging and run the loader once the page has fully loaded.
///
/// Plugin libraries are globals from other `<script>` tags, so this waits
/// for the window `load` event rather than DOM parsing.
pub fn start() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let (config, config_error) = match read_config(&document) {
        Ok(config) => (config, None),
        Err(e) => (LoaderConfig::default(), Some(e)),
    };
    logging::init(&config.log_filter, BrowserConsole);
    if let Some(e) = config_error {
        warn!("Ignoring page loader config: {}", e);
    }

    let page = BrowserPage::new(window.clone(), document.clone());
    let fetcher = WindowFetcher::new(window.clone());
    let plugins = GlobalPlugins::new(&config);
    let loader = match FragmentLoader::new(config, page, fetcher, plugins) {
        Ok(loader) => Rc::new(loader),
        Err(e) => {
            error!("Component loader disabled: {}", e);
            return;
        }
    };

    if document.ready_state() == "complete" {
        run(loader);
    } else {
        let on_load = Closure::once_into_js(move || run(loader));
        let _ = window.add_event_listener_with_callback("load", on_load.unchecked_ref());
    }
}

fn run(loader: Rc<BrowserLoader>) {
    // Menu handlers live in the loader's listener slots; they must outlive the load task
    FragmentLoader::keep_alive(&loader);
    spawn_local(async move {
        loader.initialize().await;
    });
}

fn read_config(document: &web_sys::Document) -> Result<LoaderConfig, crate::error::LoaderError> {
    match document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    {
        Some(json) if !json.trim().is_empty() => LoaderConfig::from_json(&json),
        _ => Ok(LoaderConfig::default()),
    }
}

/// Best-effort description of a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

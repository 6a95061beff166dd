use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use futures::future::join_all;
use tracing::{error, info};

use crate::bindings::ListenerSlots;
use crate::config::LoaderConfig;
use crate::dom::{Element, Fetcher, Page};
use crate::error::LoaderError;
use crate::plugins::Capabilities;
use crate::registry::ComponentRegistry;

/// Fills `data-component` placeholders with fetched fragments.
pub struct FragmentLoader<P: Page, F, C> {
    pub(crate) config: LoaderConfig,
    pub(crate) registry: ComponentRegistry,
    pub(crate) page: P,
    pub(crate) fetcher: F,
    pub(crate) plugins: C,
    pub(crate) bindings: RefCell<ListenerSlots<P::Listener>>,
}

impl<P, F, C> FragmentLoader<P, F, C>
where
    P: Page,
    F: Fetcher,
    C: Capabilities<P::Element>,
{
    pub fn new(config: LoaderConfig, page: P, fetcher: F, plugins: C) -> Result<Self, LoaderError> {
        let registry = ComponentRegistry::from_config(&config)?;
        Ok(Self {
            config,
            registry,
            page,
            fetcher,
            plugins,
            bindings: RefCell::new(ListenerSlots::new()),
        })
    }

    /// Placeholders present in the document right now.
    pub fn placeholders(&self) -> Vec<P::Element> {
        self.page
            .query_selector_all(&self.config.attributes.placeholder_selector())
    }

    /// Load every placeholder present at call time.
    ///
    /// Loads run concurrently and fail independently; this resolves once
    /// all of them have finished.
    pub async fn initialize(&self) {
        let placeholders = self.placeholders();
        info!("Loading {} component placeholder(s)", placeholders.len());

        let loads = placeholders
            .into_iter()
            .map(|placeholder| async move {
                // Errors are reported inside load_component
                let _ = self.load_component(&placeholder).await;
            });
        join_all(loads).await;
    }

    /// Load one placeholder. Any error has already been logged when this returns.
    pub async fn load_component(&self, placeholder: &P::Element) -> Result<(), LoaderError> {
        let result = self.try_load(placeholder).await;
        if let Err(e) = &result {
            error!("Error loading component: {}", e);
        }
        result
    }

    async fn try_load(&self, placeholder: &P::Element) -> Result<(), LoaderError> {
        let name = placeholder
            .attribute(&self.config.attributes.component)
            .unwrap_or_default();

        let url = self
            .registry
            .resolve(&name)
            .ok_or_else(|| LoaderError::UnknownComponent(name.clone()))?;

        match self.fetcher.fetch_text(url).await {
            Ok(html) => {
                placeholder.set_inner_html(&html);
                self.reconcile(placeholder, &name);
                info!(component = %name, "Loaded component");
                Ok(())
            }
            Err(e) => {
                placeholder.set_inner_html(&failure_notice(&name));
                Err(e)
            }
        }
    }
}

thread_local! {
    static RESIDENT: RefCell<Vec<Rc<dyn Any>>> = RefCell::new(Vec::new());
}

impl<P, F, C> FragmentLoader<P, F, C>
where
    P: Page,
    F: Fetcher + 'static,
    C: Capabilities<P::Element> + 'static,
{
    /// Keep `loader` alive for the rest of the page's lifetime.
    ///
    /// Dropping a loader detaches the listeners it bound, so a loader whose
    /// handles all go away with its load task has to be parked here first.
    pub fn keep_alive(loader: &Rc<Self>) {
        let resident: Rc<dyn Any> = loader.clone();
        RESIDENT.with(|slot| slot.borrow_mut().push(resident));
    }
}

/// Visible notice left in a placeholder whose fragment could not be fetched.
pub fn failure_notice(name: &str) -> String {
    format!("<p>Error loading component: {}</p>", escape_html(name))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

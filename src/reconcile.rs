//! Post-insertion hook: restore presentation hints and re-arm plugins that
//! only bind to elements present when they initialize.

use std::rc::Rc;

use tracing::{debug, error};

use crate::bindings::ListenerSlots;
use crate::dom::{Element, Fetcher, Page};
use crate::loader::FragmentLoader;
use crate::plugins::{Capabilities, PluginKind};

impl<P, F, C> FragmentLoader<P, F, C>
where
    P: Page,
    F: Fetcher,
    C: Capabilities<P::Element>,
{
    /// Run the reconciliation hook on a placeholder whose content was just replaced.
    pub fn reconcile(&self, placeholder: &P::Element, component: &str) {
        self.apply_hints(placeholder);

        for kind in PluginKind::SCOPED {
            self.run_plugin(kind, placeholder);
        }

        if component == self.config.header.component {
            self.reconcile_header(placeholder);
        }

        if component == self.config.related_services.component {
            self.mark_active_links(placeholder);
        }
    }

    fn apply_hints(&self, placeholder: &P::Element) {
        let attrs = &self.config.attributes;

        for el in placeholder.query_selector_all(&attrs.hint_selector()) {
            self.apply_hints_from(&el, &el);
        }

        // Hints on the placeholder belong to the fragment's outer element
        if placeholder.has_attribute(&attrs.background_image) || placeholder.has_attribute(&attrs.mask)
        {
            match placeholder.first_element_child() {
                Some(child) => self.apply_hints_from(placeholder, &child),
                None => self.apply_hints_from(placeholder, placeholder),
            }
        }
    }

    fn apply_hints_from(&self, source: &P::Element, target: &P::Element) {
        let attrs = &self.config.attributes;

        if let Some(bg) = source.attribute(&attrs.background_image).filter(|v| !v.is_empty()) {
            target.set_style_property("background-image", &css_url(&bg));
        }
        if let Some(mask) = source.attribute(&attrs.mask).filter(|v| !v.is_empty()) {
            let value = css_url(&mask);
            target.set_style_property("mask-image", &value);
            target.set_style_property("-webkit-mask-image", &value);
        }
    }

    fn run_plugin(&self, kind: PluginKind, scope: &P::Element) {
        match self.plugins.resolve(kind) {
            Some(plugin) => {
                if let Err(e) = plugin.initialize(scope) {
                    error!(plugin = %kind, "{}", e);
                }
            }
            None => debug!(plugin = %kind, "Plugin not present, skipping"),
        }
    }

    fn reconcile_header(&self, placeholder: &P::Element) {
        let header = &self.config.header;

        self.run_plugin(PluginKind::ResponsiveMenu, placeholder);

        let panels = Rc::new(header.panels.clone());
        let class = Rc::new(header.opened_class.clone());

        let mut slots = self.bindings.borrow_mut();
        let page = self.page.clone();
        let (open_panels, open_class) = (panels.clone(), class.clone());
        slots.rebind(ListenerSlots::<P::Listener>::key(&header.open_trigger, "click"), || {
            self.page.listen(
                &header.open_trigger,
                "click",
                Rc::new(move || set_class(&page, &open_panels, &open_class, true)),
            )
        });

        for trigger in &header.close_triggers {
            let page = self.page.clone();
            let (close_panels, close_class) = (panels.clone(), class.clone());
            slots.rebind(ListenerSlots::<P::Listener>::key(trigger, "click"), || {
                self.page.listen(
                    trigger,
                    "click",
                    Rc::new(move || set_class(&page, &close_panels, &close_class, false)),
                )
            });
        }
        drop(slots);

        // Sticky header state is computed from scroll position
        self.page.dispatch_window_event(&header.scroll_event);
    }

    fn mark_active_links(&self, placeholder: &P::Element) {
        let related = &self.config.related_services;
        let pathname = self.page.pathname();
        let current = current_page(&pathname, &self.config.home_page);

        for link in placeholder.query_selector_all(&related.link_selector) {
            if link.attribute("href").as_deref() == Some(current) {
                link.add_class(&related.active_class);
            }
        }
    }
}

fn set_class<P: Page>(page: &P, selectors: &[String], class: &str, on: bool) {
    for selector in selectors {
        for el in page.query_selector_all(selector) {
            if on {
                el.add_class(class);
            } else {
                el.remove_class(class);
            }
        }
    }
}

fn css_url(value: &str) -> String {
    format!("url({})", value)
}

/// Last segment of a location path, or `home` when the path ends in `/`.
pub fn current_page<'a>(pathname: &'a str, home: &'a str) -> &'a str {
    match pathname.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => home,
    }
}

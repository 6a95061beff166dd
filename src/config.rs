use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::LoaderError;

/// Identifier -> fragment path table used when no configuration overrides it.
pub const DEFAULT_COMPONENTS: &[(&str, &str)] = &[
    ("header", "components/header.html"),
    ("testimonials", "components/testimonials.html"),
    ("blog-section", "components/blog-section.html"),
    ("contact", "components/contact.html"),
    ("footer", "components/footer.html"),
    ("related-services", "components/related-services.html"),
    ("sidebar-cta", "components/sidebar-cta.html"),
];

/// Id of the optional `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "fragment-loader-config";

/// Everything the loader needs to know about the host page.
///
/// Every field has a default, so a page only has to spell out what it
/// changes. Nested sections merge field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Component identifier -> fragment path.
    pub components: BTreeMap<String, String>,
    /// Base URL every fragment path is resolved against. Relative fetch when unset.
    pub base_url: Option<String>,
    /// Page served when the location path has no last segment.
    pub home_page: String,
    /// `EnvFilter` directives for the console logger.
    pub log_filter: String,
    pub attributes: AttributeNames,
    pub header: HeaderConfig,
    pub related_services: RelatedServicesConfig,
    pub plugins: PluginOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS
                .iter()
                .map(|(id, path)| (id.to_string(), path.to_string()))
                .collect(),
            base_url: None,
            home_page: "index.html".to_string(),
            log_filter: "info".to_string(),
            attributes: AttributeNames::default(),
            header: HeaderConfig::default(),
            related_services: RelatedServicesConfig::default(),
            plugins: PluginOptions::default(),
        }
    }
}

impl LoaderConfig {
    /// Parse a JSON override document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, LoaderError> {
        serde_json::from_str(json).map_err(|e| LoaderError::Config(e.to_string()))
    }
}

/// Attribute names making up the placeholder contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    pub component: String,
    pub background_image: String,
    pub mask: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            component: "data-component".to_string(),
            background_image: "data-bg-image".to_string(),
            mask: "data-mask".to_string(),
        }
    }
}

impl AttributeNames {
    /// Selector matching any element carrying a presentation hint.
    pub fn hint_selector(&self) -> String {
        format!("[{}], [{}]", self.background_image, self.mask)
    }

    pub fn placeholder_selector(&self) -> String {
        format!("[{}]", self.component)
    }
}

/// Navigation header behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub component: String,
    pub menu_selector: String,
    pub menu_options: Value,
    pub open_trigger: String,
    pub close_triggers: Vec<String>,
    pub panels: Vec<String>,
    pub opened_class: String,
    pub scroll_event: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            component: "header".to_string(),
            menu_selector: "#main-menu".to_string(),
            menu_options: json!({
                "meanMenuContainer": ".mobile_menu",
                "meanScreenWidth": "991",
                "meanExpand": ["<i class=\"tji-angle-down\"></i>"],
            }),
            open_trigger: ".menu_btn".to_string(),
            close_triggers: vec![".hamburgerCloseBtn".to_string(), ".body-overlay".to_string()],
            panels: vec![".hamburger-area".to_string(), ".body-overlay".to_string()],
            opened_class: "opened".to_string(),
            scroll_event: "scroll".to_string(),
        }
    }
}

/// Related-services list behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedServicesConfig {
    pub component: String,
    pub link_selector: String,
    pub active_class: String,
}

impl Default for RelatedServicesConfig {
    fn default() -> Self {
        Self {
            component: "related-services".to_string(),
            link_selector: ".service-category ul li a".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// Selectors and option objects handed to the scoped plugin initializers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    pub select_selector: String,
    pub text_animation_selector: String,
    pub text_split_type: String,
    /// Tween vars for `gsap.from`; the scroll trigger is added per element.
    pub text_animation: Value,
    pub text_scroll_start: String,
    pub carousel_selector: String,
    pub carousel: Value,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            select_selector: "select".to_string(),
            text_animation_selector: ".text-anim".to_string(),
            text_split_type: "chars, words".to_string(),
            text_animation: json!({
                "duration": 1,
                "delay": 0.1,
                "x": 20,
                "autoAlpha": 0,
                "stagger": 0.03,
                "ease": "power2.out",
            }),
            text_scroll_start: "top 85%".to_string(),
            carousel_selector: ".tj-testimonial-slider".to_string(),
            carousel: json!({
                "slidesPerView": 1,
                "spaceBetween": 30,
                "loop": true,
                "autoplay": { "delay": 5000, "disableOnInteraction": false },
                "pagination": { "el": ".testimonial-pagination", "clickable": true },
                "navigation": {
                    "nextEl": ".testimonial-navigation .slider-next",
                    "prevEl": ".testimonial-navigation .slider-prev",
                },
                "breakpoints": {
                    "768": { "slidesPerView": 2 },
                    "1200": { "slidesPerView": 3 },
                },
            }),
        }
    }
}

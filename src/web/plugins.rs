//! Plugin libraries found as globals on the page (`jQuery`, `WOW`, `gsap`,
//! `SplitText`, `Swiper`). Each lookup is a presence check; nothing here
//! loads a library.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::js_error_message;
use crate::config::LoaderConfig;
use crate::dom::Element;
use crate::error::LoaderError;
use crate::plugins::{Capabilities, Initializer, PluginKind};

/// Resolves plugins from the window's global scope on every lookup.
#[derive(Clone)]
pub struct GlobalPlugins {
    options: Rc<Options>,
}

struct Options {
    select_selector: String,
    text_selector: String,
    text_split_type: String,
    text_vars: Value,
    text_scroll_start: String,
    carousel_selector: String,
    carousel: Value,
    menu_selector: String,
    menu_options: Value,
}

impl GlobalPlugins {
    pub fn new(config: &LoaderConfig) -> Self {
        let plugins = &config.plugins;
        Self {
            options: Rc::new(Options {
                select_selector: plugins.select_selector.clone(),
                text_selector: plugins.text_animation_selector.clone(),
                text_split_type: plugins.text_split_type.clone(),
                text_vars: plugins.text_animation.clone(),
                text_scroll_start: plugins.text_scroll_start.clone(),
                carousel_selector: plugins.carousel_selector.clone(),
                carousel: plugins.carousel.clone(),
                menu_selector: config.header.menu_selector.clone(),
                menu_options: config.header.menu_options.clone(),
            }),
        }
    }
}

impl Capabilities<web_sys::Element> for GlobalPlugins {
    fn resolve(&self, kind: PluginKind) -> Option<Rc<dyn Initializer<web_sys::Element>>> {
        let options = self.options.clone();
        match kind {
            PluginKind::Select => {
                let jquery = jquery_with("niceSelect")?;
                Some(Rc::new(move |scope: &web_sys::Element| {
                    nice_select(&jquery, scope, &options)
                }))
            }
            PluginKind::Reveal => {
                let wow = global_function("WOW")?;
                Some(Rc::new(move |_: &web_sys::Element| reveal(&wow)))
            }
            PluginKind::TextAnimation => {
                let gsap = global("gsap")?;
                let split_text = global_function("SplitText")?;
                Some(Rc::new(move |scope: &web_sys::Element| {
                    text_animation(&gsap, &split_text, scope, &options)
                }))
            }
            PluginKind::Carousel => {
                let swiper = global_function("Swiper")?;
                Some(Rc::new(move |scope: &web_sys::Element| {
                    carousel(&swiper, scope, &options)
                }))
            }
            PluginKind::ResponsiveMenu => {
                let jquery = jquery_with("meanmenu")?;
                Some(Rc::new(move |_: &web_sys::Element| {
                    responsive_menu(&jquery, &options)
                }))
            }
        }
    }
}

fn global(name: &str) -> Option<JsValue> {
    let value = Reflect::get(&js_sys::global(), &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn global_function(name: &str) -> Option<Function> {
    global(name)?.dyn_into::<Function>().ok()
}

/// `jQuery`, provided `jQuery.fn[method]` is a function.
fn jquery_with(method: &str) -> Option<Function> {
    let jquery = global_function("jQuery")?;
    let proto = Reflect::get(&jquery, &JsValue::from_str("fn")).ok()?;
    Reflect::get(&proto, &JsValue::from_str(method))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some(jquery)
}

fn fail(plugin: PluginKind) -> impl Fn(JsValue) -> LoaderError {
    move |e| LoaderError::Plugin {
        plugin: plugin.name(),
        message: js_error_message(&e),
    }
}

fn method(target: &JsValue, name: &str, plugin: PluginKind) -> Result<Function, LoaderError> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(fail(plugin))?
        .dyn_into::<Function>()
        .map_err(|_| LoaderError::Plugin {
            plugin: plugin.name(),
            message: format!("'{}' is not a function", name),
        })
}

/// JSON options as a plain JS object (maps become objects, not `Map`s).
fn to_js(value: &Value, plugin: PluginKind) -> Result<JsValue, LoaderError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| LoaderError::Plugin {
            plugin: plugin.name(),
            message: e.to_string(),
        })
}

fn set(target: &JsValue, key: &str, value: &JsValue, plugin: PluginKind) -> Result<(), LoaderError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(fail(plugin))
}

fn nice_select(jquery: &Function, scope: &web_sys::Element, options: &Options) -> Result<(), LoaderError> {
    let kind = PluginKind::Select;
    let wrapped = jquery.call1(&JsValue::NULL, scope).map_err(fail(kind))?;
    let selects = method(&wrapped, "find", kind)?
        .call1(&wrapped, &JsValue::from_str(&options.select_selector))
        .map_err(fail(kind))?;

    let length = Reflect::get(&selects, &JsValue::from_str("length"))
        .map_err(fail(kind))?
        .as_f64()
        .unwrap_or(0.0);
    if length > 0.0 {
        method(&selects, "niceSelect", kind)?
            .call0(&selects)
            .map_err(fail(kind))?;
    }
    Ok(())
}

fn reveal(wow: &Function) -> Result<(), LoaderError> {
    let kind = PluginKind::Reveal;
    let instance = Reflect::construct(wow, &Array::new()).map_err(fail(kind))?;
    method(&instance, "init", kind)?
        .call0(&instance)
        .map_err(fail(kind))?;
    Ok(())
}

fn text_animation(
    gsap: &JsValue,
    split_text: &Function,
    scope: &web_sys::Element,
    options: &Options,
) -> Result<(), LoaderError> {
    let kind = PluginKind::TextAnimation;
    let from = method(gsap, "from", kind)?;

    for element in Element::query_selector_all(scope, &options.text_selector) {
        let split_options = Object::new();
        set(&split_options, "type", &JsValue::from_str(&options.text_split_type), kind)?;
        let split = Reflect::construct(split_text, &Array::of2(&element, &split_options))
            .map_err(fail(kind))?;
        let chars = Reflect::get(&split, &JsValue::from_str("chars")).map_err(fail(kind))?;

        let scroll_trigger = Object::new();
        set(&scroll_trigger, "trigger", &element, kind)?;
        set(&scroll_trigger, "start", &JsValue::from_str(&options.text_scroll_start), kind)?;

        let vars = to_js(&options.text_vars, kind)?;
        set(&vars, "scrollTrigger", &scroll_trigger, kind)?;

        from.call2(gsap, &chars, &vars).map_err(fail(kind))?;
    }
    Ok(())
}

fn carousel(swiper: &Function, scope: &web_sys::Element, options: &Options) -> Result<(), LoaderError> {
    let kind = PluginKind::Carousel;
    for element in Element::query_selector_all(scope, &options.carousel_selector) {
        let settings = to_js(&options.carousel, kind)?;
        Reflect::construct(swiper, &Array::of2(&element, &settings)).map_err(fail(kind))?;
    }
    Ok(())
}

fn responsive_menu(jquery: &Function, options: &Options) -> Result<(), LoaderError> {
    let kind = PluginKind::ResponsiveMenu;
    let menu = jquery
        .call1(&JsValue::NULL, &JsValue::from_str(&options.menu_selector))
        .map_err(fail(kind))?;
    let settings = to_js(&options.menu_options, kind)?;
    method(&menu, "meanmenu", kind)?
        .call1(&menu, &settings)
        .map_err(fail(kind))?;
    Ok(())
}

#![allow(dead_code)]

//! In-memory document, fetcher, plugins and log capture for driving the
//! loader without a browser.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex};

use fragment_loader::dom::{Element, Fetcher, Page};
use fragment_loader::logging::{ConsoleLayer, ConsoleSink};
use fragment_loader::{Capabilities, FragmentLoader, Initializer, LoaderConfig, LoaderError, PluginKind};
use scraper::{ElementRef, Html};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

// -- Document --

struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    children: Vec<MockElement>,
    parent: Weak<RefCell<Node>>,
    inner_html: String,
    style: BTreeMap<String, String>,
    listeners: Vec<(u64, String, Rc<dyn Fn()>)>,
}

#[derive(Clone)]
pub struct MockElement(Rc<RefCell<Node>>);

impl MockElement {
    fn new<'a>(
        tag: &str,
        attrs: impl Iterator<Item = (&'a str, &'a str)>,
        parent: Weak<RefCell<Node>>,
    ) -> Self {
        MockElement(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            attrs: attrs.map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            children: Vec::new(),
            parent,
            inner_html: String::new(),
            style: BTreeMap::new(),
            listeners: Vec::new(),
        })))
    }

    fn build(el: ElementRef<'_>, parent: &MockElement) -> MockElement {
        let node = MockElement::new(el.value().name(), el.value().attrs(), Rc::downgrade(&parent.0));
        let children: Vec<_> = el
            .children()
            .filter_map(ElementRef::wrap)
            .map(|child| MockElement::build(child, &node))
            .collect();
        {
            let mut inner = node.0.borrow_mut();
            inner.inner_html = el.inner_html();
            inner.children = children;
        }
        node
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn inner_html(&self) -> String {
        self.0.borrow().inner_html.clone()
    }

    pub fn children(&self) -> Vec<MockElement> {
        self.0.borrow().children.clone()
    }

    pub fn parent(&self) -> Option<MockElement> {
        self.0.borrow().parent.upgrade().map(MockElement)
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().style.get(property).cloned()
    }

    pub fn has_style(&self) -> bool {
        !self.0.borrow().style.is_empty()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0
            .borrow()
            .attrs
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, e, _)| e == event)
            .count()
    }

    pub fn dispatch(&self, event: &str) {
        let handlers: Vec<Rc<dyn Fn()>> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, e, _)| e == event)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn click(&self) {
        self.dispatch("click");
    }

    fn descendants(&self) -> Vec<MockElement> {
        let mut out = Vec::new();
        for child in self.children() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    fn set_classes(&self, classes: &[String]) {
        self.0
            .borrow_mut()
            .attrs
            .insert("class".to_string(), classes.join(" "));
    }
}

impl Element for MockElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    fn set_inner_html(&self, html: &str) {
        let fragment = Html::parse_fragment(html);
        let children: Vec<_> = fragment
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .map(|child| MockElement::build(child, self))
            .collect();
        let mut node = self.0.borrow_mut();
        node.children = children;
        node.inner_html = html.to_string();
    }

    fn first_element_child(&self) -> Option<Self> {
        self.0.borrow().children.first().cloned()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|el| matches(el, selector))
            .collect()
    }

    fn set_style_property(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_classes(&classes);
        }
    }

    fn remove_class(&self, class: &str) {
        let mut classes = self.classes();
        classes.retain(|c| c != class);
        self.set_classes(&classes);
    }
}

// -- Selectors: lists of descendant chains of tag/.class/#id/[attr(=value)] --

fn matches(el: &MockElement, selector_list: &str) -> bool {
    selector_list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .any(|s| matches_chain(el, s))
}

fn matches_chain(el: &MockElement, selector: &str) -> bool {
    let parts: Vec<&str> = selector.split_whitespace().collect();
    let Some((last, ancestors)) = parts.split_last() else {
        return false;
    };
    if !matches_compound(el, last) {
        return false;
    }

    let mut current = el.parent();
    for part in ancestors.iter().rev() {
        loop {
            match current {
                None => return false,
                Some(candidate) => {
                    current = candidate.parent();
                    if matches_compound(&candidate, part) {
                        break;
                    }
                }
            }
        }
    }
    true
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '.' | '#' | '[')
}

fn matches_compound(el: &MockElement, compound: &str) -> bool {
    let tag_end = compound.find(is_delimiter).unwrap_or(compound.len());
    let tag = &compound[..tag_end];
    if !tag.is_empty() && tag != "*" && !tag.eq_ignore_ascii_case(&el.tag()) {
        return false;
    }

    let mut rest = &compound[tag_end..];
    while !rest.is_empty() {
        if let Some(body) = rest.strip_prefix('[') {
            let Some(end) = body.find(']') else {
                return false;
            };
            let inner = &body[..end];
            rest = &body[end + 1..];
            let ok = match inner.split_once('=') {
                Some((name, value)) => {
                    el.attribute(name.trim()).as_deref() == Some(value.trim().trim_matches('"'))
                }
                None => el.has_attribute(inner.trim()),
            };
            if !ok {
                return false;
            }
        } else {
            let prefix = &rest[..1];
            let body = &rest[1..];
            let end = body.find(is_delimiter).unwrap_or(body.len());
            let ident = &body[..end];
            rest = &body[end..];
            let ok = match prefix {
                "." => el.has_class(ident),
                _ => el.attribute("id").as_deref() == Some(ident),
            };
            if !ok {
                return false;
            }
        }
    }
    true
}

// -- Page --

struct PageState {
    root: MockElement,
    pathname: String,
    window_events: RefCell<Vec<String>>,
    next_listener: Cell<u64>,
}

#[derive(Clone)]
pub struct MockPage(Rc<PageState>);

impl MockPage {
    pub fn new(body_html: &str, pathname: &str) -> Self {
        let root = MockElement::new("body", std::iter::empty(), Weak::new());
        root.set_inner_html(body_html);
        MockPage(Rc::new(PageState {
            root,
            pathname: pathname.to_string(),
            window_events: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }))
    }

    pub fn root(&self) -> MockElement {
        self.0.root.clone()
    }

    pub fn all(&self, selector: &str) -> Vec<MockElement> {
        self.0.root.query_selector_all(selector)
    }

    pub fn first(&self, selector: &str) -> MockElement {
        self.all(selector)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no element matches '{}'", selector))
    }

    pub fn placeholder(&self, component: &str) -> MockElement {
        self.first(&format!("[data-component=\"{}\"]", component))
    }

    pub fn window_events(&self) -> Vec<String> {
        self.0.window_events.borrow().clone()
    }
}

pub struct MockListener {
    targets: Vec<(Weak<RefCell<Node>>, u64)>,
}

impl Drop for MockListener {
    fn drop(&mut self) {
        for (target, id) in &self.targets {
            if let Some(node) = target.upgrade() {
                node.borrow_mut().listeners.retain(|(i, _, _)| i != id);
            }
        }
    }
}

impl Page for MockPage {
    type Element = MockElement;
    type Listener = MockListener;

    fn query_selector_all(&self, selector: &str) -> Vec<MockElement> {
        self.all(selector)
    }

    fn pathname(&self) -> String {
        self.0.pathname.clone()
    }

    fn listen(&self, selector: &str, event: &str, handler: Rc<dyn Fn()>) -> MockListener {
        let id = self.0.next_listener.get();
        self.0.next_listener.set(id + 1);

        let mut targets = Vec::new();
        for el in self.all(selector) {
            el.0
                .borrow_mut()
                .listeners
                .push((id, event.to_string(), handler.clone()));
            targets.push((Rc::downgrade(&el.0), id));
        }
        MockListener { targets }
    }

    fn dispatch_window_event(&self, event: &str) {
        self.0.window_events.borrow_mut().push(event.to_string());
    }
}

// -- Fetcher --

#[derive(Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

#[derive(Clone, Default)]
pub struct MockFetcher {
    replies: HashMap<String, Reply>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MockFetcher {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn without(mut self, url: &str) -> Self {
        self.replies.remove(url);
        self
    }

    pub fn body(&self, url: &str) -> String {
        match self.replies.get(url) {
            Some(Reply::Body(body)) => body.clone(),
            _ => panic!("no body registered for {}", url),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, LoaderError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.replies.get(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(LoaderError::Status {
                url: url.to_string(),
                status: *status,
            }),
            // Anything unregistered behaves like an unreachable host
            None => Err(LoaderError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

// -- Plugins --

pub type Calls = Rc<RefCell<Vec<(PluginKind, String)>>>;

#[derive(Clone, Default)]
pub struct MockPlugins {
    installed: HashMap<PluginKind, Rc<dyn Initializer<MockElement>>>,
}

impl MockPlugins {
    pub fn with(mut self, kind: PluginKind, init: impl Initializer<MockElement> + 'static) -> Self {
        self.installed.insert(kind, Rc::new(init));
        self
    }

    /// Install every plugin kind, each recording `(kind, scope component)` into `calls`.
    pub fn recording(calls: &Calls) -> Self {
        let kinds = PluginKind::SCOPED
            .into_iter()
            .chain(std::iter::once(PluginKind::ResponsiveMenu));
        kinds.fold(MockPlugins::default(), |plugins, kind| {
            plugins.with(kind, recorder(kind, calls))
        })
    }
}

pub fn recorder(
    kind: PluginKind,
    calls: &Calls,
) -> impl Fn(&MockElement) -> Result<(), LoaderError> + 'static {
    let calls = calls.clone();
    move |scope: &MockElement| {
        let component = scope.attribute("data-component").unwrap_or_default();
        calls.borrow_mut().push((kind, component));
        Ok(())
    }
}

impl Capabilities<MockElement> for MockPlugins {
    fn resolve(&self, kind: PluginKind) -> Option<Rc<dyn Initializer<MockElement>>> {
        self.installed.get(&kind).cloned()
    }
}

// -- Logs --

#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<(Level, String)>>>);

impl ConsoleSink for LogCapture {
    fn write(&self, level: Level, line: &str) {
        self.0.lock().unwrap().push((level, line.to_string()));
    }
}

impl LogCapture {
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(self.clone()));
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn lines(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn count(&self, level: Level) -> usize {
        self.lines(level).len()
    }
}

// -- Site fixtures --

pub const HEADER_HTML: &str = r#"<header class="header-sticky"><nav id="main-menu"><ul><li><a href="index.html">Home</a></li></ul></nav><button class="menu_btn">Menu</button></header><div class="hamburger-area"><button class="hamburgerCloseBtn">Close</button></div><div class="body-overlay"></div>"#;

pub const TESTIMONIALS_HTML: &str = r#"<section class="testimonials"><h2 class="text-anim">What clients say</h2><div class="tj-testimonial-slider"><div class="swiper-slide">Great</div></div></section>"#;

pub const BLOG_HTML: &str = r#"<section class="blog" data-bg-image="img/blog-bg.jpg"><article><h3>Post</h3></article></section>"#;

pub const CONTACT_HTML: &str = r#"<section class="contact"><form><select name="service"><option>Yoga</option></select></form></section>"#;

pub const FOOTER_HTML: &str = r#"<footer><div class="shape" data-mask="img/wave.svg"></div><p>Footer</p></footer>"#;

pub const RELATED_SERVICES_HTML: &str = r#"<div class="service-category"><ul><li><a href="services-one.html">One</a></li><li><a href="services-two.html">Two</a></li><li><a href="services-three.html">Three</a></li><li><a href="index.html">Home</a></li></ul></div>"#;

pub const SIDEBAR_CTA_HTML: &str = "Book a consultation today";

/// Fetcher serving a fragment for every default component.
pub fn site() -> MockFetcher {
    MockFetcher::default()
        .with("components/header.html", HEADER_HTML)
        .with("components/testimonials.html", TESTIMONIALS_HTML)
        .with("components/blog-section.html", BLOG_HTML)
        .with("components/contact.html", CONTACT_HTML)
        .with("components/footer.html", FOOTER_HTML)
        .with("components/related-services.html", RELATED_SERVICES_HTML)
        .with("components/sidebar-cta.html", SIDEBAR_CTA_HTML)
}

pub type TestLoader = FragmentLoader<MockPage, MockFetcher, MockPlugins>;

pub fn loader(page: &MockPage, fetcher: &MockFetcher, plugins: MockPlugins) -> TestLoader {
    FragmentLoader::new(LoaderConfig::default(), page.clone(), fetcher.clone(), plugins)
        .expect("default config is valid")
}

pub fn placeholder(component: &str) -> String {
    format!(r#"<div data-component="{}"></div>"#, component)
}

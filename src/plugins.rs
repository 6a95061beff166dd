use std::fmt;
use std::rc::Rc;

use crate::error::LoaderError;

/// Optional UI libraries the reconciliation hook knows how to re-arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    /// Drop-down enhancement for `<select>` elements.
    Select,
    /// Reveal-on-scroll animation.
    Reveal,
    /// Split-text staggered animation driven by a scroll trigger.
    TextAnimation,
    Carousel,
    /// Responsive navigation menu; header only.
    ResponsiveMenu,
}

impl PluginKind {
    /// Initializers run on every inserted fragment, in this order.
    pub const SCOPED: [PluginKind; 4] = [
        PluginKind::Select,
        PluginKind::Reveal,
        PluginKind::TextAnimation,
        PluginKind::Carousel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PluginKind::Select => "select",
            PluginKind::Reveal => "reveal",
            PluginKind::TextAnimation => "text-animation",
            PluginKind::Carousel => "carousel",
            PluginKind::ResponsiveMenu => "responsive-menu",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A plugin initializer bound to an inserted subtree.
pub trait Initializer<E> {
    fn initialize(&self, scope: &E) -> Result<(), LoaderError>;
}

impl<E, F> Initializer<E> for F
where
    F: Fn(&E) -> Result<(), LoaderError>,
{
    fn initialize(&self, scope: &E) -> Result<(), LoaderError> {
        self(scope)
    }
}

/// Looks up plugin handles. `None` means the backing library is not loaded.
pub trait Capabilities<E> {
    fn resolve(&self, kind: PluginKind) -> Option<Rc<dyn Initializer<E>>>;
}

/// No plugins at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl<E> Capabilities<E> for NoPlugins {
    fn resolve(&self, _kind: PluginKind) -> Option<Rc<dyn Initializer<E>>> {
        None
    }
}

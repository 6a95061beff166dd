//! Splices static HTML fragments into `data-component` placeholders and
//! re-arms UI plugins on the inserted markup.

pub mod bindings;
pub mod config;
pub mod dom;
pub mod error;
pub mod loader;
pub mod logging;
pub mod plugins;
pub mod reconcile;
pub mod registry;
pub mod web;

pub use config::LoaderConfig;
pub use error::LoaderError;
pub use loader::FragmentLoader;
pub use plugins::{Capabilities, Initializer, PluginKind};
pub use registry::ComponentRegistry;

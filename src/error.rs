use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Component \"{0}\" not found")]
    UnknownComponent(String),

    #[error("Failed to load component: {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to load component: {url} (status {status})")]
    Status { url: String, status: u16 },

    #[error("{plugin} init failed: {message}")]
    Plugin {
        plugin: &'static str,
        message: String,
    },

    #[error("Config error: {0}")]
    Config(String),
}

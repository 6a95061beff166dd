use std::collections::BTreeMap;

use url::Url;

use crate::config::LoaderConfig;
use crate::error::LoaderError;

/// Immutable identifier -> fragment URL table.
///
/// Paths are resolved against the configured base URL once, when the
/// registry is built, so lookups never fail halfway through a load pass.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    entries: BTreeMap<String, String>,
}

impl ComponentRegistry {
    pub fn from_config(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let base = config
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| LoaderError::Config(format!("Invalid base URL '{}': {}", raw, e)))
            })
            .transpose()?;

        let mut entries = BTreeMap::new();
        for (id, path) in &config.components {
            let resolved = match &base {
                Some(base) => base
                    .join(path)
                    .map_err(|e| {
                        LoaderError::Config(format!("Invalid path '{}' for '{}': {}", path, id, e))
                    })?
                    .to_string(),
                None => path.clone(),
            };
            entries.insert(id.clone(), resolved);
        }

        Ok(Self { entries })
    }

    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use super::builtin::BUILTIN_CONTAINER_TYPES;
use crate::core::models::container_type::{ContainerTypeSpec, InvalidContainerTypeError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ContainerTypeEntry {
    well_count: usize,
    col_count: usize,
    well_volume: f64,
    #[serde(default)]
    dead_volume: f64,
    #[serde(default)]
    safe_min_volume: f64,
}

/// Lookup from a container-type short name to its [`ContainerTypeSpec`].
#[derive(Debug, Clone, Default)]
pub struct ContainerTypeRegistry {
    registry: HashMap<String, ContainerTypeSpec>,
}

impl ContainerTypeRegistry {
    /// Standard plate and tube types.
    pub fn builtin() -> Self {
        let registry = BUILTIN_CONTAINER_TYPES
            .entries()
            .map(|(name, t)| {
                let spec = ContainerTypeSpec {
                    shortname: name.to_string(),
                    well_count: t.well_count,
                    col_count: t.col_count,
                    well_volume: t.well_volume,
                    dead_volume: t.dead_volume,
                    safe_min_volume: t.safe_min_volume,
                };
                (name.to_string(), spec)
            })
            .collect();
        Self { registry }
    }

    /// Loads container types from a TOML file with one `[short-name]` table per type.
    pub fn load(path: &Path) -> Result<Self, RegistryLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let registry = Self::from_toml_str(&content).map_err(|e| match e {
            RegistryLoadError::Toml { source, .. } => RegistryLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })?;
        debug!(
            "Loaded {} container type(s) from {:?}",
            registry.len(),
            path
        );
        Ok(registry)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RegistryLoadError> {
        let entries: BTreeMap<String, ContainerTypeEntry> =
            toml::from_str(content).map_err(|e| RegistryLoadError::Toml {
                path: "<inline>".to_string(),
                source: e,
            })?;
        let mut registry = HashMap::with_capacity(entries.len());
        for (name, entry) in entries {
            let spec = ContainerTypeSpec::new(
                &name,
                entry.well_count,
                entry.col_count,
                entry.well_volume,
                entry.dead_volume,
                entry.safe_min_volume,
            )?;
            registry.insert(name, spec);
        }
        Ok(Self { registry })
    }

    /// Returns a registry where types from `other` replace same-named types of `self`.
    pub fn with_overrides(mut self, other: ContainerTypeRegistry) -> Self {
        self.registry.extend(other.registry);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ContainerTypeSpec> {
        self.registry.get(name)
    }

    /// Type names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    InvalidType(#[from] InvalidContainerTypeError),
}

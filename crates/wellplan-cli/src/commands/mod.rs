pub mod mastermix;
pub mod types;

use crate::error::Result;
use std::path::Path;
use tracing::info;
use wellplan::core::labware::registry::ContainerTypeRegistry;

/// Built-in container types, with the types from `extra` layered on top when given.
pub fn load_registry(extra: Option<&Path>) -> Result<ContainerTypeRegistry> {
    let builtin = ContainerTypeRegistry::builtin();
    match extra {
        Some(path) => {
            let overrides = ContainerTypeRegistry::load(path)?;
            info!(
                "Loaded {} container type(s) from {:?}",
                overrides.len(),
                path
            );
            Ok(builtin.with_overrides(overrides))
        }
        None => Ok(builtin),
    }
}

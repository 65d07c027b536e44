use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use wellplan::core::labware::registry::ContainerTypeRegistry;
use wellplan::core::models::ids::WellRef;
use wellplan::core::models::inventory::Inventory;
use wellplan::core::units::Volume;
use wellplan::engine::allocator::Destination;
use wellplan::engine::config::{MastermixConfig, MastermixConfigBuilder};

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileDestination {
    container_type: Option<String>,
    existing: Option<String>,
    start_well: Option<usize>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileFilledWell {
    well: usize,
    volume: Volume,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileContainer {
    name: String,
    container_type: String,
    #[serde(default)]
    filled: Vec<FileFilledWell>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileAliquot {
    container: String,
    well: usize,
    volume: Volume,
}

/// A mastermix request as written in a TOML file.
///
/// Containers declared under `[[containers]]` seed the inventory the request runs against;
/// aliquots and an `existing` destination refer to them by name.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct MastermixRequest {
    name: String,
    reactions: usize,
    multiplier: Option<f64>,
    use_dead_volume: Option<bool>,
    use_safe_volume: Option<bool>,
    #[serde(default)]
    columnwise: bool,
    destination: FileDestination,
    #[serde(default)]
    resources: BTreeMap<String, Volume>,
    #[serde(default)]
    containers: Vec<FileContainer>,
    #[serde(default)]
    aliquots: Vec<FileAliquot>,
}

impl MastermixRequest {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading mastermix request from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Builds the inventory described by the request and the engine configuration to run on it.
    pub fn into_plan(
        self,
        registry: &ContainerTypeRegistry,
    ) -> Result<(Inventory, MastermixConfig)> {
        let mut inventory = Inventory::new();
        for container in &self.containers {
            if inventory.find_container_by_name(&container.name).is_some() {
                return Err(CliError::Request(format!(
                    "Container '{}' is declared more than once.",
                    container.name
                )));
            }
            let spec = registry.get(&container.container_type).ok_or_else(|| {
                CliError::Request(format!(
                    "Container '{}' uses unknown container type '{}'.",
                    container.name, container.container_type
                ))
            })?;
            let id = inventory.add_container(&container.name, spec);
            for filled in &container.filled {
                inventory
                    .set_volume(WellRef::new(id, filled.well), filled.volume.as_microliters())
                    .map_err(|e| CliError::Request(e.to_string()))?;
            }
        }

        let lookup = |name: &str| {
            inventory.find_container_by_name(name).ok_or_else(|| {
                CliError::Request(format!("Container '{}' is not declared in [[containers]].", name))
            })
        };

        let destination = match (self.destination.container_type, self.destination.existing) {
            (Some(container_type), None) => {
                if self.destination.start_well.is_some() {
                    return Err(CliError::Request(
                        "`destination.start-well` only applies to an `existing` container.".to_string(),
                    ));
                }
                Destination::NewContainers(container_type)
            }
            (None, Some(existing)) => Destination::Existing {
                container: lookup(&existing)?,
                start_well: self.destination.start_well,
            },
            _ => {
                return Err(CliError::Request(
                    "`destination` needs exactly one of `container-type` or `existing`.".to_string(),
                ));
            }
        };

        let mut builder = MastermixConfigBuilder::new()
            .name(self.name)
            .destination(destination)
            .reactions(self.reactions)
            .columnwise(self.columnwise);
        if let Some(multiplier) = self.multiplier {
            builder = builder.multiplier(multiplier);
        }
        if let Some(flag) = self.use_dead_volume {
            builder = builder.use_dead_volume(flag);
        }
        if let Some(flag) = self.use_safe_volume {
            builder = builder.use_safe_volume(flag);
        }
        for (id, volume) in self.resources {
            builder = builder.resource(id, volume.as_microliters());
        }
        for aliquot in &self.aliquots {
            let container = lookup(&aliquot.container)?;
            builder = builder.aliquot(
                WellRef::new(container, aliquot.well),
                aliquot.volume.as_microliters(),
            );
        }

        let config = builder
            .build()
            .map_err(|e| CliError::Request(e.to_string()))?;
        Ok((inventory, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_request(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("request.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_a_request_with_new_containers() {
        let (_dir, path) = write_request(
            r#"
            name = "pcr_mm"
            reactions = 25
            multiplier = 1.2

            [destination]
            container-type = "96-pcr"

            [resources]
            rs17kj4vnh5xm3 = "7.5:microliter"
            rs18esg5hz25cm = 2.5
            "#,
        );
        let request = MastermixRequest::from_file(&path).unwrap();
        let (inventory, config) = request
            .into_plan(&ContainerTypeRegistry::builtin())
            .unwrap();

        assert_eq!(inventory.container_count(), 0);
        assert_eq!(config.name, "pcr_mm");
        assert_eq!(config.reactions, 25);
        assert_eq!(config.multiplier, 1.2);
        assert!(config.use_safe_volume);
        assert_eq!(
            config.destination,
            Destination::NewContainers("96-pcr".to_string())
        );
        assert_eq!(
            config.resources,
            vec![
                ("rs17kj4vnh5xm3".to_string(), 7.5),
                ("rs18esg5hz25cm".to_string(), 2.5)
            ]
        );
    }

    #[test]
    fn seeds_declared_containers_and_resolves_aliquots() {
        let (_dir, path) = write_request(
            r#"
            name = "mm"
            reactions = 8
            use-safe-volume = false

            [destination]
            existing = "mm_plate"
            start-well = 12

            [[containers]]
            name = "mm_plate"
            container-type = "96-pcr"

            [[containers]]
            name = "dna"
            container-type = "micro-1.5"
            filled = [{ well = 0, volume = "0.2:milliliter" }]

            [[aliquots]]
            container = "dna"
            well = 0
            volume = "2 uL"
            "#,
        );
        let (inventory, config) = MastermixRequest::from_file(&path)
            .unwrap()
            .into_plan(&ContainerTypeRegistry::builtin())
            .unwrap();

        let plate = inventory.find_container_by_name("mm_plate").unwrap();
        let dna = inventory.find_container_by_name("dna").unwrap();
        assert_eq!(
            config.destination,
            Destination::Existing {
                container: plate,
                start_well: Some(12)
            }
        );
        assert_eq!(config.aliquots, vec![(WellRef::new(dna, 0), 2.0)]);
        assert!(!config.use_safe_volume);
        assert_eq!(inventory.well(WellRef::new(dna, 0)).unwrap().volume(), Some(200.0));
    }

    #[test]
    fn rejects_ambiguous_destinations() {
        let (_dir, path) = write_request(
            r#"
            name = "mm"
            reactions = 8

            [destination]
            container-type = "96-pcr"
            existing = "plate"
            "#,
        );
        let result = MastermixRequest::from_file(&path)
            .unwrap()
            .into_plan(&ContainerTypeRegistry::builtin());
        assert!(matches!(result, Err(CliError::Request(_))));
    }

    #[test]
    fn rejects_unknown_fields() {
        let (_dir, path) = write_request(
            r#"
            name = "mm"
            reactions = 8
            reaction-volume = 10

            [destination]
            container-type = "96-pcr"
            "#,
        );
        assert!(matches!(
            MastermixRequest::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn rejects_aliquots_in_undeclared_containers() {
        let (_dir, path) = write_request(
            r#"
            name = "mm"
            reactions = 8

            [destination]
            container-type = "micro-1.5"

            [[aliquots]]
            container = "ghost"
            well = 0
            volume = 2
            "#,
        );
        let result = MastermixRequest::from_file(&path)
            .unwrap()
            .into_plan(&ContainerTypeRegistry::builtin());
        match result {
            Err(CliError::Request(msg)) => assert!(msg.contains("ghost")),
            other => panic!("expected a request error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = MastermixRequest::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}

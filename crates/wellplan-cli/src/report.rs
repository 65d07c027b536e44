use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use serde::Serialize;
use wellplan::core::models::ids::WellRef;
use wellplan::core::models::inventory::Inventory;
use wellplan::engine::plan::{Instruction, TransferOptions};
use wellplan::engine::utils::query::well_name;
use wellplan::workflows::mastermix::{MastermixOutput, ShortfallKind};

/// A well addressed by container name, since container ids mean nothing outside a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellAddress {
    pub container: String,
    pub well: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WellReport {
    pub container: String,
    pub well: usize,
    pub label: String,
    pub volume: f64,
    pub reactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum InstructionReport {
    Provision {
        resource: String,
        volumes: Vec<f64>,
        destinations: Vec<WellAddress>,
    },
    Transfer {
        volumes: Vec<f64>,
        source: WellAddress,
        destinations: Vec<WellAddress>,
        options: TransferOptions,
    },
    Mix {
        volume: f64,
        repetitions: u32,
        well: WellAddress,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShortfallReport {
    pub source: String,
    pub available: f64,
    pub needed: f64,
    pub kind: ShortfallKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MastermixReport {
    pub name: String,
    pub container_type: String,
    pub reactions: usize,
    pub per_reaction_volume: f64,
    pub multiplier: f64,
    pub reactions_per_well: usize,
    pub created_containers: Vec<String>,
    pub wells: Vec<WellReport>,
    pub shortfalls: Vec<ShortfallReport>,
    pub instructions: Vec<InstructionReport>,
}

fn address(inventory: &Inventory, well: WellRef) -> Result<WellAddress> {
    let container = inventory
        .get_container(well.container)
        .map_err(|e| CliError::Other(e.into()))?;
    Ok(WellAddress {
        container: container.name.clone(),
        well: well.index,
    })
}

fn addresses<'a>(
    inventory: &Inventory,
    wells: impl IntoIterator<Item = &'a WellRef>,
) -> Result<Vec<WellAddress>> {
    wells.into_iter().map(|w| address(inventory, *w)).collect()
}

impl MastermixReport {
    pub fn build(name: &str, inventory: &Inventory, output: &MastermixOutput) -> Result<Self> {
        let plan = &output.plan;

        let mut wells = Vec::with_capacity(output.wells.len());
        for ((well, volume), reactions) in output
            .wells
            .iter()
            .zip(&output.volumes)
            .zip(&plan.reactions_per_entry)
        {
            let WellAddress { container, well: index } = address(inventory, *well)?;
            wells.push(WellReport {
                container,
                well: index,
                label: well_name(inventory, *well, None).map_err(|e| CliError::Other(e.into()))?,
                volume: *volume,
                reactions: *reactions,
            });
        }

        let created_containers = output
            .created_containers
            .iter()
            .map(|id| {
                inventory
                    .get_container(*id)
                    .map(|c| c.name.clone())
                    .map_err(|e| CliError::Other(e.into()))
            })
            .collect::<Result<Vec<_>>>()?;

        let shortfalls = output
            .shortfalls
            .iter()
            .map(|s| ShortfallReport {
                source: s.label.clone(),
                available: s.available,
                needed: s.needed,
                kind: s.kind,
            })
            .collect();

        let instructions = output
            .instructions
            .iter()
            .map(|instruction| instruction_report(inventory, instruction))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            container_type: plan.container_type.clone(),
            reactions: plan.reactions_total,
            per_reaction_volume: plan.per_reaction_volume,
            multiplier: plan.multiplier,
            reactions_per_well: plan.reactions_per_well,
            created_containers,
            wells,
            shortfalls,
            instructions,
        })
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| CliError::Other(e.into()))
            }
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| CliError::Other(e.into()))
            }
        }
    }
}

fn instruction_report(inventory: &Inventory, instruction: &Instruction) -> Result<InstructionReport> {
    Ok(match instruction {
        Instruction::Provision {
            resource,
            destinations,
            volumes,
        } => InstructionReport::Provision {
            resource: resource.to_string(),
            destinations: addresses(inventory, destinations)?,
            volumes: volumes.clone(),
        },
        Instruction::Transfer {
            source,
            destinations,
            volumes,
            options,
        } => InstructionReport::Transfer {
            source: address(inventory, *source)?,
            destinations: addresses(inventory, destinations)?,
            volumes: volumes.clone(),
            options: *options,
        },
        Instruction::Mix {
            well,
            volume,
            repetitions,
        } => InstructionReport::Mix {
            well: address(inventory, *well)?,
            volume: *volume,
            repetitions: *repetitions,
        },
    })
}
